use crate::dom::{Dom, NodeId, has_class};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorAttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
    StartsWith { key: String, value: String },
    EndsWith { key: String, value: String },
    Contains { key: String, value: String },
    Includes { key: String, value: String },
    DashMatch { key: String, value: String },
}

impl SelectorAttrCondition {
    fn matches(&self, actual: Option<&String>) -> bool {
        match self {
            Self::Exists { .. } => actual.is_some(),
            Self::Eq { value, .. } => actual == Some(value),
            Self::StartsWith { value, .. } => {
                !value.is_empty() && actual.is_some_and(|actual| actual.starts_with(value.as_str()))
            }
            Self::EndsWith { value, .. } => {
                !value.is_empty() && actual.is_some_and(|actual| actual.ends_with(value.as_str()))
            }
            Self::Contains { value, .. } => {
                !value.is_empty() && actual.is_some_and(|actual| actual.contains(value.as_str()))
            }
            Self::Includes { value, .. } => actual
                .is_some_and(|actual| actual.split_whitespace().any(|token| token == value)),
            Self::DashMatch { value, .. } => actual.is_some_and(|actual| {
                actual == value
                    || actual
                        .strip_prefix(value.as_str())
                        .is_some_and(|rest| rest.starts_with('-'))
            }),
        }
    }

    fn key(&self) -> &str {
        match self {
            Self::Exists { key }
            | Self::Eq { key, .. }
            | Self::StartsWith { key, .. }
            | Self::EndsWith { key, .. }
            | Self::Contains { key, .. }
            | Self::Includes { key, .. }
            | Self::DashMatch { key, .. } => key,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SelectorPseudoClass {
    FirstChild,
    LastChild,
    OnlyChild,
    FirstOfType,
    LastOfType,
    Checked,
    Disabled,
    Enabled,
    Required,
    Optional,
    Empty,
    NthChild(NthChildSelector),
    NthLastChild(NthChildSelector),
    Not(Vec<Vec<SelectorPart>>),
    Is(Vec<Vec<SelectorPart>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NthChildSelector {
    Exact(usize),
    Odd,
    Even,
    AnPlusB(i64, i64),
}

impl NthChildSelector {
    fn matches(&self, index: usize) -> bool {
        match self {
            Self::Exact(expected) => index == *expected,
            Self::Odd => index % 2 == 1,
            Self::Even => index % 2 == 0,
            Self::AnPlusB(a, b) => {
                let diff = index as i64 - *b;
                if *a == 0 {
                    return diff == 0;
                }
                diff % *a == 0 && (diff / *a) >= 0
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) universal: bool,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<SelectorAttrCondition>,
    pub(crate) pseudo_classes: Vec<SelectorPseudoClass>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if !self.universal
            && self.tag.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && self.pseudo_classes.is_empty()
        {
            self.id.as_deref()
        } else {
            None
        }
    }

    fn is_empty(&self) -> bool {
        self.tag.is_none()
            && self.id.is_none()
            && self.classes.is_empty()
            && self.attrs.is_empty()
            && !self.universal
            && self.pseudo_classes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SelectorCombinator {
    Descendant,
    Child,
    AdjacentSibling,
    GeneralSibling,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SelectorPart {
    pub(crate) step: SelectorStep,
    // Relation to previous (left) selector part.
    pub(crate) combinator: Option<SelectorCombinator>,
}

pub(crate) fn parse_selector_groups(selector: &str) -> Result<Vec<Vec<SelectorPart>>> {
    let groups = split_selector_groups(selector)?;
    let mut parsed = Vec::with_capacity(groups.len());
    for group in groups {
        parsed.push(parse_selector_chain(&group)?);
    }
    Ok(parsed)
}

fn parse_selector_chain(selector: &str) -> Result<Vec<SelectorPart>> {
    let selector = selector.trim();
    if selector.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    let mut steps = Vec::new();
    let mut pending_combinator: Option<SelectorCombinator> = None;

    for token in tokenize_selector(selector)? {
        let combinator = match token.as_str() {
            ">" => Some(SelectorCombinator::Child),
            "+" => Some(SelectorCombinator::AdjacentSibling),
            "~" => Some(SelectorCombinator::GeneralSibling),
            _ => None,
        };
        if let Some(combinator) = combinator {
            if pending_combinator.is_some() || steps.is_empty() {
                return Err(Error::UnsupportedSelector(selector.into()));
            }
            pending_combinator = Some(combinator);
            continue;
        }

        let step = parse_selector_step(&token)?;
        let combinator = if steps.is_empty() {
            None
        } else {
            Some(
                pending_combinator
                    .take()
                    .unwrap_or(SelectorCombinator::Descendant),
            )
        };
        steps.push(SelectorPart { step, combinator });
    }

    if steps.is_empty() || pending_combinator.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }

    Ok(steps)
}

/// Walks `selector` and calls `on_top_level` for every character outside of
/// brackets, parens and quotes. Returning `true` consumes the character.
fn scan_top_level(
    selector: &str,
    mut on_top_level: impl FnMut(char, &mut String) -> bool,
) -> Result<String> {
    let mut current = String::new();
    let mut bracket_depth = 0usize;
    let mut paren_depth = 0usize;
    let mut quote: Option<char> = None;

    for ch in selector.chars() {
        if let Some(q) = quote {
            current.push(ch);
            if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' if bracket_depth > 0 || paren_depth > 0 => {
                quote = Some(ch);
                current.push(ch);
            }
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                bracket_depth = bracket_depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
                current.push(ch);
            }
            '(' => {
                paren_depth += 1;
                current.push(ch);
            }
            ')' => {
                paren_depth = paren_depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::UnsupportedSelector(selector.into()))?;
                current.push(ch);
            }
            _ if bracket_depth == 0 && paren_depth == 0 => {
                if !on_top_level(ch, &mut current) {
                    current.push(ch);
                }
            }
            _ => current.push(ch),
        }
    }

    if bracket_depth != 0 || paren_depth != 0 || quote.is_some() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    Ok(current)
}

fn split_selector_groups(selector: &str) -> Result<Vec<String>> {
    let mut groups = Vec::new();
    let mut empty_group = false;
    let tail = scan_top_level(selector, |ch, current| {
        if ch != ',' {
            return false;
        }
        let trimmed = current.trim();
        if trimmed.is_empty() {
            empty_group = true;
        }
        groups.push(trimmed.to_string());
        current.clear();
        true
    })?;

    let trimmed = tail.trim();
    if empty_group || trimmed.is_empty() {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(trimmed.to_string());
    Ok(groups)
}

fn tokenize_selector(selector: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let tail = scan_top_level(selector, |ch, current| {
        let is_combinator = matches!(ch, '>' | '+' | '~');
        if !is_combinator && !ch.is_ascii_whitespace() {
            return false;
        }
        if !current.trim().is_empty() {
            tokens.push(current.trim().to_string());
        }
        current.clear();
        if is_combinator {
            tokens.push(ch.to_string());
        }
        true
    })?;

    if !tail.trim().is_empty() {
        tokens.push(tail.trim().to_string());
    }
    Ok(tokens)
}

fn parse_selector_step(part: &str) -> Result<SelectorStep> {
    let part = part.trim();
    let unsupported = || Error::UnsupportedSelector(part.into());
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'*' => {
                if step.universal || !step.is_empty() {
                    return Err(unsupported());
                }
                step.universal = true;
                i += 1;
            }
            b'#' => {
                let (id, next) = parse_selector_ident(part, i + 1).ok_or_else(unsupported)?;
                if step.id.replace(id).is_some() {
                    return Err(unsupported());
                }
                i = next;
            }
            b'.' => {
                let (class_name, next) =
                    parse_selector_ident(part, i + 1).ok_or_else(unsupported)?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (attr, next) = parse_selector_attr_condition(part, i)?;
                step.attrs.push(attr);
                i = next;
            }
            b':' => {
                let (pseudo, next) = parse_selector_pseudo(part, i).ok_or_else(unsupported)?;
                step.pseudo_classes.push(pseudo);
                i = next;
            }
            _ => {
                if !step.is_empty() {
                    return Err(unsupported());
                }
                let (tag, next) = parse_selector_ident(part, i).ok_or_else(unsupported)?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step.is_empty() {
        return Err(unsupported());
    }
    Ok(step)
}

const SIMPLE_PSEUDO_CLASSES: &[(&str, SelectorPseudoClass)] = &[
    ("first-child", SelectorPseudoClass::FirstChild),
    ("last-child", SelectorPseudoClass::LastChild),
    ("only-child", SelectorPseudoClass::OnlyChild),
    ("first-of-type", SelectorPseudoClass::FirstOfType),
    ("last-of-type", SelectorPseudoClass::LastOfType),
    ("checked", SelectorPseudoClass::Checked),
    ("disabled", SelectorPseudoClass::Disabled),
    ("enabled", SelectorPseudoClass::Enabled),
    ("required", SelectorPseudoClass::Required),
    ("optional", SelectorPseudoClass::Optional),
    ("empty", SelectorPseudoClass::Empty),
];

fn parse_selector_pseudo(part: &str, start: usize) -> Option<(SelectorPseudoClass, usize)> {
    if part.as_bytes().get(start)? != &b':' {
        return None;
    }
    let start = start + 1;
    let tail = part.get(start..)?;

    for (name, pseudo) in SIMPLE_PSEUDO_CLASSES {
        if let Some(rest) = tail.strip_prefix(name) {
            if rest.as_bytes().first().is_none_or(is_selector_continuation) {
                return Some((pseudo.clone(), start + name.len()));
            }
        }
    }

    if let Some((inners, next)) = parse_pseudo_selector_list(part, start, "not(") {
        return Some((SelectorPseudoClass::Not(inners), next));
    }

    if let Some((inners, next)) = parse_pseudo_selector_list(part, start, "is(") {
        return Some((SelectorPseudoClass::Is(inners), next));
    }

    for (prefix, last) in [("nth-last-child(", true), ("nth-child(", false)] {
        let Some(body) = tail.strip_prefix(prefix) else {
            continue;
        };
        let close_pos = find_matching_paren(body)?;
        let selector = parse_nth_child_selector(body[..close_pos].trim())?;
        let next = start + prefix.len() + close_pos + 1;
        if part
            .as_bytes()
            .get(next)
            .is_some_and(|ch| !is_selector_continuation(ch))
        {
            return None;
        }
        let pseudo = if last {
            SelectorPseudoClass::NthLastChild(selector)
        } else {
            SelectorPseudoClass::NthChild(selector)
        };
        return Some((pseudo, next));
    }

    None
}

fn parse_pseudo_selector_list(
    part: &str,
    start: usize,
    prefix: &str,
) -> Option<(Vec<Vec<SelectorPart>>, usize)> {
    let rest = part.get(start..)?.strip_prefix(prefix)?;
    let close_pos = find_matching_paren(rest)?;
    let body = rest[..close_pos].trim();
    if body.is_empty() {
        return None;
    }

    let selectors = parse_selector_groups(body).ok()?;
    let next = start + prefix.len() + close_pos + 1;
    if part
        .as_bytes()
        .get(next)
        .is_some_and(|ch| !is_selector_continuation(ch))
    {
        return None;
    }
    Some((selectors, next))
}

fn find_matching_paren(body: &str) -> Option<usize> {
    let mut paren_depth = 1usize;
    let mut quote: Option<u8> = None;

    for (idx, b) in body.bytes().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' => quote = Some(b),
            b'(' => paren_depth += 1,
            b')' => {
                paren_depth -= 1;
                if paren_depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }
    None
}

fn parse_nth_child_selector(raw: &str) -> Option<NthChildSelector> {
    let compact = raw
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    match compact.as_str() {
        "" => None,
        "odd" => Some(NthChildSelector::Odd),
        "even" => Some(NthChildSelector::Even),
        other if other.contains('n') => parse_nth_child_expression(other),
        other if other.starts_with(['+', '-']) => None,
        other => match other.parse::<usize>().ok()? {
            0 => None,
            value => Some(NthChildSelector::Exact(value)),
        },
    }
}

fn parse_nth_child_expression(expr: &str) -> Option<NthChildSelector> {
    if expr.matches('n').count() != 1 {
        return None;
    }

    let n_pos = expr.find('n')?;
    let (a_part, rest) = expr.split_at(n_pos);
    let b_part = &rest[1..];

    let a = match a_part {
        "" | "+" => 1,
        "-" => -1,
        _ => a_part.parse::<i64>().ok()?,
    };

    if b_part.is_empty() {
        return Some(NthChildSelector::AnPlusB(a, 0));
    }

    let (sign, raw_b) = if let Some(rest) = b_part.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = b_part.strip_prefix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let b = raw_b.parse::<i64>().ok()?;
    Some(NthChildSelector::AnPlusB(a, b * sign))
}

fn is_selector_continuation(next: &u8) -> bool {
    matches!(next, b'.' | b'#' | b'[' | b':')
}

fn parse_selector_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_selector_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_selector_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src.get(start..end)?.to_string(), end))
}

fn is_selector_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn parse_selector_attr_condition(
    src: &str,
    open_bracket: usize,
) -> Result<(SelectorAttrCondition, usize)> {
    let unsupported = || Error::UnsupportedSelector(src.into());
    let bytes = src.as_bytes();
    let mut i = open_bracket + 1;

    skip_ws(bytes, &mut i);
    let key_start = i;
    while i < bytes.len() && (is_selector_ident_char(bytes[i]) || bytes[i] == b':') {
        i += 1;
    }
    if key_start == i {
        return Err(unsupported());
    }
    let key = src
        .get(key_start..i)
        .ok_or_else(unsupported)?
        .to_ascii_lowercase();

    skip_ws(bytes, &mut i);
    if bytes.get(i) == Some(&b']') {
        return Ok((SelectorAttrCondition::Exists { key }, i + 1));
    }

    let (op, width) = match (bytes.get(i), bytes.get(i + 1)) {
        (Some(b'='), _) => (b'=', 1),
        (Some(op @ (b'^' | b'$' | b'*' | b'~' | b'|')), Some(b'=')) => (*op, 2),
        _ => return Err(unsupported()),
    };
    i += width;

    skip_ws(bytes, &mut i);
    let (value, after_value) = parse_selector_attr_value(src, i)?;
    i = after_value;
    skip_ws(bytes, &mut i);
    if bytes.get(i) != Some(&b']') {
        return Err(unsupported());
    }

    let cond = match op {
        b'=' => SelectorAttrCondition::Eq { key, value },
        b'^' => SelectorAttrCondition::StartsWith { key, value },
        b'$' => SelectorAttrCondition::EndsWith { key, value },
        b'*' => SelectorAttrCondition::Contains { key, value },
        b'~' => SelectorAttrCondition::Includes { key, value },
        _ => SelectorAttrCondition::DashMatch { key, value },
    };

    Ok((cond, i + 1))
}

fn parse_selector_attr_value(src: &str, start: usize) -> Result<(String, usize)> {
    let bytes = src.as_bytes();
    let Some(&first) = bytes.get(start) else {
        return Err(Error::UnsupportedSelector(src.into()));
    };

    if first == b'"' || first == b'\'' {
        let mut i = start + 1;
        while i < bytes.len() {
            if bytes[i] == b'\\' {
                i += 2;
                continue;
            }
            if bytes[i] == first {
                let raw = src
                    .get(start + 1..i)
                    .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
                return Ok((unescape_selector_string(raw), i + 1));
            }
            i += 1;
        }
        return Err(Error::UnsupportedSelector(src.into()));
    }

    let mut i = start;
    while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b']' {
        i += 1;
    }
    let raw = src
        .get(start..i)
        .ok_or_else(|| Error::UnsupportedSelector(src.into()))?;
    Ok((unescape_selector_string(raw), i))
}

fn unescape_selector_string(src: &str) -> String {
    let mut out = String::with_capacity(src.len());
    let mut chars = src.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
            continue;
        }
        out.push(ch);
    }
    out
}

fn skip_ws(bytes: &[u8], i: &mut usize) {
    while *i < bytes.len() && bytes[*i].is_ascii_whitespace() {
        *i += 1;
    }
}

impl Dom {
    pub(crate) fn matches_selector_chain(&self, node_id: NodeId, steps: &[SelectorPart]) -> bool {
        let Some(last) = steps.last() else {
            return false;
        };
        if !self.matches_step(node_id, &last.step) {
            return false;
        }

        let mut current = node_id;
        for idx in (1..steps.len()).rev() {
            let prev_step = &steps[idx - 1].step;
            let combinator = steps[idx]
                .combinator
                .unwrap_or(SelectorCombinator::Descendant);

            let matched = match combinator {
                SelectorCombinator::Child => self
                    .parent(current)
                    .filter(|parent| self.matches_step(*parent, prev_step)),
                SelectorCombinator::Descendant => {
                    let mut cursor = self.parent(current);
                    let mut found = None;
                    while let Some(parent) = cursor {
                        if self.matches_step(parent, prev_step) {
                            found = Some(parent);
                            break;
                        }
                        cursor = self.parent(parent);
                    }
                    found
                }
                SelectorCombinator::AdjacentSibling => self
                    .previous_element_sibling(current)
                    .filter(|sibling| self.matches_step(*sibling, prev_step)),
                SelectorCombinator::GeneralSibling => {
                    let mut cursor = self.previous_element_sibling(current);
                    let mut found = None;
                    while let Some(sibling) = cursor {
                        if self.matches_step(sibling, prev_step) {
                            found = Some(sibling);
                            break;
                        }
                        cursor = self.previous_element_sibling(sibling);
                    }
                    found
                }
            };

            let Some(matched) = matched else {
                return false;
            };
            current = matched;
        }

        true
    }

    fn matches_step(&self, node_id: NodeId, step: &SelectorStep) -> bool {
        let Some(element) = self.element(node_id) else {
            return false;
        };

        if let Some(tag) = &step.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }

        if let Some(id) = &step.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }

        if step
            .classes
            .iter()
            .any(|class_name| !has_class(element, class_name))
        {
            return false;
        }

        if step
            .attrs
            .iter()
            .any(|cond| !cond.matches(element.attrs.get(cond.key())))
        {
            return false;
        }

        step.pseudo_classes.iter().all(|pseudo| match pseudo {
            SelectorPseudoClass::FirstChild => self.previous_element_sibling(node_id).is_none(),
            SelectorPseudoClass::LastChild => self.next_element_sibling(node_id).is_none(),
            SelectorPseudoClass::OnlyChild => self.element_siblings(node_id).len() == 1,
            SelectorPseudoClass::FirstOfType => self
                .element_siblings(node_id)
                .into_iter()
                .find(|sibling| self.tag_name(*sibling) == Some(element.tag_name.as_str()))
                == Some(node_id),
            SelectorPseudoClass::LastOfType => self
                .element_siblings(node_id)
                .into_iter()
                .rev()
                .find(|sibling| self.tag_name(*sibling) == Some(element.tag_name.as_str()))
                == Some(node_id),
            SelectorPseudoClass::Checked => element.checked,
            SelectorPseudoClass::Disabled => element.disabled,
            SelectorPseudoClass::Enabled => !element.disabled,
            SelectorPseudoClass::Required => element.required,
            SelectorPseudoClass::Optional => !element.required,
            SelectorPseudoClass::Empty => self.children(node_id).is_empty(),
            SelectorPseudoClass::NthChild(selector) => self
                .element_index(node_id)
                .is_some_and(|index| selector.matches(index)),
            SelectorPseudoClass::NthLastChild(selector) => {
                let total = self.element_siblings(node_id).len();
                self.element_index(node_id)
                    .is_some_and(|index| selector.matches(total + 1 - index))
            }
            SelectorPseudoClass::Not(inners) => !inners
                .iter()
                .any(|inner| self.matches_selector_chain(node_id, inner)),
            SelectorPseudoClass::Is(inners) => inners
                .iter()
                .any(|inner| self.matches_selector_chain(node_id, inner)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_document;

    fn ids(dom: &Dom, selector: &str) -> Result<Vec<String>> {
        Ok(dom
            .query_selector_all(selector)?
            .into_iter()
            .map(|node| dom.attr(node, "id").unwrap_or_default())
            .collect())
    }

    #[test]
    fn descendant_and_child_combinators_match() -> Result<()> {
        let dom = parse_document(
            r#"
            <nav class="navbar">
              <ul><li><a id="home" class="nav-link" href="/">Home</a></li></ul>
              <a id="direct" class="nav-link" href="/x">X</a>
            </nav>
            <a id="outside" class="nav-link" href="/y">Y</a>
            "#,
        )?;
        assert_eq!(ids(&dom, ".navbar .nav-link")?, vec!["home", "direct"]);
        assert_eq!(ids(&dom, ".navbar > .nav-link")?, vec!["direct"]);
        Ok(())
    }

    #[test]
    fn attribute_operators_match() -> Result<()> {
        let dom = parse_document(
            r#"
            <input id="search" placeholder="Search students...">
            <input id="name" placeholder="Full name">
            <img id="lazy" data-src="/a.png">
            <img id="eager" src="/b.png">
            <p id="lang" lang="en-US"></p>
            "#,
        )?;
        assert_eq!(ids(&dom, r#"input[placeholder*="Search"]"#)?, vec!["search"]);
        assert_eq!(ids(&dom, "img[data-src]")?, vec!["lazy"]);
        assert_eq!(ids(&dom, "[src^='/b']")?, vec!["eager"]);
        assert_eq!(ids(&dom, "[lang|=en]")?, vec!["lang"]);
        assert!(ids(&dom, "input[placeholder*='']")?.is_empty());
        Ok(())
    }

    #[test]
    fn selector_groups_keep_document_order() -> Result<()> {
        let dom = parse_document(
            r#"<form><select id="s"></select><input id="i"><textarea id="t"></textarea></form>"#,
        )?;
        assert_eq!(ids(&dom, "input, textarea, select")?, vec!["s", "i", "t"]);
        Ok(())
    }

    #[test]
    fn pseudo_classes_match_structure_and_state() -> Result<()> {
        let dom = parse_document(
            r#"
            <ul>
              <li id="a">1</li><li id="b" class="x">2</li><li id="c">3</li>
            </ul>
            <input id="on" type="checkbox" checked><input id="off" type="checkbox">
            "#,
        )?;
        assert_eq!(ids(&dom, "li:first-child")?, vec!["a"]);
        assert_eq!(ids(&dom, "li:nth-child(odd)")?, vec!["a", "c"]);
        assert_eq!(ids(&dom, "li:nth-last-child(1)")?, vec!["c"]);
        assert_eq!(ids(&dom, "li:not(.x)")?, vec!["a", "c"]);
        assert_eq!(ids(&dom, "input:checked")?, vec!["on"]);
        assert_eq!(ids(&dom, "li + li.x")?, vec!["b"]);
        assert_eq!(ids(&dom, "#a ~ li")?, vec!["b", "c"]);
        Ok(())
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        for selector in ["", "a,", "> a", "a >", "[x", "a::b", "div..x"] {
            let err = parse_selector_groups(selector).expect_err(selector);
            assert!(matches!(err, Error::UnsupportedSelector(_)), "{selector}");
        }
    }
}
