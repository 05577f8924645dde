use std::collections::BTreeMap;
use std::sync::LazyLock;

use fancy_regex::Regex;

use crate::dom::{Dom, NodeId, input_type, is_checkable_input};
use crate::{Error, Result};

const TRACKED_CONTROLS: &str = "input, textarea, select";

const PROCESSING_HTML: &str = r#"<span class="spinner-border spinner-border-sm me-2" role="status" aria-hidden="true"></span>Processing..."#;

// https://html.spec.whatwg.org/multipage/input.html#valid-e-mail-address
const EMAIL_PATTERN: &str = r"[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*";

const URL_PATTERN: &str = r"(?i:https?|ftp|wss?)://[^\s/?#]+\S*|(?!(?i:https?|ftp|wss?):)[A-Za-z][A-Za-z0-9+.\-]*:\S*";

static EMAIL_REGEX: LazyLock<Result<Regex>> = LazyLock::new(|| compile_pattern(EMAIL_PATTERN));

static URL_REGEX: LazyLock<Result<Regex>> = LazyLock::new(|| compile_pattern(URL_PATTERN));

/// What the page's submit listeners made of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// False when the target had no form to submit.
    pub dispatched: bool,
    pub default_prevented: bool,
    pub valid: bool,
    /// No tracked control differs from its load-time value and the form
    /// does not opt out with `allow-empty-submit`.
    pub unchanged: bool,
}

impl Default for SubmitOutcome {
    fn default() -> Self {
        Self {
            dispatched: false,
            default_prevented: false,
            valid: true,
            unchanged: false,
        }
    }
}

/// Per-form record of the control values present when the page initialized.
/// Values are keyed by `name`, with `""` for unnamed controls. Controls
/// sharing a name keep the value of the last one in document order.
#[derive(Debug, Clone)]
pub(crate) struct FormController {
    form: NodeId,
    controls: Vec<(String, NodeId)>,
    initial: BTreeMap<String, String>,
}

impl FormController {
    pub(crate) fn capture(dom: &Dom, form: NodeId) -> Result<Self> {
        let mut controls = Vec::new();
        let mut initial = BTreeMap::new();
        for control in dom.query_selector_all_from(form, TRACKED_CONTROLS)? {
            let name = dom.attr(control, "name").unwrap_or_default();
            initial.insert(name.clone(), dom.value(control)?);
            controls.push((name, control));
        }
        Ok(Self {
            form,
            controls,
            initial,
        })
    }

    pub(crate) fn form(&self) -> NodeId {
        self.form
    }

    pub(crate) fn initial_values(&self) -> &BTreeMap<String, String> {
        &self.initial
    }

    /// True when any control's value differs from the value recorded under
    /// its name. Checked state is not compared.
    pub(crate) fn has_changes(&self, dom: &Dom) -> Result<bool> {
        for (name, control) in &self.controls {
            if self.initial.get(name) != Some(&dom.value(*control)?) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub(crate) fn flags_unchanged(&self, dom: &Dom) -> Result<bool> {
        Ok(!self.has_changes(dom)? && !dom.class_contains(self.form, "allow-empty-submit"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidityIssue {
    ValueMissing,
    TypeMismatch,
    BadInput,
    RangeUnderflow,
    RangeOverflow,
    TooShort,
    TooLong,
    PatternMismatch,
}

pub(crate) fn check_validity(dom: &Dom, form: NodeId) -> Result<bool> {
    for control in dom.query_selector_all_from(form, TRACKED_CONTROLS)? {
        if !control_issues(dom, control)?.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Constraint violations of one control. Barred controls have none.
pub(crate) fn control_issues(dom: &Dom, control: NodeId) -> Result<Vec<ValidityIssue>> {
    if is_barred(dom, control)? {
        return Ok(Vec::new());
    }

    let kind = input_type(dom, control);
    let value = dom.value(control)?;
    let mut issues = Vec::new();

    if dom.required(control) && is_missing(dom, control, kind.as_deref(), &value)? {
        issues.push(ValidityIssue::ValueMissing);
    }
    if value.is_empty() || is_checkable_input(dom, control) {
        return Ok(issues);
    }

    match kind.as_deref() {
        Some("email") => {
            let addresses: Vec<&str> = if dom.has_attr(control, "multiple") {
                value.split(',').map(str::trim).collect()
            } else {
                vec![value.as_str()]
            };
            for address in addresses {
                if !full_match(&EMAIL_REGEX, address)? {
                    issues.push(ValidityIssue::TypeMismatch);
                    break;
                }
            }
        }
        Some("url") => {
            if !full_match(&URL_REGEX, &value)? {
                issues.push(ValidityIssue::TypeMismatch);
            }
        }
        Some("number") => match parse_number(&value) {
            Some(number) => {
                let min = dom.attr(control, "min").and_then(|raw| parse_number(&raw));
                let max = dom.attr(control, "max").and_then(|raw| parse_number(&raw));
                if min.is_some_and(|min| number < min) {
                    issues.push(ValidityIssue::RangeUnderflow);
                }
                if max.is_some_and(|max| number > max) {
                    issues.push(ValidityIssue::RangeOverflow);
                }
            }
            None => issues.push(ValidityIssue::BadInput),
        },
        _ => {}
    }

    if supports_length_and_pattern(dom, control, kind.as_deref()) {
        let length = value.chars().count();
        let limit = |name: &str| {
            dom.attr(control, name)
                .and_then(|raw| raw.trim().parse::<usize>().ok())
        };
        if limit("minlength").is_some_and(|min| length < min) {
            issues.push(ValidityIssue::TooShort);
        }
        if limit("maxlength").is_some_and(|max| length > max) {
            issues.push(ValidityIssue::TooLong);
        }

        if kind.is_some() {
            if let Some(pattern) = dom.attr(control, "pattern") {
                // an uncompilable pattern is no constraint
                if let Ok(regex) = compile_pattern(&pattern) {
                    let matched = regex.is_match(&value).map_err(|err| {
                        Error::Runtime(format!("pattern {pattern:?} failed to run: {err}"))
                    })?;
                    if !matched {
                        issues.push(ValidityIssue::PatternMismatch);
                    }
                }
            }
        }
    }

    Ok(issues)
}

/// Compiles an HTML `pattern` attribute, which must match the whole value.
pub(crate) fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|err| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: err.to_string(),
    })
}

fn full_match(regex: &Result<Regex>, value: &str) -> Result<bool> {
    let regex = regex.as_ref().map_err(Clone::clone)?;
    regex.is_match(value).map_err(|err| {
        Error::Runtime(format!("pattern {:?} failed to run: {err}", regex.as_str()))
    })
}

fn is_barred(dom: &Dom, control: NodeId) -> Result<bool> {
    if dom.disabled(control) || dom.closest(control, "fieldset[disabled]")?.is_some() {
        return Ok(true);
    }
    if matches!(
        input_type(dom, control).as_deref(),
        Some("hidden" | "submit" | "reset" | "button" | "image")
    ) {
        return Ok(true);
    }
    Ok(dom.readonly(control) && !dom.has_tag(control, "select"))
}

fn is_missing(dom: &Dom, control: NodeId, kind: Option<&str>, value: &str) -> Result<bool> {
    match kind {
        Some("checkbox") => Ok(!dom.checked(control)?),
        Some("radio") => radio_group_unchecked(dom, control),
        _ => Ok(value.is_empty()),
    }
}

fn radio_group_unchecked(dom: &Dom, radio: NodeId) -> Result<bool> {
    if dom.checked(radio)? {
        return Ok(false);
    }
    let Some(name) = dom.attr(radio, "name").filter(|name| !name.is_empty()) else {
        return Ok(true);
    };
    let scope = dom
        .find_ancestor_by_tag(radio, "form")
        .unwrap_or_else(|| dom.root());
    for other in dom.query_selector_all_from(scope, "input")? {
        if input_type(dom, other).as_deref() == Some("radio")
            && dom.attr(other, "name").as_deref() == Some(name.as_str())
            && dom.checked(other)?
        {
            return Ok(false);
        }
    }
    Ok(true)
}

fn supports_length_and_pattern(dom: &Dom, control: NodeId, kind: Option<&str>) -> bool {
    if dom.has_tag(control, "textarea") {
        return true;
    }
    matches!(
        kind,
        Some("text" | "search" | "url" | "tel" | "email" | "password")
    )
}

fn parse_number(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.starts_with('+') {
        return None;
    }
    raw.parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Disables the form's first submit button and swaps in the spinner.
pub(crate) fn apply_loading_state(dom: &mut Dom, form: NodeId) -> Result<Option<NodeId>> {
    let Some(button) = dom.query_selector_from(form, r#"button[type="submit"]"#)? else {
        return Ok(None);
    };
    dom.set_disabled(button, true)?;
    dom.set_inner_html(button, PROCESSING_HTML)?;
    Ok(Some(button))
}
