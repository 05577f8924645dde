use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::html::{is_void_tag, parse_fragment};
use crate::selector::{SelectorPart, parse_selector_groups};
use crate::{Error, Result};

/// Handle to a node of a [`Dom`]. Handles stay valid for the lifetime of the
/// document; detached nodes keep their handle and can be reattached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) enum NodeType {
    Document,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) node_type: NodeType,
}

#[derive(Debug, Clone)]
pub(crate) struct Element {
    pub(crate) tag_name: String,
    pub(crate) attrs: IndexMap<String, String>,
    pub(crate) value: String,
    pub(crate) checked: bool,
    pub(crate) disabled: bool,
    pub(crate) readonly: bool,
    pub(crate) required: bool,
}

impl Element {
    fn new(tag_name: String, attrs: IndexMap<String, String>) -> Self {
        let value = attrs.get("value").cloned().unwrap_or_default();
        let checked = attrs.contains_key("checked");
        let disabled = attrs.contains_key("disabled");
        let readonly = attrs.contains_key("readonly");
        let required = attrs.contains_key("required");
        Self {
            tag_name,
            attrs,
            value,
            checked,
            disabled,
            readonly,
            required,
        }
    }
}

/// Arena-backed document tree.
#[derive(Debug, Clone)]
pub struct Dom {
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    id_index: HashMap<String, NodeId>,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    pub fn new() -> Self {
        let root = Node {
            parent: None,
            children: Vec::new(),
            node_type: NodeType::Document,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            id_index: HashMap::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, parent: Option<NodeId>, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent,
            children: Vec::new(),
            node_type,
        });
        if let Some(parent_id) = parent {
            self.nodes[parent_id.0].children.push(id);
        }
        id
    }

    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: String,
        attrs: IndexMap<String, String>,
    ) -> NodeId {
        let element = Element::new(tag_name, attrs);
        let id = self.create_node(Some(parent), NodeType::Element(element));
        if let Some(id_attr) = self
            .element(id)
            .and_then(|element| element.attrs.get("id").cloned())
        {
            if self.is_connected(id) {
                self.id_index.entry(id_attr).or_insert(id);
            }
        }
        id
    }

    pub(crate) fn create_text(&mut self, parent: NodeId, text: String) -> NodeId {
        self.create_node(Some(parent), NodeType::Text(text))
    }

    /// Creates an element that is not yet attached to the tree.
    pub fn create_detached_element(&mut self, tag_name: &str) -> NodeId {
        let element = Element::new(tag_name.to_ascii_lowercase(), IndexMap::new());
        self.create_node(None, NodeType::Element(element))
    }

    pub fn create_detached_text(&mut self, text: &str) -> NodeId {
        self.create_node(None, NodeType::Text(text.to_string()))
    }

    pub(crate) fn element(&self, node_id: NodeId) -> Option<&Element> {
        match &self.nodes.get(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub(crate) fn element_mut(&mut self, node_id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(node_id.0)?.node_type {
            NodeType::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn is_element(&self, node_id: NodeId) -> bool {
        self.element(node_id).is_some()
    }

    pub fn tag_name(&self, node_id: NodeId) -> Option<&str> {
        self.element(node_id).map(|e| e.tag_name.as_str())
    }

    pub(crate) fn has_tag(&self, node_id: NodeId, tag: &str) -> bool {
        self.tag_name(node_id)
            .map(|name| name.eq_ignore_ascii_case(tag))
            .unwrap_or(false)
    }

    pub fn parent(&self, node_id: NodeId) -> Option<NodeId> {
        self.nodes.get(node_id.0).and_then(|node| node.parent)
    }

    pub fn children(&self, node_id: NodeId) -> &[NodeId] {
        self.nodes
            .get(node_id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn first_child(&self, node_id: NodeId) -> Option<NodeId> {
        self.children(node_id).first().copied()
    }

    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    pub fn text_content(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document | NodeType::Element(_) => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
            NodeType::Text(text) => text.clone(),
        }
    }

    pub fn set_text_content(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("textContent target is not an element".into()));
        }
        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            self.create_text(node_id, value.to_string());
        }
        self.rebuild_id_index();
        Ok(())
    }

    pub fn inner_html(&self, node_id: NodeId) -> Result<String> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("innerHTML target is not an element".into()));
        }
        let mut out = String::new();
        for child in &self.nodes[node_id.0].children {
            out.push_str(&self.dump_node(*child));
        }
        Ok(out)
    }

    pub fn set_inner_html(&mut self, node_id: NodeId, html: &str) -> Result<()> {
        if self.element(node_id).is_none() {
            return Err(Error::Runtime("innerHTML target is not an element".into()));
        }

        let fragment = parse_fragment(html)?;

        let old_children = std::mem::take(&mut self.nodes[node_id.0].children);
        for child in old_children {
            self.nodes[child.0].parent = None;
        }

        let children = fragment.nodes[fragment.root.0].children.clone();
        for child in children {
            self.clone_subtree_from_dom(&fragment, child, Some(node_id))?;
        }

        self.rebuild_id_index();
        Ok(())
    }

    fn clone_subtree_from_dom(
        &mut self,
        source: &Dom,
        source_node: NodeId,
        parent: Option<NodeId>,
    ) -> Result<NodeId> {
        let node_type = match &source.nodes[source_node.0].node_type {
            NodeType::Document => {
                return Err(Error::Runtime(
                    "cannot clone document node into innerHTML target".into(),
                ));
            }
            NodeType::Element(element) => NodeType::Element(element.clone()),
            NodeType::Text(text) => NodeType::Text(text.clone()),
        };

        let node = self.create_node(parent, node_type);
        for child in &source.nodes[source_node.0].children {
            self.clone_subtree_from_dom(source, *child, Some(node))?;
        }
        Ok(node)
    }

    pub fn value(&self, node_id: NodeId) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        Ok(element.value.clone())
    }

    pub fn set_value(&mut self, node_id: NodeId, value: &str) -> Result<()> {
        if self.has_tag(node_id, "select") {
            return self.set_select_value(node_id, value);
        }

        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("value target is not an element".into()))?;
        element.value = value.to_string();
        Ok(())
    }

    pub(crate) fn initialize_form_control_values(&mut self) -> Result<()> {
        for node in self.all_element_nodes() {
            if self.has_tag(node, "textarea") {
                let text = self.text_content(node);
                let element = self.element_mut(node).ok_or_else(|| {
                    Error::Runtime("textarea target is not an element".into())
                })?;
                element.value = text;
                continue;
            }

            if self.has_tag(node, "select") {
                self.sync_select_value(node)?;
            }
        }
        Ok(())
    }

    fn set_select_value(&mut self, select_node: NodeId, requested: &str) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);

        let mut matched = None;
        for option in &options {
            if matched.is_none() && self.option_effective_value(*option)? == requested {
                matched = Some(*option);
            }
        }

        for option in &options {
            let option_element = self
                .element_mut(*option)
                .ok_or_else(|| Error::Runtime("option target is not an element".into()))?;
            if Some(*option) == matched {
                option_element
                    .attrs
                    .insert("selected".to_string(), String::new());
            } else {
                option_element.attrs.shift_remove("selected");
            }
        }

        let value = match matched {
            Some(option) => self.option_effective_value(option)?,
            None => String::new(),
        };
        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::Runtime("select target is not an element".into()))?;
        element.value = value;
        Ok(())
    }

    fn sync_select_value(&mut self, select_node: NodeId) -> Result<()> {
        let mut options = Vec::new();
        self.collect_select_options(select_node, &mut options);
        let value = match options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied())
        {
            Some(option) => self.option_effective_value(option)?,
            None => String::new(),
        };
        let element = self
            .element_mut(select_node)
            .ok_or_else(|| Error::Runtime("select target is not an element".into()))?;
        element.value = value;
        Ok(())
    }

    fn collect_select_options(&self, node: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node.0].children {
            if self.has_tag(*child, "option") {
                out.push(*child);
            }
            self.collect_select_options(*child, out);
        }
    }

    fn option_effective_value(&self, option_node: NodeId) -> Result<String> {
        let element = self
            .element(option_node)
            .ok_or_else(|| Error::Runtime("option target is not an element".into()))?;
        if let Some(value) = element.attrs.get("value") {
            return Ok(value.clone());
        }
        Ok(self.text_content(option_node).trim().to_string())
    }

    pub fn checked(&self, node_id: NodeId) -> Result<bool> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("checked target is not an element".into()))?;
        Ok(element.checked)
    }

    pub fn set_checked(&mut self, node_id: NodeId, checked: bool) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("checked target is not an element".into()))?;
        element.checked = checked;
        Ok(())
    }

    pub fn disabled(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.disabled).unwrap_or(false)
    }

    pub fn set_disabled(&mut self, node_id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attr(node_id, "disabled", "")
        } else {
            self.remove_attr(node_id, "disabled")
        }
    }

    pub fn readonly(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.readonly).unwrap_or(false)
    }

    pub fn required(&self, node_id: NodeId) -> bool {
        self.element(node_id).map(|e| e.required).unwrap_or(false)
    }

    pub fn attr(&self, node_id: NodeId, name: &str) -> Option<String> {
        self.element(node_id)
            .and_then(|e| e.attrs.get(&name.to_ascii_lowercase()).cloned())
    }

    pub fn has_attr(&self, node_id: NodeId, name: &str) -> bool {
        self.element(node_id)
            .map(|e| e.attrs.contains_key(&name.to_ascii_lowercase()))
            .unwrap_or(false)
    }

    pub fn set_attr(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("setAttribute target is not an element".into()))?;
        element.attrs.insert(lowered.clone(), value.to_string());

        match lowered.as_str() {
            "value" => element.value = value.to_string(),
            "checked" => element.checked = true,
            "disabled" => element.disabled = true,
            "readonly" => element.readonly = true,
            "required" => element.required = true,
            _ => {}
        }

        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub fn remove_attr(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let lowered = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("removeAttribute target is not an element".into()))?;
        element.attrs.shift_remove(&lowered);

        match lowered.as_str() {
            "value" => element.value.clear(),
            "checked" => element.checked = false,
            "disabled" => element.disabled = false,
            "readonly" => element.readonly = false,
            "required" => element.required = false,
            _ => {}
        }

        if lowered == "id" {
            self.rebuild_id_index();
        }
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.check_insertable(parent, child, "appendChild")?;
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
        self.rebuild_id_index();
        Ok(())
    }

    pub fn prepend_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let reference = self
            .children(parent)
            .iter()
            .copied()
            .find(|node| *node != child);
        match reference {
            Some(reference) => self.insert_before(parent, child, reference),
            None => self.append_child(parent, child),
        }
    }

    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) -> Result<()> {
        self.check_insertable(parent, child, "insertBefore")?;
        if !self.is_valid_node(reference) {
            return Err(Error::Runtime("insertBefore node is invalid".into()));
        }
        if self.parent(reference) != Some(parent) {
            return Err(Error::Runtime(
                "insertBefore reference is not a direct child".into(),
            ));
        }
        if child == reference {
            return Ok(());
        }

        self.detach(child);

        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|id| *id == reference)
        else {
            return Err(Error::Runtime("insertBefore reference is missing".into()));
        };

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index, child);
        self.rebuild_id_index();
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId, op: &str) -> Result<()> {
        if !self.can_have_children(parent) {
            return Err(Error::Runtime(format!("{op} target cannot have children")));
        }
        if child == self.root || child == parent || !self.is_valid_node(child) {
            return Err(Error::Runtime(format!("invalid {op} node")));
        }

        // parent must not sit inside child's subtree
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(Error::Runtime(format!("{op} would create a cycle")));
            }
            cursor = self.parent(node);
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.parent(child) {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
        self.nodes[child.0].parent = None;
    }

    /// Detaches `node` from its parent. Detached nodes are left alone.
    pub fn remove_node(&mut self, node: NodeId) -> Result<()> {
        if node == self.root {
            return Err(Error::Runtime("cannot remove document root".into()));
        }
        if !self.is_valid_node(node) || self.parent(node).is_none() {
            return Ok(());
        }
        self.detach(node);
        self.rebuild_id_index();
        Ok(())
    }

    pub fn style_get(&self, node_id: NodeId, name: &str) -> Result<String> {
        let element = self
            .element(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?;
        let name = name.to_ascii_lowercase();
        let decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        Ok(decls
            .iter()
            .find(|(prop, _)| prop == &name)
            .map(|(_, value)| value.clone())
            .unwrap_or_default())
    }

    pub fn style_set(&mut self, node_id: NodeId, name: &str, value: &str) -> Result<()> {
        let name = name.to_ascii_lowercase();
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("style target is not an element".into()))?;

        let mut decls = parse_style_declarations(element.attrs.get("style").map(String::as_str));
        if let Some(pos) = decls.iter().position(|(prop, _)| prop == &name) {
            if value.is_empty() {
                decls.remove(pos);
            } else {
                decls[pos].1 = value.to_string();
            }
        } else if !value.is_empty() {
            decls.push((name, value.to_string()));
        }

        if decls.is_empty() {
            element.attrs.shift_remove("style");
        } else {
            element
                .attrs
                .insert("style".to_string(), serialize_style_declarations(&decls));
        }

        Ok(())
    }

    pub fn class_contains(&self, node_id: NodeId, class_name: &str) -> bool {
        self.element(node_id)
            .map(|element| has_class(element, class_name))
            .unwrap_or(false)
    }

    pub fn class_add(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        if !classes.iter().any(|name| name == class_name) {
            classes.push(class_name.to_string());
        }
        set_class_attr(element, &classes);
        Ok(())
    }

    pub fn class_remove(&mut self, node_id: NodeId, class_name: &str) -> Result<()> {
        let element = self
            .element_mut(node_id)
            .ok_or_else(|| Error::Runtime("classList target is not an element".into()))?;
        let mut classes = class_tokens(element.attrs.get("class").map(String::as_str));
        classes.retain(|name| name != class_name);
        set_class_attr(element, &classes);
        Ok(())
    }

    pub fn class_toggle(&mut self, node_id: NodeId, class_name: &str) -> Result<bool> {
        if self.class_contains(node_id, class_name) {
            self.class_remove(node_id, class_name)?;
            Ok(false)
        } else {
            self.class_add(node_id, class_name)?;
            Ok(true)
        }
    }

    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all(selector)?;
        Ok(all.into_iter().next())
    }

    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;

        if groups.len() == 1 && groups[0].len() == 1 {
            if let Some(id) = groups[0][0].step.id_only() {
                return Ok(self.by_id(id).into_iter().collect());
            }
        }

        let mut ids = Vec::new();
        self.collect_elements_dfs(self.root, &mut ids);
        Ok(self.filter_matching(ids, &groups))
    }

    pub fn query_selector_from(&self, root: NodeId, selector: &str) -> Result<Option<NodeId>> {
        let all = self.query_selector_all_from(root, selector)?;
        Ok(all.into_iter().next())
    }

    pub fn query_selector_all_from(&self, root: NodeId, selector: &str) -> Result<Vec<NodeId>> {
        let groups = parse_selector_groups(selector)?;
        let mut ids = Vec::new();
        self.collect_elements_descendants_dfs(root, &mut ids);
        Ok(self.filter_matching(ids, &groups))
    }

    fn filter_matching(&self, candidates: Vec<NodeId>, groups: &[Vec<SelectorPart>]) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut matched = Vec::new();
        for candidate in candidates {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(candidate, steps))
                && seen.insert(candidate)
            {
                matched.push(candidate);
            }
        }
        matched
    }

    pub fn closest(&self, node_id: NodeId, selector: &str) -> Result<Option<NodeId>> {
        if self.element(node_id).is_none() {
            return Ok(None);
        }

        let groups = parse_selector_groups(selector)?;
        let mut cursor = Some(node_id);
        while let Some(current) = cursor {
            if groups
                .iter()
                .any(|steps| self.matches_selector_chain(current, steps))
            {
                return Ok(Some(current));
            }
            cursor = self.parent(current);
        }
        Ok(None)
    }

    pub(crate) fn find_ancestor_by_tag(&self, node_id: NodeId, tag: &str) -> Option<NodeId> {
        let mut cursor = self.parent(node_id);
        while let Some(current) = cursor {
            if self.has_tag(current, tag) {
                return Some(current);
            }
            cursor = self.parent(current);
        }
        None
    }

    fn can_have_children(&self, node_id: NodeId) -> bool {
        matches!(
            self.nodes.get(node_id.0).map(|n| &n.node_type),
            Some(NodeType::Document | NodeType::Element(_))
        )
    }

    pub(crate) fn is_valid_node(&self, node_id: NodeId) -> bool {
        node_id.0 < self.nodes.len()
    }

    pub fn is_connected(&self, node_id: NodeId) -> bool {
        let mut cursor = Some(node_id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    pub(crate) fn rebuild_id_index(&mut self) {
        let mut next = HashMap::new();
        let mut stack = vec![self.root];
        while let Some(node) = stack.pop() {
            if let NodeType::Element(element) = &self.nodes[node.0].node_type {
                if let Some(id) = element.attrs.get("id") {
                    if !id.is_empty() {
                        next.entry(id.clone()).or_insert(node);
                    }
                }
            }
            for child in self.nodes[node.0].children.iter().rev() {
                stack.push(*child);
            }
        }
        self.id_index = next;
    }

    pub(crate) fn collect_elements_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        if matches!(self.nodes[node_id.0].node_type, NodeType::Element(_)) {
            out.push(node_id);
        }
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    fn collect_elements_descendants_dfs(&self, node_id: NodeId, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node_id.0].children {
            self.collect_elements_dfs(*child, out);
        }
    }

    pub(crate) fn all_element_nodes(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.collect_elements_dfs(self.root, &mut out);
        out
    }

    pub(crate) fn element_index(&self, node_id: NodeId) -> Option<usize> {
        let parent = self.parent(node_id)?;
        let mut index = 0usize;
        for child in &self.nodes[parent.0].children {
            if self.element(*child).is_none() {
                continue;
            }
            index += 1;
            if *child == node_id {
                return Some(index);
            }
        }
        None
    }

    pub(crate) fn element_siblings(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(parent) = self.parent(node_id) else {
            return Vec::new();
        };
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
            .collect()
    }

    pub(crate) fn next_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        children
            .iter()
            .skip(pos + 1)
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    pub(crate) fn previous_element_sibling(&self, node_id: NodeId) -> Option<NodeId> {
        let parent = self.parent(node_id)?;
        let children = &self.nodes[parent.0].children;
        let pos = children.iter().position(|id| *id == node_id)?;
        children[..pos]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.element(*sibling).is_some())
    }

    /// Serializes `node_id` and its subtree back to HTML.
    pub fn dump_node(&self, node_id: NodeId) -> String {
        match &self.nodes[node_id.0].node_type {
            NodeType::Document => {
                let mut out = String::new();
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out
            }
            NodeType::Text(text) => {
                let raw_parent = self
                    .parent(node_id)
                    .and_then(|parent| self.tag_name(parent))
                    .map(|tag| matches!(tag, "script" | "style"))
                    .unwrap_or(false);
                if raw_parent {
                    text.clone()
                } else {
                    escape_html_text_for_serialization(text)
                }
            }
            NodeType::Element(element) => {
                let mut out = String::new();
                out.push('<');
                out.push_str(&element.tag_name);
                for (k, v) in &element.attrs {
                    out.push(' ');
                    out.push_str(k);
                    out.push_str("=\"");
                    out.push_str(&escape_html_attr_for_serialization(v));
                    out.push('"');
                }
                out.push('>');
                if is_void_tag(&element.tag_name) {
                    return out;
                }
                for child in &self.nodes[node_id.0].children {
                    out.push_str(&self.dump_node(*child));
                }
                out.push_str("</");
                out.push_str(&element.tag_name);
                out.push('>');
                out
            }
        }
    }
}

pub(crate) fn has_class(element: &Element, class_name: &str) -> bool {
    element
        .attrs
        .get("class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_tokens(class_attr: Option<&str>) -> Vec<String> {
    class_attr
        .map(|value| {
            value
                .split_whitespace()
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>()
        })
        .unwrap_or_default()
}

fn set_class_attr(element: &mut Element, classes: &[String]) {
    if classes.is_empty() {
        element.attrs.shift_remove("class");
    } else {
        element.attrs.insert("class".to_string(), classes.join(" "));
    }
}

fn parse_style_declarations(style_attr: Option<&str>) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let Some(style_attr) = style_attr else {
        return out;
    };

    for decl in style_attr.split(';') {
        let Some((name, value)) = decl.trim().split_once(':') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        if name.is_empty() {
            continue;
        }
        let value = value.trim().to_string();
        if let Some(pos) = out.iter().position(|(existing, _)| existing == &name) {
            out[pos].1 = value;
        } else {
            out.push((name, value));
        }
    }

    out
}

fn serialize_style_declarations(decls: &[(String, String)]) -> String {
    let mut out = String::new();
    for (idx, (name, value)) in decls.iter().enumerate() {
        if idx > 0 {
            out.push(' ');
        }
        out.push_str(name);
        out.push_str(": ");
        out.push_str(value);
        out.push(';');
    }
    out
}

fn escape_html_text_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_html_attr_for_serialization(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn input_type(dom: &Dom, node_id: NodeId) -> Option<String> {
    if !dom.has_tag(node_id, "input") {
        return None;
    }
    Some(
        dom.attr(node_id, "type")
            .unwrap_or_else(|| "text".into())
            .to_ascii_lowercase(),
    )
}

pub(crate) fn is_checkable_input(dom: &Dom, node_id: NodeId) -> bool {
    matches!(
        input_type(dom, node_id).as_deref(),
        Some("checkbox" | "radio")
    )
}

pub(crate) fn is_submit_control(dom: &Dom, node_id: NodeId) -> bool {
    let Some(element) = dom.element(node_id) else {
        return false;
    };

    match element.tag_name.as_str() {
        "button" => element
            .attrs
            .get("type")
            .map(|kind| kind.eq_ignore_ascii_case("submit"))
            .unwrap_or(true),
        "input" => element
            .attrs
            .get("type")
            .map(|kind| kind.eq_ignore_ascii_case("submit"))
            .unwrap_or(false),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::parse_document;

    #[test]
    fn class_list_mutations_keep_token_order() -> Result<()> {
        let mut dom = parse_document("<div id='box' class='a b'></div>")?;
        let node = dom.by_id("box").expect("box exists");
        dom.class_add(node, "c")?;
        dom.class_add(node, "a")?;
        dom.class_remove(node, "b")?;
        assert_eq!(dom.attr(node, "class").as_deref(), Some("a c"));
        assert!(!dom.class_toggle(node, "a")?);
        assert!(dom.class_toggle(node, "z")?);
        assert_eq!(dom.attr(node, "class").as_deref(), Some("c z"));
        Ok(())
    }

    #[test]
    fn style_set_updates_and_removes_declarations() -> Result<()> {
        let mut dom = parse_document("<div id='box' style='color: red'></div>")?;
        let node = dom.by_id("box").expect("box exists");
        dom.style_set(node, "opacity", "0")?;
        dom.style_set(node, "color", "")?;
        assert_eq!(dom.attr(node, "style").as_deref(), Some("opacity: 0;"));
        dom.style_set(node, "opacity", "")?;
        assert_eq!(dom.attr(node, "style"), None);
        Ok(())
    }

    #[test]
    fn removing_a_node_drops_it_from_the_id_index() -> Result<()> {
        let mut dom = parse_document("<main><p id='x'>hi</p></main>")?;
        let node = dom.by_id("x").expect("x exists");
        dom.remove_node(node)?;
        assert_eq!(dom.by_id("x"), None);
        assert!(!dom.is_connected(node));
        dom.remove_node(node)?;
        Ok(())
    }

    #[test]
    fn prepend_inserts_before_existing_children() -> Result<()> {
        let mut dom = parse_document("<main><p>old</p></main>")?;
        let main = dom.query_selector("main")?.expect("main exists");
        let fresh = dom.create_detached_element("div");
        dom.set_text_content(fresh, "new")?;
        dom.prepend_child(main, fresh)?;
        assert_eq!(
            dom.inner_html(main)?,
            "<div>new</div><p>old</p>".to_string()
        );
        Ok(())
    }

    #[test]
    fn append_child_rejects_cycles() -> Result<()> {
        let mut dom = parse_document("<div id='outer'><div id='inner'></div></div>")?;
        let outer = dom.by_id("outer").expect("outer exists");
        let inner = dom.by_id("inner").expect("inner exists");
        let err = dom
            .append_child(inner, outer)
            .expect_err("cycle must be rejected");
        assert!(matches!(err, Error::Runtime(msg) if msg.contains("cycle")));
        Ok(())
    }

    #[test]
    fn select_value_follows_selected_option() -> Result<()> {
        let mut dom = parse_document(
            "<select id='s'><option value='a'>A</option><option value='b' selected>B</option></select>",
        )?;
        let select = dom.by_id("s").expect("select exists");
        assert_eq!(dom.value(select)?, "b");
        dom.set_value(select, "a")?;
        assert_eq!(dom.value(select)?, "a");
        dom.set_value(select, "missing")?;
        assert_eq!(dom.value(select)?, "");
        Ok(())
    }

    #[test]
    fn serialization_escapes_text_and_skips_void_end_tags() -> Result<()> {
        let mut dom = parse_document("<p id='p'></p>")?;
        let p = dom.by_id("p").expect("p exists");
        dom.set_text_content(p, "<b>&")?;
        assert_eq!(dom.dump_node(p), "<p id=\"p\">&lt;b&gt;&amp;</p>");
        let dom = parse_document("<img src='a.png' alt=x>")?;
        let img = dom.query_selector("img")?.expect("img exists");
        assert_eq!(dom.dump_node(img), "<img src=\"a.png\" alt=\"x\">");
        Ok(())
    }
}
