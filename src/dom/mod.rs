//! In-memory document tree.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Detached nodes stay in the arena; removing a node only unlinks
//! it from its parent.

pub mod events;
pub mod html;
pub mod selector;

pub use events::{Event, EventKind, Handler};
pub use selector::Selector;

use crate::utils::error::{Result, ViewerError};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub const SELECT_MENU_ID: &str = "selectMenu";
pub const PLACEHOLDER_OPTION: &str = "Employees";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag_name: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attrs: BTreeMap::new(),
            classes: Vec::new(),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Attributes other than `class`, in name order.
    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        if name == "class" {
            self.classes.clear();
            for class in value.split_whitespace() {
                self.add_class(class);
            }
            return;
        }
        self.attrs.insert(name.to_string(), value.to_string());
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        self.attrs.remove(name).is_some()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        let before = self.classes.len();
        self.classes.retain(|c| c != class);
        self.classes.len() != before
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Fragment,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    listeners: HashMap<NodeId, Vec<(EventKind, Handler)>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            listeners: HashMap::new(),
        }
    }

    /// `html > body > (header > h1 + select#selectMenu) + main`, with the
    /// select holding a single value-less "Employees" prompt option.
    pub fn page_shell() -> Self {
        let mut doc = Self::new();
        let root = doc.root;

        let html = doc.create_element("html");
        doc.attach(root, html);
        let body = doc.create_element("body");
        doc.attach(html, body);

        let header = doc.create_element("header");
        doc.attach(body, header);
        let title = doc.create_element("h1");
        let title_text = doc.create_text("Employee Posts");
        doc.attach(title, title_text);
        doc.attach(header, title);

        let select = doc.create_element("select");
        if let Some(element) = doc.element_mut(select) {
            element.set_attr("id", SELECT_MENU_ID);
        }
        let prompt = doc.create_element("option");
        let prompt_text = doc.create_text(PLACEHOLDER_OPTION);
        doc.attach(prompt, prompt_text);
        doc.attach(select, prompt);
        doc.attach(header, select);

        let main = doc.create_element("main");
        doc.attach(body, main);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.create_node(NodeKind::Element(Element::new(tag_name)))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.create_node(NodeKind::Text(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.create_node(NodeKind::Fragment)
    }

    // Only for nodes created in the same call, which cannot form a cycle.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn checked(&self, id: NodeId) -> Result<&Node> {
        self.node(id)
            .ok_or_else(|| ViewerError::dom(format!("unknown {}", id)))
    }

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.node(id).map(|node| &node.kind)
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut_or_err(&mut self, id: NodeId) -> Result<&mut Element> {
        self.element_mut(id)
            .ok_or_else(|| ViewerError::dom(format!("{} is not an element", id)))
    }

    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(Element::tag_name)
    }

    pub fn is_fragment(&self, id: NodeId) -> bool {
        matches!(self.kind(id), Some(NodeKind::Fragment))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(node) = cursor {
            if node == self.root {
                return true;
            }
            cursor = self.parent(node);
        }
        false
    }

    fn can_have_children(&self, id: NodeId) -> bool {
        matches!(
            self.kind(id),
            Some(NodeKind::Document | NodeKind::Fragment | NodeKind::Element(_))
        )
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(old_parent) = self.nodes[child.0].parent.take() {
            self.nodes[old_parent.0].children.retain(|id| *id != child);
        }
    }

    /// Appends `child` to `parent`, moving it out of its previous parent.
    /// Appending a fragment moves the fragment's children instead and leaves
    /// the fragment empty.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        self.checked(parent)?;
        self.checked(child)?;
        if !self.can_have_children(parent) {
            return Err(ViewerError::dom(format!("{} cannot have children", parent)));
        }
        if child == self.root {
            return Err(ViewerError::dom("cannot append the document root"));
        }

        // parent must not be inside child's subtree
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            if node == child {
                return Err(ViewerError::dom(format!(
                    "appending {} to {} would create a cycle",
                    child, parent
                )));
            }
            cursor = self.parent(node);
        }

        if self.is_fragment(child) {
            let moved = std::mem::take(&mut self.nodes[child.0].children);
            for node in &moved {
                self.nodes[node.0].parent = Some(parent);
            }
            self.nodes[parent.0].children.extend(moved);
            return Ok(());
        }

        self.detach(child);
        self.attach(parent, child);
        Ok(())
    }

    pub fn append_all(&mut self, parent: NodeId, children: &[NodeId]) -> Result<()> {
        for child in children {
            self.append(parent, *child)?;
        }
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.parent(child) != Some(parent) {
            return Err(ViewerError::dom(format!(
                "{} is not a direct child of {}",
                child, parent
            )));
        }
        self.detach(child);
        Ok(())
    }

    /// Unlinks every child of `parent` and returns how many there were.
    pub fn clear_children(&mut self, parent: NodeId) -> usize {
        let Some(node) = self.nodes.get_mut(parent.0) else {
            return 0;
        };
        let removed = std::mem::take(&mut node.children);
        for child in &removed {
            self.nodes[child.0].parent = None;
        }
        removed.len()
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut_or_err(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        self.element_mut(id)
            .map(|element| element.remove_attr(name))
            .unwrap_or(false)
    }

    pub fn data(&self, id: NodeId, key: &str) -> Option<&str> {
        self.attr(id, &format!("data-{}", key))
    }

    pub fn set_data(&mut self, id: NodeId, key: &str, value: &str) -> Result<()> {
        self.set_attr(id, &format!("data-{}", key), value)
    }

    pub fn set_disabled(&mut self, id: NodeId, disabled: bool) -> Result<()> {
        if disabled {
            self.set_attr(id, "disabled", "")
        } else {
            self.element_mut_or_err(id)?.remove_attr("disabled");
            Ok(())
        }
    }

    pub fn is_disabled(&self, id: NodeId) -> bool {
        self.attr(id, "disabled").is_some()
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|element| element.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        self.element_mut_or_err(id)?.add_class(class);
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> bool {
        self.element_mut(id)
            .map(|element| element.remove_class(class))
            .unwrap_or(false)
    }

    /// Flips `class` and returns whether it is now present.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> Result<bool> {
        let element = self.element_mut_or_err(id)?;
        if element.remove_class(class) {
            Ok(false)
        } else {
            element.add_class(class);
            Ok(true)
        }
    }

    pub fn set_class(&mut self, id: NodeId, class: &str, on: bool) -> Result<()> {
        let element = self.element_mut_or_err(id)?;
        if on {
            element.add_class(class);
        } else {
            element.remove_class(class);
        }
        Ok(())
    }

    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(NodeKind::Text(text)) = self.kind(id) {
            return text.clone();
        }
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        for child in self.children(id) {
            match self.kind(*child) {
                Some(NodeKind::Text(text)) => out.push_str(text),
                _ => self.collect_text(*child, out),
            }
        }
    }

    /// Replaces the children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<()> {
        match self.nodes.get_mut(id.0).map(|node| &mut node.kind) {
            Some(NodeKind::Text(existing)) => {
                *existing = text.to_string();
                Ok(())
            }
            Some(NodeKind::Element(_) | NodeKind::Fragment) => {
                self.clear_children(id);
                let text_node = self.create_text(text);
                self.attach(id, text_node);
                Ok(())
            }
            Some(NodeKind::Document) => Err(ViewerError::dom(
                "cannot set text content of the document",
            )),
            None => Err(ViewerError::dom(format!("unknown {}", id))),
        }
    }

    /// Descendants of `scope` in document order, `scope` excluded.
    pub fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(scope).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.element(*id).is_some_and(|e| selector.matches(e)))
            .collect()
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.element(*id).is_some_and(|e| selector.matches(e)))
    }

    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_selector(self.root, &Selector::id(id))
    }

    /// An option's `value` attribute, falling back to its text.
    pub fn option_value(&self, option: NodeId) -> String {
        match self.attr(option, "value") {
            Some(value) => value.to_string(),
            None => self.text_content(option),
        }
    }

    /// Value of the selected option, or of the first option when none is
    /// flagged `selected`.
    pub fn select_value(&self, select: NodeId) -> Option<String> {
        let options = self.query_selector_all(select, &Selector::tag("option"));
        let chosen = options
            .iter()
            .copied()
            .find(|option| self.attr(*option, "selected").is_some())
            .or_else(|| options.first().copied())?;
        Some(self.option_value(chosen))
    }

    /// Marks the option whose value equals `value` as selected. Returns false
    /// when no option matches, leaving the selection unchanged.
    pub fn select_option(&mut self, select: NodeId, value: &str) -> Result<bool> {
        let options = self.query_selector_all(select, &Selector::tag("option"));
        let Some(target) = options
            .iter()
            .copied()
            .find(|option| self.option_value(*option) == value)
        else {
            return Ok(false);
        };
        for option in options {
            if option == target {
                self.set_attr(option, "selected", "")?;
            } else {
                self.remove_attr(option, "selected");
            }
        }
        Ok(true)
    }

    /// Registers `handler`; identical registrations are ignored.
    pub fn add_event_listener(&mut self, node: NodeId, kind: EventKind, handler: Handler) -> bool {
        let entries = self.listeners.entry(node).or_default();
        if entries.contains(&(kind, handler)) {
            return false;
        }
        entries.push((kind, handler));
        true
    }

    pub fn remove_event_listener(
        &mut self,
        node: NodeId,
        kind: EventKind,
        handler: Handler,
    ) -> bool {
        let Some(entries) = self.listeners.get_mut(&node) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| *entry != (kind, handler));
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.listeners.remove(&node);
        }
        removed
    }

    pub fn listeners(&self, node: NodeId, kind: EventKind) -> Vec<Handler> {
        self.listeners
            .get(&node)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|(k, _)| *k == kind)
                    .map(|(_, handler)| *handler)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }
}
