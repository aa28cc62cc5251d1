//! Retained element tree for panel controls.
//!
//! A [`Document`] owns every rendered element. The sync loop never keeps
//! references into it: it recomputes an element's id from the resource id
//! (see [`ids`]) and looks the element up again on every poll.
//!
//! Text always lives in text nodes and is never interpreted as markup; the
//! HTML export escapes it.

pub mod builder;
mod html;
pub mod ids;
pub mod outline;

use crate::action::Action;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Class marking a control whose backing field could not be fetched
pub const UNAVAILABLE: &str = "unavailable";
/// Attribute carrying the last fetch error of an unavailable control
pub const ERROR_ATTR: &str = "data-error";
/// Attribute set when a list container could not be seeded. Only a rebuild
/// clears it; field polls leave it alone.
pub const SEED_ERROR_ATTR: &str = "data-seed-error";

pub type SharedDocument = Arc<RwLock<Document>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Section,
    Div,
    Span,
    Ul,
    Li,
    Button,
    Input,
    Label,
    H2,
    P,
    Img,
    Fieldset,
    Legend,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Section => "section",
            Tag::Div => "div",
            Tag::Span => "span",
            Tag::Ul => "ul",
            Tag::Li => "li",
            Tag::Button => "button",
            Tag::Input => "input",
            Tag::Label => "label",
            Tag::H2 => "h2",
            Tag::P => "p",
            Tag::Img => "img",
            Tag::Fieldset => "fieldset",
            Tag::Legend => "legend",
        }
    }

    /// Elements without closing tag or children
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Input | Tag::Img)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    tag: Tag,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "BTreeSet::is_empty")]
    classes: BTreeSet<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    attrs: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    checked: bool,
    #[serde(skip)]
    action: Option<Action>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<Node>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            id: None,
            classes: BTreeSet::new(),
            attrs: BTreeMap::new(),
            value: None,
            checked: false,
            action: None,
            children: Vec::new(),
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add one or more whitespace-separated classes
    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.classes.insert(class.to_string());
        }
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    /// Append a text node
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn is_checked(&self) -> bool {
        self.checked
    }

    pub fn action(&self) -> Option<&Action> {
        self.action.as_ref()
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of this element and all descendants
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
            }
        }
    }

    // ========================================================================
    // Mutation: every setter reports whether something changed
    // ========================================================================

    pub fn add_class(&mut self, class: &str) -> bool {
        self.classes.insert(class.to_string())
    }

    pub fn remove_class(&mut self, class: &str) -> bool {
        self.classes.remove(class)
    }

    pub fn set_attr(&mut self, name: &str, value: &str) -> bool {
        if self.attr(name) == Some(value) {
            return false;
        }
        self.attrs.insert(name.to_string(), value.to_string());
        true
    }

    pub fn remove_attr(&mut self, name: &str) -> bool {
        self.attrs.remove(name).is_some()
    }

    pub fn set_value(&mut self, value: &str) -> bool {
        if self.value.as_deref() == Some(value) {
            return false;
        }
        self.value = Some(value.to_string());
        true
    }

    pub fn set_checked(&mut self, checked: bool) -> bool {
        let changed = self.checked != checked;
        self.checked = checked;
        changed
    }

    pub fn set_action(&mut self, action: Option<Action>) {
        self.action = action;
    }

    /// Replace the direct text nodes with a single one, keeping child elements
    pub fn set_text(&mut self, text: &str) -> bool {
        let current: Vec<&str> = self
            .children
            .iter()
            .filter_map(|node| match node {
                Node::Text(t) => Some(t.as_str()),
                Node::Element(_) => None,
            })
            .collect();
        if current == [text] {
            return false;
        }
        self.children.retain(|node| matches!(node, Node::Element(_)));
        self.children.insert(0, Node::Text(text.to_string()));
        true
    }

    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    pub fn replace_children(&mut self, children: Vec<Element>) {
        self.children = children.into_iter().map(Node::Element).collect();
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        for node in &mut self.children {
            if let Node::Element(child) = node {
                if let Some(found) = child.find_mut(id) {
                    return Some(found);
                }
            }
        }
        None
    }

    /// Depth-first, pre-order visit of this element and its descendants
    pub fn walk<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Element, usize)) {
        visit(self, depth);
        for child in self.child_elements() {
            child.walk(depth + 1, visit);
        }
    }

    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Element)) {
        visit(self);
        for node in &mut self.children {
            if let Node::Element(child) = node {
                child.walk_mut(visit);
            }
        }
    }
}

/// The rendered panel: one element tree plus an optional status badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    root: Element,
    #[serde(skip)]
    status_badge: Option<String>,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            root,
            status_badge: None,
        }
    }

    /// Element whose text summarises unavailable controls
    pub fn with_status_badge(mut self, id: impl Into<String>) -> Self {
        self.status_badge = Some(id.into());
        self
    }

    pub fn shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn find(&self, id: &str) -> Option<&Element> {
        self.root.find(id)
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        self.root.find_mut(id)
    }

    pub fn to_html(&self) -> String {
        html::render(&self.root)
    }

    /// Within `container`, give `class` to the element `target` and take it
    /// from every other descendant. An unknown target leaves none marked.
    pub fn set_exclusive_class(&mut self, container: &str, class: &str, target: &str) -> bool {
        let Some(container) = self.root.find_mut(container) else {
            return false;
        };
        let mut changed = false;
        container.walk_mut(&mut |element| {
            if element.id() == Some(target) {
                changed |= element.add_class(class);
            } else {
                changed |= element.remove_class(class);
            }
        });
        changed
    }

    /// Check the radio input in `container` whose value is `value`, uncheck
    /// the rest
    pub fn check_radio(&mut self, container: &str, value: &str) -> bool {
        let Some(container) = self.root.find_mut(container) else {
            return false;
        };
        let mut changed = false;
        container.walk_mut(&mut |element| {
            if element.tag() == Tag::Input && element.attr("type") == Some("radio") {
                let checked = element.value() == Some(value);
                changed |= element.set_checked(checked);
            }
        });
        changed
    }

    pub fn mark_unavailable(&mut self, id: &str, reason: &str) -> bool {
        match self.root.find_mut(id) {
            Some(element) => {
                let added = element.add_class(UNAVAILABLE);
                element.set_attr(ERROR_ATTR, reason) || added
            }
            None => false,
        }
    }

    /// Undo [`mark_unavailable`](Self::mark_unavailable). An element whose
    /// list failed to seed stays unavailable.
    pub fn clear_unavailable(&mut self, id: &str) -> bool {
        match self.root.find_mut(id) {
            Some(element) => {
                let removed =
                    element.attr(SEED_ERROR_ATTR).is_none() && element.remove_class(UNAVAILABLE);
                element.remove_attr(ERROR_ATTR) || removed
            }
            None => false,
        }
    }

    /// Ids (or tags) of every element currently marked unavailable
    pub fn unavailable(&self) -> Vec<String> {
        let mut found = Vec::new();
        self.root.walk(0, &mut |element, _| {
            if element.has_class(UNAVAILABLE) {
                found.push(
                    element
                        .id()
                        .map(str::to_string)
                        .unwrap_or_else(|| element.tag().as_str().to_string()),
                );
            }
        });
        found
    }

    /// Rewrite the status badge from the current unavailable set
    pub fn refresh_status(&mut self) {
        let Some(badge_id) = self.status_badge.clone() else {
            return;
        };
        let mut unavailable = self.unavailable();
        unavailable.retain(|id| *id != badge_id);
        if let Some(badge) = self.root.find_mut(&badge_id) {
            if unavailable.is_empty() {
                badge.set_text("");
                badge.remove_class(UNAVAILABLE);
            } else {
                badge.set_text(&format!("unavailable: {}", unavailable.join(", ")));
                badge.add_class(UNAVAILABLE);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let root = Element::new(Tag::Section)
            .with_id("head-panel")
            .with_child(Element::new(Tag::Span).with_id("head-status"))
            .with_child(
                Element::new(Tag::Div)
                    .with_id("emotion-options-container")
                    .with_child(
                        Element::new(Tag::Button)
                            .with_id("happy-button")
                            .with_text("happy"),
                    )
                    .with_child(
                        Element::new(Tag::Button)
                            .with_id("sad-button")
                            .with_class("current-emotion")
                            .with_text("sad"),
                    ),
            )
            .with_child(
                Element::new(Tag::Fieldset)
                    .with_id("screen-blank")
                    .with_child(
                        Element::new(Tag::Input)
                            .with_attr("type", "radio")
                            .with_value("true"),
                    )
                    .with_child(
                        Element::new(Tag::Input)
                            .with_attr("type", "radio")
                            .with_value("false")
                            .with_checked(true),
                    ),
            );
        Document::new(root).with_status_badge("head-status")
    }

    #[test]
    fn test_find_by_id() {
        let doc = sample();
        assert_eq!(doc.find("happy-button").unwrap().text_content(), "happy");
        assert!(doc.find("angry-button").is_none());
    }

    #[test]
    fn test_exclusive_class_moves_marker() {
        let mut doc = sample();
        assert!(doc.set_exclusive_class(
            "emotion-options-container",
            "current-emotion",
            "happy-button"
        ));
        assert!(doc.find("happy-button").unwrap().has_class("current-emotion"));
        assert!(!doc.find("sad-button").unwrap().has_class("current-emotion"));

        // Reapplying the same state is a no-op
        assert!(!doc.set_exclusive_class(
            "emotion-options-container",
            "current-emotion",
            "happy-button"
        ));
    }

    #[test]
    fn test_exclusive_class_unknown_target_clears() {
        let mut doc = sample();
        doc.set_exclusive_class("emotion-options-container", "current-emotion", "nope-button");
        assert!(!doc.find("sad-button").unwrap().has_class("current-emotion"));
    }

    #[test]
    fn test_check_radio() {
        let mut doc = sample();
        assert!(doc.check_radio("screen-blank", "true"));
        let checked: Vec<Option<&str>> = doc
            .find("screen-blank")
            .unwrap()
            .child_elements()
            .filter(|e| e.is_checked())
            .map(|e| e.value())
            .collect();
        assert_eq!(checked, vec![Some("true")]);
    }

    #[test]
    fn test_set_text_keeps_child_elements() {
        let mut button = Element::new(Tag::Button)
            .with_text("Launch")
            .with_child(Element::new(Tag::Img));
        assert!(button.set_text("Active"));
        assert!(!button.set_text("Active"));
        assert_eq!(button.text_content(), "Active");
        assert_eq!(button.child_elements().count(), 1);
    }

    #[test]
    fn test_unavailable_badge() {
        let mut doc = sample();
        doc.mark_unavailable("emotion-options-container", "Backend returned 500");
        doc.refresh_status();
        let badge = doc.find("head-status").unwrap();
        assert!(badge.has_class(UNAVAILABLE));
        assert_eq!(badge.text_content(), "unavailable: emotion-options-container");
        assert_eq!(
            doc.find("emotion-options-container").unwrap().attr(ERROR_ATTR),
            Some("Backend returned 500")
        );

        doc.clear_unavailable("emotion-options-container");
        doc.refresh_status();
        let badge = doc.find("head-status").unwrap();
        assert!(!badge.has_class(UNAVAILABLE));
        assert_eq!(badge.text_content(), "");
    }

    #[test]
    fn test_seed_failure_survives_field_recovery() {
        let mut doc = sample();
        let container = doc.find_mut("emotion-options-container").unwrap();
        container.add_class(UNAVAILABLE);
        container.set_attr(SEED_ERROR_ATTR, "Backend returned 503");

        doc.clear_unavailable("emotion-options-container");
        doc.refresh_status();
        assert!(doc
            .find("emotion-options-container")
            .unwrap()
            .has_class(UNAVAILABLE));
        assert_eq!(
            doc.find("head-status").unwrap().text_content(),
            "unavailable: emotion-options-container"
        );
    }

    #[test]
    fn test_json_skips_empty_fields() {
        let doc = Document::new(Element::new(Tag::P).with_text("hi"));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"root": {"tag": "p", "children": [{"text": "hi"}]}})
        );
    }
}
