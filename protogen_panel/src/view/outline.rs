//! Flat, line-per-control view of a document.
//!
//! Used by the terminal dashboard (one list row per control) and by the
//! plain `show` output.

use super::builder::{BTN_SUCCESS, CURRENT_EMOTION};
use super::{Document, Element, Tag, UNAVAILABLE};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum RowKind {
    Heading,
    Text,
    Button { highlighted: bool },
    Radio { checked: bool },
    Range { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlRow {
    pub element_id: Option<String>,
    pub depth: usize,
    pub label: String,
    #[serde(flatten)]
    pub kind: RowKind,
    /// The control or one of its containers is unavailable
    pub unavailable: bool,
    /// Activating the row runs an action
    pub actionable: bool,
}

impl ControlRow {
    pub fn is_range(&self) -> bool {
        matches!(self.kind, RowKind::Range { .. })
    }
}

pub fn flatten(doc: &Document) -> Vec<ControlRow> {
    let mut rows = Vec::new();
    visit(doc.root(), 0, false, &mut rows);
    rows
}

fn visit(element: &Element, depth: usize, inherited: bool, rows: &mut Vec<ControlRow>) {
    let unavailable = inherited || element.has_class(UNAVAILABLE);
    let row = |label: String, kind: RowKind| ControlRow {
        element_id: element.id().map(str::to_string),
        depth,
        label,
        kind,
        unavailable,
        actionable: element.action().is_some(),
    };

    match element.tag() {
        Tag::H2 | Tag::Legend => {
            rows.push(row(element.text_content(), RowKind::Heading));
            return;
        }
        Tag::P => {
            let text = element.text_content();
            if !text.is_empty() {
                rows.push(row(text, RowKind::Text));
            }
            return;
        }
        Tag::Span if element.has_class("player-name") => {
            rows.push(row(element.text_content(), RowKind::Text));
            return;
        }
        // Status badges are shown outside the tree; labels duplicate their input
        Tag::Span | Tag::Label | Tag::Img => return,
        Tag::Button => {
            let highlighted = element.has_class(BTN_SUCCESS) || element.has_class(CURRENT_EMOTION);
            rows.push(row(element.text_content(), RowKind::Button { highlighted }));
            return;
        }
        Tag::Input => {
            let label = element.attr("data-label").unwrap_or_default().to_string();
            let kind = match element.attr("type") {
                Some("radio") => RowKind::Radio {
                    checked: element.is_checked(),
                },
                Some("range") => RowKind::Range {
                    value: element.value().unwrap_or_default().to_string(),
                },
                _ => RowKind::Text,
            };
            rows.push(row(label, kind));
            return;
        }
        Tag::Section | Tag::Div | Tag::Ul | Tag::Li | Tag::Fieldset => {}
    }

    for child in element.child_elements() {
        visit(child, depth + 1, unavailable, rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::view::builder;

    #[test]
    fn test_flatten_card() {
        let id = "snake".into();
        let action = Action::LaunchApp("snake".into());
        let mut card = builder::build_card(&id, "Snake", "Eat", "/t.png", action);
        card.add_class(UNAVAILABLE);
        let rows = flatten(&Document::new(card));

        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["Snake", "Eat", "Launch"]);
        assert!(rows.iter().all(|r| r.unavailable));

        let launch = &rows[2];
        assert_eq!(launch.element_id.as_deref(), Some("launch-app-button-snake"));
        assert!(launch.actionable);
        assert_eq!(launch.kind, RowKind::Button { highlighted: false });
    }

    #[test]
    fn test_flatten_inputs() {
        let group = builder::radio_group(
            "screen-blank",
            "Screen",
            "screen-blank",
            vec![builder::RadioOption {
                id: "screen-blank-true".into(),
                value: "true".into(),
                label: "Blank".into(),
                action: Action::SetBlank(true),
            }],
        );
        let range =
            builder::range_input("audio-level", "Audio", 0, 100, 30, Action::SetAudioLoudness(30));
        let root = Element::new(Tag::Div).with_child(group).with_child(range);
        let rows = flatten(&Document::new(root));

        assert_eq!(rows[0].kind, RowKind::Heading);
        assert_eq!(rows[1].label, "Blank");
        assert_eq!(rows[1].kind, RowKind::Radio { checked: false });
        assert!(rows[2].is_range());
        assert_eq!(rows[2].kind, RowKind::Range { value: "30".to_string() });
    }
}
