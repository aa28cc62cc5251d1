// HTML export of the element tree. All text and attribute values are
// escaped; nothing from the backend reaches the output as markup.

use super::{Element, Node};
use std::fmt::Write;

pub(super) fn render(root: &Element) -> String {
    let mut out = String::new();
    write_element(&mut out, root);
    out
}

fn write_element(out: &mut String, element: &Element) {
    let tag = element.tag().as_str();
    out.push('<');
    out.push_str(tag);

    if let Some(id) = element.id() {
        write_attr(out, "id", id);
    }
    let classes: Vec<&str> = element.classes().collect();
    if !classes.is_empty() {
        write_attr(out, "class", &classes.join(" "));
    }
    for (name, value) in element.attrs() {
        write_attr(out, name, value);
    }
    if let Some(value) = element.value() {
        write_attr(out, "value", value);
    }
    if element.is_checked() {
        out.push_str(" checked");
    }
    out.push('>');

    if element.tag().is_void() {
        return;
    }

    for node in element.children() {
        match node {
            Node::Text(text) => out.push_str(&escape(text)),
            Node::Element(child) => write_element(out, child),
        }
    }
    let _ = write!(out, "</{}>", tag);
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {}=\"{}\"", name, escape(value));
}

pub(super) fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
