//! Markup serialization.
//!
//! Elements print their class list first, then attributes in insertion order,
//! then the live presentation as a `style` attribute. Raw payloads are written
//! verbatim; text is escaped.

use std::fmt::{self, Write};

use stagekit_css::encode;

use crate::document::{Document, NodeId, NodeKind};

const VOID_ELEMENTS: [&str; 8] = ["area", "br", "col", "hr", "img", "input", "link", "meta"];

fn escape_text(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(s: &str, out: &mut String) {
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    escape_attr(value, out);
    out.push('"');
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    match doc.kind(id) {
        Some(NodeKind::Element(element)) => {
            let tag = element.tag();
            out.push('<');
            out.push_str(tag);
            if !element.classes().is_empty() {
                write_attr(out, "class", &element.classes().join(" "));
            }
            for (name, value) in element.attributes() {
                write_attr(out, name, value);
            }
            let style = encode(element.presentation());
            if !style.is_empty() {
                write_attr(out, "style", style.trim_end());
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&tag) {
                return;
            }
            write_children(doc, id, out);
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        Some(NodeKind::Text(text)) => escape_text(text, out),
        Some(NodeKind::Raw(markup)) => out.push_str(markup),
        None => {}
    }
}

fn write_children(doc: &Document, id: NodeId, out: &mut String) {
    for child in doc.children(id) {
        write_node(doc, child, out);
    }
}

impl Document {
    /// Markup of the node's children.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_children(self, id, &mut out);
        out
    }

    /// Markup of the node itself, including its children.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        write_node(self, id, &mut out);
        out
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Document")?;
        f.write_str(&self.outer_html(self.root()))?;
        f.write_char('\n')
    }
}
