//! HTML serializer for [`Document`] trees.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::fmt::Write;

use crate::document::{Document, NodeData, NodeId};
use crate::{drops_leading_newline, is_raw_text, is_void};

/// Serialize a [`Document`] back to HTML.
pub struct HtmlSerializer;

impl HtmlSerializer {
    /// Create a new serializer.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Serialize the whole document.
    pub fn serialize(&self, doc: &Document) -> String {
        let mut out = String::with_capacity(4096);
        for &child in doc.children(doc.root()) {
            serialize_node(doc, child, false, &mut out);
        }
        out
    }

    /// Serialize a single node and its subtree.
    pub fn serialize_node(&self, doc: &Document, id: NodeId) -> String {
        let mut out = String::new();
        serialize_node(doc, id, false, &mut out);
        out
    }
}

impl Default for HtmlSerializer {
    fn default() -> Self {
        Self::new()
    }
}

fn serialize_node(doc: &Document, id: NodeId, raw: bool, out: &mut String) {
    match doc.data(id) {
        NodeData::Root => {
            for &child in doc.children(id) {
                serialize_node(doc, child, false, out);
            }
        }
        NodeData::Doctype(content) => write!(out, "<!DOCTYPE {content}>").unwrap(),
        NodeData::Comment(text) => write!(out, "<!--{text}-->").unwrap(),
        NodeData::Text(text) if raw => out.push_str(text),
        NodeData::Text(text) => out.push_str(&escape_text(text)),
        NodeData::Element(el) => {
            out.push('<');
            out.push_str(&el.tag);
            for (key, value) in &el.attrs {
                write!(out, r#" {}="{}""#, key, escape_attr(value)).unwrap();
            }
            out.push('>');

            if is_void(&el.tag) {
                return;
            }
            // The first newline after the start tag is eaten on reparse.
            if drops_leading_newline(&el.tag)
                && let Some(&first) = doc.children(id).first()
                && matches!(doc.data(first), NodeData::Text(text) if text.starts_with('\n'))
            {
                out.push('\n');
            }

            let raw = is_raw_text(&el.tag);
            for &child in doc.children(id) {
                serialize_node(doc, child, raw, out);
            }
            write!(out, "</{}>", el.tag).unwrap();
        }
    }
}

fn escape_text(text: &str) -> String {
    escape(text, false)
}

fn escape_attr(text: &str) -> String {
    escape(text, true)
}

fn escape(text: &str, quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
