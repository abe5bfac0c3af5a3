//! HTML document tree for RW page post-processing.
//!
//! Rendered documentation pages are parsed into a [`Document`], an arena of
//! nodes addressed by [`NodeId`]. The tree supports the handful of DOM
//! operations needed to enhance pages after they are built: element lookup
//! in document order, attribute and class manipulation, node insertion and
//! replacement, and text extraction.
//!
//! # Example
//!
//! ```
//! use rw_dom::{HtmlParser, HtmlSerializer};
//!
//! let mut doc = HtmlParser::new()
//!     .parse(r#"<pre><code class="language-rust">fn main() {}</code></pre>"#)
//!     .unwrap();
//!
//! let code = doc.select_children("pre", "code")[0];
//! assert_eq!(doc.text_content(code), "fn main() {}");
//!
//! let pre = doc.parent(code).unwrap();
//! doc.add_class(pre, "code-block");
//!
//! let html = HtmlSerializer::new().serialize(&doc);
//! assert!(html.starts_with(r#"<pre class="code-block">"#));
//! ```

mod document;
mod entities;
mod error;
mod parser;
mod serializer;

pub use document::{Document, Element, NodeData, NodeId};
pub use error::DomError;
pub use parser::HtmlParser;
pub use serializer::HtmlSerializer;

/// Elements that never have children or a closing tag.
pub(crate) const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose content is raw text, neither parsed nor escaped.
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Elements that ignore a newline directly after their start tag.
pub(crate) const LEADING_NEWLINE_ELEMENTS: &[&str] = &["listing", "pre", "textarea"];

/// Whether `tag` is a void element.
pub(crate) fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Whether `tag` holds raw text.
pub(crate) fn is_raw_text(tag: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(tag))
}

/// Whether `tag` drops a newline that directly follows its start tag.
pub(crate) fn drops_leading_newline(tag: &str) -> bool {
    LEADING_NEWLINE_ELEMENTS
        .iter()
        .any(|v| v.eq_ignore_ascii_case(tag))
}
