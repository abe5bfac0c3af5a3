//! Error types for HTML parsing.

use std::str::Utf8Error;

/// Error while parsing an HTML page into a [`Document`](crate::Document).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum DomError {
    /// XML tokenizer error.
    #[error("HTML parse error: {0}")]
    Parse(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// Attribute syntax error.
    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error while decoding text.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),
}
