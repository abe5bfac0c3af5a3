//! Error types for page enhancement.

use rw_dom::DomError;

/// Error while enhancing a page.
///
/// Enhancement itself never fails; the only error source is turning the
/// input HTML into a document.
#[derive(Debug, thiserror::Error)]
pub enum EnhanceError {
    /// The page could not be parsed.
    #[error("failed to parse page")]
    Parse(#[from] DomError),
}
