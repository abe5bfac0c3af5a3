//! Code block enhancement for rendered RW pages.
//!
//! Takes a built HTML page and turns its `<pre><code>` blocks into
//! interactive blocks:
//! - a toolbar with the block's language (or `code`) and a Copy button,
//! - a [`CopyControl`] per button that writes the block's text to a
//!   [`Clipboard`] and shows `Copied`/`Failed` feedback for 1400 ms,
//! - `mermaid` blocks replaced with diagram targets and handed once, in
//!   document order, to a [`DiagramRenderer`].
//!
//! # Architecture
//!
//! - [`language`]: `language-<id>` class parsing
//! - [`diagram`]: diagram extraction and the renderer seam
//! - [`ScriptRenderer`]: renderer that emits the client-side bootstrap
//! - [`BlockEnhancer`] / [`EnhancedPage`]: the enhancement passes and their result
//! - [`CopyControl`]: per-button clipboard action with timed revert
//!
//! # Example
//!
//! ```
//! use rw_enhance::{BlockEnhancer, ScriptRenderer};
//!
//! let html = r#"<body><pre><code class="language-mermaid">graph TD; A-->B;</code></pre></body>"#;
//! let mut renderer = ScriptRenderer::default();
//! let page = BlockEnhancer::new().enhance_html(html, Some(&mut renderer)).unwrap();
//!
//! assert_eq!(page.diagrams()[0].id, "mermaid-diagram-1");
//! assert!(page.to_html().contains("mermaid.run"));
//! ```

mod clipboard;
pub mod consts;
mod copy;
pub mod diagram;
mod enhancer;
mod error;
pub mod language;
mod script;

pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, UnavailableClipboard};
pub use copy::{CopyControl, CopyOutcome, SharedDocument};
pub use diagram::{DiagramBlock, DiagramRenderer, RendererConfig};
pub use enhancer::{BlockEnhancer, EnhancedBlock, EnhancedPage, enhance_code_blocks};
pub use error::EnhanceError;
pub use script::{DEFAULT_SCRIPT_URL, ScriptRenderer};
