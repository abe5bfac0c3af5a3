//! Clipboard collaborator used by copy controls.

use std::future::Future;
use std::sync::{Mutex, PoisonError};

/// Why a clipboard write did not happen.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// The host refused access.
    #[error("clipboard access denied")]
    Denied,
    /// No clipboard in this environment.
    #[error("clipboard unavailable")]
    Unavailable,
    /// The write was attempted and failed.
    #[error("clipboard write failed: {0}")]
    Failed(String),
}

/// Asynchronous text clipboard.
pub trait Clipboard: Send + Sync {
    /// Write `text` to the clipboard.
    fn write_text(&self, text: &str) -> impl Future<Output = Result<(), ClipboardError>> + Send;
}

/// In-memory clipboard that keeps the last written text.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Mutex<Option<String>>,
}

impl MemoryClipboard {
    /// Create an empty clipboard.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last written text.
    #[must_use]
    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_owned());
        Ok(())
    }
}

/// Clipboard for environments without one; every write fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}
