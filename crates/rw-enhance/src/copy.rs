//! Copy controls bound to enhanced code blocks.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use rw_dom::{Document, NodeId};

use crate::clipboard::Clipboard;
use crate::consts::{COPIED_CLASS, COPIED_LABEL, COPY_LABEL, FAILED_LABEL};

/// Document shared between a page and its copy controls.
pub type SharedDocument = Arc<Mutex<Document>>;

pub(crate) fn lock(doc: &SharedDocument) -> MutexGuard<'_, Document> {
    doc.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Which branch a copy activation took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text reached the clipboard; the button shows `Copied`.
    Copied,
    /// The clipboard write failed; the button shows `Failed`.
    Failed,
}

/// The Copy button of one enhanced code block.
///
/// Each activation writes the block's rendered text to a clipboard, shows
/// feedback on the button and schedules an independent revert to `Copy`.
/// Reverts are never cancelled: activating again before an earlier revert
/// fires leaves both timers running, and the earlier one resets the label
/// first.
#[derive(Debug, Clone)]
pub struct CopyControl {
    doc: SharedDocument,
    button: NodeId,
    code: NodeId,
    revert_delay: Duration,
}

impl CopyControl {
    pub(crate) fn new(
        doc: SharedDocument,
        button: NodeId,
        code: NodeId,
        revert_delay: Duration,
    ) -> Self {
        Self {
            doc,
            button,
            code,
            revert_delay,
        }
    }

    /// The `<button>` element.
    #[must_use]
    pub fn button(&self) -> NodeId {
        self.button
    }

    /// The `<code>` element whose text is copied.
    #[must_use]
    pub fn code(&self) -> NodeId {
        self.code
    }

    /// Current button label.
    #[must_use]
    pub fn label(&self) -> String {
        lock(&self.doc).text_content(self.button)
    }

    /// Whether the button currently carries the success class.
    #[must_use]
    pub fn is_copied(&self) -> bool {
        lock(&self.doc).has_class(self.button, COPIED_CLASS)
    }

    /// Handle a click on the button.
    ///
    /// Clipboard failures end here: they only change the label. The revert is
    /// spawned on the current tokio runtime, so this must run inside one.
    pub async fn activate<C: Clipboard>(&self, clipboard: &C) -> CopyOutcome {
        let text = lock(&self.doc).rendered_text(self.code);

        let outcome = match clipboard.write_text(&text).await {
            Ok(()) => CopyOutcome::Copied,
            Err(_) => CopyOutcome::Failed,
        };

        {
            let mut doc = lock(&self.doc);
            match outcome {
                CopyOutcome::Copied => {
                    doc.set_text_content(self.button, COPIED_LABEL);
                    doc.add_class(self.button, COPIED_CLASS);
                }
                CopyOutcome::Failed => doc.set_text_content(self.button, FAILED_LABEL),
            }
        }

        self.schedule_revert(outcome);
        outcome
    }

    fn schedule_revert(&self, outcome: CopyOutcome) {
        let doc = Arc::clone(&self.doc);
        let button = self.button;
        let delay = self.revert_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut doc = lock(&doc);
            doc.set_text_content(button, COPY_LABEL);
            if outcome == CopyOutcome::Copied {
                doc.remove_class(button, COPIED_CLASS);
            }
        });
    }
}
