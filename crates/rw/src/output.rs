//! Colored terminal reporting for `rw enhance`.

use std::fmt::Display;
use std::path::Path;

use console::{Style, Term};

/// Writes run progress and results to stderr.
pub(crate) struct Output {
    term: Term,
    label: Style,
    ok: Style,
    skipped: Style,
    failed: Style,
}

impl Output {
    /// Create a reporter writing to stderr.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            label: Style::new().dim(),
            ok: Style::new().green(),
            skipped: Style::new().yellow(),
            failed: Style::new().red(),
        }
    }

    /// Print a labelled directory, e.g. `Source: site/`.
    pub(crate) fn location(&self, label: &str, path: &Path) {
        self.line(&format!(
            "{} {}",
            self.label.apply_to(format!("{label}:")),
            path.display()
        ));
    }

    /// Report a page that was left untouched.
    pub(crate) fn skipped(&self, path: &Path, reason: &impl Display) {
        self.line(
            &self
                .skipped
                .apply_to(format!("Skipped {}: {reason}", path.display()))
                .to_string(),
        );
    }

    /// Report run totals.
    pub(crate) fn summary(&self, pages: usize, blocks: usize, diagrams: usize) {
        self.line(
            &self
                .ok
                .apply_to(format!(
                    "Enhanced {pages} pages ({blocks} code blocks, {diagrams} diagrams)"
                ))
                .to_string(),
        );
    }

    /// Print a fatal error.
    pub(crate) fn error(&self, msg: &str) {
        self.line(&self.failed.apply_to(msg).to_string());
    }

    fn line(&self, text: &str) {
        let _ = self.term.write_line(text);
    }
}
