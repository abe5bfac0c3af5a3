//! Markup vocabulary and timing shared by the enhancement passes.

use std::time::Duration;

/// Attribute set on a wrapper once it has been enhanced.
pub const ENHANCED_ATTR: &str = "data-enhanced";

/// Class added to every enhanced wrapper.
pub const CODE_BLOCK_CLASS: &str = "code-block";

/// Class of the toolbar inserted at the top of a wrapper.
pub const TOOLBAR_CLASS: &str = "code-toolbar";

/// Class of the language label inside the toolbar.
pub const LANG_CLASS: &str = "code-lang";

/// Class of the copy button inside the toolbar.
pub const COPY_BUTTON_CLASS: &str = "copy-button";

/// Class present on the copy button while it shows [`COPIED_LABEL`].
pub const COPIED_CLASS: &str = "copied";

/// Label shown when a code block has no language class.
pub const FALLBACK_LABEL: &str = "code";

/// Resting label of the copy button.
pub const COPY_LABEL: &str = "Copy";

/// Label after a successful clipboard write.
pub const COPIED_LABEL: &str = "Copied";

/// Label after a failed clipboard write.
pub const FAILED_LABEL: &str = "Failed";

/// How long the copy button shows its feedback label.
pub const REVERT_DELAY: Duration = Duration::from_millis(1400);

/// Language tag reserved for diagram blocks.
pub const DIAGRAM_MARKER: &str = "mermaid";
