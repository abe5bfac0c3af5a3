//! Diagram block extraction and renderer hand-off.
//!
//! Code containers tagged with [`DIAGRAM_MARKER`] are not given a copy
//! toolbar. Their wrapper is swapped for a diagram target element carrying a
//! sequential id and the raw diagram source, and the full ordered set of
//! targets is handed to a [`DiagramRenderer`] in a single call.

use rw_dom::{Document, NodeId};
use serde::Serialize;

use crate::consts::DIAGRAM_MARKER;
use crate::language::code_language;

/// Fixed configuration passed to the diagram renderer.
///
/// Serializes to the renderer's option names (`startOnLoad`,
/// `securityLevel`, `theme`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RendererConfig {
    /// Whether the renderer scans the page by itself on load.
    pub start_on_load: bool,
    /// Content sandboxing mode.
    pub security_level: String,
    /// Visual theme.
    pub theme: String,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            start_on_load: false,
            security_level: "loose".to_owned(),
            theme: "neutral".to_owned(),
        }
    }
}

/// A diagram target created from a code container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramBlock {
    /// Element id, `mermaid-diagram-<n>` with `n` counting from 1.
    pub id: String,
    /// Raw diagram source taken from the code container.
    pub source: String,
    /// The replacement element now in the document.
    pub node: NodeId,
}

/// External diagram renderer.
///
/// `initialize` is always called once, right before the single `run` call.
/// The renderer owns the target nodes from then on and may rewrite them.
pub trait DiagramRenderer {
    /// Apply renderer configuration.
    fn initialize(&mut self, config: &RendererConfig);

    /// Render the given targets, in document order.
    fn run(&mut self, doc: &mut Document, nodes: &[DiagramBlock]);
}

/// Element id for the `n`-th diagram on a page (1-based).
#[must_use]
pub fn diagram_id(n: usize) -> String {
    format!("{DIAGRAM_MARKER}-diagram-{n}")
}

/// Replace every diagram-tagged code container's wrapper with a target.
///
/// Targets are `<div class="mermaid" id="mermaid-diagram-<n>">source</div>`,
/// numbered in document order without gaps.
pub fn extract_diagrams(doc: &mut Document) -> Vec<DiagramBlock> {
    let mut blocks = Vec::new();

    for code in doc.select_children("pre", "code") {
        if code_language(doc, code) != Some(DIAGRAM_MARKER) {
            continue;
        }
        // Wrapper may already be gone if it held more than one diagram.
        let Some(wrapper) = doc.parent_element(code) else {
            continue;
        };
        if doc.parent(wrapper).is_none() {
            continue;
        }

        let id = diagram_id(blocks.len() + 1);
        let source = doc.text_content(code);

        let target = doc.create_element("div");
        doc.set_attr(target, "class", DIAGRAM_MARKER);
        doc.set_attr(target, "id", id.clone());
        doc.set_text_content(target, source.clone());
        doc.replace(wrapper, target);

        tracing::debug!(id = %id, "Extracted diagram block");
        blocks.push(DiagramBlock {
            id,
            source,
            node: target,
        });
    }

    blocks
}

/// Hand extracted diagram targets to the renderer, if there is one.
///
/// Returns `true` when the renderer was invoked. With no blocks or no renderer
/// the targets stay in the page as inert placeholders.
pub fn hand_off(
    doc: &mut Document,
    blocks: &[DiagramBlock],
    renderer: Option<&mut dyn DiagramRenderer>,
) -> bool {
    if blocks.is_empty() {
        return false;
    }
    let Some(renderer) = renderer else {
        tracing::debug!(count = blocks.len(), "No diagram renderer, leaving placeholders");
        return false;
    };

    renderer.initialize(&RendererConfig::default());
    renderer.run(doc, blocks);
    tracing::info!(count = blocks.len(), "Handed diagrams to renderer");
    true
}
