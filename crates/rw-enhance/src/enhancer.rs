//! The Block Enhancer.
//!
//! Enhancement runs in two passes over a parsed page:
//!
//! 1. Diagram extraction swaps diagram-tagged blocks for renderer targets and
//!    hands them off (see [`crate::diagram`]). It runs first because it removes
//!    wrappers the second pass would otherwise decorate.
//! 2. The generic pass gives every remaining `pre > code` block a toolbar with
//!    a language label and a Copy button.
//!
//! A wrapper is marked with `data-enhanced="true"` before anything else
//! touches it, which makes the generic pass safe to run again.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use rw_dom::{Document, HtmlParser, HtmlSerializer, NodeId};

use crate::consts::{
    CODE_BLOCK_CLASS, COPY_BUTTON_CLASS, COPY_LABEL, ENHANCED_ATTR, LANG_CLASS, REVERT_DELAY,
    TOOLBAR_CLASS,
};
use crate::copy::{CopyControl, SharedDocument, lock};
use crate::diagram::{DiagramBlock, DiagramRenderer, extract_diagrams, hand_off};
use crate::error::EnhanceError;
use crate::language::display_label;

/// A code block decorated by the generic pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedBlock {
    /// The `<pre>` wrapper.
    pub wrapper: NodeId,
    /// The `<code>` container.
    pub code: NodeId,
    /// The inserted toolbar.
    pub toolbar: NodeId,
    /// The Copy button inside the toolbar.
    pub button: NodeId,
    /// Text of the language label.
    pub label: String,
}

/// Add toolbars to every code block that does not have one yet.
///
/// Returns the blocks enhanced by this call, in document order. Blocks whose
/// wrapper is already marked are skipped, as are code elements with no parent
/// element.
pub fn enhance_code_blocks(doc: &mut Document) -> Vec<EnhancedBlock> {
    let mut enhanced = Vec::new();

    for code in doc.select_children("pre", "code") {
        let Some(wrapper) = doc.parent_element(code) else {
            continue;
        };
        if doc.attr(wrapper, ENHANCED_ATTR) == Some("true") {
            tracing::debug!(?wrapper, "Skipping already enhanced block");
            continue;
        }

        doc.set_attr(wrapper, ENHANCED_ATTR, "true");
        doc.add_class(wrapper, CODE_BLOCK_CLASS);

        let label = display_label(doc, code).to_owned();
        let (toolbar, button) = build_toolbar(doc, &label);
        doc.prepend_child(wrapper, toolbar);

        tracing::debug!(label = %label, "Enhanced code block");
        enhanced.push(EnhancedBlock {
            wrapper,
            code,
            toolbar,
            button,
            label,
        });
    }

    enhanced
}

/// Build `<div class="code-toolbar"><span class="code-lang">..</span><button ..>Copy</button></div>`.
fn build_toolbar(doc: &mut Document, label: &str) -> (NodeId, NodeId) {
    let toolbar = doc.create_element("div");
    doc.set_attr(toolbar, "class", TOOLBAR_CLASS);

    let lang = doc.create_element("span");
    doc.set_attr(lang, "class", LANG_CLASS);
    doc.set_text_content(lang, label);

    let button = doc.create_element("button");
    doc.set_attr(button, "type", "button");
    doc.set_attr(button, "class", COPY_BUTTON_CLASS);
    doc.set_text_content(button, COPY_LABEL);

    doc.append_child(toolbar, lang);
    doc.append_child(toolbar, button);
    (toolbar, button)
}

/// Enhances parsed pages.
///
/// # Example
///
/// ```
/// use rw_enhance::BlockEnhancer;
///
/// let page = BlockEnhancer::new()
///     .enhance_html(r#"<pre><code class="language-python">print(1)</code></pre>"#, None)
///     .unwrap();
///
/// assert_eq!(page.controls().len(), 1);
/// assert!(page.to_html().contains(r#"<span class="code-lang">python</span>"#));
/// ```
#[derive(Debug, Clone)]
pub struct BlockEnhancer {
    revert_delay: Duration,
}

impl BlockEnhancer {
    /// Create an enhancer with the standard 1400 ms feedback delay.
    #[must_use]
    pub fn new() -> Self {
        Self {
            revert_delay: REVERT_DELAY,
        }
    }

    /// Override how long copy feedback stays visible.
    #[must_use]
    pub fn revert_delay(mut self, delay: Duration) -> Self {
        self.revert_delay = delay;
        self
    }

    /// Parse `html` and enhance it.
    ///
    /// # Errors
    ///
    /// Returns an error if the page cannot be parsed.
    pub fn enhance_html(
        &self,
        html: &str,
        renderer: Option<&mut dyn DiagramRenderer>,
    ) -> Result<EnhancedPage, EnhanceError> {
        let doc = HtmlParser::new().parse(html)?;
        Ok(self.enhance(doc, renderer))
    }

    /// Enhance an already parsed document.
    pub fn enhance(
        &self,
        mut doc: Document,
        renderer: Option<&mut dyn DiagramRenderer>,
    ) -> EnhancedPage {
        let diagrams = extract_diagrams(&mut doc);
        let diagrams_rendered = hand_off(&mut doc, &diagrams, renderer);
        let blocks = enhance_code_blocks(&mut doc);

        let mut page = EnhancedPage {
            doc: Arc::new(Mutex::new(doc)),
            revert_delay: self.revert_delay,
            diagrams,
            diagrams_rendered,
            controls: Vec::new(),
        };
        page.bind(&blocks);
        page
    }
}

impl Default for BlockEnhancer {
    fn default() -> Self {
        Self::new()
    }
}

/// A page after enhancement, owning its document and copy controls.
#[derive(Debug)]
pub struct EnhancedPage {
    doc: SharedDocument,
    revert_delay: Duration,
    diagrams: Vec<DiagramBlock>,
    diagrams_rendered: bool,
    controls: Vec<CopyControl>,
}

impl EnhancedPage {
    fn bind(&mut self, blocks: &[EnhancedBlock]) {
        self.controls.extend(blocks.iter().map(|block| {
            CopyControl::new(
                Arc::clone(&self.doc),
                block.button,
                block.code,
                self.revert_delay,
            )
        }));
    }

    /// Copy controls, one per enhanced block, in document order.
    #[must_use]
    pub fn controls(&self) -> &[CopyControl] {
        &self.controls
    }

    /// Diagram targets extracted from the page.
    #[must_use]
    pub fn diagrams(&self) -> &[DiagramBlock] {
        &self.diagrams
    }

    /// Whether the diagram targets were handed to a renderer.
    #[must_use]
    pub fn diagrams_rendered(&self) -> bool {
        self.diagrams_rendered
    }

    /// Run the generic pass again, binding controls for any new blocks.
    ///
    /// Returns the number of newly enhanced blocks.
    pub fn rescan(&mut self) -> usize {
        let blocks = enhance_code_blocks(&mut lock(&self.doc));
        self.bind(&blocks);
        blocks.len()
    }

    /// Read the document.
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        let doc = lock(&self.doc);
        f(&*doc)
    }

    /// Mutate the document, e.g. to inject content before a [`rescan`](Self::rescan).
    pub fn with_document_mut<R>(&self, f: impl FnOnce(&mut Document) -> R) -> R {
        let mut doc = lock(&self.doc);
        f(&mut *doc)
    }

    /// Serialize the page.
    #[must_use]
    pub fn to_html(&self) -> String {
        let doc = lock(&self.doc);
        HtmlSerializer::new().serialize(&doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::{ClipboardError, MemoryClipboard, UnavailableClipboard};
    use crate::copy::CopyOutcome;
    use crate::diagram::RendererConfig;
    use crate::{Clipboard, consts::COPIED_CLASS};
    use pretty_assertions::assert_eq;

    fn enhance(html: &str) -> EnhancedPage {
        BlockEnhancer::new().enhance_html(html, None).unwrap()
    }

    fn labels(page: &EnhancedPage) -> Vec<String> {
        page.with_document(|doc| {
            doc.descendants(doc.root())
                .into_iter()
                .filter(|&id| doc.has_class(id, LANG_CLASS))
                .map(|id| doc.text_content(id))
                .collect()
        })
    }

    #[test]
    fn test_python_block_gets_toolbar() {
        let page = enhance(r#"<pre><code class="language-python">print(1)</code></pre>"#);

        assert_eq!(
            page.to_html(),
            concat!(
                r#"<pre data-enhanced="true" class="code-block">"#,
                r#"<div class="code-toolbar"><span class="code-lang">python</span>"#,
                r#"<button type="button" class="copy-button">Copy</button></div>"#,
                r#"<code class="language-python">print(1)</code></pre>"#,
            )
        );
        page.with_document(|doc| {
            let pre = doc.elements_by_tag("pre")[0];
            let toolbar = doc.first_child(pre).unwrap();
            assert!(doc.has_class(toolbar, TOOLBAR_CLASS));
        });
    }

    #[test]
    fn test_label_from_language_or_fallback() {
        let page = enhance(concat!(
            "<pre><code>plain</code></pre>",
            r#"<pre><code class="hljs language-rust">fn x() {}</code></pre>"#,
            r#"<pre><code class="highlight">x</code></pre>"#,
        ));
        assert_eq!(labels(&page), vec!["code", "rust", "code"]);
    }

    #[test]
    fn test_toolbar_directly_precedes_code_after_newline() {
        let page = enhance("<pre>\n<code>x</code></pre>");
        page.with_document(|doc| {
            let pre = doc.elements_by_tag("pre")[0];
            let children = doc.children(pre);
            assert_eq!(children.len(), 2);
            assert!(doc.has_class(children[0], TOOLBAR_CLASS));
            assert!(doc.is_element(children[1], "code"));
        });
        assert!(page.to_html().contains("</div><code>x</code></pre>"));
    }

    #[test]
    fn test_page_with_bare_ampersand_and_less_than() {
        let page = enhance("<p>Q&A: a < b</p><pre><code>a && b</code></pre>");
        assert_eq!(page.controls().len(), 1);
        assert!(page.to_html().starts_with("<p>Q&amp;A: a &lt; b</p><pre"));
    }

    #[test]
    fn test_existing_wrapper_class_kept() {
        let page = enhance(r#"<pre class="highlight"><code>x</code></pre>"#);
        page.with_document(|doc| {
            let pre = doc.elements_by_tag("pre")[0];
            assert_eq!(doc.attr(pre, "class"), Some("highlight code-block"));
        });
    }

    #[test]
    fn test_code_outside_pre_untouched() {
        let html = "<p>Use <code>cargo</code> here.</p>";
        let page = enhance(html);
        assert!(page.controls().is_empty());
        assert_eq!(page.to_html(), html);
    }

    #[test]
    fn test_second_pass_adds_no_toolbar() {
        let mut page = enhance("<pre><code>x</code></pre>");
        assert_eq!(page.rescan(), 0);
        assert_eq!(page.controls().len(), 1);

        page.with_document(|doc| {
            let toolbars = doc
                .descendants(doc.root())
                .into_iter()
                .filter(|&id| doc.has_class(id, TOOLBAR_CLASS))
                .count();
            assert_eq!(toolbars, 1);
        });
    }

    #[test]
    fn test_premarked_wrapper_skipped() {
        let html = r#"<pre data-enhanced="true"><code>x</code></pre>"#;
        let page = enhance(html);
        assert!(page.controls().is_empty());
        assert_eq!(page.to_html(), html);
    }

    #[test]
    fn test_rescan_picks_up_new_blocks() {
        let mut page = enhance("<pre><code>a</code></pre>");
        page.with_document_mut(|doc| {
            let root = doc.root();
            let pre = doc.create_element("pre");
            let code = doc.create_element("code");
            doc.set_attr(code, "class", "language-sh");
            doc.set_text_content(code, "ls");
            doc.append_child(pre, code);
            doc.append_child(root, pre);
        });

        assert_eq!(page.rescan(), 1);
        assert_eq!(page.controls().len(), 2);
        assert_eq!(labels(&page), vec!["code", "sh"]);
    }

    #[test]
    fn test_diagram_blocks_get_no_toolbar() {
        let page = enhance(concat!(
            r#"<pre><code class="language-mermaid">graph TD; A--&gt;B;</code></pre>"#,
            r#"<pre><code class="language-js">x()</code></pre>"#,
        ));

        assert_eq!(page.diagrams().len(), 1);
        assert!(!page.diagrams_rendered());
        assert_eq!(page.controls().len(), 1);
        assert_eq!(labels(&page), vec!["js"]);
        assert!(page.to_html().starts_with(
            r#"<div class="mermaid" id="mermaid-diagram-1">graph TD; A--&gt;B;</div>"#
        ));
    }

    #[test]
    fn test_renderer_receives_single_diagram() {
        struct Stub {
            calls: Vec<Vec<(String, String)>>,
            initialized: bool,
        }
        impl DiagramRenderer for Stub {
            fn initialize(&mut self, config: &RendererConfig) {
                assert!(!config.start_on_load);
                self.initialized = true;
            }
            fn run(&mut self, doc: &mut Document, nodes: &[DiagramBlock]) {
                self.calls.push(
                    nodes
                        .iter()
                        .map(|b| {
                            let id = doc.attr(b.node, "id").unwrap_or_default().to_owned();
                            (id, doc.text_content(b.node))
                        })
                        .collect(),
                );
            }
        }

        let mut stub = Stub {
            calls: Vec::new(),
            initialized: false,
        };
        let page = BlockEnhancer::new()
            .enhance_html(
                r#"<pre><code class="language-mermaid">graph TD; A-->B;</code></pre>"#,
                Some(&mut stub),
            )
            .unwrap();

        assert!(page.diagrams_rendered());
        assert!(stub.initialized);
        assert_eq!(
            stub.calls,
            vec![vec![(
                "mermaid-diagram-1".to_owned(),
                "graph TD; A-->B;".to_owned()
            )]]
        );
    }

    struct DeniedClipboard;

    impl Clipboard for DeniedClipboard {
        async fn write_text(&self, _text: &str) -> Result<(), ClipboardError> {
            Err(ClipboardError::Denied)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_success_label_cycle() {
        let page = enhance("<pre><code class=\"language-rs\">let x = 1;\n</code></pre>");
        let control = &page.controls()[0];
        let clipboard = MemoryClipboard::new();

        assert_eq!(control.label(), "Copy");
        assert!(!control.is_copied());

        assert_eq!(control.activate(&clipboard).await, CopyOutcome::Copied);
        assert_eq!(clipboard.contents().as_deref(), Some("let x = 1;\n"));
        assert_eq!(control.label(), "Copied");
        assert!(control.is_copied());

        tokio::time::sleep(Duration::from_millis(1399)).await;
        assert_eq!(control.label(), "Copied");
        assert!(control.is_copied());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(control.label(), "Copy");
        assert!(!control.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_failure_label_cycle() {
        let page = enhance("<pre><code>x</code></pre>");
        let control = &page.controls()[0];

        assert_eq!(control.activate(&DeniedClipboard).await, CopyOutcome::Failed);
        assert_eq!(control.label(), "Failed");
        assert!(!control.is_copied());

        tokio::time::sleep(Duration::from_millis(1401)).await;
        assert_eq!(control.label(), "Copy");
        assert!(!control.is_copied());
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_clipboard_fails_quietly() {
        let page = enhance("<pre><code>x</code></pre>");
        let control = &page.controls()[0];

        assert_eq!(
            control.activate(&UnavailableClipboard).await,
            CopyOutcome::Failed
        );
        page.with_document(|doc| {
            assert!(!doc.has_class(control.button(), COPIED_CLASS));
        });
    }

    #[tokio::test(start_paused = true)]
    async fn test_repeated_clicks_keep_independent_reverts() {
        let page = enhance("<pre><code>x</code></pre>");
        let control = &page.controls()[0];
        let clipboard = MemoryClipboard::new();

        control.activate(&clipboard).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        control.activate(&clipboard).await;
        assert_eq!(control.label(), "Copied");

        // First revert fires 1400 ms after the first click.
        tokio::time::sleep(Duration::from_millis(401)).await;
        assert_eq!(control.label(), "Copy");
        assert!(!control.is_copied());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(control.label(), "Copy");
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_uses_rendered_text() {
        let page = enhance("<pre><code>a<br>b &amp; c<!-- hidden --></code></pre>");
        let clipboard = MemoryClipboard::new();

        page.controls()[0].activate(&clipboard).await;
        assert_eq!(clipboard.contents().as_deref(), Some("a\nb & c"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_are_independent() {
        let page = enhance("<pre><code>a</code></pre><pre><code>b</code></pre>");
        let clipboard = MemoryClipboard::new();

        page.controls()[1].activate(&clipboard).await;
        assert_eq!(page.controls()[0].label(), "Copy");
        assert_eq!(page.controls()[1].label(), "Copied");
        assert_eq!(clipboard.contents().as_deref(), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_revert_delay() {
        let page = BlockEnhancer::new()
            .revert_delay(Duration::from_millis(50))
            .enhance_html("<pre><code>x</code></pre>", None)
            .unwrap();
        let control = &page.controls()[0];

        control.activate(&MemoryClipboard::new()).await;
        tokio::time::sleep(Duration::from_millis(51)).await;
        assert_eq!(control.label(), "Copy");
    }
}
