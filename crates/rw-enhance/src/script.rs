//! Diagram renderer for statically built pages.
//!
//! The diagram library runs in the reader's browser, so rendering a built page
//! means emitting the bootstrap that loads the library and points it at the
//! extracted targets. [`ScriptRenderer`] appends two scripts to `<body>`:
//!
//! ```html
//! <script src="https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.min.js"></script>
//! <script>
//! mermaid.initialize({"startOnLoad":false,"securityLevel":"loose","theme":"neutral"});
//! mermaid.run({ nodes: ["mermaid-diagram-1"].map((id) => document.getElementById(id)) });
//! </script>
//! ```

use rw_dom::Document;

use crate::diagram::{DiagramBlock, DiagramRenderer, RendererConfig};

/// Default location of the diagram library.
pub const DEFAULT_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/mermaid@11/dist/mermaid.min.js";

/// Renderer that wires the page up to the client-side diagram library.
#[derive(Debug, Clone)]
pub struct ScriptRenderer {
    script_url: String,
    config: RendererConfig,
}

impl ScriptRenderer {
    /// Create a renderer loading the library from `script_url`.
    #[must_use]
    pub fn new(script_url: impl Into<String>) -> Self {
        Self {
            script_url: script_url.into(),
            config: RendererConfig::default(),
        }
    }

    /// Inline bootstrap for the given targets.
    fn bootstrap(&self, nodes: &[DiagramBlock]) -> String {
        let ids: Vec<&str> = nodes.iter().map(|b| b.id.as_str()).collect();
        // Both values are plain data structs, serialization cannot fail.
        let config = serde_json::to_string(&self.config).unwrap_or_else(|_| "{}".to_owned());
        let ids = serde_json::to_string(&ids).unwrap_or_else(|_| "[]".to_owned());
        format!(
            "\nmermaid.initialize({config});\nmermaid.run({{ nodes: {ids}.map((id) => document.getElementById(id)) }});\n"
        )
    }
}

impl Default for ScriptRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_SCRIPT_URL)
    }
}

impl DiagramRenderer for ScriptRenderer {
    fn initialize(&mut self, config: &RendererConfig) {
        self.config = config.clone();
    }

    fn run(&mut self, doc: &mut Document, nodes: &[DiagramBlock]) {
        let host = doc
            .elements_by_tag("body")
            .first()
            .copied()
            .unwrap_or_else(|| doc.root());

        let loader = doc.create_element("script");
        doc.set_attr(loader, "src", self.script_url.clone());
        doc.append_child(host, loader);

        let inline = doc.create_element("script");
        doc.set_text_content(inline, self.bootstrap(nodes));
        doc.append_child(host, inline);
    }
}
