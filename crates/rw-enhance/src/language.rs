//! Language tags carried by code containers.

use std::sync::LazyLock;

use regex::Regex;
use rw_dom::{Document, NodeId};

use crate::consts::FALLBACK_LABEL;

/// First `language-<id>` occurrence anywhere in a class attribute.
static LANGUAGE_CLASS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"language-([a-zA-Z0-9_-]+)").expect("invalid language regex"));

/// Extract the language tag from a class attribute value.
///
/// The match is unanchored, so `"hljs language-rust"` and `"xlanguage-rust"`
/// both yield `rust`. Returns `None` when no class matches.
#[must_use]
pub fn language_tag(class_name: &str) -> Option<&str> {
    LANGUAGE_CLASS
        .captures(class_name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Language tag of a code container element.
#[must_use]
pub fn code_language(doc: &Document, code: NodeId) -> Option<&str> {
    doc.attr(code, "class").and_then(language_tag)
}

/// Toolbar label for a code container: its language tag or `code`.
#[must_use]
pub fn display_label(doc: &Document, code: NodeId) -> &str {
    code_language(doc, code).unwrap_or(FALLBACK_LABEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_tag_simple() {
        assert_eq!(language_tag("language-python"), Some("python"));
    }

    #[test]
    fn test_language_tag_among_other_classes() {
        assert_eq!(language_tag("hljs language-c_sharp extra"), Some("c_sharp"));
    }

    #[test]
    fn test_language_tag_stops_at_invalid_char() {
        assert_eq!(language_tag("language-c++"), Some("c"));
        assert_eq!(language_tag("language-objective-c"), Some("objective-c"));
    }

    #[test]
    fn test_language_tag_first_match_wins() {
        assert_eq!(language_tag("language-js language-ts"), Some("js"));
    }

    #[test]
    fn test_language_tag_missing() {
        assert_eq!(language_tag(""), None);
        assert_eq!(language_tag("highlight"), None);
        assert_eq!(language_tag("language-"), None);
    }

    #[test]
    fn test_display_label_fallback() {
        let mut doc = Document::new();
        let plain = doc.create_element("code");
        let tagged = doc.create_element("code");
        doc.set_attr(tagged, "class", "language-toml");

        assert_eq!(display_label(&doc, plain), "code");
        assert_eq!(display_label(&doc, tagged), "toml");
    }
}
