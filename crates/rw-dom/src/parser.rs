//! Lenient HTML parser built on the `quick-xml` tokenizer.
//!
//! Rendered documentation pages are close to XHTML but not quite: void
//! elements are not self-closed, some end tags are omitted, attributes may be
//! unquoted or valueless, prose contains bare `&` and `<`, and scripts contain
//! unescaped markup. The parser keeps
//! an explicit stack of open elements and closes to the nearest matching
//! ancestor, so stray or missing end tags never abort a page.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::sync::LazyLock;

use quick_xml::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use regex::Regex;

use crate::document::{Document, NodeId};
use crate::entities::{convert_html_entities, decode_reference};
use crate::error::DomError;
use crate::{drops_leading_newline, is_void};

static SCRIPT_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<script\b[^>]*>)(.*?)(</script\s*>)").expect("invalid script regex")
});

static STYLE_BODY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(<style\b[^>]*>)(.*?)(</style\s*>)").expect("invalid style regex")
});

static VERBATIM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!\[CDATA\[.*?\]\]>|<!--.*?-->").expect("invalid verbatim regex")
});

/// Parse HTML pages into [`Document`] trees.
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse an HTML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the tokenizer rejects the input.
    pub fn parse(&self, html: &str) -> Result<Document, DomError> {
        let html = prepare_markup(&protect_raw_text(html));

        let mut reader = Reader::from_str(&html);
        let config = reader.config_mut();
        config.trim_text(false);
        config.check_end_names = false;
        config.allow_unmatched_ends = true;
        config.allow_dangling_amp = true;

        let mut doc = Document::new();
        let mut open: Vec<NodeId> = vec![doc.root()];

        loop {
            let parent = *open.last().unwrap_or(&doc.root());
            match reader.read_event()? {
                Event::Start(e) => {
                    let node = self.element(&mut doc, reader.decoder(), &e);
                    doc.append_child(parent, node);
                    let tag = self.decode_name(reader.decoder(), e.name().as_ref());
                    if !is_void(&tag) {
                        open.push(node);
                    }
                }
                Event::Empty(e) => {
                    let node = self.element(&mut doc, reader.decoder(), &e);
                    doc.append_child(parent, node);
                }
                Event::End(e) => {
                    let tag = self.decode_name(reader.decoder(), e.name().as_ref());
                    if let Some(pos) = open.iter().rposition(|&id| doc.is_element(id, &tag)) {
                        open.truncate(pos);
                    }
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?;
                    let text = skip_leading_newline(&doc, parent, &text).to_owned();
                    append_text(&mut doc, parent, &text);
                }
                Event::GeneralRef(e) => {
                    let reference = reader.decoder().decode(&e)?;
                    append_text(&mut doc, parent, &decode_reference(&reference));
                }
                Event::CData(e) => {
                    let text = reader.decoder().decode(&e)?;
                    append_text(&mut doc, parent, &text);
                }
                Event::Comment(e) => {
                    let text = reader.decoder().decode(&e)?.into_owned();
                    let node = doc.create_comment(text);
                    doc.append_child(parent, node);
                }
                Event::DocType(e) => {
                    let content = reader.decoder().decode(&e)?.trim().to_owned();
                    let node = doc.create_doctype(content);
                    doc.append_child(parent, node);
                }
                Event::Eof => return Ok(doc),
                Event::Decl(_) | Event::PI(_) => {}
            }
        }
    }

    fn element(&self, doc: &mut Document, decoder: Decoder, e: &BytesStart) -> NodeId {
        let tag = self.decode_name(decoder, e.name().as_ref());
        let node = doc.create_element(tag);
        for attr in e.html_attributes().flatten() {
            let key = self.decode_name(decoder, attr.key.as_ref());
            let value = attr.unescape_value().map_or_else(
                |_| String::from_utf8_lossy(&attr.value).into_owned(),
                std::borrow::Cow::into_owned,
            );
            doc.set_attr(node, &key, value);
        }
        node
    }

    fn decode_name(&self, decoder: Decoder, name: &[u8]) -> String {
        decoder.decode(name).map_or_else(
            |_| String::from_utf8_lossy(name).into_owned(),
            std::borrow::Cow::into_owned,
        )
    }
}

impl Default for HtmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Merge text into a trailing text node or start a new one.
fn append_text(doc: &mut Document, parent: NodeId, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(&last) = doc.children(parent).last()
        && let Some(existing) = doc.text_mut(last)
    {
        existing.push_str(text);
        return;
    }
    let node = doc.create_text(text);
    doc.append_child(parent, node);
}

/// Drop the newline that directly follows a `<pre>`, `<listing>` or
/// `<textarea>` start tag.
fn skip_leading_newline<'a>(doc: &Document, parent: NodeId, text: &'a str) -> &'a str {
    let drops = doc.children(parent).is_empty()
        && doc
            .element(parent)
            .is_some_and(|el| drops_leading_newline(&el.tag));
    if !drops {
        return text;
    }
    text.strip_prefix("\r\n")
        .or_else(|| text.strip_prefix('\n'))
        .unwrap_or(text)
}

/// Rewrite markup outside CDATA sections and comments for the tokenizer:
/// HTML-only entities become characters and a `<` that cannot open a tag
/// becomes `&lt;`.
fn prepare_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for m in VERBATIM.find_iter(html) {
        escape_stray_lt(&convert_html_entities(&html[last..m.start()]), &mut out);
        out.push_str(m.as_str());
        last = m.end();
    }
    escape_stray_lt(&convert_html_entities(&html[last..]), &mut out);
    out
}

/// Copy `text` to `out`, escaping each `<` not followed by a letter, `/`, `!` or `?`.
fn escape_stray_lt(text: &str, out: &mut String) {
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        let opens_tag = ch == '<'
            && chars
                .peek()
                .is_some_and(|&next| next.is_ascii_alphabetic() || matches!(next, '/' | '!' | '?'));
        if ch == '<' && !opens_tag {
            out.push_str("&lt;");
        } else {
            out.push(ch);
        }
    }
}

/// Wrap `<script>` and `<style>` bodies in CDATA so the tokenizer passes them
/// through untouched.
fn protect_raw_text(html: &str) -> String {
    let wrap = |caps: &regex::Captures| {
        let body = &caps[2];
        if body.is_empty() {
            return caps[0].to_owned();
        }
        let body = body.replace("]]>", "]]]]><![CDATA[>");
        format!("{}<![CDATA[{body}]]>{}", &caps[1], &caps[3])
    };
    let html = SCRIPT_BODY.replace_all(html, wrap);
    STYLE_BODY.replace_all(&html, wrap).into_owned()
}
