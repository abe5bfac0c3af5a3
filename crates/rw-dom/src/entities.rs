//! Named HTML entity handling.
//!
//! The tokenizer only knows the five XML entities. Rendered pages routinely
//! contain HTML-only ones (`&nbsp;`, `&mdash;`, ...), so those are rewritten to
//! their characters before tokenizing. Anything unknown is left untouched and
//! later surfaces as literal text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

static NAMED_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([a-zA-Z][a-zA-Z0-9]*);").expect("invalid entity regex"));

/// HTML entities outside the XML set, sorted by name for binary search.
const HTML_ENTITIES: &[(&str, char)] = &[
    ("Dagger", '\u{2021}'),
    ("bull", '\u{2022}'),
    ("cent", '\u{00a2}'),
    ("copy", '\u{00a9}'),
    ("dagger", '\u{2020}'),
    ("darr", '\u{2193}'),
    ("deg", '\u{00b0}'),
    ("divide", '\u{00f7}'),
    ("euro", '\u{20ac}'),
    ("frac12", '\u{00bd}'),
    ("frac14", '\u{00bc}'),
    ("frac34", '\u{00be}'),
    ("ge", '\u{2265}'),
    ("harr", '\u{2194}'),
    ("hellip", '\u{2026}'),
    ("laquo", '\u{00ab}'),
    ("larr", '\u{2190}'),
    ("ldquo", '\u{201c}'),
    ("le", '\u{2264}'),
    ("lsquo", '\u{2018}'),
    ("mdash", '\u{2014}'),
    ("middot", '\u{00b7}'),
    ("nbsp", '\u{00a0}'),
    ("ndash", '\u{2013}'),
    ("ne", '\u{2260}'),
    ("para", '\u{00b6}'),
    ("plusmn", '\u{00b1}'),
    ("pound", '\u{00a3}'),
    ("raquo", '\u{00bb}'),
    ("rarr", '\u{2192}'),
    ("rdquo", '\u{201d}'),
    ("reg", '\u{00ae}'),
    ("rsquo", '\u{2019}'),
    ("sect", '\u{00a7}'),
    ("times", '\u{00d7}'),
    ("trade", '\u{2122}'),
    ("uarr", '\u{2191}'),
    ("yen", '\u{00a5}'),
];

/// Replace HTML-only named entities with their characters.
///
/// XML entities (`amp`, `lt`, `gt`, `quot`, `apos`) are not in the table and
/// pass through for the tokenizer to resolve.
pub(crate) fn convert_html_entities(html: &str) -> Cow<'_, str> {
    NAMED_ENTITY.replace_all(html, |caps: &regex::Captures| {
        lookup(&caps[1]).map_or_else(|| caps[0].to_owned(), String::from)
    })
}

fn lookup(name: &str) -> Option<char> {
    HTML_ENTITIES
        .binary_search_by(|(key, _)| (*key).cmp(name))
        .ok()
        .map(|idx| HTML_ENTITIES[idx].1)
}

/// Resolve an entity reference body (without `&` and `;`).
///
/// Handles the XML entities and decimal/hex character references. Returns the
/// original `&name;` text for anything else.
pub(crate) fn decode_reference(reference: &str) -> String {
    let resolved = match reference {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => reference.strip_prefix('#').and_then(|num| {
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            };
            code.and_then(char::from_u32)
        }),
    };
    resolved.map_or_else(|| format!("&{reference};"), String::from)
}
