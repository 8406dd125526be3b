//! Text normalisation applied to every extracted fragment.
//!
//! Text taken out of the parsed page is already entity-decoded and free of
//! tags; only escaped line breaks are left to resolve. Strings read from
//! embedded JSON state may still carry inline markup, so known HTML tags
//! are stripped from them. Anything else in angle brackets, such as
//! `<none>` in build output, is log text and stays.

use std::sync::LazyLock;

use regex::Regex;

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").expect("Invalid regex"));

/// Open or close tag of an inline or block HTML element.
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)</?(?:a|b|i|u|em|strong|small|span|div|p|pre|code|font|ul|ol|li|table|tr|td|th|h[1-6])(?:\s[^>]*)?/?>",
    )
    .expect("Invalid regex")
});

/// Turns literal `\r\n`, `\n`, `\r` and `\t` escape sequences into real characters.
pub fn unescape_sequences(text: &str) -> String {
    text.replace("\\r\\n", "\n")
        .replace("\\n", "\n")
        .replace("\\r", "\n")
        .replace("\\t", "\t")
}

/// Removes known HTML tags, leaving other bracketed text alone.
pub fn strip_tags(text: &str) -> String {
    HTML_TAG_RE.replace_all(text, "").into_owned()
}

/// Normalisation of text already taken out of the page, trimmed.
pub fn normalize(text: &str) -> String {
    unescape_sequences(text).trim().to_string()
}

/// Normalisation of a string that may carry inline markup, trimmed.
pub fn normalize_markup(raw: &str) -> String {
    let text = unescape_sequences(raw);
    let text = BR_RE.replace_all(&text, "\n");
    strip_tags(&text).trim().to_string()
}
