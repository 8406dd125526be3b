//! Parsed pages and the text walk the extraction rules share.
//!
//! Pages go through `scraper`, so attribute values and text nodes arrive
//! entity-decoded and unclosed or misnested tags are repaired the way a
//! browser would repair them.

use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose contents are never page text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that sit on lines of their own in extracted text.
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "header", "footer", "main", "nav", "aside", "h1", "h2", "h3",
    "h4", "h5", "h6", "li", "dt", "dd", "blockquote", "pre", "table", "tr", "td", "th", "ul", "ol",
    "hr",
];

// ============================================================================
// Document
// ============================================================================

/// A parsed page.
#[derive(Debug, Clone)]
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full page.
    pub fn parse(page: &str) -> Self {
        Self {
            html: Html::parse_document(page),
        }
    }

    /// Elements matching `selector`, in page order.
    pub fn select<'a>(&'a self, selector: &'a Selector) -> impl Iterator<Item = ElementRef<'a>> + 'a {
        self.html.select(selector)
    }

    /// Values of the given attributes on any element, entity-decoded, in page order.
    pub fn attribute_values<'a>(&'a self, names: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
        self.html
            .root_element()
            .descendants()
            .filter_map(|node| node.value().as_element())
            .flat_map(move |element| {
                element
                    .attrs()
                    .filter(move |(name, _)| names.iter().any(|n| n.eq_ignore_ascii_case(name)))
                    .map(|(_, value)| value)
            })
    }

    /// Text of the whole page, see [`element_text`].
    pub fn text(&self) -> String {
        element_text(self.html.root_element())
    }
}

// ============================================================================
// Text
// ============================================================================

/// Text under `element`.
///
/// Script and style contents are skipped, `<br>` becomes a line break and
/// block elements sit on lines of their own.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    push_text(element, &mut out);
    out
}

/// Text of a markup fragment, see [`element_text`].
pub fn fragment_text(markup: &str) -> String {
    element_text(Html::parse_fragment(markup).root_element())
}

fn push_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if name == "br" {
                    out.push('\n');
                    continue;
                }
                if SKIPPED_TAGS.contains(&name) {
                    continue;
                }
                let block = BLOCK_TAGS.contains(&name);
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                if let Some(child_element) = ElementRef::wrap(child) {
                    push_text(child_element, out);
                }
                if block && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
    }
}

/// Cuts `text` to at most `max` bytes on a character boundary.
pub fn cap_bytes(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    &text[..cut]
}

// ============================================================================
// Tests
// ============================================================================
