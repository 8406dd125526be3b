//! Extraction strategies.
//!
//! Each strategy is one self-contained heuristic for pulling log or status
//! text out of a rendered page. Strategies never fail: malformed input only
//! means "nothing found here".

use std::sync::LazyLock;

use deployscout_core::ExtractionStrategyKind;
use scraper::Selector;
use serde_json::Value;
use tracing::debug;

use crate::extract::normalize::{normalize, normalize_markup};
use crate::markup::{Document, cap_bytes, element_text};

/// Attributes that carry serialized component state.
pub const STATE_ATTRIBUTES: &[&str] = &["wire:snapshot", "wire:initial-data", "data-page"];

/// Field names that hold deployment output inside component state.
pub const LOG_FIELDS: &[&str] = &["output", "logs", "deployment_logs"];

/// A string field longer than this is taken as log text when no known field exists.
pub const MIN_FALLBACK_CHARS: usize = 100;

/// Tags that may wrap a status banner.
pub const STATUS_TAGS: &[&str] = &[
    "div", "span", "p", "strong", "h1", "h2", "h3", "h4", "h5", "h6", "li", "td", "label",
];

/// Words that mark a status banner.
pub const STATUS_KEYWORDS: &[&str] = &["error", "failed", "failure", "exception", "fatal"];

/// Upper bound on the text captured from a single `<pre>` or `<code>` block, in bytes.
pub const MAX_BLOCK_CAPTURE: usize = 200_000;

/// Line prefixes typical of build and deploy output.
pub const LINE_KEYWORDS: &[&str] = &[
    "cloning",
    "install",
    "build",
    "error",
    "fatal",
    "warning",
    "npm",
    "yarn",
    "pnpm",
    "step",
    "deploying",
    "pulling",
    "starting",
    "successfully",
    "docker",
];

/// Longest line kept by the keyword-line scan, in characters.
pub const MAX_LINE_CHARS: usize = 300;

static STATUS_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(&STATUS_TAGS.join(", ")).expect("Invalid selector"));

static PRE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("pre").expect("Invalid selector"));

static CODE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("code").expect("Invalid selector"));

// ============================================================================
// Strategy Trait
// ============================================================================

/// One heuristic of the extraction cascade.
pub trait ExtractionStrategy: Send + Sync {
    /// Which heuristic this is.
    fn kind(&self) -> ExtractionStrategyKind;

    /// Priority (higher = tried first).
    fn priority(&self) -> u32 {
        self.kind().priority()
    }

    /// Normalised, non-empty text, or `None` when the page has nothing for
    /// this strategy.
    fn extract(&self, doc: &Document) -> Option<String>;
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

// ============================================================================
// Embedded State
// ============================================================================

/// Decodes JSON component state embedded in element attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedState;

impl ExtractionStrategy for EmbeddedState {
    fn kind(&self) -> ExtractionStrategyKind {
        ExtractionStrategyKind::EmbeddedState
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        // Attribute values come out of the parser entity-decoded.
        doc.attribute_values(STATE_ATTRIBUTES).find_map(|raw| {
            let state: Value = match serde_json::from_str(raw) {
                Ok(state) => state,
                Err(e) => {
                    debug!(error = %e, "Embedded state is not valid JSON");
                    return None;
                }
            };
            find_log_field(&state)
                .or_else(|| find_long_string(&state))
                .and_then(|text| non_empty(normalize_markup(&text)))
        })
    }
}

/// Depth-first search for the first known log field with usable content.
fn find_log_field(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => LOG_FIELDS
            .iter()
            .find_map(|field| map.get(*field).and_then(render_log_value))
            .or_else(|| map.values().find_map(find_log_field)),
        Value::Array(items) => items.iter().find_map(find_log_field),
        _ => None,
    }
}

/// Renders a log field: plain text, a JSON-encoded string of entries, or an
/// array of entries with `output` (entries flagged `hidden` are skipped).
fn render_log_value(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(inner @ (Value::Array(_) | Value::Object(_))) => return render_log_value(&inner),
            _ => s.clone(),
        },
        Value::Array(items) => items
            .iter()
            .filter_map(render_log_value)
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => {
            if map.get("hidden").and_then(Value::as_bool) == Some(true) {
                return None;
            }
            return map.get("output").and_then(render_log_value);
        }
        _ => return None,
    };
    (!text.trim().is_empty()).then_some(text)
}

/// First string stored under an object field that is long enough to be a log.
fn find_long_string(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.values().find_map(|v| match v {
            Value::String(s) if s.chars().count() > MIN_FALLBACK_CHARS => Some(s.clone()),
            other => find_long_string(other),
        }),
        Value::Array(items) => items.iter().find_map(find_long_string),
        _ => None,
    }
}

// ============================================================================
// Status Markup
// ============================================================================

/// Finds the innermost element whose visible text carries a status keyword.
///
/// Script and style contents do not count as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusMarkup;

impl ExtractionStrategy for StatusMarkup {
    fn kind(&self) -> ExtractionStrategyKind {
        ExtractionStrategyKind::StatusMarkup
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        let candidates: Vec<_> = doc
            .select(&STATUS_SELECTOR)
            .filter_map(|element| {
                let text = normalize(&element_text(element));
                has_status_keyword(&text).then_some((element, text))
            })
            .collect();
        let ids: Vec<_> = candidates.iter().map(|(element, _)| element.id()).collect();

        candidates
            .iter()
            .find(|(element, _)| {
                !element
                    .descendants()
                    .skip(1)
                    .any(|node| ids.contains(&node.id()))
            })
            .map(|(_, text)| text.clone())
    }
}

fn has_status_keyword(text: &str) -> bool {
    let lower = text.to_lowercase();
    STATUS_KEYWORDS.iter().any(|k| lower.contains(k))
}

// ============================================================================
// Blocks
// ============================================================================

/// First non-empty `<pre>` block.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreBlock;

impl ExtractionStrategy for PreBlock {
    fn kind(&self) -> ExtractionStrategyKind {
        ExtractionStrategyKind::PreformattedBlock
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        first_block(doc, &PRE_SELECTOR)
    }
}

/// First non-empty `<code>` block.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeBlock;

impl ExtractionStrategy for CodeBlock {
    fn kind(&self) -> ExtractionStrategyKind {
        ExtractionStrategyKind::CodeBlock
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        first_block(doc, &CODE_SELECTOR)
    }
}

fn first_block(doc: &Document, selector: &Selector) -> Option<String> {
    doc.select(selector).find_map(|element| {
        let text = element_text(element);
        non_empty(normalize(cap_bytes(&text, MAX_BLOCK_CAPTURE)))
    })
}

// ============================================================================
// Keyword Lines
// ============================================================================

/// Collects lines anywhere in the page that start with a build keyword.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordLines;

impl ExtractionStrategy for KeywordLines {
    fn kind(&self) -> ExtractionStrategyKind {
        ExtractionStrategyKind::KeywordLines
    }

    fn extract(&self, doc: &Document) -> Option<String> {
        let text = normalize(&doc.text());
        let lines: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| starts_with_keyword(line))
            .map(|line| line.chars().take(MAX_LINE_CHARS).collect())
            .collect();
        non_empty(lines.join("\n"))
    }
}

fn starts_with_keyword(line: &str) -> bool {
    LINE_KEYWORDS.iter().any(|keyword| {
        line.get(..keyword.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(keyword))
    })
}

// ============================================================================
// Tests
// ============================================================================
