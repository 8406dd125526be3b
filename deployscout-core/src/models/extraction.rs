//! Log extraction results.
//!
//! Extraction never fails: a page either yields normalised text tagged with
//! the strategy that found it, or nothing.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default number of characters shown before the truncation marker.
pub const DEFAULT_DISPLAY_LIMIT: usize = 10_000;

// ============================================================================
// Strategy Kind
// ============================================================================

/// The heuristic that recovered a piece of text, in cascade priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtractionStrategyKind {
    /// JSON state blob embedded in an element attribute.
    EmbeddedState,
    /// Element whose text carries a status keyword (error banner).
    StatusMarkup,
    /// `<pre>` block.
    PreformattedBlock,
    /// `<code>` block.
    CodeBlock,
    /// Lines starting with build/deploy keywords anywhere in the page.
    KeywordLines,
}

impl ExtractionStrategyKind {
    /// All kinds, highest priority first.
    pub const ALL: [Self; 5] = [
        Self::EmbeddedState,
        Self::StatusMarkup,
        Self::PreformattedBlock,
        Self::CodeBlock,
        Self::KeywordLines,
    ];

    /// Stable identifier used in diagnostics and JSON output.
    pub fn id(&self) -> &'static str {
        match self {
            Self::EmbeddedState => "embedded-state",
            Self::StatusMarkup => "status-markup",
            Self::PreformattedBlock => "preformatted-block",
            Self::CodeBlock => "code-block",
            Self::KeywordLines => "keyword-lines",
        }
    }

    /// Cascade priority (higher = tried first).
    pub fn priority(&self) -> u32 {
        match self {
            Self::EmbeddedState => 100,
            Self::StatusMarkup => 80,
            Self::PreformattedBlock => 60,
            Self::CodeBlock => 40,
            Self::KeywordLines => 20,
        }
    }
}

impl fmt::Display for ExtractionStrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// ============================================================================
// Extraction Result
// ============================================================================

/// Outcome of running the extraction cascade over one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ExtractionResult {
    /// A strategy produced non-empty normalised text.
    Found {
        /// Decoded, tag-stripped text. Never truncated.
        text: String,
        /// Strategy that produced `text`.
        strategy: ExtractionStrategyKind,
    },
    /// Every strategy came up empty.
    NotFound,
}

impl ExtractionResult {
    /// Creates a found result.
    pub fn found(text: impl Into<String>, strategy: ExtractionStrategyKind) -> Self {
        Self::Found {
            text: text.into(),
            strategy,
        }
    }

    /// Returns true if text was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// Full extracted text, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Found { text, .. } => Some(text),
            Self::NotFound => None,
        }
    }

    /// Strategy that produced the text, if any.
    pub fn strategy(&self) -> Option<ExtractionStrategyKind> {
        match self {
            Self::Found { strategy, .. } => Some(*strategy),
            Self::NotFound => None,
        }
    }

    /// Text cut to `limit` characters for display, with a marker when cut.
    pub fn display_text(&self, limit: usize) -> Option<Cow<'_, str>> {
        self.text().map(|text| truncate_for_display(text, limit))
    }
}

/// Cuts `text` to at most `limit` characters and appends a truncation marker.
///
/// The input is returned borrowed when it already fits.
pub fn truncate_for_display(text: &str, limit: usize) -> Cow<'_, str> {
    match text.char_indices().nth(limit) {
        None => Cow::Borrowed(text),
        Some((cut, _)) => {
            let remaining = text[cut..].chars().count();
            Cow::Owned(format!(
                "{}\n... [truncated, {remaining} more characters]",
                &text[..cut]
            ))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_order_matches_priority() {
        let mut sorted = ExtractionStrategyKind::ALL;
        sorted.sort_by(|a, b| b.priority().cmp(&a.priority()));
        assert_eq!(sorted, ExtractionStrategyKind::ALL);
    }

    #[test]
    fn test_truncate_short_text_is_borrowed() {
        let out = truncate_for_display("hello", 10);
        assert!(matches!(out, Cow::Borrowed("hello")));
    }

    #[test]
    fn test_truncate_long_text_appends_marker() {
        let out = truncate_for_display("abcdefghij", 4);
        assert_eq!(out, "abcd\n... [truncated, 6 more characters]");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        let out = truncate_for_display("ééééé", 5);
        assert_eq!(out, "ééééé");
        let out = truncate_for_display("ééééé", 2);
        assert!(out.starts_with("éé\n"));
    }

    #[test]
    fn test_display_keeps_full_text() {
        let result = ExtractionResult::found("abcdef", ExtractionStrategyKind::CodeBlock);
        assert_eq!(result.display_text(3).unwrap(), "abc\n... [truncated, 3 more characters]");
        assert_eq!(result.text(), Some("abcdef"));
    }

    #[test]
    fn test_not_found_accessors() {
        let result = ExtractionResult::NotFound;
        assert!(!result.is_found());
        assert!(result.text().is_none());
        assert!(result.strategy().is_none());
        assert!(result.display_text(10).is_none());
    }
}
