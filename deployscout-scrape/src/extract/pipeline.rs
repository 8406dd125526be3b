//! Extraction cascade.
//!
//! Strategies run in priority order over one parsed page; the first one
//! that yields non-empty text wins and the rest are never evaluated.

use std::time::{Duration, Instant};

use deployscout_core::{ExtractionResult, ExtractionStrategyKind};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::extract::strategy::{
    CodeBlock, EmbeddedState, ExtractionStrategy, KeywordLines, PreBlock, StatusMarkup,
};
use crate::markup::Document;

// ============================================================================
// Extraction Attempt
// ============================================================================

/// Record of one strategy evaluation.
///
/// Equality ignores `duration`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionAttempt {
    /// Strategy that ran.
    pub strategy: ExtractionStrategyKind,
    /// Whether it produced text.
    pub matched: bool,
    /// How long it took.
    #[serde(skip)]
    pub duration: Duration,
}

impl PartialEq for ExtractionAttempt {
    fn eq(&self, other: &Self) -> bool {
        self.strategy == other.strategy && self.matched == other.matched
    }
}

impl Eq for ExtractionAttempt {}

// ============================================================================
// Extraction Outcome
// ============================================================================

/// Result of running the cascade over one page.
///
/// Equality ignores `duration`.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionOutcome {
    /// Winning text, or `NotFound`.
    pub result: ExtractionResult,
    /// Every strategy that was evaluated, in order.
    pub attempts: Vec<ExtractionAttempt>,
    /// Total time spent.
    #[serde(skip)]
    pub duration: Duration,
}

impl PartialEq for ExtractionOutcome {
    fn eq(&self, other: &Self) -> bool {
        self.result == other.result && self.attempts == other.attempts
    }
}

impl Eq for ExtractionOutcome {}

impl ExtractionOutcome {
    /// Returns true if some strategy matched.
    pub fn is_found(&self) -> bool {
        self.result.is_found()
    }

    /// Returns the winning strategy, if any.
    pub fn successful_strategy(&self) -> Option<ExtractionStrategyKind> {
        self.result.strategy()
    }
}

// ============================================================================
// Content Extractor
// ============================================================================

/// Ordered cascade of extraction strategies.
pub struct ContentExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl ContentExtractor {
    /// Creates the standard five-strategy cascade.
    pub fn new() -> Self {
        Self::with_strategies(vec![
            Box::new(EmbeddedState),
            Box::new(StatusMarkup),
            Box::new(PreBlock),
            Box::new(CodeBlock),
            Box::new(KeywordLines),
        ])
    }

    /// Creates a cascade from the given strategies.
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        let mut extractor = Self { strategies };
        extractor.sort_by_priority();
        extractor
    }

    /// Adds a strategy.
    pub fn add_strategy(&mut self, strategy: Box<dyn ExtractionStrategy>) {
        self.strategies.push(strategy);
        self.sort_by_priority();
    }

    // Stable, so equal priorities keep insertion order.
    fn sort_by_priority(&mut self) {
        self.strategies
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Number of strategies.
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    /// Returns true if there are no strategies.
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Strategy kinds in evaluation order.
    pub fn order(&self) -> Vec<ExtractionStrategyKind> {
        self.strategies.iter().map(|s| s.kind()).collect()
    }

    /// Runs the cascade over a page body.
    ///
    /// Never fails: a page nothing matches yields [`ExtractionResult::NotFound`].
    #[instrument(skip_all, fields(bytes = page.len()))]
    pub fn extract(&self, page: &str) -> ExtractionOutcome {
        let start = Instant::now();
        let doc = Document::parse(page);
        let mut attempts = Vec::with_capacity(self.strategies.len());

        for strategy in &self.strategies {
            let kind = strategy.kind();
            let attempt_start = Instant::now();
            let text = strategy.extract(&doc).filter(|t| !t.is_empty());
            let matched = text.is_some();

            attempts.push(ExtractionAttempt {
                strategy: kind,
                matched,
                duration: attempt_start.elapsed(),
            });

            if let Some(text) = text {
                debug!(strategy = %kind, chars = text.chars().count(), "Strategy matched");
                return ExtractionOutcome {
                    result: ExtractionResult::found(text, kind),
                    attempts,
                    duration: start.elapsed(),
                };
            }
            debug!(strategy = %kind, "Strategy found nothing");
        }

        debug!("No strategy matched");
        ExtractionOutcome {
            result: ExtractionResult::NotFound,
            attempts,
            duration: start.elapsed(),
        }
    }
}

impl Default for ContentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ContentExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentExtractor")
            .field("strategies", &self.order())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
