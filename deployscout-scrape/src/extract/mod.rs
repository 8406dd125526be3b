//! Content extraction: strategies, the cascade that runs them, and the
//! normalisation applied to whatever they find.

pub mod normalize;
pub mod pipeline;
pub mod strategy;

pub use normalize::{normalize, normalize_markup, strip_tags, unescape_sequences};
pub use pipeline::{ContentExtractor, ExtractionAttempt, ExtractionOutcome};
pub use strategy::{
    CodeBlock, EmbeddedState, ExtractionStrategy, KeywordLines, PreBlock, StatusMarkup,
};
