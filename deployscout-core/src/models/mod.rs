//! Domain models for `DeployScout`.
//!
//! - [`resource`] - Hierarchical resource identifiers
//! - [`deployment`] - Deployment listing entries and status
//! - [`extraction`] - Log extraction results

pub mod deployment;
pub mod extraction;
pub mod resource;

pub use deployment::{DEPLOYMENT_ID_LEN, Deployment, DeploymentId, DeploymentStatus};
pub use extraction::{
    DEFAULT_DISPLAY_LIMIT, ExtractionResult, ExtractionStrategyKind, truncate_for_display,
};
pub use resource::{ResourceId, ResourceLevel, ResourceTriple};
