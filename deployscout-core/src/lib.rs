// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DeployScout` Core
//!
//! Core types and models shared by every `DeployScout` crate.
//!
//! ## Key Types
//!
//! ### Resources
//! - [`ResourceId`] - Opaque alphanumeric identifier of a project, environment or application
//! - [`ResourceTriple`] - The `project → environment → application` chain
//! - [`ResourceLevel`] - Which level of the chain a value belongs to
//!
//! ### Deployments
//! - [`DeploymentId`] - Fixed-length deployment identifier
//! - [`DeploymentStatus`] - Coarse deployment state inferred from markup
//! - [`Deployment`] - One entry of a deployment listing
//!
//! ### Extraction
//! - [`ExtractionStrategyKind`] - Tag naming the heuristic that produced a result
//! - [`ExtractionResult`] - Normalised log text or nothing

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Resources
    ResourceId,
    ResourceLevel,
    ResourceTriple,
    // Deployments
    DEPLOYMENT_ID_LEN,
    Deployment,
    DeploymentId,
    DeploymentStatus,
    // Extraction
    DEFAULT_DISPLAY_LIMIT,
    ExtractionResult,
    ExtractionStrategyKind,
    truncate_for_display,
};
