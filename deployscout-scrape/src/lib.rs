// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `DeployScout` Scrape
//!
//! Panel-specific logic on top of the session client.
//!
//! - [`auth::Authenticator`] - CSRF-token fetch and credential form POST
//! - [`discover::ResourceDiscoverer`] - Finds project, environment and
//!   application identifiers in rendered pages
//! - [`extract::ContentExtractor`] - Ordered cascade of heuristics that pulls
//!   log text out of a deployment page
//! - [`deployments::DeploymentFetcher`] - Lists deployments and fetches their logs
//!
//! Discovery and deployment listing read pages through [`source::PageSource`],
//! which [`deployscout_fetch::SessionClient`] implements.

pub mod auth;
pub mod deployments;
pub mod discover;
pub mod error;
pub mod extract;
pub mod markup;
pub mod source;

pub use auth::{Authenticator, FAILURE_PHRASE, LOGIN_PATH, LoginOutcome};
pub use deployments::{DEFAULT_CONCURRENCY, DeploymentFetcher, DeploymentLogs, parse_listing};
pub use discover::{DASHBOARD_PATH, DiscoveryOutcome, ResourceDiscoverer};
pub use error::{AuthError, unreachable_guidance};
pub use extract::{ContentExtractor, ExtractionAttempt, ExtractionOutcome, ExtractionStrategy};
pub use markup::Document;
pub use source::{Page, PageSource};
