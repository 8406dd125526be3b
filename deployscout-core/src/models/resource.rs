//! Hierarchical resource identifiers.
//!
//! The panel addresses everything through a path scheme:
//!
//! ```text
//! /project/{project}/environment/{environment}/application/{application}
//! ```
//!
//! Each level is only meaningful inside the level above it, so the three
//! identifiers travel together as a [`ResourceTriple`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Resource Level
// ============================================================================

/// A level in the `project → environment → application` hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceLevel {
    /// Top-level project.
    Project,
    /// Environment inside a project.
    Environment,
    /// Application inside an environment.
    Application,
}

impl ResourceLevel {
    /// Path segment used by the panel for this level.
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Environment => "environment",
            Self::Application => "application",
        }
    }
}

impl fmt::Display for ResourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

// ============================================================================
// Resource Id
// ============================================================================

/// Opaque alphanumeric identifier of a project, environment or application.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceId(String);

impl ResourceId {
    /// Validates and wraps an identifier.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CoreError::InvalidResourceId(raw.to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ResourceId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceId> for String {
    fn from(id: ResourceId) -> Self {
        id.0
    }
}

// ============================================================================
// Resource Triple
// ============================================================================

/// A fully resolved `project → environment → application` chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceTriple {
    /// Project identifier.
    pub project: ResourceId,
    /// Environment identifier, scoped to `project`.
    pub environment: ResourceId,
    /// Application identifier, scoped to `environment`.
    pub application: ResourceId,
}

impl ResourceTriple {
    /// Creates a triple from already validated identifiers.
    pub fn new(project: ResourceId, environment: ResourceId, application: ResourceId) -> Self {
        Self {
            project,
            environment,
            application,
        }
    }

    /// Parses the `project/environment/application` token form.
    pub fn parse(token: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidTriple(token.to_string());

        let mut parts = token.split('/');
        let (Some(project), Some(environment), Some(application), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        Ok(Self {
            project: ResourceId::parse(project).map_err(|_| invalid())?,
            environment: ResourceId::parse(environment).map_err(|_| invalid())?,
            application: ResourceId::parse(application).map_err(|_| invalid())?,
        })
    }

    /// Returns true if `token` has the shape of a triple.
    pub fn looks_like_triple(token: &str) -> bool {
        Self::parse(token).is_ok()
    }

    /// Path of the project page.
    pub fn project_path(&self) -> String {
        format!("/project/{}", self.project)
    }

    /// Path of the environment page.
    pub fn environment_path(&self) -> String {
        format!("{}/environment/{}", self.project_path(), self.environment)
    }

    /// Path of the application page.
    pub fn application_path(&self) -> String {
        format!("{}/application/{}", self.environment_path(), self.application)
    }

    /// Path of the deployment listing.
    pub fn deployments_path(&self) -> String {
        format!("{}/deployment", self.application_path())
    }

    /// Path of a single deployment page.
    pub fn deployment_path(&self, deployment: &str) -> String {
        format!("{}/{}", self.deployments_path(), deployment)
    }
}

impl fmt::Display for ResourceTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.environment, self.application)
    }
}

impl FromStr for ResourceTriple {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ============================================================================
// Tests
// ============================================================================
