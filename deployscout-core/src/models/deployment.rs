//! Deployment listing types.
//!
//! - [`DeploymentId`] - 24-character lowercase alphanumeric token
//! - [`DeploymentStatus`] - Coarse state inferred from listing markup
//! - [`Deployment`] - One listing entry

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Length of a deployment identifier.
pub const DEPLOYMENT_ID_LEN: usize = 24;

// ============================================================================
// Deployment Id
// ============================================================================

/// Fixed-length deployment identifier embedded as a path segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeploymentId(String);

impl DeploymentId {
    /// Validates and wraps a deployment identifier.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let valid = raw.len() == DEPLOYMENT_ID_LEN
            && raw
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
        if valid {
            Ok(Self(raw.to_string()))
        } else {
            Err(CoreError::InvalidDeploymentId(raw.to_string()))
        }
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeploymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DeploymentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DeploymentId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DeploymentId> for String {
    fn from(id: DeploymentId) -> Self {
        id.0
    }
}

// ============================================================================
// Deployment Status
// ============================================================================

/// Deployment state as shown by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    /// Finished successfully.
    Success,
    /// Finished with an error.
    Failed,
    /// Currently building or deploying.
    Running,
    /// Queued, not started yet.
    Pending,
    /// No recognisable status keyword.
    #[default]
    Unknown,
}

impl DeploymentStatus {
    /// Keywords checked in order; earlier entries win when a segment mentions several.
    const KEYWORDS: &'static [(&'static str, DeploymentStatus)] = &[
        ("failed", DeploymentStatus::Failed),
        ("error", DeploymentStatus::Failed),
        ("cancelled", DeploymentStatus::Failed),
        ("in_progress", DeploymentStatus::Running),
        ("in progress", DeploymentStatus::Running),
        ("running", DeploymentStatus::Running),
        ("building", DeploymentStatus::Running),
        ("queued", DeploymentStatus::Pending),
        ("pending", DeploymentStatus::Pending),
        ("finished", DeploymentStatus::Success),
        ("success", DeploymentStatus::Success),
        ("completed", DeploymentStatus::Success),
    ];

    /// Infers a status from free text (case-insensitive keyword scan).
    pub fn from_text(text: &str) -> Self {
        let lower = text.to_lowercase();
        Self::KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map_or(Self::Unknown, |(_, status)| *status)
    }

    /// Returns a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::Running => "Running",
            Self::Pending => "Pending",
            Self::Unknown => "Unknown",
        }
    }

    /// Returns an emoji for the status.
    pub fn emoji(&self) -> &'static str {
        match self {
            Self::Success => "🟢",
            Self::Failed => "🔴",
            Self::Running => "🔵",
            Self::Pending => "🟡",
            Self::Unknown => "⚪",
        }
    }

    /// Returns true once the deployment can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failed)
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Deployment
// ============================================================================

/// One entry of an application's deployment listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    /// Deployment identifier.
    pub id: DeploymentId,
    /// Inferred status.
    pub status: DeploymentStatus,
    /// Start time as printed by the panel; not machine-parsed.
    pub started_at: Option<String>,
    /// End time as printed by the panel; not machine-parsed.
    pub ended_at: Option<String>,
    /// Absolute URL of the deployment page.
    pub raw_page_url: String,
    /// When this entry was scraped.
    pub observed_at: DateTime<Utc>,
}

impl Deployment {
    /// Creates an entry with unknown status and no timestamps.
    pub fn new(id: DeploymentId, raw_page_url: impl Into<String>) -> Self {
        Self {
            id,
            status: DeploymentStatus::Unknown,
            started_at: None,
            ended_at: None,
            raw_page_url: raw_page_url.into(),
            observed_at: Utc::now(),
        }
    }

    /// Sets the status.
    pub fn with_status(mut self, status: DeploymentStatus) -> Self {
        self.status = status;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
