//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use deployscout_core::{Deployment, ResourceId, ResourceLevel, ResourceTriple};
use deployscout_scrape::{DeploymentLogs, DiscoveryOutcome, LoginOutcome};
use serde::{Serialize, Serializer};

// ============================================================================
// Output Types
// ============================================================================

/// Login result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginOutput {
    pub base_url: String,
    pub status: u16,
    pub final_url: String,
    pub csrf_token_found: bool,
    pub confirmed: bool,
}

/// Project listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsOutput {
    pub projects: Vec<String>,
}

/// Discovery result.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryOutput {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resources: Option<ResourcesOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_level: Option<ResourceLevel>,
}

/// A resolved triple.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcesOutput {
    pub project: String,
    pub environment: String,
    pub application: String,
}

/// Deployment listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentsOutput {
    pub resources: ResourcesOutput,
    pub deployments: Vec<DeploymentOutput>,
}

/// One deployment.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentOutput {
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    pub url: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub observed_at: DateTime<Utc>,
}

/// Logs of one deployment. Text is never truncated here.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogsOutput {
    pub deployment: String,
    pub url: String,
    pub status: u16,
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub attempts: Vec<AttemptOutput>,
}

/// One strategy evaluation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutput {
    pub strategy: String,
    pub matched: bool,
}

// ============================================================================
// Serialization helpers
// ============================================================================

fn serialize_datetime<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339())
}

impl From<&ResourceTriple> for ResourcesOutput {
    fn from(resources: &ResourceTriple) -> Self {
        Self {
            project: resources.project.to_string(),
            environment: resources.environment.to_string(),
            application: resources.application.to_string(),
        }
    }
}

impl From<&Deployment> for DeploymentOutput {
    fn from(deployment: &Deployment) -> Self {
        Self {
            id: deployment.id.to_string(),
            status: deployment.status.label().to_lowercase(),
            started_at: deployment.started_at.clone(),
            ended_at: deployment.ended_at.clone(),
            url: deployment.raw_page_url.clone(),
            observed_at: deployment.observed_at,
        }
    }
}

impl From<&DeploymentLogs> for LogsOutput {
    fn from(logs: &DeploymentLogs) -> Self {
        let extraction = &logs.extraction;
        Self {
            deployment: logs.deployment.to_string(),
            url: logs.url.clone(),
            status: logs.status,
            found: extraction.is_found(),
            strategy: extraction.successful_strategy().map(|s| s.id().to_string()),
            text: extraction.result.text().map(str::to_string),
            attempts: extraction
                .attempts
                .iter()
                .map(|a| AttemptOutput {
                    strategy: a.strategy.id().to_string(),
                    matched: a.matched,
                })
                .collect(),
        }
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the login result.
    pub fn format_login(&self, base_url: &str, outcome: &LoginOutcome) -> Result<String> {
        self.format(&LoginOutput {
            base_url: base_url.to_string(),
            status: outcome.status,
            final_url: outcome.final_url.clone(),
            csrf_token_found: outcome.csrf_token_found,
            confirmed: outcome.confirmed,
        })
    }

    /// Formats a project listing.
    pub fn format_projects(&self, projects: &[ResourceId]) -> Result<String> {
        self.format(&ProjectsOutput {
            projects: projects.iter().map(ToString::to_string).collect(),
        })
    }

    /// Formats the discovery result.
    pub fn format_discovery(&self, outcome: &DiscoveryOutcome) -> Result<String> {
        let output = match outcome {
            DiscoveryOutcome::Found { resources } => DiscoveryOutput {
                found: true,
                resources: Some(resources.into()),
                missing_level: None,
            },
            DiscoveryOutcome::NotFound { level } => DiscoveryOutput {
                found: false,
                resources: None,
                missing_level: Some(*level),
            },
        };
        self.format(&output)
    }

    /// Formats a deployment listing.
    pub fn format_deployments(
        &self,
        resources: &ResourceTriple,
        deployments: &[Deployment],
    ) -> Result<String> {
        self.format(&DeploymentsOutput {
            resources: resources.into(),
            deployments: deployments.iter().map(Into::into).collect(),
        })
    }

    /// Formats the logs of several deployments as one array.
    pub fn format_logs(&self, logs: &[DeploymentLogs]) -> Result<String> {
        let outputs: Vec<LogsOutput> = logs.iter().map(Into::into).collect();
        self.format(&outputs)
    }
}
