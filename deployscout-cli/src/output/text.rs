//! Text output formatting with colors.

use std::borrow::Cow;

use deployscout_core::{Deployment, DeploymentStatus, ResourceId, ResourceTriple};
use deployscout_scrape::{DeploymentLogs, DiscoveryOutcome, LoginOutcome};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the login result.
    pub fn format_login(&self, base_url: &str, outcome: &LoginOutcome) -> String {
        if outcome.confirmed {
            return format!("{} Logged in to {}", self.green("✓"), self.cyan(base_url));
        }
        format!(
            "{} Logged in to {} {}",
            self.yellow("⚠"),
            self.cyan(base_url),
            self.dim(&format!(
                "(unconfirmed: status {} at {})",
                outcome.status, outcome.final_url
            ))
        )
    }

    /// Formats a project listing.
    pub fn format_projects(&self, projects: &[ResourceId]) -> String {
        if projects.is_empty() {
            return "No projects found".to_string();
        }
        let mut lines = vec![self.bold(&format!("Projects ({})", projects.len()))];
        lines.extend(projects.iter().map(|p| format!("  {p}")));
        lines.join("\n")
    }

    /// Formats the discovery result.
    pub fn format_discovery(&self, outcome: &DiscoveryOutcome) -> String {
        match outcome {
            DiscoveryOutcome::Found { resources } => self.format_resources(resources),
            DiscoveryOutcome::NotFound { level } => format!(
                "{} Could not discover resources (no {level} link found)",
                self.red("✗")
            ),
        }
    }

    /// Formats a resolved triple.
    pub fn format_resources(&self, resources: &ResourceTriple) -> String {
        format!(
            "Project:     {}\nEnvironment: {}\nApplication: {}",
            self.cyan(resources.project.as_str()),
            self.cyan(resources.environment.as_str()),
            self.cyan(resources.application.as_str())
        )
    }

    /// Formats a deployment listing.
    pub fn format_deployments(&self, resources: &ResourceTriple, deployments: &[Deployment]) -> String {
        if deployments.is_empty() {
            return format!("No deployments found for {resources}");
        }

        let mut lines = vec![self.bold(&format!(
            "Deployments for {resources} ({})",
            deployments.len()
        ))];
        for deployment in deployments {
            lines.push(self.format_deployment(deployment));
        }
        lines.join("\n")
    }

    /// Formats one listing entry.
    pub fn format_deployment(&self, deployment: &Deployment) -> String {
        let status = self.color_for_status(
            deployment.status,
            &format!("{:<8}", deployment.status.label()),
        );
        let mut line = format!(
            "{} {}  {}",
            deployment.status.emoji(),
            deployment.id,
            status
        );
        if let Some(started) = &deployment.started_at {
            line.push_str(&format!("  started {}", self.dim(started)));
        }
        if let Some(ended) = &deployment.ended_at {
            line.push_str(&format!("  ended {}", self.dim(ended)));
        }
        line
    }

    /// Formats the logs of one deployment, cut to `limit` characters when given.
    pub fn format_logs(&self, logs: &DeploymentLogs, limit: Option<usize>) -> String {
        let extraction = &logs.extraction;
        let header = match extraction.successful_strategy() {
            Some(strategy) => format!(
                "{} {}",
                self.bold(&format!("Deployment {}", logs.deployment)),
                self.dim(&format!("(via {strategy})"))
            ),
            None => self.bold(&format!("Deployment {}", logs.deployment)),
        };

        let text = match limit {
            Some(limit) => extraction.result.display_text(limit),
            None => extraction.result.text().map(Cow::Borrowed),
        };
        let body = match text {
            Some(text) => text.into_owned(),
            None => self.yellow(&format!(
                "No log content found (tried {} strategies, page status {})",
                extraction.attempts.len(),
                logs.status
            )),
        };

        format!("{header}\n{body}")
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn color_for_status(&self, status: DeploymentStatus, text: &str) -> String {
        match status {
            DeploymentStatus::Success => self.green(text),
            DeploymentStatus::Failed => self.red(text),
            DeploymentStatus::Running => self.blue(text),
            DeploymentStatus::Pending => self.yellow(text),
            DeploymentStatus::Unknown => self.dim(text),
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}
