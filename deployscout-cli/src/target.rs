//! Positional argument parsing.
//!
//! The command line takes loose tokens rather than nested subcommands:
//!
//! ```text
//! deployscout [URL] [COMMAND] [project/environment/application] [DEPLOYMENT_ID...]
//! ```
//!
//! A URL is only recognised as the first token. Without a command keyword
//! the deployment listing runs.

use std::fmt;

use deployscout_core::{DeploymentId, ResourceTriple};
use thiserror::Error;

/// What to do once logged in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Log in and report the outcome.
    Login,
    /// List projects on the dashboard.
    Projects,
    /// Resolve the resource triple.
    Discover,
    /// List deployments of the application.
    #[default]
    Deployments,
    /// Extract logs of one or more deployments (latest when none given).
    Logs,
}

impl Command {
    /// Parses a command keyword.
    pub fn from_keyword(token: &str) -> Option<Self> {
        match token.to_ascii_lowercase().as_str() {
            "login" => Some(Self::Login),
            "projects" => Some(Self::Projects),
            "discover" => Some(Self::Discover),
            "deployments" | "list" => Some(Self::Deployments),
            "logs" => Some(Self::Logs),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Login => "login",
            Self::Projects => "projects",
            Self::Discover => "discover",
            Self::Deployments => "deployments",
            Self::Logs => "logs",
        };
        f.write_str(name)
    }
}

/// Errors in the positional arguments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    /// Token is neither a keyword, triple, deployment id nor a leading URL.
    #[error("Unexpected argument '{0}'")]
    Unexpected(String),

    /// Two command keywords.
    #[error("Only one command may be given (got '{first}' and '{second}')")]
    DuplicateCommand {
        /// First keyword.
        first: Command,
        /// Second keyword.
        second: Command,
    },

    /// Two triples.
    #[error("Only one project/environment/application may be given")]
    DuplicateResources,

    /// Deployment ids passed to a command other than `logs`.
    #[error("Deployment ids are only accepted by 'logs'")]
    DeploymentIdsWithoutLogs,
}

/// Parsed positional arguments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Invocation {
    /// Base URL given on the command line.
    pub base_url: Option<String>,
    /// Command to run.
    pub command: Command,
    /// Explicit resources; discovery runs when absent.
    pub resources: Option<ResourceTriple>,
    /// Deployments for `logs`.
    pub deployments: Vec<DeploymentId>,
}

impl Invocation {
    /// Parses the loose positional tokens.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, TargetError> {
        let mut invocation = Self::default();
        let mut command: Option<Command> = None;

        for (index, token) in tokens.iter().map(AsRef::as_ref).enumerate() {
            if let Some(next) = Command::from_keyword(token) {
                if let Some(first) = command {
                    return Err(TargetError::DuplicateCommand { first, second: next });
                }
                command = Some(next);
            } else if let Ok(id) = DeploymentId::parse(token) {
                invocation.deployments.push(id);
            } else if let Ok(triple) = ResourceTriple::parse(token) {
                if invocation.resources.is_some() {
                    return Err(TargetError::DuplicateResources);
                }
                invocation.resources = Some(triple);
            } else if index == 0 && looks_like_url(token) {
                invocation.base_url = Some(token.to_string());
            } else {
                return Err(TargetError::Unexpected(token.to_string()));
            }
        }

        invocation.command = command.unwrap_or_default();
        if !invocation.deployments.is_empty() && invocation.command != Command::Logs {
            return Err(TargetError::DeploymentIdsWithoutLogs);
        }
        Ok(invocation)
    }
}

fn looks_like_url(token: &str) -> bool {
    token.contains("://") || token.contains('.') || token.starts_with("localhost")
}
