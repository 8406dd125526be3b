//! Core error types for `DeployScout`.

use thiserror::Error;

/// Core error type for `DeployScout` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Resource identifier is empty or not alphanumeric.
    #[error("Invalid resource identifier: {0:?}")]
    InvalidResourceId(String),

    /// Deployment identifier has the wrong length or alphabet.
    #[error("Invalid deployment identifier: {0:?}")]
    InvalidDeploymentId(String),

    /// Slash-delimited triple could not be parsed.
    #[error("Invalid resource triple {0:?}: expected project/environment/application")]
    InvalidTriple(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
