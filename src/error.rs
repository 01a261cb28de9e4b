//! Error types for commit signal computation

use thiserror::Error;

/// Errors that can occur during computation
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid commit at index {index}: {source}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("Invalid pattern for agent {agent}: {message}")]
    InvalidPattern { agent: String, message: String },
}

/// Problems found in a single commit record at ingestion
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Commit has an empty sha")]
    EmptySha,

    #[error("Commit {sha} has no timestamp")]
    MissingTimestamp { sha: String },

    #[error("Commit {sha} has an invalid timestamp '{value}': {reason}")]
    InvalidTimestamp {
        sha: String,
        value: String,
        reason: String,
    },
}
