//! Commit payload adapter
//!
//! Parses the collector's commit JSON (array or NDJSON) and converts it into
//! validated [`CommitRecord`]s.

use crate::error::{ComputeError, ValidationError};
use crate::types::CommitRecord;
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// A commit exactly as the collector wrote it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCommit {
    #[serde(default)]
    pub sha: String,
    /// RFC3339 commit timestamp
    #[serde(default, alias = "timestamp")]
    pub date: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_email: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
    #[serde(default)]
    pub files: u32,
    /// Repository full name (`owner/name`)
    #[serde(default, alias = "full_name")]
    pub repo: Option<String>,
}

/// Validation failure for one record of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitValidationResult {
    pub index: usize,
    pub sha: Option<String>,
    pub error: ValidationError,
}

impl RawCommit {
    /// Check that the record can become a [`CommitRecord`]
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.to_record().map(|_| ())
    }

    /// Convert to a validated commit record
    pub fn to_record(&self) -> Result<CommitRecord, ValidationError> {
        if self.sha.trim().is_empty() {
            return Err(ValidationError::EmptySha);
        }

        let value = match self.date.as_deref().map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => {
                return Err(ValidationError::MissingTimestamp {
                    sha: self.sha.clone(),
                })
            }
        };

        let timestamp =
            DateTime::parse_from_rfc3339(value).map_err(|e| ValidationError::InvalidTimestamp {
                sha: self.sha.clone(),
                value: value.to_string(),
                reason: e.to_string(),
            })?;

        Ok(CommitRecord {
            sha: self.sha.clone(),
            timestamp,
            message: self.message.clone(),
            author_name: self.author_name.clone(),
            author_email: self.author_email.clone(),
            additions: self.additions,
            deletions: self.deletions,
            files: self.files,
            repo: self
                .repo
                .as_deref()
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string),
        })
    }
}

/// Parse a JSON array of commits
pub fn parse_commits_array(json: &str) -> Result<Vec<RawCommit>, ComputeError> {
    let commits: Vec<RawCommit> = serde_json::from_str(json)?;
    Ok(commits)
}

/// Parse newline-delimited JSON, one commit per line
pub fn parse_commits_ndjson(ndjson: &str) -> Result<Vec<RawCommit>, ComputeError> {
    let mut commits = Vec::new();
    for (line_num, line) in ndjson.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match serde_json::from_str::<RawCommit>(trimmed) {
            Ok(commit) => commits.push(commit),
            Err(e) => {
                return Err(ComputeError::ParseError(format!(
                    "Failed to parse line {}: {}",
                    line_num + 1,
                    e
                )));
            }
        }
    }
    Ok(commits)
}

/// Convert a batch to commit records, failing on the first invalid one
pub fn to_records(commits: &[RawCommit]) -> Result<Vec<CommitRecord>, ComputeError> {
    commits
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            raw.to_record()
                .map_err(|source| ComputeError::Validation { index, source })
        })
        .collect()
}

/// Every invalid record of a batch
pub fn validate_commits(commits: &[RawCommit]) -> Vec<CommitValidationResult> {
    commits
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| {
            raw.validate().err().map(|error| CommitValidationResult {
                index,
                sha: (!raw.sha.trim().is_empty()).then(|| raw.sha.clone()),
                error,
            })
        })
        .collect()
}
