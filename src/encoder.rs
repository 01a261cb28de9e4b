//! Report encoding
//!
//! This module assembles classified commits, their summary and their temporal
//! profile into a versioned [`SignalReport`] with producer metadata.

use crate::error::ComputeError;
use crate::types::{
    ClassifiedCommit, CommitSignal, CommitSummary, ReportProducer, ReportWindow, SignalReport,
    TemporalProfile,
};
use crate::{PRODUCER_NAME, SIGNALS_VERSION};
use chrono::Utc;
use uuid::Uuid;

/// Current report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Report encoder for producing versioned JSON reports
pub struct ReportEncoder {
    instance_id: String,
}

impl Default for ReportEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    /// Encode an analysed commit set into a report
    pub fn encode(
        &self,
        commits: &[ClassifiedCommit],
        summary: &CommitSummary,
        temporal: &TemporalProfile,
    ) -> Result<SignalReport, ComputeError> {
        let producer = ReportProducer {
            name: PRODUCER_NAME.to_string(),
            version: SIGNALS_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let commit_signals = commits
            .iter()
            .map(|c| CommitSignal {
                sha: c.record.sha.clone(),
                timestamp: c.record.timestamp.to_rfc3339(),
                classification: c.classification,
            })
            .collect();

        Ok(SignalReport {
            report_version: REPORT_VERSION.to_string(),
            producer,
            computed_at_utc: Utc::now().to_rfc3339(),
            window: build_window(commits),
            summary: summary.clone(),
            temporal: temporal.clone(),
            commits: commit_signals,
        })
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(
        &self,
        commits: &[ClassifiedCommit],
        summary: &CommitSummary,
        temporal: &TemporalProfile,
    ) -> Result<String, ComputeError> {
        let report = self.encode(commits, summary, temporal)?;
        serde_json::to_string_pretty(&report).map_err(ComputeError::JsonError)
    }
}

/// Earliest and latest commit instants, regardless of input order
fn build_window(commits: &[ClassifiedCommit]) -> ReportWindow {
    let first = commits.iter().map(|c| c.record.timestamp).min();
    let last = commits.iter().map(|c| c.record.timestamp).max();

    ReportWindow {
        start: first.map(|t| t.to_rfc3339()),
        end: last.map(|t| t.to_rfc3339()),
    }
}
