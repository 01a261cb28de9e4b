//! Pipeline orchestration
//!
//! This module provides the public API for commit signals.
//! It orchestrates the full pipeline from collector commit JSON to a signal report.

use crate::adapter::{parse_commits_array, to_records};
use crate::classifier::{classify_all, classify_commit};
use crate::config::AnalysisConfig;
use crate::encoder::ReportEncoder;
use crate::error::ComputeError;
use crate::patterns::PatternRegistry;
use crate::temporal::TemporalProfileBuilder;
use crate::types::{ClassifiedCommit, CommitRecord, CommitSummary, SignalReport, TemporalProfile};
use std::collections::HashSet;

/// Convert a collector commit array into a pretty-printed signal report.
///
/// # Arguments
/// * `raw_json` - JSON array of commits (`sha`, `date`, `message`, `author_name`,
///   `author_email`, optional `additions`/`deletions`/`files`/`repo`)
///
/// # Returns
/// The report JSON. An empty array yields a report with zeroed aggregates.
///
/// # Example
/// ```ignore
/// let report = commits_to_report(commits_json)?;
/// ```
pub fn commits_to_report(raw_json: String) -> Result<String, ComputeError> {
    // Stage 1: Parse and validate collector records
    let raw = parse_commits_array(&raw_json)?;
    let records = to_records(&raw)?;

    // Stage 2: Classify against the built-in registry
    let classified = classify_all(PatternRegistry::builtin(), &records);

    // Stage 3: Mine temporal patterns
    let temporal = TemporalProfileBuilder::default().build(&records);

    // Stage 4: Summarize
    let summary = CommitSummary::from_commits(&classified);

    // Stage 5: Encode
    ReportEncoder::new().encode_to_json(&classified, &summary, &temporal)
}

/// Stateful processor that accumulates commits across batches.
///
/// Use this when commits arrive in several payloads (pagination, multiple
/// repositories). Commits are de-duplicated by sha.
pub struct SignalProcessor {
    config: AnalysisConfig,
    registry: Option<PatternRegistry>,
    profile_builder: TemporalProfileBuilder,
    encoder: ReportEncoder,
    commits: Vec<ClassifiedCommit>,
    seen: HashSet<String>,
}

impl Default for SignalProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SignalProcessor {
    /// Create a new processor with default settings
    pub fn new() -> Self {
        Self {
            config: AnalysisConfig::default(),
            registry: None,
            profile_builder: TemporalProfileBuilder::default(),
            encoder: ReportEncoder::new(),
            commits: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Create a processor from a configuration, compiling any custom patterns
    pub fn with_config(config: AnalysisConfig) -> Result<Self, ComputeError> {
        let registry = config.custom_registry()?;
        Ok(Self {
            profile_builder: TemporalProfileBuilder::from_config(&config),
            registry,
            config,
            ..Self::new()
        })
    }

    /// Replace the pattern registry used for commits ingested from now on
    pub fn with_registry(mut self, registry: PatternRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The registry in effect (custom or built-in)
    pub fn registry(&self) -> &PatternRegistry {
        self.registry
            .as_ref()
            .unwrap_or_else(|| PatternRegistry::builtin())
    }

    /// Ingest a JSON array of collector commits.
    ///
    /// The whole batch is validated before anything is stored. Returns the
    /// number of commits that were not already known.
    pub fn ingest(&mut self, raw_json: &str) -> Result<usize, ComputeError> {
        let raw = parse_commits_array(raw_json)?;
        let records = to_records(&raw)?;
        Ok(self.ingest_records(records))
    }

    /// Ingest already-validated records. Returns the number of new commits.
    pub fn ingest_records(&mut self, records: Vec<CommitRecord>) -> usize {
        let before = self.commits.len();

        for record in records {
            if !self.seen.insert(record.sha.clone()) {
                log::debug!("Skipping duplicate commit {}", record.sha);
                continue;
            }
            let classification = classify_commit(self.registry(), &record);
            self.commits.push(ClassifiedCommit {
                record,
                classification,
            });
        }

        let added = self.commits.len() - before;
        log::info!(
            "Ingested {} new commits ({} total)",
            added,
            self.commits.len()
        );
        added
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Classified commits in ingestion order
    pub fn commits(&self) -> &[ClassifiedCommit] {
        &self.commits
    }

    /// Drop all accumulated commits
    pub fn clear(&mut self) {
        self.commits.clear();
        self.seen.clear();
    }

    /// Temporal profile of everything ingested so far
    pub fn profile(&self) -> TemporalProfile {
        let records: Vec<CommitRecord> = self.commits.iter().map(|c| c.record.clone()).collect();
        self.profile_builder.build(&records)
    }

    /// Summary of everything ingested so far
    pub fn summary(&self) -> CommitSummary {
        CommitSummary::from_commits(&self.commits)
    }

    /// Build the full report
    pub fn build_report(&self) -> Result<SignalReport, ComputeError> {
        self.encoder
            .encode(&self.commits, &self.summary(), &self.profile())
    }

    /// Build the full report as pretty-printed JSON
    pub fn report(&self) -> Result<String, ComputeError> {
        self.encoder
            .encode_to_json(&self.commits, &self.summary(), &self.profile())
    }
}
