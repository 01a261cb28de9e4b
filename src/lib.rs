//! Commit Signals - deterministic analysis of commit histories
//!
//! Commit Signals attributes commits to AI coding assistants and mines temporal
//! work patterns through a deterministic pipeline: commit adaptation → classification
//! → temporal profiling → summary → report encoding.
//!
//! ## Modules
//!
//! - **Classifier**: Ordered agent pattern registry with high/medium/low confidence tiers
//! - **Temporal**: Sessions, streaks, activity heatmap, chronotype and work/life balance

pub mod adapter;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod patterns;
pub mod pipeline;
pub mod summary;
pub mod temporal;
pub mod types;

// FFI bindings for C interop (always available for cdylib/staticlib builds)
pub mod ffi;

pub use classifier::{categorize, classify, classify_all, classify_commit, classify_with};
pub use config::AnalysisConfig;
pub use error::{ComputeError, ValidationError};
pub use patterns::{AgentRuleSpec, PatternRegistry};
pub use pipeline::{commits_to_report, SignalProcessor};
pub use temporal::{segment, streaks, temporal_profile, TemporalProfileBuilder};
pub use types::{
    Agent, ClassificationResult, ClassifiedCommit, CommitRecord, CommitSummary, Confidence,
    Session, SignalReport, StreakInfo, TemporalProfile,
};

/// Library version embedded in all reports
pub const SIGNALS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "commit-signals";
