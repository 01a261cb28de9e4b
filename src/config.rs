//! Analysis configuration
//!
//! Tunable thresholds and optional custom agent patterns. Everything has a default,
//! so an empty JSON object is a valid configuration.

use crate::error::ComputeError;
use crate::patterns::{AgentRuleSpec, PatternRegistry};
use crate::temporal::DEFAULT_SESSION_GAP_MINUTES;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum minutes between two commits of the same session
    pub session_gap_minutes: u32,

    /// Replacement agent rules, in evaluation order. `None` uses the built-in registry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patterns: Option<Vec<AgentRuleSpec>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            session_gap_minutes: DEFAULT_SESSION_GAP_MINUTES,
            patterns: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, ComputeError> {
        serde_json::from_str(json)
            .map_err(|e| ComputeError::ParseError(format!("Failed to parse configuration: {}", e)))
    }

    /// Compile the custom patterns, if any
    pub fn custom_registry(&self) -> Result<Option<PatternRegistry>, ComputeError> {
        self.patterns
            .as_deref()
            .map(PatternRegistry::from_specs)
            .transpose()
    }
}
