//! Commit signal data types
//!
//! This module defines the records that flow through the classifier and the
//! temporal pattern miner, plus the report shapes produced at the end of the pipeline.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Number of weekday rows in the activity heatmap (Monday = 0 .. Sunday = 6)
pub const DAYS_PER_WEEK: usize = 7;

/// Number of hour columns in the activity heatmap
pub const HOURS_PER_DAY: usize = 24;

/// Weekday x hour commit counts
pub type Heatmap = [[u32; HOURS_PER_DAY]; DAYS_PER_WEEK];

// ============================================================================
// Input records
// ============================================================================

/// A single commit as delivered by the collector.
///
/// The timestamp keeps the committer's own UTC offset so that hour-of-day and
/// calendar-date derivations reflect local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    /// Commit hash
    pub sha: String,
    /// Commit instant with the committer's offset
    pub timestamp: DateTime<FixedOffset>,
    /// Full commit message, trailers included
    pub message: String,
    /// Author display name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Lines added
    #[serde(default)]
    pub additions: u64,
    /// Lines deleted
    #[serde(default)]
    pub deletions: u64,
    /// Files touched
    #[serde(default)]
    pub files: u32,
    /// Repository the commit belongs to, when the collector recorded it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
}

// ============================================================================
// Classification
// ============================================================================

/// AI coding assistants the classifier can attribute a commit to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    Claude,
    Copilot,
    Codex,
    Cursor,
    Aider,
    Cline,
    Jetbrains,
    /// AI assistance detected from a fuzzy hint without a recognizable agent
    Unknown,
}

impl Agent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Agent::Claude => "claude",
            Agent::Copilot => "copilot",
            Agent::Codex => "codex",
            Agent::Cursor => "cursor",
            Agent::Aider => "aider",
            Agent::Cline => "cline",
            Agent::Jetbrains => "jetbrains",
            Agent::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strength of an AI-assistance signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Identity or structural evidence (bot email, co-author trailer)
    High,
    /// Explicit keyword in the message
    Medium,
    /// Fuzzy lexical hint
    Low,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "high",
            Confidence::Medium => "medium",
            Confidence::Low => "low",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying one commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub is_ai_assisted: bool,
    /// Attributed agent; `None` for solo-authored commits
    pub agent: Option<Agent>,
    /// Signal strength; solo-authored commits report `Low`
    pub confidence: Confidence,
}

impl ClassificationResult {
    /// A solo-authored (not AI-assisted) result
    pub fn solo() -> Self {
        Self {
            is_ai_assisted: false,
            agent: None,
            confidence: Confidence::Low,
        }
    }

    /// An AI-assisted result attributed to `agent`
    pub fn assisted(agent: Agent, confidence: Confidence) -> Self {
        Self {
            is_ai_assisted: true,
            agent: Some(agent),
            confidence,
        }
    }
}

/// A commit paired with its classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedCommit {
    pub record: CommitRecord,
    pub classification: ClassificationResult,
}

/// Commit count for one agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCount {
    pub agent: Agent,
    pub count: u32,
}

/// Commits per agent, plus the solo-authored remainder
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTally {
    /// Commits with no AI signal
    pub solo: u32,
    /// AI-assisted commits per agent, most frequent first
    pub by_agent: Vec<AgentCount>,
}

// ============================================================================
// Temporal patterns
// ============================================================================

/// A maximal run of commits whose consecutive gaps stay within the threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// First commit in the session
    pub start: DateTime<FixedOffset>,
    /// Last commit in the session
    pub end: DateTime<FixedOffset>,
    /// `end - start` in minutes
    pub duration_minutes: f64,
    /// Number of commits in the session
    pub commit_count: u32,
}

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Streak statistics over distinct commit dates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakInfo {
    /// Consecutive days ending at the most recent commit date
    pub current_streak: u32,
    /// Longest run of consecutive commit days
    pub longest_streak: u32,
    /// Earliest range achieving the longest streak (`None` unless it spans two or more days)
    pub longest_streak_dates: Option<DateRange>,
    /// Mean number of idle days between streaks
    pub avg_gap_between_streaks: f64,
}

/// An hour of day with its total commit count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakHour {
    pub hour: u32,
    pub count: u32,
}

/// Preferred coding hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Chronotype {
    #[serde(rename = "early bird")]
    EarlyBird,
    #[serde(rename = "night owl")]
    NightOwl,
    #[serde(rename = "mixed")]
    Mixed,
}

impl Chronotype {
    pub fn label(&self) -> &'static str {
        match self {
            Chronotype::EarlyBird => "early bird",
            Chronotype::NightOwl => "night owl",
            Chronotype::Mixed => "mixed",
        }
    }
}

impl fmt::Display for Chronotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Human-readable reading of weekend and after-hours activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkLifeInterpretation {
    #[serde(rename = "High weekend + after-hours activity")]
    HighWeekendAndAfterHours,
    #[serde(rename = "Significant weekend work")]
    SignificantWeekendWork,
    #[serde(rename = "Heavy after-hours coding")]
    HeavyAfterHours,
    #[serde(rename = "Good work/life separation")]
    GoodSeparation,
    #[serde(rename = "Moderate off-hours activity")]
    ModerateOffHours,
    #[serde(rename = "No data")]
    NoData,
}

impl WorkLifeInterpretation {
    pub fn label(&self) -> &'static str {
        match self {
            WorkLifeInterpretation::HighWeekendAndAfterHours => {
                "High weekend + after-hours activity"
            }
            WorkLifeInterpretation::SignificantWeekendWork => "Significant weekend work",
            WorkLifeInterpretation::HeavyAfterHours => "Heavy after-hours coding",
            WorkLifeInterpretation::GoodSeparation => "Good work/life separation",
            WorkLifeInterpretation::ModerateOffHours => "Moderate off-hours activity",
            WorkLifeInterpretation::NoData => "No data",
        }
    }
}

impl fmt::Display for WorkLifeInterpretation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weekend and after-hours ratios with their interpretation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkLifeBalance {
    /// Share of commits on Saturday or Sunday
    pub weekend_ratio: f64,
    /// Share of weekday commits before 09:00 or from 18:00
    pub after_hours_ratio: f64,
    pub interpretation: WorkLifeInterpretation,
}

/// Aggregate temporal profile of one commit set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalProfile {
    /// Weekday (Monday = 0) x hour commit counts
    pub hourly_heatmap: Heatmap,
    /// Up to three busiest hours, busiest first
    pub peak_hours: Vec<PeakHour>,
    pub weekend_commit_ratio: f64,
    pub after_hours_ratio: f64,
    pub work_life_interpretation: WorkLifeInterpretation,
    pub chronotype: Chronotype,

    // Session analysis
    pub sessions: Vec<Session>,
    pub session_count: u32,
    pub avg_session_duration_minutes: f64,
    pub commits_per_session: f64,

    // Streak analysis
    pub streaks: StreakInfo,
}

impl TemporalProfile {
    /// Profile of an empty commit set
    pub fn empty() -> Self {
        Self {
            hourly_heatmap: [[0; HOURS_PER_DAY]; DAYS_PER_WEEK],
            peak_hours: Vec::new(),
            weekend_commit_ratio: 0.0,
            after_hours_ratio: 0.0,
            work_life_interpretation: WorkLifeInterpretation::NoData,
            chronotype: Chronotype::Mixed,
            sessions: Vec::new(),
            session_count: 0,
            avg_session_duration_minutes: 0.0,
            commits_per_session: 0.0,
            streaks: StreakInfo::default(),
        }
    }

    /// Sum of all heatmap cells
    pub fn total_commits(&self) -> u32 {
        self.hourly_heatmap.iter().flatten().sum()
    }
}

// ============================================================================
// Summary
// ============================================================================

/// AI-assisted commits broken down by agent and month
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiBreakdown {
    /// Total AI-assisted commits
    pub total: u32,
    /// Per-agent counts, most frequent first
    pub by_agent: Vec<AgentCount>,
    /// `YYYY-MM` to AI-assisted commit count
    pub by_month: BTreeMap<String, u32>,
}

/// Commit activity within one repository
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoActivity {
    pub repo: String,
    pub commits: u32,
    pub net_lines: i64,
    pub ai_commits: u32,
    pub ai_ratio: f64,
}

/// Per-repository activity, most commits first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoBreakdown {
    /// Repositories with at least one commit
    pub repos_active: u32,
    pub most_active_repo: Option<String>,
    pub by_repo: Vec<RepoActivity>,
    /// Commits the collector did not attribute to a repository
    pub unattributed_commits: u32,
}

/// Commit counts along calendar and clock dimensions (local time)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitDistribution {
    /// `YYYY-MM-DD` to commit count
    pub by_date: BTreeMap<String, u32>,
    /// ISO week (`YYYY-Www`) to commit count
    pub by_week: BTreeMap<String, u32>,
    /// `YYYY-MM` to commit count
    pub by_month: BTreeMap<String, u32>,
    /// Monday = 0
    pub by_weekday: [u32; DAYS_PER_WEEK],
    pub by_hour: [u32; HOURS_PER_DAY],
}

/// Volume and AI-adoption aggregates for a commit set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitSummary {
    // Volume
    pub total_commits: u32,
    pub total_additions: u64,
    pub total_deletions: u64,
    pub net_lines: i64,
    pub files_touched: u64,

    // Temporal
    /// Distinct local calendar dates with at least one commit
    pub coding_days: u32,
    pub longest_streak: u32,
    pub commits_per_day: f64,

    // AI
    pub ai_commits: u32,
    pub ai_ratio: f64,
    /// Most frequent agent among AI-assisted commits
    pub primary_ai_agent: Option<Agent>,
    pub ai_breakdown: AiBreakdown,

    // Breakdowns
    pub repos: RepoBreakdown,
    pub distribution: CommitDistribution,
}

// ============================================================================
// Report
// ============================================================================

/// Producer metadata embedded in every report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Time span covered by the analysed commits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportWindow {
    /// First commit (RFC3339)
    pub start: Option<String>,
    /// Last commit (RFC3339)
    pub end: Option<String>,
}

/// Per-commit classification line of a report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitSignal {
    pub sha: String,
    /// Commit timestamp (RFC3339)
    pub timestamp: String,
    #[serde(flatten)]
    pub classification: ClassificationResult,
}

/// Full analysis report for a commit set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalReport {
    pub report_version: String,
    pub producer: ReportProducer,
    /// When this report was computed (RFC3339)
    pub computed_at_utc: String,
    pub window: ReportWindow,
    pub summary: CommitSummary,
    pub temporal: TemporalProfile,
    pub commits: Vec<CommitSignal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_serialization() {
        let json = serde_json::to_string(&Agent::Jetbrains).unwrap();
        assert_eq!(json, "\"jetbrains\"");

        let parsed: Agent = serde_json::from_str("\"copilot\"").unwrap();
        assert_eq!(parsed, Agent::Copilot);
    }

    #[test]
    fn test_labels_serialize_as_text() {
        assert_eq!(
            serde_json::to_string(&Chronotype::NightOwl).unwrap(),
            "\"night owl\""
        );
        assert_eq!(
            serde_json::to_string(&WorkLifeInterpretation::GoodSeparation).unwrap(),
            "\"Good work/life separation\""
        );
        assert_eq!(WorkLifeInterpretation::NoData.to_string(), "No data");
    }

    #[test]
    fn test_solo_classification_shape() {
        let json = serde_json::to_value(ClassificationResult::solo()).unwrap();
        assert_eq!(json["is_ai_assisted"], false);
        assert!(json["agent"].is_null());
        assert_eq!(json["confidence"], "low");
    }

    #[test]
    fn test_empty_profile() {
        let profile = TemporalProfile::empty();
        assert_eq!(profile.total_commits(), 0);
        assert_eq!(profile.chronotype, Chronotype::Mixed);
        assert_eq!(profile.work_life_interpretation, WorkLifeInterpretation::NoData);
        assert!(profile.streaks.longest_streak_dates.is_none());
    }

    #[test]
    fn test_commit_record_defaults() {
        let json = r#"{
            "sha": "abc123",
            "timestamp": "2025-03-04T10:15:00+01:00",
            "message": "Fix parser",
            "author_name": "Dev",
            "author_email": "dev@example.com"
        }"#;

        let record: CommitRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.additions, 0);
        assert_eq!(record.files, 0);
        assert_eq!(record.timestamp.offset().local_minus_utc(), 3600);
        assert_eq!(record.repo, None);

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("repo").is_none());
    }
}
