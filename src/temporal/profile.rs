//! Temporal profile builder
//!
//! Sorts commit timestamps once and runs the session segmenter, the streak
//! calculator and the rhythm analysis over them.

use crate::config::AnalysisConfig;
use crate::temporal::rhythm::analyze_rhythm;
use crate::temporal::sessions::{segment, DEFAULT_SESSION_GAP_MINUTES};
use crate::temporal::streaks::{distinct_dates, streaks};
use crate::types::{CommitRecord, TemporalProfile};
use chrono::{DateTime, FixedOffset};

/// Builds a [`TemporalProfile`] per commit set
#[derive(Debug, Clone)]
pub struct TemporalProfileBuilder {
    gap_threshold_minutes: u32,
}

impl Default for TemporalProfileBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_SESSION_GAP_MINUTES)
    }
}

impl TemporalProfileBuilder {
    /// Create a builder with a session gap threshold in minutes
    pub fn new(gap_threshold_minutes: u32) -> Self {
        Self {
            gap_threshold_minutes,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.session_gap_minutes)
    }

    pub fn gap_threshold_minutes(&self) -> u32 {
        self.gap_threshold_minutes
    }

    /// Profile a set of commits (any order)
    pub fn build(&self, commits: &[CommitRecord]) -> TemporalProfile {
        let timestamps: Vec<DateTime<FixedOffset>> = commits.iter().map(|c| c.timestamp).collect();
        self.build_from_timestamps(&timestamps)
    }

    /// Profile a set of timestamps (any order)
    pub fn build_from_timestamps(&self, timestamps: &[DateTime<FixedOffset>]) -> TemporalProfile {
        if timestamps.is_empty() {
            return TemporalProfile::empty();
        }

        let mut sorted = timestamps.to_vec();
        sorted.sort();

        let rhythm = analyze_rhythm(&sorted);
        let sessions = segment(&sorted, self.gap_threshold_minutes);
        let streak_info = streaks(&distinct_dates(&sorted));

        let session_count = sessions.len() as u32;
        let (avg_session_duration_minutes, commits_per_session) = if sessions.is_empty() {
            (0.0, 0.0)
        } else {
            let n = sessions.len() as f64;
            (
                sessions.iter().map(|s| s.duration_minutes).sum::<f64>() / n,
                sessions.iter().map(|s| s.commit_count as f64).sum::<f64>() / n,
            )
        };

        log::debug!(
            "Profiled {} commits: {} sessions, longest streak {} days",
            sorted.len(),
            session_count,
            streak_info.longest_streak
        );

        TemporalProfile {
            hourly_heatmap: rhythm.heatmap,
            peak_hours: rhythm.peak_hours,
            weekend_commit_ratio: rhythm.balance.weekend_ratio,
            after_hours_ratio: rhythm.balance.after_hours_ratio,
            work_life_interpretation: rhythm.balance.interpretation,
            chronotype: rhythm.chronotype,
            sessions,
            session_count,
            avg_session_duration_minutes,
            commits_per_session,
            streaks: streak_info,
        }
    }
}

/// Profile commits with the default session threshold
pub fn temporal_profile(commits: &[CommitRecord]) -> TemporalProfile {
    TemporalProfileBuilder::default().build(commits)
}
