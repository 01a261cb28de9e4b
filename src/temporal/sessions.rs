//! Coding session segmentation
//!
//! A session is a maximal run of commits where each commit lands within the gap
//! threshold of the previous one.

use crate::types::Session;
use chrono::{DateTime, FixedOffset};

/// Default maximum gap between commits of one session
pub const DEFAULT_SESSION_GAP_MINUTES: u32 = 30;

/// Partition ascending timestamps into sessions.
///
/// The input must already be sorted; this function does not sort. Unsorted input
/// yields sessions that do not reflect real working periods.
pub fn segment(sorted_timestamps: &[DateTime<FixedOffset>], gap_threshold_minutes: u32) -> Vec<Session> {
    let Some((&first, rest)) = sorted_timestamps.split_first() else {
        return Vec::new();
    };

    let threshold = gap_threshold_minutes as f64;
    let mut sessions = Vec::new();
    let mut start = first;
    let mut last = first;
    let mut commit_count: u32 = 1;

    for &timestamp in rest {
        if minutes_between(last, timestamp) <= threshold {
            last = timestamp;
            commit_count += 1;
        } else {
            sessions.push(close_session(start, last, commit_count));
            start = timestamp;
            last = timestamp;
            commit_count = 1;
        }
    }

    sessions.push(close_session(start, last, commit_count));
    sessions
}

fn close_session(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>, commit_count: u32) -> Session {
    Session {
        start,
        end,
        duration_minutes: minutes_between(start, end),
        commit_count,
    }
}

fn minutes_between(earlier: DateTime<FixedOffset>, later: DateTime<FixedOffset>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / 60_000.0
}
