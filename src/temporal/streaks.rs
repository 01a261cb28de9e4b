//! Day streak calculation
//!
//! Streaks are counted in distinct calendar days, never in commits.

use crate::types::{DateRange, StreakInfo};
use chrono::{DateTime, FixedOffset, NaiveDate};

/// Distinct local calendar dates of the given timestamps, ascending
pub fn distinct_dates(timestamps: &[DateTime<FixedOffset>]) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = timestamps.iter().map(|t| t.date_naive()).collect();
    dates.sort_unstable();
    dates.dedup();
    dates
}

/// Compute streak statistics over commit dates.
///
/// Dates may arrive unsorted or with duplicates.
pub fn streaks(dates: &[NaiveDate]) -> StreakInfo {
    let mut dates = dates.to_vec();
    dates.sort_unstable();
    dates.dedup();

    if dates.is_empty() {
        return StreakInfo::default();
    }

    // Current streak: walk back from the most recent date
    let mut current_streak: u32 = 1;
    for pair in dates.windows(2).rev() {
        if days_between(pair[0], pair[1]) == 1 {
            current_streak += 1;
        } else {
            break;
        }
    }

    // Longest streak: a strictly longer run is required to replace the earliest one
    let mut longest_streak: u32 = 1;
    let mut longest_start = 0;
    let mut run_length: u32 = 1;
    let mut run_start = 0;
    for i in 1..dates.len() {
        if days_between(dates[i - 1], dates[i]) == 1 {
            run_length += 1;
            if run_length > longest_streak {
                longest_streak = run_length;
                longest_start = run_start;
            }
        } else {
            run_start = i;
            run_length = 1;
        }
    }

    // A lone day is not a streak worth dating
    let longest_streak_dates = (longest_streak > 1).then(|| DateRange {
        start: dates[longest_start],
        end: dates[longest_start + longest_streak as usize - 1],
    });

    let idle_gaps: Vec<i64> = dates
        .windows(2)
        .map(|pair| days_between(pair[0], pair[1]))
        .filter(|&gap| gap > 1)
        .map(|gap| gap - 1)
        .collect();
    let avg_gap_between_streaks = if idle_gaps.is_empty() {
        0.0
    } else {
        idle_gaps.iter().sum::<i64>() as f64 / idle_gaps.len() as f64
    };

    StreakInfo {
        current_streak,
        longest_streak,
        longest_streak_dates,
        avg_gap_between_streaks,
    }
}

fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days()
}
