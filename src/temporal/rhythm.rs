//! Weekly rhythm: heatmap, peak hours, chronotype and work/life balance
//!
//! Hours and weekdays are read in each timestamp's own offset, so a commit at
//! 22:00 local time counts as 22:00 whatever UTC says.

use crate::types::{
    Chronotype, Heatmap, PeakHour, WorkLifeBalance, WorkLifeInterpretation, DAYS_PER_WEEK,
    HOURS_PER_DAY,
};
use chrono::{DateTime, Datelike, FixedOffset, Timelike};
use std::ops::Range;

/// Morning window for chronotype classification
const MORNING_HOURS: Range<usize> = 6..12;

/// Evening window (late part)
const EVENING_HOURS: Range<usize> = 18..24;

/// Evening window (past midnight)
const LATE_NIGHT_HOURS: Range<usize> = 0..2;

/// Morning share above which a developer is an early bird
const EARLY_BIRD_RATIO: f64 = 0.6;

/// Morning share below which a developer is a night owl
const NIGHT_OWL_RATIO: f64 = 0.4;

/// Weekday working hours are [WORKDAY_START, WORKDAY_END)
const WORKDAY_START: usize = 9;
const WORKDAY_END: usize = 18;

/// First weekend row in the heatmap (Saturday)
const SATURDAY: usize = 5;

const HIGH_WEEKEND_RATIO: f64 = 0.3;
const HIGH_AFTER_HOURS_RATIO: f64 = 0.5;
const LOW_WEEKEND_RATIO: f64 = 0.1;
const LOW_AFTER_HOURS_RATIO: f64 = 0.2;

/// Number of peak hours reported
const PEAK_HOUR_COUNT: usize = 3;

/// Heatmap-derived view of one commit set
#[derive(Debug, Clone, PartialEq)]
pub struct Rhythm {
    pub heatmap: Heatmap,
    pub peak_hours: Vec<PeakHour>,
    pub chronotype: Chronotype,
    pub balance: WorkLifeBalance,
}

/// Compute heatmap, peaks, chronotype and work/life balance in one pass
pub fn analyze_rhythm(timestamps: &[DateTime<FixedOffset>]) -> Rhythm {
    let heatmap = build_heatmap(timestamps);
    Rhythm {
        peak_hours: peak_hours(&heatmap),
        chronotype: chronotype(&heatmap),
        balance: balance_from_heatmap(&heatmap),
        heatmap,
    }
}

/// Weekend and after-hours ratios for a commit set
pub fn work_life_balance(timestamps: &[DateTime<FixedOffset>]) -> WorkLifeBalance {
    balance_from_heatmap(&build_heatmap(timestamps))
}

/// Count commits per (weekday, hour), Monday = 0
pub fn build_heatmap(timestamps: &[DateTime<FixedOffset>]) -> Heatmap {
    let mut heatmap = [[0u32; HOURS_PER_DAY]; DAYS_PER_WEEK];
    for timestamp in timestamps {
        let day = timestamp.weekday().num_days_from_monday() as usize;
        let hour = timestamp.hour() as usize;
        heatmap[day][hour] += 1;
    }
    heatmap
}

/// Commit totals per hour across all weekdays
pub fn hourly_totals(heatmap: &Heatmap) -> [u32; HOURS_PER_DAY] {
    let mut totals = [0u32; HOURS_PER_DAY];
    for row in heatmap {
        for (hour, count) in row.iter().enumerate() {
            totals[hour] += count;
        }
    }
    totals
}

/// The busiest hours, busiest first.
///
/// Only hours with commits are candidates. Equal counts keep ascending hour order.
pub fn peak_hours(heatmap: &Heatmap) -> Vec<PeakHour> {
    let mut hours: Vec<PeakHour> = hourly_totals(heatmap)
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(hour, &count)| PeakHour {
            hour: hour as u32,
            count,
        })
        .collect();

    hours.sort_by(|a, b| b.count.cmp(&a.count));
    hours.truncate(PEAK_HOUR_COUNT);
    hours
}

/// Chronotype from the hourly distribution of a heatmap
pub fn chronotype(heatmap: &Heatmap) -> Chronotype {
    let totals = hourly_totals(heatmap);
    let window_sum = |range: Range<usize>| -> u32 { totals[range].iter().sum() };

    let morning = window_sum(MORNING_HOURS);
    let evening = window_sum(EVENING_HOURS) + window_sum(LATE_NIGHT_HOURS);
    classify_chronotype(morning, evening)
}

/// Classify from morning and evening commit counts
pub fn classify_chronotype(morning_commits: u32, evening_commits: u32) -> Chronotype {
    if morning_commits == 0 && evening_commits == 0 {
        return Chronotype::Mixed;
    }

    let ratio = morning_commits as f64 / (morning_commits + evening_commits) as f64;
    if ratio > EARLY_BIRD_RATIO {
        Chronotype::EarlyBird
    } else if ratio < NIGHT_OWL_RATIO {
        Chronotype::NightOwl
    } else {
        Chronotype::Mixed
    }
}

/// Interpret weekend and after-hours ratios (first matching rule wins)
pub fn interpret_work_life(weekend_ratio: f64, after_hours_ratio: f64) -> WorkLifeInterpretation {
    if weekend_ratio > HIGH_WEEKEND_RATIO && after_hours_ratio > HIGH_AFTER_HOURS_RATIO {
        WorkLifeInterpretation::HighWeekendAndAfterHours
    } else if weekend_ratio > HIGH_WEEKEND_RATIO {
        WorkLifeInterpretation::SignificantWeekendWork
    } else if after_hours_ratio > HIGH_AFTER_HOURS_RATIO {
        WorkLifeInterpretation::HeavyAfterHours
    } else if weekend_ratio < LOW_WEEKEND_RATIO && after_hours_ratio < LOW_AFTER_HOURS_RATIO {
        WorkLifeInterpretation::GoodSeparation
    } else {
        WorkLifeInterpretation::ModerateOffHours
    }
}

fn balance_from_heatmap(heatmap: &Heatmap) -> WorkLifeBalance {
    let total: u32 = heatmap.iter().flatten().sum();
    if total == 0 {
        return WorkLifeBalance {
            weekend_ratio: 0.0,
            after_hours_ratio: 0.0,
            interpretation: WorkLifeInterpretation::NoData,
        };
    }

    let weekend: u32 = heatmap[SATURDAY..].iter().flatten().sum();
    let weekdays = &heatmap[..SATURDAY];
    let weekday_total: u32 = weekdays.iter().flatten().sum();
    let weekday_after_hours: u32 = weekdays
        .iter()
        .flat_map(|row| row.iter().enumerate())
        .filter(|(hour, _)| *hour < WORKDAY_START || *hour >= WORKDAY_END)
        .map(|(_, count)| count)
        .sum();

    let weekend_ratio = weekend as f64 / total as f64;
    let after_hours_ratio = if weekday_total > 0 {
        weekday_after_hours as f64 / weekday_total as f64
    } else {
        0.0
    };

    WorkLifeBalance {
        weekend_ratio,
        after_hours_ratio,
        interpretation: interpret_work_life(weekend_ratio, after_hours_ratio),
    }
}
