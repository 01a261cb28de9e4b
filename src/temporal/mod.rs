//! Temporal pattern mining
//!
//! Turns commit timestamps into coding sessions, day streaks, an activity
//! heatmap, a chronotype and a work/life reading.
//!
//! Pipeline: timestamps → sort → Sessions + Streaks + Rhythm → TemporalProfile

pub mod profile;
pub mod rhythm;
pub mod sessions;
pub mod streaks;

pub use profile::{temporal_profile, TemporalProfileBuilder};
pub use rhythm::{analyze_rhythm, work_life_balance, Rhythm};
pub use sessions::{segment, DEFAULT_SESSION_GAP_MINUTES};
pub use streaks::{distinct_dates, streaks};
