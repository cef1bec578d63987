//! Progress analytics over completed workout history.
//!
//! Every function here is pure: it takes the history, a [`TimeRange`](crate::TimeRange)
//! and, where "now" matters, an explicit timestamp. Nothing reads the active
//! session or the system clock.

mod aggregate;
mod formulas;
mod frequency;
mod records;
mod report;

pub use aggregate::{
    exercise_summaries, progress_metrics, strength_progression, volume_over_time,
    ProgressMetrics, StrengthPoint, StrengthProgression, VolumeData, VolumePoint,
};

pub use formulas::{
    classify_trend, one_rep_max, percent_change, TrendDirection, BRZYCKI_MAX_REPS,
    TREND_THRESHOLD_PERCENT,
};

pub use frequency::{
    consistency, streaks, workout_frequency, ConsistencyMetrics, FrequencyData, Streaks,
    STREAK_GAP_DAYS,
};

pub use records::{
    personal_records, NewRecord, PersonalRecord, PersonalRecordBook, RecordDimension, RecordEntry,
};

pub use report::{build_report, ProgressReport};
