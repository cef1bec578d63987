//! The combined progress report shown by `liftlog report`.

use super::aggregate::{exercise_summaries, volume_over_time, ProgressMetrics, VolumeData};
use super::frequency::{consistency, workout_frequency, ConsistencyMetrics, FrequencyData};
use super::records::{personal_records, PersonalRecord};
use crate::catalog::ExerciseCatalog;
use crate::{TimeRange, WorkoutSession};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the reporting view shows for one time range
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressReport {
    pub range: TimeRange,
    pub generated_at: DateTime<Utc>,
    pub frequency: FrequencyData,
    pub consistency: ConsistencyMetrics,
    pub volume: VolumeData,
    pub exercises: Vec<ProgressMetrics>,
    /// All-time, not limited to `range`
    pub personal_records: Vec<PersonalRecord>,
}

pub fn build_report(
    history: &[WorkoutSession],
    range: &TimeRange,
    now: DateTime<Utc>,
    catalog: &dyn ExerciseCatalog,
) -> ProgressReport {
    let report = ProgressReport {
        range: *range,
        generated_at: now,
        frequency: workout_frequency(history, range, now),
        consistency: consistency(history, range),
        volume: volume_over_time(history, range, None),
        exercises: exercise_summaries(history, range, catalog),
        personal_records: personal_records(history, catalog),
    };

    tracing::info!(
        "Built report: {} workouts, {} exercises, {} records",
        report.frequency.total_workouts,
        report.exercises.len(),
        report.personal_records.len()
    );
    report
}
