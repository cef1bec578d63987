//! Per-exercise aggregates and per-session time series.

use super::formulas::{classify_trend, percent_change, TrendDirection};
use crate::catalog::{display_name, ExerciseCatalog};
use crate::history::{completed_in_range, entries_for_exercise};
use crate::{TimeRange, WorkoutSession, WorkoutSet};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeSet;
use uuid::Uuid;

/// Aggregate performance for one exercise over a time window
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ProgressMetrics {
    pub exercise_id: String,
    pub exercise_name: String,
    /// Best estimated one-rep-max over all sets in the window
    pub one_rep_max: f64,
    pub total_volume: f64,
    /// Mean set weight
    pub average_weight: f64,
    pub total_sets: usize,
    pub total_reps: u64,
    /// Max weight in the last session vs. the first session of the window
    pub progress_percentage: f64,
    pub session_count: usize,
}

/// Compute [`ProgressMetrics`] for `exercise_id` over `range`.
///
/// An exercise with no matching sets yields zeros rather than an error.
pub fn progress_metrics(
    history: &[WorkoutSession],
    exercise_id: &str,
    range: &TimeRange,
    catalog: &dyn ExerciseCatalog,
) -> ProgressMetrics {
    let sessions = completed_in_range(history, range);
    let entries = entries_for_exercise(&sessions, exercise_id);

    let sets: Vec<&WorkoutSet> = entries.iter().flat_map(|(_, e)| e.sets.iter()).collect();
    let total_sets = sets.len();
    let total_volume: f64 = sets.iter().map(|s| s.volume()).sum();
    let total_reps: u64 = sets.iter().map(|s| u64::from(s.reps)).sum();
    let one_rep_max = sets.iter().map(|s| s.one_rep_max()).fold(0.0, f64::max);
    let average_weight = if total_sets == 0 {
        0.0
    } else {
        sets.iter().map(|s| s.weight).sum::<f64>() / total_sets as f64
    };

    let progress_percentage = match (entries.first(), entries.last()) {
        (Some((_, first)), Some((_, last))) if entries.len() >= 2 => {
            percent_change(first.max_weight(), last.max_weight())
        }
        _ => 0.0,
    };

    ProgressMetrics {
        exercise_id: exercise_id.to_string(),
        exercise_name: display_name(catalog, exercise_id),
        one_rep_max,
        total_volume,
        average_weight,
        total_sets,
        total_reps,
        progress_percentage,
        session_count: entries.len(),
    }
}

/// Metrics for every exercise performed in the window, highest volume first
pub fn exercise_summaries(
    history: &[WorkoutSession],
    range: &TimeRange,
    catalog: &dyn ExerciseCatalog,
) -> Vec<ProgressMetrics> {
    let exercise_ids: BTreeSet<&str> = completed_in_range(history, range)
        .into_iter()
        .flat_map(|s| s.exercises.iter())
        .filter(|e| !e.sets.is_empty())
        .map(|e| e.exercise_id.as_str())
        .collect();

    let mut summaries: Vec<_> = exercise_ids
        .into_iter()
        .map(|id| progress_metrics(history, id, range, catalog))
        .collect();

    summaries.sort_by(|a, b| {
        b.total_volume
            .total_cmp(&a.total_volume)
            .then_with(|| a.exercise_id.cmp(&b.exercise_id))
    });
    summaries
}

// ============================================================================
// Strength progression
// ============================================================================

/// One session's best effort for an exercise
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StrengthPoint {
    pub date: DateTime<Utc>,
    pub session_id: Uuid,
    pub max_weight: f64,
    pub one_rep_max: f64,
    pub volume: f64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct StrengthProgression {
    pub exercise_id: String,
    pub exercise_name: String,
    pub points: Vec<StrengthPoint>,
    /// Classified on the one-rep-max series
    pub trend: TrendDirection,
}

/// One point per session that trained `exercise_id`, oldest first
pub fn strength_progression(
    history: &[WorkoutSession],
    exercise_id: &str,
    range: &TimeRange,
    catalog: &dyn ExerciseCatalog,
) -> StrengthProgression {
    let sessions = completed_in_range(history, range);

    let points: Vec<StrengthPoint> = entries_for_exercise(&sessions, exercise_id)
        .into_iter()
        .map(|(session, entry)| StrengthPoint {
            date: session.started_at,
            session_id: session.id,
            max_weight: entry.max_weight(),
            one_rep_max: entry
                .sets
                .iter()
                .map(WorkoutSet::one_rep_max)
                .fold(0.0, f64::max),
            volume: entry.total_volume(),
        })
        .collect();

    let series: Vec<f64> = points.iter().map(|p| p.one_rep_max).collect();

    StrengthProgression {
        exercise_id: exercise_id.to_string(),
        exercise_name: display_name(catalog, exercise_id),
        trend: classify_trend(&series),
        points,
    }
}

// ============================================================================
// Volume over time
// ============================================================================

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VolumePoint {
    pub date: DateTime<Utc>,
    pub session_id: Uuid,
    pub volume: f64,
    pub sets: usize,
    pub reps: u64,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct VolumeData {
    /// `None` when the series covers every exercise
    pub exercise_id: Option<String>,
    pub points: Vec<VolumePoint>,
    pub total_volume: f64,
    pub average_per_session: f64,
    pub trend: TrendDirection,
}

/// Per-session training volume, optionally restricted to one exercise.
///
/// Sessions that did not train the requested exercise are left out of the
/// series instead of contributing zero points.
pub fn volume_over_time(
    history: &[WorkoutSession],
    range: &TimeRange,
    exercise_id: Option<&str>,
) -> VolumeData {
    let points: Vec<VolumePoint> = completed_in_range(history, range)
        .into_iter()
        .filter_map(|session| {
            let sets: Vec<&WorkoutSet> = session
                .exercises
                .iter()
                .filter(|e| exercise_id.map_or(true, |id| e.exercise_id == id))
                .flat_map(|e| e.sets.iter())
                .collect();
            if sets.is_empty() && exercise_id.is_some() {
                return None;
            }
            Some(VolumePoint {
                date: session.started_at,
                session_id: session.id,
                volume: sets.iter().map(|s| s.volume()).sum(),
                sets: sets.len(),
                reps: sets.iter().map(|s| u64::from(s.reps)).sum(),
            })
        })
        .collect();

    let total_volume: f64 = points.iter().map(|p| p.volume).sum();
    let average_per_session = if points.is_empty() {
        0.0
    } else {
        total_volume / points.len() as f64
    };
    let series: Vec<f64> = points.iter().map(|p| p.volume).collect();

    VolumeData {
        exercise_id: exercise_id.map(str::to_string),
        trend: classify_trend(&series),
        points,
        total_volume,
        average_per_session,
    }
}
