//! Workout frequency, streaks and consistency.
//!
//! Streaks use a fixed gap rule: consecutive sessions at most
//! [`STREAK_GAP_DAYS`] calendar days apart belong to the same run. This is
//! not tied to calendar weeks.

use crate::history::completed_in_range;
use crate::{TimeRange, WorkoutSession};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

pub const STREAK_GAP_DAYS: i64 = 7;

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct FrequencyData {
    pub total_workouts: usize,
    pub average_per_week: f64,
    pub longest_streak: usize,
    pub current_streak: usize,
    /// Session counts, Monday first
    pub workouts_by_weekday: [usize; 7],
}

#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct Streaks {
    pub longest: usize,
    pub current: usize,
}

/// Compute streaks over session dates.
///
/// `dates` need not be sorted. The final run only counts as current when the
/// latest date is within [`STREAK_GAP_DAYS`] of `today`.
pub fn streaks(dates: &[NaiveDate], today: NaiveDate) -> Streaks {
    let mut sorted = dates.to_vec();
    sorted.sort();

    let Some(&last) = sorted.last() else {
        return Streaks::default();
    };

    let mut longest = 1;
    let mut run = 1;
    for pair in sorted.windows(2) {
        if (pair[1] - pair[0]).num_days() <= STREAK_GAP_DAYS {
            run += 1;
        } else {
            run = 1;
        }
        longest = longest.max(run);
    }

    let current = if (today - last).num_days() <= STREAK_GAP_DAYS {
        run
    } else {
        0
    };

    Streaks { longest, current }
}

/// Frequency summary for sessions in `range`, with streaks judged against `now`
pub fn workout_frequency(
    history: &[WorkoutSession],
    range: &TimeRange,
    now: DateTime<Utc>,
) -> FrequencyData {
    let sessions = completed_in_range(history, range);
    let total_workouts = sessions.len();

    let weeks = range.total_days() as f64 / 7.0;
    let average_per_week = if weeks > 0.0 {
        total_workouts as f64 / weeks
    } else {
        0.0
    };

    let dates: Vec<NaiveDate> = sessions.iter().map(|s| s.date()).collect();
    let Streaks { longest, current } = streaks(&dates, now.date_naive());

    let mut workouts_by_weekday = [0; 7];
    for date in &dates {
        workouts_by_weekday[date.weekday().num_days_from_monday() as usize] += 1;
    }

    FrequencyData {
        total_workouts,
        average_per_week,
        longest_streak: longest,
        current_streak: current,
        workouts_by_weekday,
    }
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ConsistencyMetrics {
    pub workout_days: i64,
    pub total_days: i64,
    pub consistency_percentage: f64,
    pub missed_days: i64,
}

/// Share of calendar days in `range` with at least one completed session
pub fn consistency(history: &[WorkoutSession], range: &TimeRange) -> ConsistencyMetrics {
    let workout_days = completed_in_range(history, range)
        .into_iter()
        .map(WorkoutSession::date)
        .collect::<BTreeSet<_>>()
        .len() as i64;
    let total_days = range.total_days();

    let consistency_percentage = if total_days > 0 {
        workout_days as f64 / total_days as f64 * 100.0
    } else {
        0.0
    };

    ConsistencyMetrics {
        workout_days,
        total_days,
        consistency_percentage,
        missed_days: total_days - workout_days,
    }
}
