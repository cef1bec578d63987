//! Core domain types for liftlog.
//!
//! This module defines the records that flow through the system:
//! - Sets and the raw input they are validated from
//! - Exercise entries within a workout
//! - Workout sessions (active and completed)
//! - Exercise catalog metadata
//! - Time ranges used to window analytics

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Limits
// ============================================================================

pub const MAX_REPS: i64 = 1000;
pub const MAX_WEIGHT: f64 = 10_000.0;
pub const MAX_REST_SECONDS: i64 = 3600;
/// Longest analytics window, in days (about a century).
pub const MAX_RANGE_DAYS: u32 = 36_600;
/// Free text (names, notes) is truncated to this many characters.
pub const MAX_TEXT_LEN: usize = 500;

// ============================================================================
// Sets
// ============================================================================

/// A single recorded set
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSet {
    pub reps: u32,
    pub weight: f64,
    pub completed: bool,
    pub rest_time_seconds: u32,
}

impl WorkoutSet {
    /// `reps * weight`
    pub fn volume(&self) -> f64 {
        f64::from(self.reps) * self.weight
    }

    /// Estimated one-rep-max for this set (Brzycki).
    pub fn one_rep_max(&self) -> f64 {
        crate::analytics::one_rep_max(self.reps, self.weight)
    }
}

/// Unvalidated set data as supplied by a front end.
///
/// Fields are wider than [`WorkoutSet`] so that negative or oversized values
/// reach validation instead of being silently wrapped by a cast.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SetInput {
    pub reps: i64,
    pub weight: f64,
    pub completed: Option<bool>,
    pub rest_time_seconds: Option<i64>,
}

impl SetInput {
    pub fn new(reps: i64, weight: f64) -> Self {
        Self {
            reps,
            weight,
            ..Self::default()
        }
    }

    /// Validate into a [`WorkoutSet`], falling back to `default_rest` when no
    /// rest time was given.
    pub fn validate(&self, default_rest: u32) -> crate::Result<WorkoutSet> {
        if self.reps < 1 || self.reps > MAX_REPS {
            return Err(crate::Error::InvalidInput(format!(
                "reps must be between 1 and {}, got {}",
                MAX_REPS, self.reps
            )));
        }
        if !self.weight.is_finite() || self.weight < 0.0 || self.weight > MAX_WEIGHT {
            return Err(crate::Error::InvalidInput(format!(
                "weight must be between 0 and {}, got {}",
                MAX_WEIGHT, self.weight
            )));
        }
        let rest = match self.rest_time_seconds {
            Some(rest) => validate_rest(rest)?,
            None => default_rest,
        };

        Ok(WorkoutSet {
            reps: self.reps as u32,
            weight: self.weight,
            completed: self.completed.unwrap_or(true),
            rest_time_seconds: rest,
        })
    }
}

/// Validate a rest time in seconds
pub fn validate_rest(seconds: i64) -> crate::Result<u32> {
    if !(0..=MAX_REST_SECONDS).contains(&seconds) {
        return Err(crate::Error::InvalidInput(format!(
            "rest time must be between 0 and {} seconds, got {}",
            MAX_REST_SECONDS, seconds
        )));
    }
    Ok(seconds as u32)
}

/// Trim free text, drop it when empty and cap its length.
pub fn sanitize_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_TEXT_LEN).collect())
}

// ============================================================================
// Sessions
// ============================================================================

/// One exercise performed within a workout
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseEntry {
    pub exercise_id: String,
    pub sets: Vec<WorkoutSet>,
    pub rest_time_seconds: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExerciseEntry {
    pub fn new(exercise_id: impl Into<String>, rest_time_seconds: u32) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            sets: Vec::new(),
            rest_time_seconds,
            notes: None,
        }
    }

    pub fn total_volume(&self) -> f64 {
        self.sets.iter().map(WorkoutSet::volume).sum()
    }

    pub fn max_weight(&self) -> f64 {
        self.sets.iter().map(|s| s.weight).fold(0.0, f64::max)
    }
}

/// A workout session, either active (`ended_at == None`) or completed
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct WorkoutSession {
    pub id: Uuid,
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub exercises: Vec<ExerciseEntry>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WorkoutSession {
    pub fn new(name: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            started_at,
            ended_at: None,
            exercises: Vec::new(),
            notes: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.ended_at.is_some()
    }

    pub fn exercise(&self, exercise_id: &str) -> Option<&ExerciseEntry> {
        self.exercises.iter().find(|e| e.exercise_id == exercise_id)
    }

    pub(crate) fn exercise_mut(&mut self, exercise_id: &str) -> Option<&mut ExerciseEntry> {
        self.exercises
            .iter_mut()
            .find(|e| e.exercise_id == exercise_id)
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    pub fn total_volume(&self) -> f64 {
        self.exercises.iter().map(ExerciseEntry::total_volume).sum()
    }

    /// Elapsed time for a completed session
    pub fn duration(&self) -> Option<Duration> {
        self.ended_at.map(|end| end - self.started_at)
    }

    /// Calendar date (UTC) the session started on
    pub fn date(&self) -> NaiveDate {
        self.started_at.date_naive()
    }
}

// ============================================================================
// Exercise Catalog Types
// ============================================================================

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseCategory {
    Strength,
    Bodyweight,
    Cardio,
    Mobility,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MuscleGroup {
    Chest,
    Back,
    Shoulders,
    Biceps,
    Triceps,
    Core,
    Quadriceps,
    Hamstrings,
    Glutes,
    Calves,
    FullBody,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Kettlebell,
    Machine,
    Cable,
    PullupBar,
    Bodyweight,
}

/// Exercise metadata used to decorate reports
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ExerciseInfo {
    pub id: String,
    pub name: String,
    pub muscle_groups: Vec<MuscleGroup>,
    pub equipment: Equipment,
    pub category: ExerciseCategory,
}

/// The complete catalog of known exercises
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    pub exercises: HashMap<String, ExerciseInfo>,
}

// ============================================================================
// Time Ranges
// ============================================================================

/// Inclusive `[start, end]` window for analytics
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> crate::Result<Self> {
        if end < start {
            return Err(crate::Error::InvalidInput(format!(
                "time range ends ({}) before it starts ({})",
                end, start
            )));
        }
        Ok(Self { start, end })
    }

    /// The `days` days leading up to and including `now`
    pub fn last_days(now: DateTime<Utc>, days: u32) -> crate::Result<Self> {
        if days > MAX_RANGE_DAYS {
            return Err(crate::Error::InvalidInput(format!(
                "report range must be at most {} days, got {}",
                MAX_RANGE_DAYS, days
            )));
        }
        let days = i64::from(days.max(1));
        let start = now
            .checked_sub_signed(Duration::days(days - 1))
            .ok_or_else(|| {
                crate::Error::InvalidInput(format!("{} days before {} is out of range", days, now))
            })?;
        Ok(Self { start, end: now })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Inclusive number of calendar days the range touches
    pub fn total_days(&self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days() + 1
    }
}
