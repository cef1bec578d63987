//! Personal records across the whole history.
//!
//! Records are running maxima: a dimension only changes when a set strictly
//! beats the current best, so replaying more history can never lower one.

use crate::catalog::{display_name, ExerciseCatalog};
use crate::history::completed_sessions;
use crate::{WorkoutSession, WorkoutSet};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RecordDimension {
    Weight,
    Reps,
    Volume,
    OneRepMax,
}

impl RecordDimension {
    pub const ALL: [RecordDimension; 4] = [
        RecordDimension::Weight,
        RecordDimension::Reps,
        RecordDimension::Volume,
        RecordDimension::OneRepMax,
    ];

    fn measure(self, set: &WorkoutSet) -> f64 {
        match self {
            RecordDimension::Weight => set.weight,
            RecordDimension::Reps => f64::from(set.reps),
            RecordDimension::Volume => set.volume(),
            RecordDimension::OneRepMax => set.one_rep_max(),
        }
    }
}

/// Best value for one dimension and when it was set
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct RecordEntry {
    pub value: f64,
    pub achieved_at: DateTime<Utc>,
    pub session_id: Uuid,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PersonalRecord {
    pub exercise_id: String,
    pub exercise_name: String,
    pub max_weight: Option<RecordEntry>,
    pub max_reps: Option<RecordEntry>,
    /// Best single-set volume
    pub max_volume: Option<RecordEntry>,
    pub max_one_rep_max: Option<RecordEntry>,
}

/// A record that was beaten while observing a session
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewRecord {
    pub exercise_id: String,
    pub dimension: RecordDimension,
    pub previous: Option<f64>,
    pub value: f64,
}

/// Incrementally maintained record table
#[derive(Clone, Debug, Default)]
pub struct PersonalRecordBook {
    records: BTreeMap<String, BTreeMap<RecordDimension, RecordEntry>>,
}

impl PersonalRecordBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the book from every completed session in `history`
    pub fn from_history(history: &[WorkoutSession]) -> Self {
        let mut book = Self::new();
        for session in completed_sessions(history) {
            book.observe(session);
        }
        book
    }

    /// Fold one session into the book, returning the records it broke.
    ///
    /// Each dimension is reported at most once per exercise per session, with
    /// the session's best value.
    pub fn observe(&mut self, session: &WorkoutSession) -> Vec<NewRecord> {
        let mut broken: BTreeMap<(String, RecordDimension), NewRecord> = BTreeMap::new();

        for entry in &session.exercises {
            for set in &entry.sets {
                for dimension in RecordDimension::ALL {
                    let value = dimension.measure(set);
                    let best = self
                        .records
                        .entry(entry.exercise_id.clone())
                        .or_default();
                    let current = best.get(&dimension).map(|r| r.value);

                    if value > current.unwrap_or(0.0) {
                        best.insert(
                            dimension,
                            RecordEntry {
                                value,
                                achieved_at: session.started_at,
                                session_id: session.id,
                            },
                        );
                        broken
                            .entry((entry.exercise_id.clone(), dimension))
                            .and_modify(|r| r.value = value)
                            .or_insert(NewRecord {
                                exercise_id: entry.exercise_id.clone(),
                                dimension,
                                previous: current,
                                value,
                            });
                    }
                }
            }
        }

        if !broken.is_empty() {
            tracing::debug!(
                "Session {} set {} new personal records",
                session.id,
                broken.len()
            );
        }
        broken.into_values().collect()
    }

    pub fn get(&self, exercise_id: &str, dimension: RecordDimension) -> Option<&RecordEntry> {
        self.records.get(exercise_id)?.get(&dimension)
    }

    /// Records per exercise, ordered by exercise id
    pub fn records(&self, catalog: &dyn ExerciseCatalog) -> Vec<PersonalRecord> {
        self.records
            .iter()
            .map(|(id, best)| PersonalRecord {
                exercise_id: id.clone(),
                exercise_name: display_name(catalog, id),
                max_weight: best.get(&RecordDimension::Weight).copied(),
                max_reps: best.get(&RecordDimension::Reps).copied(),
                max_volume: best.get(&RecordDimension::Volume).copied(),
                max_one_rep_max: best.get(&RecordDimension::OneRepMax).copied(),
            })
            .collect()
    }
}

/// Personal records over all completed history (not time-windowed)
pub fn personal_records(
    history: &[WorkoutSession],
    catalog: &dyn ExerciseCatalog,
) -> Vec<PersonalRecord> {
    PersonalRecordBook::from_history(history).records(catalog)
}
