//! The workout session state machine.
//!
//! A [`WorkoutTracker`] owns the single "active session" slot. Every command
//! works on a copy of the active session, writes that copy through the
//! [`SessionStore`], and only then swaps it into the slot. A failed write
//! therefore leaves the in-memory session untouched.
//!
//! ```text
//! Idle --start--> Active --complete--> Idle (session appended to history)
//!                   |
//!                   +----abandon-----> Idle (session discarded)
//! ```

use crate::clock::Clock;
use crate::config::Config;
use crate::store::SessionStore;
use crate::types::{sanitize_text, validate_rest, ExerciseEntry, SetInput, WorkoutSession};
use crate::{Error, Result};
use chrono::Duration;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrackerState {
    Idle,
    Active,
}

/// Result of a best-effort removal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

pub struct WorkoutTracker<S: SessionStore, C: Clock> {
    store: S,
    clock: C,
    default_rest_seconds: u32,
    active: Option<WorkoutSession>,
}

impl<S: SessionStore, C: Clock> WorkoutTracker<S, C> {
    /// Open a tracker, resuming any active session left in the store.
    pub fn open(mut store: S, clock: C, config: &Config) -> Result<Self> {
        let mut active = store.load_active()?;

        // A crash between appending to history and clearing the active slot
        // leaves the finished session in both places.
        if let Some(session) = &active {
            let finished = session.is_completed()
                || store.list_history()?.iter().any(|h| h.id == session.id);
            if finished {
                tracing::warn!(
                    "Active session {} was already completed; clearing it",
                    session.id
                );
                // Only clear if no other process has started a new session meanwhile
                let stale_id = session.id;
                if store.load_active()?.map(|s| s.id) == Some(stale_id) {
                    store.clear_active()?;
                }
                active = None;
            } else {
                tracing::info!("Resumed active session {} ({})", session.id, session.name);
            }
        }

        Ok(Self {
            store,
            clock,
            default_rest_seconds: config.session.default_rest_seconds,
            active,
        })
    }

    pub fn state(&self) -> TrackerState {
        match self.active {
            Some(_) => TrackerState::Active,
            None => TrackerState::Idle,
        }
    }

    pub fn active(&self) -> Option<&WorkoutSession> {
        self.active.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Start a new session. The name defaults to a timestamp label.
    pub fn start(&mut self, name: Option<&str>) -> Result<&WorkoutSession> {
        if let Some(active) = &self.active {
            return Err(Error::AlreadyActive(active.id));
        }

        let now = self.clock.now();
        let name = name
            .and_then(sanitize_text)
            .unwrap_or_else(|| format!("Workout {}", now.format("%Y-%m-%d %H:%M")));
        let session = WorkoutSession::new(name, now);

        self.store.save_active(&session)?;
        tracing::info!("Started session {} ({})", session.id, session.name);
        Ok(&*self.active.insert(session))
    }

    pub fn add_exercise(&mut self, exercise_id: &str) -> Result<()> {
        let rest = self.default_rest_seconds;
        self.insert_exercise(exercise_id, rest)
    }

    /// Add an exercise with its own rest time. Nothing is added if the rest
    /// time is out of range.
    pub fn add_exercise_with_rest(&mut self, exercise_id: &str, rest_seconds: i64) -> Result<()> {
        let rest = validate_rest(rest_seconds)?;
        self.insert_exercise(exercise_id, rest)
    }

    fn insert_exercise(&mut self, exercise_id: &str, rest: u32) -> Result<()> {
        let exercise_id = exercise_id.trim();
        if exercise_id.is_empty() {
            return Err(Error::InvalidInput("exercise id must not be empty".into()));
        }

        self.mutate(|session| {
            if session.exercise(exercise_id).is_some() {
                return Err(Error::DuplicateExercise(exercise_id.to_string()));
            }
            session
                .exercises
                .push(ExerciseEntry::new(exercise_id, rest));
            Ok(())
        })?;

        tracing::debug!("Added exercise {}", exercise_id);
        Ok(())
    }

    /// Append a set; returns its index within the exercise.
    pub fn add_set(&mut self, exercise_id: &str, input: SetInput) -> Result<usize> {
        let index = self.mutate(|session| {
            let entry = session
                .exercise_mut(exercise_id)
                .ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))?;
            let set = input.validate(entry.rest_time_seconds)?;
            entry.sets.push(set);
            Ok(entry.sets.len() - 1)
        })?;

        tracing::debug!("Added set {} to {}", index, exercise_id);
        Ok(index)
    }

    /// Replace a recorded set, with the same validation as [`Self::add_set`].
    pub fn update_set(&mut self, exercise_id: &str, index: usize, input: SetInput) -> Result<()> {
        self.mutate(|session| {
            let entry = session
                .exercise_mut(exercise_id)
                .ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))?;
            let count = entry.sets.len();
            let slot = entry.sets.get_mut(index).ok_or_else(|| {
                Error::InvalidInput(format!(
                    "set {} does not exist ({} has {} sets)",
                    index, exercise_id, count
                ))
            })?;
            let rest = slot.rest_time_seconds;
            *slot = input.validate(rest)?;
            Ok(())
        })
    }

    /// Remove an exercise and its sets. Missing exercises are not an error.
    pub fn remove_exercise(&mut self, exercise_id: &str) -> Result<RemoveOutcome> {
        let present = self
            .require_active()?
            .exercise(exercise_id)
            .is_some();
        if !present {
            tracing::debug!("Exercise {} not in session; nothing to remove", exercise_id);
            return Ok(RemoveOutcome::NotFound);
        }

        self.mutate(|session| {
            session.exercises.retain(|e| e.exercise_id != exercise_id);
            Ok(())
        })?;
        Ok(RemoveOutcome::Removed)
    }

    /// Remove one set. A missing exercise or index is not an error.
    pub fn remove_set(&mut self, exercise_id: &str, index: usize) -> Result<RemoveOutcome> {
        let present = self
            .require_active()?
            .exercise(exercise_id)
            .map(|e| index < e.sets.len())
            .unwrap_or(false);
        if !present {
            tracing::debug!("Set {} of {} not found; nothing to remove", index, exercise_id);
            return Ok(RemoveOutcome::NotFound);
        }

        self.mutate(|session| {
            if let Some(entry) = session.exercise_mut(exercise_id) {
                entry.sets.remove(index);
            }
            Ok(())
        })?;
        Ok(RemoveOutcome::Removed)
    }

    pub fn rename(&mut self, name: &str) -> Result<()> {
        let name = sanitize_text(name)
            .ok_or_else(|| Error::InvalidInput("session name must not be empty".into()))?;
        self.mutate(|session| {
            session.name = name;
            Ok(())
        })
    }

    pub fn set_session_notes(&mut self, notes: &str) -> Result<()> {
        let notes = sanitize_text(notes);
        self.mutate(|session| {
            session.notes = notes;
            Ok(())
        })
    }

    pub fn set_exercise_notes(&mut self, exercise_id: &str, notes: &str) -> Result<()> {
        let notes = sanitize_text(notes);
        self.mutate(|session| {
            let entry = session
                .exercise_mut(exercise_id)
                .ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))?;
            entry.notes = notes;
            Ok(())
        })
    }

    /// Change the rest time used for sets added from now on
    pub fn set_exercise_rest(&mut self, exercise_id: &str, seconds: i64) -> Result<()> {
        let seconds = validate_rest(seconds)?;
        self.mutate(|session| {
            let entry = session
                .exercise_mut(exercise_id)
                .ok_or_else(|| Error::UnknownExercise(exercise_id.to_string()))?;
            entry.rest_time_seconds = seconds;
            Ok(())
        })
    }

    /// Finish the active session and move it into history.
    pub fn complete(&mut self) -> Result<WorkoutSession> {
        let active = self.require_active()?;
        if active.exercises.is_empty() {
            return Err(Error::EmptyWorkout);
        }

        let mut finished = active.clone();
        let earliest_end = finished.started_at + Duration::milliseconds(1);
        finished.ended_at = Some(self.clock.now().max(earliest_end));

        self.store.append_history(&finished)?;

        // The session is in history now. If clearing the stored active copy
        // fails, `open` will notice the duplicate and clear it next time.
        if let Err(e) = self.store.clear_active() {
            tracing::warn!(
                "Session {} completed but the active copy could not be cleared: {}",
                finished.id,
                e
            );
        }
        self.active = None;

        tracing::info!(
            "Completed session {} with {} exercises and {} sets",
            finished.id,
            finished.exercises.len(),
            finished.total_sets()
        );
        Ok(finished)
    }

    /// Discard the active session without recording it. No-op when idle.
    pub fn abandon(&mut self) -> Result<Option<WorkoutSession>> {
        if self.active.is_none() {
            return Ok(None);
        }

        self.store.clear_active()?;
        let abandoned = self.active.take();
        if let Some(session) = &abandoned {
            tracing::info!("Abandoned session {}", session.id);
        }
        Ok(abandoned)
    }

    /// Delete a completed session from history. The active slot is untouched.
    pub fn delete_from_history(&mut self, id: Uuid) -> Result<bool> {
        if self.active.as_ref().map(|a| a.id) == Some(id) {
            return Err(Error::InvalidInput(
                "the active workout is not in history; use abandon instead".into(),
            ));
        }
        self.store.remove_history(id)
    }

    fn require_active(&self) -> Result<&WorkoutSession> {
        self.active.as_ref().ok_or(Error::NoActiveSession)
    }

    /// Apply `f` to a copy of the active session, persist the copy, then
    /// commit it. Nothing changes if `f` or the store fails.
    fn mutate<T>(&mut self, f: impl FnOnce(&mut WorkoutSession) -> Result<T>) -> Result<T> {
        let mut draft = self.require_active()?.clone();
        let value = f(&mut draft)?;
        self.store.save_active(&draft)?;
        self.active = Some(draft);
        Ok(value)
    }
}
