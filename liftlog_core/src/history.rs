//! Session history selection.
//!
//! Analytics only ever look at completed sessions; these helpers pick them out
//! of a history list and put them in chronological order.

use crate::{ExerciseEntry, TimeRange, WorkoutSession};

/// All completed sessions, oldest first
pub fn completed_sessions(history: &[WorkoutSession]) -> Vec<&WorkoutSession> {
    let mut sessions: Vec<_> = history.iter().filter(|s| s.is_completed()).collect();
    sessions.sort_by(|a, b| a.started_at.cmp(&b.started_at));
    sessions
}

/// Completed sessions whose start falls inside `range` (inclusive), oldest first
pub fn completed_in_range<'a>(
    history: &'a [WorkoutSession],
    range: &TimeRange,
) -> Vec<&'a WorkoutSession> {
    let sessions: Vec<_> = completed_sessions(history)
        .into_iter()
        .filter(|s| range.contains(s.started_at))
        .collect();

    tracing::debug!(
        "{} of {} sessions fall in {} .. {}",
        sessions.len(),
        history.len(),
        range.start,
        range.end
    );
    sessions
}

/// Sessions that recorded at least one set of `exercise_id`, paired with the
/// matching entry. Order is preserved.
pub fn entries_for_exercise<'a>(
    sessions: &[&'a WorkoutSession],
    exercise_id: &str,
) -> Vec<(&'a WorkoutSession, &'a ExerciseEntry)> {
    sessions
        .iter()
        .filter_map(|s| s.exercise(exercise_id).map(|e| (*s, e)))
        .filter(|(_, entry)| !entry.sets.is_empty())
        .collect()
}

/// Most recent completed session that included `exercise_id`
pub fn find_last_session_with_exercise<'a>(
    history: &'a [WorkoutSession],
    exercise_id: &str,
) -> Option<&'a WorkoutSession> {
    completed_sessions(history)
        .into_iter()
        .rev()
        .find(|s| {
            s.exercise(exercise_id)
                .map(|e| !e.sets.is_empty())
                .unwrap_or(false)
        })
}

/// Find a session by full id or by a unique id prefix
pub fn find_session<'a>(history: &'a [WorkoutSession], id: &str) -> Option<&'a WorkoutSession> {
    let id = id.trim().to_lowercase();
    if id.is_empty() {
        return None;
    }

    let mut matches = history
        .iter()
        .filter(|s| s.id.to_string().starts_with(&id));
    let first = matches.next()?;
    if matches.next().is_some() {
        tracing::debug!("Id prefix '{}' is ambiguous", id);
        return None;
    }
    Some(first)
}
