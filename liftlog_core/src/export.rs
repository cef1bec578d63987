//! CSV export of workout history.
//!
//! Each recorded set becomes one row so the file can be pivoted in a
//! spreadsheet without further processing.

use crate::catalog::{display_name, ExerciseCatalog};
use crate::history::completed_sessions;
use crate::{Result, WorkoutSession};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    session_id: String,
    session_name: String,
    started_at: String,
    ended_at: Option<String>,
    exercise_id: String,
    exercise_name: String,
    set_number: usize,
    reps: u32,
    weight: f64,
    volume: f64,
    completed: bool,
    rest_time_seconds: u32,
}

fn rows(session: &WorkoutSession, catalog: &dyn ExerciseCatalog) -> Vec<CsvRow> {
    session
        .exercises
        .iter()
        .flat_map(|entry| {
            let name = display_name(catalog, &entry.exercise_id);
            entry.sets.iter().enumerate().map(move |(i, set)| CsvRow {
                session_id: session.id.to_string(),
                session_name: session.name.clone(),
                started_at: session.started_at.to_rfc3339(),
                ended_at: session.ended_at.map(|t| t.to_rfc3339()),
                exercise_id: entry.exercise_id.clone(),
                exercise_name: name.clone(),
                set_number: i + 1,
                reps: set.reps,
                weight: set.weight,
                volume: set.volume(),
                completed: set.completed,
                rest_time_seconds: set.rest_time_seconds,
            })
        })
        .collect()
}

/// Write every completed session to `path`, replacing any existing file.
///
/// Returns the number of rows (sets) written. The file is synced before
/// returning.
pub fn export_history_csv(
    history: &[WorkoutSession],
    catalog: &dyn ExerciseCatalog,
    path: &Path,
) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    let mut count = 0;
    for session in completed_sessions(history) {
        for row in rows(session, catalog) {
            writer.serialize(row)?;
            count += 1;
        }
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    file.sync_all()?;

    tracing::info!("Exported {} sets to {:?}", count, path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::test_support::{session_at, set};
    use crate::catalog::get_default_catalog;

    #[test]
    fn test_export_writes_one_row_per_set() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("history.csv");

        let history = vec![
            session_at(2, &[("squat", vec![set(5, 100.0), set(5, 105.0)])]),
            session_at(1, &[("bench_press", vec![set(8, 80.0)]), ("plank", vec![])]),
        ];
        let count = export_history_csv(&history, get_default_catalog(), &csv_path).unwrap();
        assert_eq!(count, 3);

        let mut reader = csv::Reader::from_path(&csv_path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(&headers[0], "session_id");
        assert_eq!(&headers[5], "exercise_name");

        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 3);
        // Oldest session first
        assert_eq!(&records[0][4], "bench_press");
        assert_eq!(&records[0][5], "Bench Press");
        assert_eq!(&records[1][5], "Back Squat");
        assert_eq!(&records[2][6], "2");
        assert_eq!(&records[2][9], "525.0");
    }

    #[test]
    fn test_export_skips_active_sessions() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        let mut active = session_at(1, &[("squat", vec![set(5, 100.0)])]);
        active.ended_at = None;
        let count = export_history_csv(&[active], get_default_catalog(), &csv_path).unwrap();
        assert_eq!(count, 0);
        assert!(csv_path.exists());
    }

    #[test]
    fn test_export_replaces_existing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");
        std::fs::write(&csv_path, "stale contents\nmore\nlines\n").unwrap();

        let history = vec![session_at(1, &[("squat", vec![set(5, 100.0)])])];
        export_history_csv(&history, get_default_catalog(), &csv_path).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert!(!contents.contains("stale"));
        assert_eq!(contents.lines().count(), 2);
    }
}
