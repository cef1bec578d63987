//! Integration tests for the liftlog binary.
//!
//! These tests verify end-to-end behavior including:
//! - The start / log / complete workflow
//! - Error reporting and exit codes
//! - Reports, records and CSV export

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Helper to create a test data directory
fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// CLI bound to `data_dir`, with the user's config file kept out of the way
fn cli(data_dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("liftlog"));
    cmd.env("XDG_CONFIG_HOME", data_dir.join("config"))
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn log_bench_workout(data_dir: &Path, weights: &[&str]) {
    cli(data_dir).arg("start").assert().success();
    cli(data_dir)
        .args(["add-exercise", "bench_press"])
        .assert()
        .success();
    for weight in weights {
        cli(data_dir)
            .args(["add-set", "bench_press", "--reps", "8", "--weight", weight])
            .assert()
            .success();
    }
    cli(data_dir).arg("complete").assert().success();
}

fn read_history(data_dir: &Path) -> Vec<serde_json::Value> {
    let contents = fs::read_to_string(data_dir.join("history.jsonl")).unwrap_or_default();
    contents
        .lines()
        .map(|line| serde_json::from_str(line).expect("history line is JSON"))
        .collect()
}

#[test]
fn test_cli_help() {
    Command::new(assert_cmd::cargo::cargo_bin!("liftlog"))
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Strength workout logger and progress tracker",
        ));
}

#[test]
fn test_full_workout_flow() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["start", "--name", "Push day"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started Push day"));
    assert!(data_dir.join("active_session.json").exists());

    cli(data_dir)
        .args(["add-exercise", "bench_press", "--rest", "120"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added Bench Press"));
    cli(data_dir)
        .args(["add-set", "bench_press", "--reps", "10", "--weight", "80"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set 1 logged"));
    cli(data_dir)
        .args(["add-set", "bench_press", "--reps", "8", "--weight", "85"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set 2 logged"));

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push day"))
        .stdout(predicate::str::contains("1480.0 total volume"));

    cli(data_dir)
        .arg("complete")
        .assert()
        .success()
        .stdout(predicate::str::contains("Workout complete: Push day"))
        .stdout(predicate::str::contains("New record"));

    assert!(!data_dir.join("active_session.json").exists());
    let history = read_history(data_dir);
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["name"], "Push day");
    assert_eq!(history[0]["exercises"][0]["rest_time_seconds"], 120);
    assert_eq!(history[0]["exercises"][0]["sets"].as_array().unwrap().len(), 2);

    cli(data_dir)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active workout"));
}

#[test]
fn test_start_twice_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir)
        .arg("start")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already active"));
}

#[test]
fn test_duplicate_exercise_is_an_error() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir).args(["add-exercise", "squat"]).assert().success();
    cli(data_dir)
        .args(["add-exercise", "squat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already part of this workout"));
}

#[test]
fn test_add_exercise_with_bad_rest_adds_nothing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir)
        .args(["add-exercise", "squat", "--rest", "99999"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rest time must be between"));

    let active: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("active_session.json")).unwrap())
            .unwrap();
    assert!(active["exercises"].as_array().unwrap().is_empty());

    // The corrected command goes through
    cli(data_dir)
        .args(["add-exercise", "squat", "--rest", "180"])
        .assert()
        .success();
}

#[test]
fn test_invalid_set_is_rejected() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir).args(["add-exercise", "squat"]).assert().success();
    cli(data_dir)
        .args(["add-set", "squat", "--reps", "0", "--weight", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("reps must be between 1 and 1000"));
    cli(data_dir)
        .args(["add-set", "squat", "--reps", "5", "--weight", "20000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("weight must be between"));

    let active: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("active_session.json")).unwrap())
            .unwrap();
    assert!(active["exercises"][0]["sets"].as_array().unwrap().is_empty());
}

#[test]
fn test_commands_without_active_workout() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["add-exercise", "squat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active workout session"));
    cli(data_dir)
        .arg("complete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No active workout session"));
    cli(data_dir)
        .arg("abandon")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active workout"));
}

#[test]
fn test_complete_empty_workout_fails() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir)
        .arg("complete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no exercises"));
    assert!(read_history(data_dir).is_empty());
}

#[test]
fn test_edit_and_remove_sets() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir).args(["add-exercise", "deadlift"]).assert().success();
    cli(data_dir)
        .args(["add-set", "deadlift", "--reps", "5", "--weight", "140"])
        .assert()
        .success();
    cli(data_dir)
        .args(["add-set", "deadlift", "--reps", "5", "--weight", "150"])
        .assert()
        .success();

    cli(data_dir)
        .args(["update-set", "deadlift", "1", "--reps", "3", "--weight", "160"])
        .assert()
        .success();
    cli(data_dir)
        .args(["update-set", "deadlift", "9", "--reps", "3", "--weight", "160"])
        .assert()
        .failure();
    cli(data_dir)
        .args(["remove-set", "deadlift", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed set 2"));
    cli(data_dir)
        .args(["remove-set", "deadlift", "7"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No set 7"));
    cli(data_dir)
        .args(["note", "belt on", "--exercise", "deadlift"])
        .assert()
        .success();

    let active: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("active_session.json")).unwrap())
            .unwrap();
    let entry = &active["exercises"][0];
    let sets = entry["sets"].as_array().unwrap();
    assert_eq!(sets.len(), 1);
    assert_eq!(sets[0]["reps"], 3);
    assert_eq!(sets[0]["weight"], 160.0);
    assert_eq!(entry["notes"], "belt on");

    cli(data_dir)
        .args(["remove-exercise", "deadlift"])
        .assert()
        .success();
    cli(data_dir)
        .args(["remove-exercise", "deadlift"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not in this workout"));
}

#[test]
fn test_abandon_does_not_touch_history() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir).arg("start").assert().success();
    cli(data_dir).args(["add-exercise", "squat"]).assert().success();
    cli(data_dir)
        .arg("abandon")
        .assert()
        .success()
        .stdout(predicate::str::contains("Abandoned"));

    assert!(!data_dir.join("active_session.json").exists());
    assert!(read_history(data_dir).is_empty());
}

#[test]
fn test_history_and_delete() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_bench_workout(data_dir, &["80"]);
    log_bench_workout(data_dir, &["82.5"]);

    let history = read_history(data_dir);
    assert_eq!(history.len(), 2);
    let first_id = history[0]["id"].as_str().unwrap().to_string();

    cli(data_dir)
        .arg("history")
        .assert()
        .success()
        .stdout(predicate::str::contains(&first_id[..8]));

    cli(data_dir)
        .args(["delete", &first_id[..8]])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted"));
    assert_eq!(read_history(data_dir).len(), 1);

    cli(data_dir)
        .args(["delete", &first_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no workout matches"));
}

#[test]
fn test_add_exercise_shows_last_performance() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_bench_workout(data_dir, &["80", "82.5"]);

    cli(data_dir).arg("start").assert().success();
    cli(data_dir)
        .args(["add-exercise", "bench_press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Last time"))
        .stdout(predicate::str::contains("8 x 80, 8 x 82.5"));
}

#[test]
fn test_report_json() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_bench_workout(data_dir, &["80", "85"]);

    let output = cli(data_dir)
        .args(["report", "--days", "7", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["frequency"]["total_workouts"], 1);
    assert_eq!(report["consistency"]["total_days"], 7);
    assert_eq!(report["consistency"]["workout_days"], 1);
    assert_eq!(report["volume"]["total_volume"], 1320.0);
    assert_eq!(report["exercises"][0]["exercise_id"], "bench_press");
    assert_eq!(report["personal_records"][0]["max_weight"]["value"], 85.0);
}

#[test]
fn test_report_for_one_exercise() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_bench_workout(data_dir, &["80"]);

    let output = cli(data_dir)
        .args(["report", "--exercise", "bench_press", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["metrics"]["session_count"], 1);
    assert_eq!(report["metrics"]["total_volume"], 640.0);
    assert_eq!(report["strength"]["points"].as_array().unwrap().len(), 1);
    assert_eq!(report["volume"]["exercise_id"], "bench_press");

    cli(data_dir)
        .args(["report", "--exercise", "bench_press"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bench Press"));
}

#[test]
fn test_report_rejects_oversized_range() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .args(["report", "--days", "200000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("report range must be at most"))
        .stderr(predicate::str::contains("panicked").not());

    let config_path = data_dir.join("huge.toml");
    fs::write(&config_path, "[report]\ndefault_range_days = 200000000\n").unwrap();
    cli(data_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("report")
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_range_days"));
}

#[test]
fn test_empty_report() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    cli(data_dir)
        .arg("report")
        .assert()
        .success()
        .stdout(predicate::str::contains("Last 30 days"))
        .stdout(predicate::str::contains("Workouts:        0"));
    cli(data_dir)
        .arg("records")
        .assert()
        .success()
        .stdout(predicate::str::contains("No records yet"));
}

#[test]
fn test_export_csv() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    log_bench_workout(data_dir, &["80", "85", "90"]);

    let csv_path = data_dir.join("export").join("history.csv");
    cli(data_dir)
        .arg("export")
        .arg(&csv_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 3 sets"));

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert_eq!(contents.lines().count(), 4);
    assert!(contents.lines().next().unwrap().starts_with("session_id,"));
}

#[test]
fn test_exercises_lists_catalog_and_custom_entries() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();

    let config_dir = data_dir.join("config").join("liftlog");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        r#"
[[catalog.custom]]
id = "landmine_press"
name = "Landmine Press"
equipment = "barbell"
"#,
    )
    .unwrap();

    cli(data_dir)
        .arg("exercises")
        .assert()
        .success()
        .stdout(predicate::str::contains("Back Squat"))
        .stdout(predicate::str::contains("Landmine Press"));
}

#[test]
fn test_config_default_rest_applies() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let config_path = data_dir.join("custom.toml");
    fs::write(&config_path, "[session]\ndefault_rest_seconds = 45\n").unwrap();

    cli(data_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("start")
        .assert()
        .success();
    cli(data_dir)
        .arg("--config")
        .arg(&config_path)
        .args(["add-exercise", "pullup"])
        .assert()
        .success();

    let active: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(data_dir.join("active_session.json")).unwrap())
            .unwrap();
    assert_eq!(active["exercises"][0]["rest_time_seconds"], 45);
}

#[test]
fn test_invalid_config_is_reported() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path();
    let config_path = data_dir.join("bad.toml");
    fs::write(&config_path, "[report]\ndefault_range_days = 0\n").unwrap();

    cli(data_dir)
        .arg("--config")
        .arg(&config_path)
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_range_days"));
}
