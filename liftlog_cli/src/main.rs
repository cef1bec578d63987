use chrono::Utc;
use clap::{Parser, Subcommand};
use liftlog_core::analytics::{
    build_report, personal_records, progress_metrics, strength_progression, volume_over_time,
    PersonalRecordBook, RecordDimension,
};
use liftlog_core::history::{find_last_session_with_exercise, find_session};
use liftlog_core::*;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Strength workout logger and progress tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a new workout
    Start {
        /// Workout name (defaults to the start time)
        #[arg(long)]
        name: Option<String>,
    },

    /// Add an exercise to the active workout
    AddExercise {
        /// Exercise id, e.g. bench_press (see `liftlog exercises`)
        exercise: String,

        /// Rest between sets in seconds
        #[arg(long)]
        rest: Option<i64>,
    },

    /// Record a set
    AddSet {
        exercise: String,

        #[arg(long)]
        reps: i64,

        /// Weight in kg (0 for bodyweight)
        #[arg(long, default_value_t = 0.0)]
        weight: f64,

        /// Rest after this set in seconds
        #[arg(long)]
        rest: Option<i64>,

        /// Mark the set as not completed
        #[arg(long)]
        incomplete: bool,
    },

    /// Replace a recorded set
    UpdateSet {
        exercise: String,

        /// Set number as shown by `status` (starting at 1)
        set: usize,

        #[arg(long)]
        reps: i64,

        #[arg(long, default_value_t = 0.0)]
        weight: f64,

        #[arg(long)]
        rest: Option<i64>,

        #[arg(long)]
        incomplete: bool,
    },

    /// Remove an exercise and all of its sets
    RemoveExercise { exercise: String },

    /// Remove a single set
    RemoveSet {
        exercise: String,

        /// Set number as shown by `status` (starting at 1)
        set: usize,
    },

    /// Attach a note to the workout or to one exercise
    Note {
        text: String,

        #[arg(long)]
        exercise: Option<String>,
    },

    /// Rename the active workout
    Rename { name: String },

    /// Show the active workout
    Status,

    /// Finish the active workout and save it to history
    Complete,

    /// Discard the active workout
    Abandon,

    /// List completed workouts, newest first
    History {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Delete a completed workout by id or id prefix
    Delete { id: String },

    /// Progress report for a recent period
    Report {
        /// Number of days to cover, ending today
        #[arg(long)]
        days: Option<u32>,

        /// Report on one exercise only
        #[arg(long)]
        exercise: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show personal records
    Records {
        #[arg(long)]
        json: bool,
    },

    /// List known exercises
    Exercises,

    /// Export completed workouts to CSV, one row per set
    Export { path: PathBuf },
}

type Tracker = WorkoutTracker<FileSessionStore, SystemClock>;

fn main() -> ExitCode {
    // Warnings only, so command output stays clean
    liftlog_core::logging::init_with_level("warn");

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());

    let catalog = Catalog::with_custom(&config.catalog.custom);
    let errors = catalog.validate();
    if !errors.is_empty() {
        eprintln!("Catalog validation errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(Error::CatalogValidation("Invalid catalog".into()));
    }

    tracing::debug!("Using data directory {:?}", data_dir);
    let store =
        FileSessionStore::new(&data_dir).with_write_retries(config.storage.write_retries);
    let mut tracker = WorkoutTracker::open(store, SystemClock, &config)?;

    match cli.command {
        Commands::Start { name } => cmd_start(&mut tracker, name.as_deref()),
        Commands::AddExercise { exercise, rest } => {
            cmd_add_exercise(&mut tracker, &catalog, &exercise, rest)
        }
        Commands::AddSet {
            exercise,
            reps,
            weight,
            rest,
            incomplete,
        } => {
            let input = set_input(reps, weight, rest, incomplete);
            let index = tracker.add_set(&exercise, input)?;
            println!(
                "✓ Set {} logged for {}: {} x {}",
                index + 1,
                display_name(&catalog, &exercise),
                reps,
                weight
            );
            Ok(())
        }
        Commands::UpdateSet {
            exercise,
            set,
            reps,
            weight,
            rest,
            incomplete,
        } => {
            let index = set_index(set)?;
            tracker.update_set(&exercise, index, set_input(reps, weight, rest, incomplete))?;
            println!("✓ Set {} of {} updated", set, display_name(&catalog, &exercise));
            Ok(())
        }
        Commands::RemoveExercise { exercise } => {
            match tracker.remove_exercise(&exercise)? {
                RemoveOutcome::Removed => println!("✓ Removed {}", exercise),
                RemoveOutcome::NotFound => println!("{} is not in this workout", exercise),
            }
            Ok(())
        }
        Commands::RemoveSet { exercise, set } => {
            let index = set_index(set)?;
            match tracker.remove_set(&exercise, index)? {
                RemoveOutcome::Removed => println!("✓ Removed set {} of {}", set, exercise),
                RemoveOutcome::NotFound => println!("No set {} for {}", set, exercise),
            }
            Ok(())
        }
        Commands::Note { text, exercise } => {
            match exercise {
                Some(exercise) => tracker.set_exercise_notes(&exercise, &text)?,
                None => tracker.set_session_notes(&text)?,
            }
            println!("✓ Note saved");
            Ok(())
        }
        Commands::Rename { name } => {
            tracker.rename(&name)?;
            println!("✓ Workout renamed");
            Ok(())
        }
        Commands::Status => cmd_status(&tracker, &catalog),
        Commands::Complete => cmd_complete(&mut tracker, &catalog),
        Commands::Abandon => {
            match tracker.abandon()? {
                Some(session) => println!("✓ Abandoned {}", session.name),
                None => println!("No active workout."),
            }
            Ok(())
        }
        Commands::History { limit } => cmd_history(&tracker, limit),
        Commands::Delete { id } => cmd_delete(&mut tracker, &id),
        Commands::Report {
            days,
            exercise,
            json,
        } => {
            let days = days.unwrap_or(config.report.default_range_days);
            cmd_report(&tracker, &catalog, days, exercise.as_deref(), json)
        }
        Commands::Records { json } => cmd_records(&tracker, &catalog, json),
        Commands::Exercises => {
            for info in catalog.sorted() {
                println!("  {:<20} {} ({:?})", info.id, info.name, info.category);
            }
            Ok(())
        }
        Commands::Export { path } => {
            let history = tracker.store().list_history()?;
            let count = export_history_csv(&history, &catalog, &path)?;
            println!("✓ Exported {} sets to {}", count, path.display());
            Ok(())
        }
    }
}

fn set_input(reps: i64, weight: f64, rest: Option<i64>, incomplete: bool) -> SetInput {
    SetInput {
        completed: Some(!incomplete),
        rest_time_seconds: rest,
        ..SetInput::new(reps, weight)
    }
}

/// Convert a 1-based set number from the command line
fn set_index(set: usize) -> Result<usize> {
    set.checked_sub(1)
        .ok_or_else(|| Error::InvalidInput("set numbers start at 1".into()))
}

fn cmd_start(tracker: &mut Tracker, name: Option<&str>) -> Result<()> {
    let session = tracker.start(name)?;
    println!("✓ Started {}", session.name);
    println!("  Id: {}", session.id);
    Ok(())
}

fn cmd_add_exercise(
    tracker: &mut Tracker,
    catalog: &Catalog,
    exercise: &str,
    rest: Option<i64>,
) -> Result<()> {
    if catalog.get_by_id(exercise.trim()).is_none() {
        eprintln!("Note: '{}' is not in the exercise catalog", exercise.trim());
    }

    match rest {
        Some(rest) => tracker.add_exercise_with_rest(exercise, rest)?,
        None => tracker.add_exercise(exercise)?,
    }

    let exercise = exercise.trim();
    println!("✓ Added {}", display_name(catalog, exercise));

    let history = tracker.store().list_history()?;
    let last = find_last_session_with_exercise(&history, exercise)
        .and_then(|session| session.exercise(exercise).map(|e| (session, e)));
    if let Some((session, entry)) = last {
        let sets: Vec<String> = entry
            .sets
            .iter()
            .map(|s| format!("{} x {}", s.reps, s.weight))
            .collect();
        println!(
            "  Last time ({}): {}",
            session.started_at.format("%Y-%m-%d"),
            sets.join(", ")
        );
    }
    Ok(())
}

fn cmd_status(tracker: &Tracker, catalog: &Catalog) -> Result<()> {
    let Some(session) = tracker.active() else {
        println!("No active workout.");
        return Ok(());
    };

    let elapsed = Utc::now() - session.started_at;
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}", session.name);
    println!("╰─────────────────────────────────────────╯");
    println!(
        "  Started {} ({} min ago)",
        session.started_at.format("%Y-%m-%d %H:%M"),
        elapsed.num_minutes().max(0)
    );
    if let Some(notes) = &session.notes {
        println!("  Notes: {}", notes);
    }
    println!();

    for entry in &session.exercises {
        println!(
            "  {} (rest {}s)",
            display_name(catalog, &entry.exercise_id),
            entry.rest_time_seconds
        );
        if let Some(notes) = &entry.notes {
            println!("    ℹ {}", notes);
        }
        for (i, set) in entry.sets.iter().enumerate() {
            let mark = if set.completed { "✓" } else { "✗" };
            println!("    {} {}. {} x {}", mark, i + 1, set.reps, set.weight);
        }
    }

    println!();
    println!(
        "  {} sets, {:.1} total volume",
        session.total_sets(),
        session.total_volume()
    );
    Ok(())
}

fn cmd_complete(tracker: &mut Tracker, catalog: &Catalog) -> Result<()> {
    let history = tracker.store().list_history()?;
    let mut book = PersonalRecordBook::from_history(&history);

    let session = tracker.complete()?;
    let minutes = session.duration().map(|d| d.num_minutes()).unwrap_or(0);
    println!("\n✓ Workout complete: {}", session.name);
    println!(
        "  {} exercises, {} sets, {:.1} volume, {} min",
        session.exercises.len(),
        session.total_sets(),
        session.total_volume(),
        minutes
    );

    let broken = book.observe(&session);
    if !broken.is_empty() {
        println!();
        for record in broken {
            let label = match record.dimension {
                RecordDimension::Weight => "heaviest set",
                RecordDimension::Reps => "most reps",
                RecordDimension::Volume => "best set volume",
                RecordDimension::OneRepMax => "estimated 1RM",
            };
            println!(
                "  ★ New record: {} {} {:.1}",
                display_name(catalog, &record.exercise_id),
                label,
                record.value
            );
        }
    }
    Ok(())
}

fn cmd_history(tracker: &Tracker, limit: usize) -> Result<()> {
    let history = tracker.store().list_history()?;
    if history.is_empty() {
        println!("No completed workouts yet.");
        return Ok(());
    }

    for session in history.iter().rev().take(limit) {
        let id = session.id.to_string();
        println!(
            "  {}  {}  {:<28} {} sets  {:.1} volume",
            &id[..8],
            session.started_at.format("%Y-%m-%d"),
            session.name,
            session.total_sets(),
            session.total_volume()
        );
    }
    Ok(())
}

fn cmd_delete(tracker: &mut Tracker, id: &str) -> Result<()> {
    let history = tracker.store().list_history()?;
    let Some(session) = find_session(&history, id) else {
        return Err(Error::InvalidInput(format!(
            "no workout matches '{}' (or the prefix is ambiguous)",
            id
        )));
    };

    let (session_id, name) = (session.id, session.name.clone());
    if tracker.delete_from_history(session_id)? {
        println!("✓ Deleted {} ({})", name, session_id);
    }
    Ok(())
}

fn cmd_report(
    tracker: &Tracker,
    catalog: &Catalog,
    days: u32,
    exercise: Option<&str>,
    json: bool,
) -> Result<()> {
    let history = tracker.store().list_history()?;
    let now = Utc::now();
    let range = TimeRange::last_days(now, days)?;

    if let Some(exercise) = exercise {
        let metrics = progress_metrics(&history, exercise, &range, catalog);
        let strength = strength_progression(&history, exercise, &range, catalog);
        let volume = volume_over_time(&history, &range, Some(exercise));

        if json {
            let value = serde_json::json!({
                "range": range,
                "metrics": metrics,
                "strength": strength,
                "volume": volume,
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
            return Ok(());
        }

        println!("\n{} - last {} days", metrics.exercise_name, days);
        println!("  Sessions:        {}", metrics.session_count);
        println!("  Sets / reps:     {} / {}", metrics.total_sets, metrics.total_reps);
        println!("  Total volume:    {:.1}", metrics.total_volume);
        println!("  Average weight:  {:.1}", metrics.average_weight);
        println!("  Estimated 1RM:   {:.1}", metrics.one_rep_max);
        println!("  Progress:        {:+.1}%", metrics.progress_percentage);
        println!("  Strength trend:  {:?}", strength.trend);
        for point in &strength.points {
            println!(
                "    {}  top {:.1}  1RM {:.1}  volume {:.1}",
                point.date.format("%Y-%m-%d"),
                point.max_weight,
                point.one_rep_max,
                point.volume
            );
        }
        return Ok(());
    }

    let report = build_report(&history, &range, now, catalog);
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let frequency = &report.frequency;
    println!("\nLast {} days", days);
    println!("  Workouts:        {}", frequency.total_workouts);
    println!("  Per week:        {:.1}", frequency.average_per_week);
    println!(
        "  Streak:          {} current, {} longest",
        frequency.current_streak, frequency.longest_streak
    );
    println!(
        "  Consistency:     {:.0}% ({} of {} days)",
        report.consistency.consistency_percentage,
        report.consistency.workout_days,
        report.consistency.total_days
    );
    println!(
        "  Volume:          {:.1} ({:?})",
        report.volume.total_volume, report.volume.trend
    );

    if !report.exercises.is_empty() {
        println!();
        for metrics in &report.exercises {
            println!(
                "  {:<24} {:>3} sets  {:>9.1} volume  1RM {:.1}",
                metrics.exercise_name, metrics.total_sets, metrics.total_volume, metrics.one_rep_max
            );
        }
    }
    Ok(())
}

fn cmd_records(tracker: &Tracker, catalog: &Catalog, json: bool) -> Result<()> {
    let history = tracker.store().list_history()?;
    let records = personal_records(&history, catalog);

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }
    if records.is_empty() {
        println!("No records yet.");
        return Ok(());
    }

    for record in records {
        println!("  {}", record.exercise_name);
        let rows = [
            ("Heaviest set", record.max_weight),
            ("Most reps", record.max_reps),
            ("Best set volume", record.max_volume),
            ("Estimated 1RM", record.max_one_rep_max),
        ];
        for (label, entry) in rows.iter().filter_map(|(l, e)| e.map(|e| (l, e))) {
            println!(
                "    {:<16} {:>8.1}  {}",
                label,
                entry.value,
                entry.achieved_at.format("%Y-%m-%d")
            );
        }
    }
    Ok(())
}
