#![forbid(unsafe_code)]

//! Core domain model and business logic for liftlog.
//!
//! This crate provides:
//! - Domain types (sets, exercise entries, workout sessions, time ranges)
//! - Exercise catalog
//! - The workout session state machine
//! - Persistence (active session file, JSONL history, CSV export)
//! - Progress analytics

pub mod types;
pub mod error;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod logging;
pub mod store;
pub mod history;
pub mod session;
pub mod analytics;
pub mod export;

// Re-export commonly used types
pub use error::{Error, ErrorKind, Result};
pub use types::*;
pub use catalog::{display_name, get_default_catalog, ExerciseCatalog};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::Config;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
pub use session::{RemoveOutcome, TrackerState, WorkoutTracker};
pub use export::export_history_csv;
