//! Error types for the liftlog_core library.

use std::io;
use uuid::Uuid;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Closed classification of every failure the core can report.
///
/// Front ends branch on this rather than on individual [`Error`] variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    DuplicateExercise,
    UnknownExercise,
    NoActiveSession,
    AlreadyActive,
    EmptyWorkout,
    StorageFailure,
    Config,
}

/// Core error type for liftlog_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Catalog validation error
    #[error("Catalog validation error: {0}")]
    CatalogValidation(String),

    /// Reps, weight, rest time or another field is out of range
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Exercise '{0}' is already part of this workout")]
    DuplicateExercise(String),

    #[error("Exercise '{0}' is not part of this workout")]
    UnknownExercise(String),

    #[error("No active workout session")]
    NoActiveSession,

    #[error("A workout session is already active ({0})")]
    AlreadyActive(Uuid),

    #[error("Cannot complete a workout with no exercises")]
    EmptyWorkout,

    /// Session store failure that is not a plain IO/serialization error
    #[error("Storage error: {0}")]
    Storage(String),
}

impl Error {
    /// Classify this error into the closed [`ErrorKind`] taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Io(_) | Error::Json(_) | Error::Csv(_) | Error::Storage(_) => {
                ErrorKind::StorageFailure
            }
            Error::Toml(_) | Error::Config(_) | Error::CatalogValidation(_) => ErrorKind::Config,
            Error::InvalidInput(_) => ErrorKind::InvalidInput,
            Error::DuplicateExercise(_) => ErrorKind::DuplicateExercise,
            Error::UnknownExercise(_) => ErrorKind::UnknownExercise,
            Error::NoActiveSession => ErrorKind::NoActiveSession,
            Error::AlreadyActive(_) => ErrorKind::AlreadyActive,
            Error::EmptyWorkout => ErrorKind::EmptyWorkout,
        }
    }

    /// Storage failures are transient from the caller's point of view;
    /// validation failures will fail the same way again.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StorageFailure
    }
}
