//! Error types for the worktime_core library.

use std::io;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for worktime_core operations
///
/// The engine itself never returns these; they come from parsing user input,
/// persistence and configuration.
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

    /// A wall-clock time could not be parsed
    #[error("Invalid time '{0}', expected HH:MM")]
    InvalidTime(String),

    /// A day-type key that is not in the policy table
    #[error("Unknown day type '{0}'")]
    UnknownDayType(String),

    /// Day index outside the tracked period
    #[error("Day {day} is outside the current period (1..={max})")]
    DayOutOfRange { day: usize, max: usize },

    /// Break position outside a day's break list
    #[error("Break {position} does not exist (day has {count} breaks)")]
    BreakOutOfRange { position: usize, count: usize },

    /// State management error
    #[error("State error: {0}")]
    State(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}
