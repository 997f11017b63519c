#![forbid(unsafe_code)]

//! Core domain model and business logic for the worktime tracker.
//!
//! This crate provides:
//! - Domain types (clock times, breaks, day-types, day records, stats)
//! - Day-type policy table
//! - Work-time engine (per-day and per-period statistics)
//! - Period tracking (ISO weeks, calendar months) and targets
//! - Persistence (state file, CSV export)

pub mod types;
pub mod error;
pub mod policy;
pub mod config;
pub mod logging;
pub mod period;
pub mod state;
pub mod engine;
pub mod export;
pub mod format;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use policy::{policy_for, policy_table};
pub use config::{Config, TargetMode, TrackingMode};
pub use period::{Period, PeriodKind};
pub use state::TrackerState;
pub use engine::{
    compute_day_stats, compute_period_stats, day_type_target_minutes, monthly_target_minutes,
    plus_minus, WEEKLY_TARGET_MINUTES,
};
pub use export::export_period_csv;
