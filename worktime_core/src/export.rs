//! CSV export of a period's per-day statistics.

use crate::{PeriodStats, Result, TrackerState};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    day: usize,
    date: Option<String>,
    weekday: String,
    day_type: &'static str,
    clock_in: Option<String>,
    clock_out: Option<String>,
    breaks: String,
    worked_minutes: u32,
    break_minutes: u32,
    bonus_minutes: u32,
    total_minutes: u32,
    plus_minus: i64,
}

/// Write one row per tracked day to `csv_path`, replacing any existing file
///
/// `stats` must come from the same state; days are matched by index.
/// Returns the number of rows written.
pub fn export_period_csv(csv_path: &Path, state: &TrackerState, stats: &PeriodStats) -> Result<usize> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_writer(File::create(csv_path)?);

    for (record, day) in state.records.iter().zip(&stats.days) {
        let breaks: Vec<String> = record.breaks.iter().map(|b| b.to_string()).collect();
        writer.serialize(CsvRow {
            day: record.day_index,
            date: state
                .period
                .date_of(record.day_index)
                .map(|d| d.format("%Y-%m-%d").to_string()),
            weekday: state.period.day_label(record.day_index),
            day_type: record.day_type.key(),
            clock_in: record.clock_in.map(|t| t.to_string()),
            clock_out: record.clock_out.map(|t| t.to_string()),
            breaks: breaks.join(" "),
            worked_minutes: day.worked_minutes,
            break_minutes: day.break_minutes,
            bonus_minutes: day.bonus_minutes,
            total_minutes: day.total_minutes,
            plus_minus: day.plus_minus,
        })?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    let rows = stats.days.len().min(state.records.len());
    tracing::info!("Exported {} days of {} to {:?}", rows, state.period, csv_path);
    Ok(rows)
}
