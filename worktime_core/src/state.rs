//! Tracker state persistence with file locking.
//!
//! The state holds the records of the current period together with the
//! period they belong to. Loading for a different period rolls the records
//! over to a fresh set.

use crate::engine::compute_period_stats;
use crate::policy::{policy_for, policy_table};
use crate::{
    BreakInterval, ClockTime, DayRecord, DayType, Error, Period, PeriodStats, Result,
};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Records for one period, owned by the caller and passed to the engine
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrackerState {
    pub period: Period,
    pub records: Vec<DayRecord>,
}

impl TrackerState {
    /// Empty records for every day of `period`
    pub fn fresh(period: Period, default_breaks: &[BreakInterval]) -> Self {
        let records = (1..=period.day_count())
            .map(|day| DayRecord::new(day, default_breaks.to_vec()))
            .collect();
        Self { period, records }
    }

    /// Load the state for `period` from a file with shared locking
    ///
    /// Returns fresh state if the file doesn't exist, is corrupted, or
    /// belongs to another period.
    pub fn load_for(path: &Path, period: Period, default_breaks: &[BreakInterval]) -> Result<Self> {
        let fresh = || Self::fresh(period, default_breaks);

        if !path.exists() {
            tracing::info!("No state file found, starting {}", period);
            return Ok(fresh());
        }

        let contents = match read_locked(path) {
            Ok(contents) => contents,
            Err(e) => {
                tracing::warn!(
                    "Unable to read state file {:?}: {}. Starting fresh.",
                    path,
                    e
                );
                return Ok(fresh());
            }
        };

        let mut state = match serde_json::from_str::<TrackerState>(&contents) {
            Ok(state) => state,
            Err(e) => {
                tracing::warn!(
                    "Failed to parse state file {:?}: {}. Starting fresh.",
                    path,
                    e
                );
                return Ok(fresh());
            }
        };

        if state.period != period {
            tracing::info!("Period rolled over from {} to {}", state.period, period);
            return Ok(fresh());
        }

        state.normalize(default_breaks);
        tracing::debug!("Loaded state for {} from {:?}", period, path);
        Ok(state)
    }

    /// Save state to a file with exclusive locking
    ///
    /// Atomically writes state by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the original
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::State(format!("State path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string(self)?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved state for {} to {:?}", self.period, path);
        Ok(())
    }

    /// Load state, modify it, and save it back
    pub fn update<F>(
        path: &Path,
        period: Period,
        default_breaks: &[BreakInterval],
        f: F,
    ) -> Result<Self>
    where
        F: FnOnce(&mut TrackerState) -> Result<()>,
    {
        let mut state = Self::load_for(path, period, default_breaks)?;
        f(&mut state)?;
        state.save(path)?;
        Ok(state)
    }

    /// Delete the stored state; returns whether a file was removed
    pub fn reset(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)?;
        tracing::info!("Removed state file {:?}", path);
        Ok(true)
    }

    /// Engine statistics over all records
    pub fn stats(&self, target_minutes: u32) -> PeriodStats {
        compute_period_stats(&self.records, policy_table(), target_minutes)
    }

    pub fn record(&self, day: usize) -> Result<&DayRecord> {
        self.check_day(day)?;
        Ok(&self.records[day - 1])
    }

    /// Mutable record of a day that takes entries
    ///
    /// Weekend days of a month are not tracked and refuse every edit.
    fn record_mut(&mut self, day: usize) -> Result<&mut DayRecord> {
        self.check_day(day)?;
        if !self.period.is_tracked(day) {
            return Err(Error::State(format!(
                "Day {} ({}) is a weekend and is not tracked",
                day,
                self.period.day_label(day)
            )));
        }
        Ok(&mut self.records[day - 1])
    }

    /// Like [`record_mut`](Self::record_mut), but refuses days whose type ignores clock times
    fn clocked_record_mut(&mut self, day: usize) -> Result<&mut DayRecord> {
        let record = self.record_mut(day)?;
        if policy_for(record.day_type).is_full_day_off {
            return Err(Error::State(format!(
                "Day {} is {}; clock times do not apply",
                day,
                record.day_type.label()
            )));
        }
        Ok(record)
    }

    fn check_day(&self, day: usize) -> Result<()> {
        if day == 0 || day > self.records.len() {
            return Err(Error::DayOutOfRange {
                day,
                max: self.records.len(),
            });
        }
        Ok(())
    }

    pub fn set_clock_in(&mut self, day: usize, time: ClockTime) -> Result<()> {
        self.clocked_record_mut(day)?.clock_in = Some(time);
        Ok(())
    }

    pub fn set_clock_out(&mut self, day: usize, time: ClockTime) -> Result<()> {
        self.clocked_record_mut(day)?.clock_out = Some(time);
        Ok(())
    }

    pub fn clear_times(&mut self, day: usize) -> Result<()> {
        let record = self.record_mut(day)?;
        record.clock_in = None;
        record.clock_out = None;
        Ok(())
    }

    /// Change a day's type
    ///
    /// Switching to a full-day-off type clears the clock times and restores
    /// the default breaks.
    pub fn set_day_type(
        &mut self,
        day: usize,
        day_type: DayType,
        default_breaks: &[BreakInterval],
    ) -> Result<()> {
        let record = self.record_mut(day)?;
        record.day_type = day_type;
        if policy_for(day_type).is_full_day_off {
            record.clock_in = None;
            record.clock_out = None;
            record.breaks = default_breaks.to_vec();
        }
        Ok(())
    }

    pub fn add_break(&mut self, day: usize, interval: BreakInterval) -> Result<()> {
        if !interval.is_well_formed() {
            return Err(Error::State(format!(
                "Break {} ends before it starts",
                interval
            )));
        }
        let record = self.clocked_record_mut(day)?;
        record.breaks.push(interval);
        record.breaks.sort_by_key(|b| b.start);
        Ok(())
    }

    /// Remove the break at a 1-based position
    pub fn remove_break(&mut self, day: usize, position: usize) -> Result<BreakInterval> {
        let record = self.clocked_record_mut(day)?;
        let count = record.breaks.len();
        if position == 0 || position > count {
            return Err(Error::BreakOutOfRange { position, count });
        }
        Ok(record.breaks.remove(position - 1))
    }

    pub fn reset_breaks(&mut self, day: usize, default_breaks: &[BreakInterval]) -> Result<()> {
        self.clocked_record_mut(day)?.breaks = default_breaks.to_vec();
        Ok(())
    }

    /// Make records line up with the period's days, one per index in order
    fn normalize(&mut self, default_breaks: &[BreakInterval]) {
        let period = self.period;
        let day_count = period.day_count();
        let mut slots: Vec<Option<DayRecord>> = vec![None; day_count];

        for record in self.records.drain(..) {
            let slot = record
                .day_index
                .checked_sub(1)
                .and_then(|i| slots.get_mut(i));
            match slot {
                Some(slot) if slot.is_none() => *slot = Some(record),
                _ => tracing::warn!("Dropping stray record for day {}", record.day_index),
            }
        }

        self.records = slots
            .into_iter()
            .enumerate()
            .map(|(i, slot)| {
                let day = i + 1;
                match slot {
                    Some(record) if period.is_tracked(day) || is_blank(&record) => record,
                    Some(_) => {
                        tracing::warn!("Clearing entries on untracked day {}", day);
                        DayRecord::new(day, default_breaks.to_vec())
                    }
                    None => DayRecord::new(day, default_breaks.to_vec()),
                }
            })
            .collect();
    }
}

fn is_blank(record: &DayRecord) -> bool {
    record.clock_in.is_none() && record.clock_out.is_none() && record.day_type == DayType::Work
}

fn read_locked(path: &Path) -> Result<String> {
    let file = File::open(path)?;
    file.lock_shared()?;

    let mut contents = String::new();
    let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
    file.unlock()?;
    read?;

    Ok(contents)
}
