//! Core domain types for the worktime tracker.
//!
//! This module defines the fundamental types used throughout the system:
//! - Wall-clock times and break intervals
//! - Day-types and their policies
//! - Per-day records as entered by the user
//! - Per-day and per-period statistics

use crate::Error;
use chrono::{NaiveTime, Timelike};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Wall-clock Types
// ============================================================================

/// Local wall-clock time of day with minute precision.
///
/// Stored as minutes since midnight. Serialized as `"HH:MM"`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(u16);

impl ClockTime {
    pub const MINUTES_PER_DAY: u16 = 24 * 60;

    /// Build from hour and minute, `None` if either is out of range
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self((hour * 60 + minute) as u16))
        } else {
            None
        }
    }

    /// Build from minutes since midnight, `None` past 23:59
    pub fn from_minutes(minutes: u16) -> Option<Self> {
        (minutes < Self::MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Minutes since midnight
    pub fn minutes(self) -> u32 {
        u32::from(self.0)
    }

    pub fn hour(self) -> u32 {
        self.minutes() / 60
    }

    pub fn minute(self) -> u32 {
        self.minutes() % 60
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(time: NaiveTime) -> Self {
        Self((time.hour() * 60 + time.minute()) as u16)
    }
}

impl FromStr for ClockTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map(Self::from)
            .map_err(|_| Error::InvalidTime(s.to_string()))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Reads an optional clock time, treating empty or unparseable strings as absent.
fn lenient_clock_time<'de, D>(deserializer: D) -> Result<Option<ClockTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        if s.trim().is_empty() {
            return None;
        }
        match s.parse() {
            Ok(time) => Some(time),
            Err(e) => {
                tracing::warn!("Ignoring stored clock time: {}", e);
                None
            }
        }
    }))
}

/// A break taken during the day, e.g. lunch from 12:00 to 13:00
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakInterval {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl BreakInterval {
    pub fn new(start: ClockTime, end: ClockTime) -> Self {
        Self { start, end }
    }

    /// A break whose end is not after its start counts for nothing
    pub fn is_well_formed(&self) -> bool {
        self.end > self.start
    }

    /// Minutes of this break that fall inside `[from, to)`
    pub fn overlap_minutes(&self, from: ClockTime, to: ClockTime) -> u32 {
        if !self.is_well_formed() {
            return 0;
        }
        let lo = from.minutes().max(self.start.minutes());
        let hi = to.minutes().min(self.end.minutes());
        hi.saturating_sub(lo)
    }
}

impl fmt::Display for BreakInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ============================================================================
// Day-types
// ============================================================================

/// Classification of a day, which selects its policy
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DayType {
    #[default]
    Work,
    FullLeave,
    HalfLeave,
    QuarterLeave,
    FreeDinner,
    RefreshDay,
    Holiday,
}

impl DayType {
    pub const ALL: [DayType; 7] = [
        DayType::Work,
        DayType::FullLeave,
        DayType::HalfLeave,
        DayType::QuarterLeave,
        DayType::FreeDinner,
        DayType::RefreshDay,
        DayType::Holiday,
    ];

    /// Stable key used in state files and on the command line
    pub fn key(self) -> &'static str {
        match self {
            DayType::Work => "work",
            DayType::FullLeave => "fullLeave",
            DayType::HalfLeave => "halfLeave",
            DayType::QuarterLeave => "quarterLeave",
            DayType::FreeDinner => "freeDinner",
            DayType::RefreshDay => "refreshDay",
            DayType::Holiday => "holiday",
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            DayType::Work => "Work",
            DayType::FullLeave => "Annual leave",
            DayType::HalfLeave => "Half-day leave",
            DayType::QuarterLeave => "Quarter-day leave",
            DayType::FreeDinner => "Late shift (dinner)",
            DayType::RefreshDay => "Refresh day",
            DayType::Holiday => "Holiday",
        }
    }

    /// Look up a key, ignoring case and `-`/`_` separators.
    ///
    /// Also accepts the keys used by older monthly state files.
    fn from_key(key: &str) -> Option<Self> {
        let normalized: String = key
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        let day_type = match normalized.as_str() {
            "work" | "default" => DayType::Work,
            "fullleave" | "annual" => DayType::FullLeave,
            "halfleave" | "half" => DayType::HalfLeave,
            "quarterleave" | "quarter" => DayType::QuarterLeave,
            "freedinner" => DayType::FreeDinner,
            "refreshday" => DayType::RefreshDay,
            "holiday" => DayType::Holiday,
            _ => return None,
        };
        Some(day_type)
    }

    /// Look up a key, falling back to [`DayType::Work`] for unknown keys
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            tracing::warn!("Unknown day type '{}', treating as work day", key);
            DayType::Work
        })
    }
}

impl FromStr for DayType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| Error::UnknownDayType(s.to_string()))
    }
}

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl<'de> Deserialize<'de> for DayType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(Self::from_key_or_default(&key))
    }
}

/// Minutes credited, deducted and expected for one day-type
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayTypePolicy {
    pub day_type: DayType,
    /// Credited toward the total without being worked (paid leave etc.)
    pub bonus_minutes: u32,
    /// Deducted on top of any entered breaks
    pub fixed_break_minutes: u32,
    /// Expected worked minutes for the day
    pub target_minutes: u32,
    /// Clock times do not apply on this day
    pub is_full_day_off: bool,
}

// ============================================================================
// Records and Statistics
// ============================================================================

/// One tracked day as entered by the user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    /// 1-based position of the day within its period
    pub day_index: usize,
    #[serde(default, deserialize_with = "lenient_clock_time")]
    pub clock_in: Option<ClockTime>,
    #[serde(default, deserialize_with = "lenient_clock_time")]
    pub clock_out: Option<ClockTime>,
    #[serde(default)]
    pub day_type: DayType,
    #[serde(default)]
    pub breaks: Vec<BreakInterval>,
}

impl DayRecord {
    /// An empty work day with the given break list
    pub fn new(day_index: usize, breaks: Vec<BreakInterval>) -> Self {
        Self {
            day_index,
            clock_in: None,
            clock_out: None,
            day_type: DayType::Work,
            breaks,
        }
    }

    pub fn has_times(&self) -> bool {
        self.clock_in.is_some() && self.clock_out.is_some()
    }
}

/// Derived numbers for a single day
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DayStats {
    pub day_index: usize,
    pub worked_minutes: u32,
    /// Break time actually deducted from the clocked span
    pub break_minutes: u32,
    pub bonus_minutes: u32,
    pub total_minutes: u32,
    /// Credited minutes minus the day-type's target; positive is overage
    pub plus_minus: i64,
}

/// Aggregate numbers over a week or month
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PeriodStats {
    pub worked_minutes: u32,
    pub break_minutes: u32,
    pub bonus_minutes: u32,
    pub total_minutes: u32,
    pub target_minutes: u32,
    /// Total minus target
    pub difference_minutes: i64,
    /// Sum of the per-day plus/minus figures
    pub plus_minus_minutes: i64,
    pub days: Vec<DayStats>,
}

impl PeriodStats {
    /// Minutes still missing to reach the target; negative once exceeded
    pub fn remaining_minutes(&self) -> i64 {
        -self.difference_minutes
    }

    pub fn is_target_met(&self) -> bool {
        self.total_minutes >= self.target_minutes
    }

    /// Progress toward the target, capped at 100
    pub fn progress_percent(&self) -> f64 {
        if self.target_minutes == 0 {
            return 100.0;
        }
        (f64::from(self.total_minutes) / f64::from(self.target_minutes) * 100.0).min(100.0)
    }
}
