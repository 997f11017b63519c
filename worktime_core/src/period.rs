//! Tracked periods: ISO weeks (Mon..Fri) and calendar months.
//!
//! A period identifies which records are current. When the period computed
//! for today differs from the stored one, the records roll over.

use crate::config::TargetMode;
use crate::engine::{day_type_target_minutes, monthly_target_minutes};
use crate::policy::policy_table;
use crate::{DayRecord, Error, Result};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Weekdays tracked in week mode
const TRACKED_WEEKDAYS: usize = 5;

/// Whether records are kept per week or per month
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    #[default]
    Week,
    Month,
}

impl FromStr for PeriodKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "week" | "weekly" => Ok(PeriodKind::Week),
            "month" | "monthly" => Ok(PeriodKind::Month),
            other => Err(Error::Config(format!(
                "Unknown tracking mode '{}', expected week or month",
                other
            ))),
        }
    }
}

/// A concrete week or month
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    Week { iso_year: i32, week: u32 },
    Month { year: i32, month: u32 },
}

impl Period {
    /// The period of the given kind containing `today`
    pub fn current(kind: PeriodKind, today: NaiveDate) -> Self {
        match kind {
            PeriodKind::Week => {
                let iso = today.iso_week();
                Period::Week {
                    iso_year: iso.year(),
                    week: iso.week(),
                }
            }
            PeriodKind::Month => Period::Month {
                year: today.year(),
                month: today.month(),
            },
        }
    }

    pub fn kind(&self) -> PeriodKind {
        match self {
            Period::Week { .. } => PeriodKind::Week,
            Period::Month { .. } => PeriodKind::Month,
        }
    }

    /// Number of tracked days: 5 for a week, the month length otherwise
    pub fn day_count(&self) -> usize {
        match *self {
            Period::Week { .. } => TRACKED_WEEKDAYS,
            Period::Month { year, month } => days_in_month(year, month) as usize,
        }
    }

    pub fn contains_day(&self, day_index: usize) -> bool {
        (1..=self.day_count()).contains(&day_index)
    }

    fn first_day(&self) -> Option<NaiveDate> {
        match *self {
            Period::Week { iso_year, week } => {
                NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon)
            }
            Period::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// Calendar date of a 1-based day index
    pub fn date_of(&self, day_index: usize) -> Option<NaiveDate> {
        if !self.contains_day(day_index) {
            return None;
        }
        self.first_day()
            .map(|first| first + Duration::days(day_index as i64 - 1))
    }

    /// Day index of a calendar date, if the date lies in this period
    pub fn day_index_of(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.first_day()?).num_days();
        let index = usize::try_from(offset).ok()? + 1;
        self.contains_day(index).then_some(index)
    }

    /// Short weekday name, e.g. "Mon"
    pub fn day_label(&self, day_index: usize) -> String {
        self.date_of(day_index)
            .map(|d| d.format("%a").to_string())
            .unwrap_or_default()
    }

    pub fn is_weekend(&self, day_index: usize) -> bool {
        self.date_of(day_index)
            .map(|d| matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
            .unwrap_or(false)
    }

    /// Whether a day takes entries: every day of a week, weekdays of a month
    pub fn is_tracked(&self, day_index: usize) -> bool {
        match self {
            Period::Week { .. } => self.contains_day(day_index),
            Period::Month { .. } => self.contains_day(day_index) && !self.is_weekend(day_index),
        }
    }

    /// Target minutes for this period
    ///
    /// Months always use the 40-hours-per-week rule; weeks use either the
    /// fixed weekly target or the sum of day-type targets.
    pub fn target_minutes(
        &self,
        target: TargetMode,
        weekly_target_minutes: u32,
        records: &[DayRecord],
    ) -> u32 {
        match self {
            Period::Month { .. } => monthly_target_minutes(self.day_count() as u32),
            Period::Week { .. } => match target {
                TargetMode::Fixed => weekly_target_minutes,
                TargetMode::DayTypes => day_type_target_minutes(records, policy_table()),
            },
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Week { iso_year, week } => write!(f, "{}-W{:02}", iso_year, week),
            Period::Month { year, month } => write!(f, "{}-{:02}", year, month),
        }
    }
}

/// Number of days in a month, 0 for an invalid month
pub fn days_in_month(year: i32, month: u32) -> u32 {
    if !(1..=12).contains(&month) {
        return 0;
    }
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2026, 4), 30);
        assert_eq!(days_in_month(2026, 12), 31);
        assert_eq!(days_in_month(2026, 13), 0);
    }

    #[test]
    fn test_current_week() {
        // 2026-10-21 is a Wednesday in ISO week 43
        let period = Period::current(PeriodKind::Week, date(2026, 10, 21));
        assert_eq!(period, Period::Week { iso_year: 2026, week: 43 });
        assert_eq!(period.to_string(), "2026-W43");
        assert_eq!(period.day_count(), 5);
        assert_eq!(period.date_of(1), Some(date(2026, 10, 19)));
        assert_eq!(period.date_of(5), Some(date(2026, 10, 23)));
        assert_eq!(period.date_of(6), None);
        assert_eq!(period.day_label(1), "Mon");
        assert_eq!(period.day_index_of(date(2026, 10, 21)), Some(3));
        assert_eq!(period.day_index_of(date(2026, 10, 24)), None);
    }

    #[test]
    fn test_week_at_year_boundary() {
        // 2027-01-01 belongs to ISO week 53 of 2026
        let period = Period::current(PeriodKind::Week, date(2027, 1, 1));
        assert_eq!(period, Period::Week { iso_year: 2026, week: 53 });
        assert_eq!(period.date_of(1), Some(date(2026, 12, 28)));
    }

    #[test]
    fn test_current_month() {
        let period = Period::current(PeriodKind::Month, date(2026, 11, 5));
        assert_eq!(period.to_string(), "2026-11");
        assert_eq!(period.day_count(), 30);
        assert!(period.contains_day(30));
        assert!(!period.contains_day(31));
        assert!(!period.contains_day(0));
        // 2026-11-01 is a Sunday
        assert!(period.is_weekend(1));
        assert!(!period.is_weekend(2));
        assert_eq!(period.day_label(2), "Mon");
        assert!(!period.is_tracked(1));
        assert!(period.is_tracked(2));
        assert!(!period.is_tracked(7));
        assert!(!period.is_tracked(31));
    }

    #[test]
    fn test_every_week_day_is_tracked() {
        let period = Period::current(PeriodKind::Week, date(2026, 10, 21));
        assert!((1..=5).all(|day| period.is_tracked(day)));
        assert!(!period.is_tracked(6));
    }

    #[test]
    fn test_targets() {
        let month = Period::Month { year: 2026, month: 11 };
        assert_eq!(month.target_minutes(TargetMode::Fixed, 2400, &[]), 171 * 60);

        let week = Period::Week { iso_year: 2026, week: 43 };
        assert_eq!(week.target_minutes(TargetMode::Fixed, 2400, &[]), 2400);

        let mut records: Vec<DayRecord> = (1..=5).map(|i| DayRecord::new(i, vec![])).collect();
        records[4].day_type = crate::DayType::FreeDinner;
        assert_eq!(week.target_minutes(TargetMode::DayTypes, 2400, &records), 4 * 480 + 600);
    }

    #[test]
    fn test_period_kind_parse() {
        assert_eq!("Month".parse::<PeriodKind>().unwrap(), PeriodKind::Month);
        assert_eq!("weekly".parse::<PeriodKind>().unwrap(), PeriodKind::Week);
        assert!("fortnight".parse::<PeriodKind>().is_err());
    }
}
