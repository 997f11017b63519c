//! Work-time engine.
//!
//! Pure functions turning day records into worked, bonus and total minutes:
//! - Full-day-off types credit their bonus and ignore clock times
//! - Missing or inverted clock times yield an all-zero day
//! - Entered breaks are clipped to the clocked span, then the day-type's
//!   fixed break is added on top
//!
//! Nothing here fails or keeps state; every input maps to a number.

use crate::policy::policy_for;
use crate::{DayRecord, DayStats, DayType, DayTypePolicy, PeriodStats};
use std::collections::HashMap;

/// Fixed weekly target: five standard days
pub const WEEKLY_TARGET_MINUTES: u32 = 5 * crate::policy::STANDARD_DAY_MINUTES;

/// Compute worked, break, bonus and total minutes for one day
pub fn compute_day_stats(record: &DayRecord, policy: &DayTypePolicy) -> DayStats {
    let mut stats = DayStats {
        day_index: record.day_index,
        ..DayStats::default()
    };

    if policy.is_full_day_off {
        stats.bonus_minutes = policy.bonus_minutes;
        stats.total_minutes = policy.bonus_minutes;
        return stats;
    }

    let (clock_in, clock_out) = match (record.clock_in, record.clock_out) {
        (Some(clock_in), Some(clock_out)) if clock_out > clock_in => (clock_in, clock_out),
        _ => return stats,
    };

    let raw_minutes = clock_out.minutes() - clock_in.minutes();
    let entered_breaks: u32 = record
        .breaks
        .iter()
        .map(|b| b.overlap_minutes(clock_in, clock_out))
        .sum();
    let break_minutes = (entered_breaks + policy.fixed_break_minutes).min(raw_minutes);

    stats.worked_minutes = raw_minutes - break_minutes;
    stats.break_minutes = break_minutes;
    stats.bonus_minutes = policy.bonus_minutes;
    stats.total_minutes = stats.worked_minutes + policy.bonus_minutes;
    stats.plus_minus = plus_minus(&stats, policy);
    stats
}

/// A day's credited minutes (worked plus leave bonus) minus its target
///
/// Full-day-off days and days with nothing credited yet count as 0.
pub fn plus_minus(stats: &DayStats, policy: &DayTypePolicy) -> i64 {
    if policy.is_full_day_off || stats.total_minutes == 0 {
        return 0;
    }
    i64::from(stats.total_minutes) - i64::from(policy.target_minutes)
}

/// Sum day statistics over a period and compare against its target
///
/// Day-types missing from `policies` fall back to the work-day policy.
pub fn compute_period_stats(
    records: &[DayRecord],
    policies: &HashMap<DayType, DayTypePolicy>,
    target_minutes: u32,
) -> PeriodStats {
    let mut period = PeriodStats {
        target_minutes,
        ..PeriodStats::default()
    };

    for record in records {
        let policy = lookup(policies, record.day_type);
        let day = compute_day_stats(record, &policy);

        period.worked_minutes += day.worked_minutes;
        period.break_minutes += day.break_minutes;
        period.bonus_minutes += day.bonus_minutes;
        period.total_minutes += day.total_minutes;
        period.plus_minus_minutes += day.plus_minus;
        period.days.push(day);
    }

    period.difference_minutes = i64::from(period.total_minutes) - i64::from(target_minutes);

    tracing::debug!(
        "Period stats: {} days, total {} of {} minutes",
        period.days.len(),
        period.total_minutes,
        target_minutes
    );

    period
}

/// Monthly target: 40 hours per 7 days, truncated to whole hours
pub fn monthly_target_minutes(days_in_month: u32) -> u32 {
    (40 * days_in_month / 7) * 60
}

/// Target built from each record's day-type target
pub fn day_type_target_minutes(
    records: &[DayRecord],
    policies: &HashMap<DayType, DayTypePolicy>,
) -> u32 {
    records
        .iter()
        .map(|r| lookup(policies, r.day_type).target_minutes)
        .sum()
}

fn lookup(policies: &HashMap<DayType, DayTypePolicy>, day_type: DayType) -> DayTypePolicy {
    policies.get(&day_type).copied().unwrap_or_else(|| {
        tracing::warn!("No policy for {:?}, using work-day policy", day_type);
        policy_for(DayType::Work)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{policy_table, BreakInterval, ClockTime};

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn lunch() -> Vec<BreakInterval> {
        vec![BreakInterval::new(t("12:00"), t("13:00"))]
    }

    fn record(day: usize, clock_in: &str, clock_out: &str, day_type: DayType) -> DayRecord {
        DayRecord {
            day_index: day,
            clock_in: Some(t(clock_in)),
            clock_out: Some(t(clock_out)),
            day_type,
            breaks: lunch(),
        }
    }

    #[test]
    fn test_standard_day_with_lunch() {
        let rec = record(1, "09:00", "18:00", DayType::Work);
        let stats = compute_day_stats(&rec, &policy_for(DayType::Work));

        assert_eq!(stats.worked_minutes, 480);
        assert_eq!(stats.break_minutes, 60);
        assert_eq!(stats.total_minutes, 480);
        assert_eq!(stats.plus_minus, 0);
    }

    #[test]
    fn test_break_clipped_to_clock_out() {
        let rec = record(1, "09:00", "12:30", DayType::Work);
        let stats = compute_day_stats(&rec, &policy_for(DayType::Work));

        assert_eq!(stats.worked_minutes, 180);
        assert_eq!(stats.break_minutes, 30);
        assert_eq!(stats.plus_minus, -300);
    }

    #[test]
    fn test_inverted_or_equal_times_are_zero() {
        for (clock_in, clock_out) in [("18:00", "09:00"), ("09:00", "09:00")] {
            for breaks in [vec![], lunch()] {
                let mut rec = record(1, clock_in, clock_out, DayType::HalfLeave);
                rec.breaks = breaks;
                let stats = compute_day_stats(&rec, &policy_for(DayType::HalfLeave));
                assert_eq!(stats, DayStats { day_index: 1, ..DayStats::default() });
            }
        }
    }

    #[test]
    fn test_missing_time_is_zero() {
        let mut rec = record(3, "09:00", "18:00", DayType::Work);
        rec.clock_out = None;
        let stats = compute_day_stats(&rec, &policy_for(DayType::Work));
        assert_eq!(stats.total_minutes, 0);
        assert_eq!(stats.plus_minus, 0);
    }

    #[test]
    fn test_full_day_off_ignores_clock_times() {
        for day_type in [DayType::FullLeave, DayType::Holiday] {
            let policy = policy_for(day_type);
            let a = compute_day_stats(&record(1, "09:00", "18:00", day_type), &policy);
            let b = compute_day_stats(&record(1, "07:00", "23:00", day_type), &policy);
            let mut empty = DayRecord::new(1, vec![]);
            empty.day_type = day_type;
            let c = compute_day_stats(&empty, &policy);

            assert_eq!(a, b);
            assert_eq!(a, c);
            assert_eq!(a.worked_minutes, 0);
            assert_eq!(a.bonus_minutes, 480);
            assert_eq!(a.total_minutes, 480);
            assert_eq!(a.plus_minus, 0);
        }
    }

    #[test]
    fn test_half_leave_credits_bonus() {
        let rec = record(2, "13:00", "17:00", DayType::HalfLeave);
        let stats = compute_day_stats(&rec, &policy_for(DayType::HalfLeave));

        assert_eq!(stats.worked_minutes, 240);
        assert_eq!(stats.bonus_minutes, 240);
        assert_eq!(stats.total_minutes, 480);
        // Four hours at work plus the half-day credit fulfils the day
        assert_eq!(stats.plus_minus, 0);
    }

    #[test]
    fn test_short_quarter_leave_counts_credit_toward_plus_minus() {
        let rec = record(3, "09:00", "15:00", DayType::QuarterLeave);
        let stats = compute_day_stats(&rec, &policy_for(DayType::QuarterLeave));

        // 360 clocked, 60 lunch, 120 credit
        assert_eq!(stats.worked_minutes, 300);
        assert_eq!(stats.total_minutes, 420);
        assert_eq!(stats.plus_minus, -60);
    }

    #[test]
    fn test_fixed_break_stacks_with_entered_breaks() {
        let rec = record(4, "09:00", "21:00", DayType::FreeDinner);
        let stats = compute_day_stats(&rec, &policy_for(DayType::FreeDinner));

        // 720 clocked, 60 lunch, 30 dinner
        assert_eq!(stats.break_minutes, 90);
        assert_eq!(stats.worked_minutes, 630);
        assert_eq!(stats.plus_minus, 30);
    }

    #[test]
    fn test_breaks_never_make_work_negative() {
        let mut rec = record(1, "12:10", "12:20", DayType::FreeDinner);
        rec.breaks.push(BreakInterval::new(t("12:00"), t("12:30")));
        let stats = compute_day_stats(&rec, &policy_for(DayType::FreeDinner));

        assert_eq!(stats.worked_minutes, 0);
        assert_eq!(stats.break_minutes, 10);
    }

    #[test]
    fn test_period_is_sum_of_days() {
        let records = vec![
            record(1, "09:00", "18:00", DayType::Work),
            record(2, "09:00", "19:00", DayType::Work),
            record(3, "13:00", "17:00", DayType::HalfLeave),
            DayRecord {
                day_type: DayType::FullLeave,
                ..DayRecord::new(4, vec![])
            },
            DayRecord::new(5, lunch()),
        ];

        let stats = compute_period_stats(&records, policy_table(), WEEKLY_TARGET_MINUTES);

        assert_eq!(stats.days.len(), 5);
        assert_eq!(stats.worked_minutes, 480 + 540 + 240);
        assert_eq!(stats.bonus_minutes, 240 + 480);
        assert_eq!(stats.total_minutes, 480 + 540 + 480 + 480);
        assert_eq!(stats.target_minutes, 2400);
        assert_eq!(stats.difference_minutes, 1980 - 2400);
        assert_eq!(stats.plus_minus_minutes, 60);

        let summed: u32 = records
            .iter()
            .map(|r| compute_day_stats(r, &policy_for(r.day_type)).total_minutes)
            .sum();
        assert_eq!(stats.total_minutes, summed);
    }

    #[test]
    fn test_editing_one_day_changes_only_its_contribution() {
        let mut records = vec![
            record(1, "09:00", "18:00", DayType::Work),
            record(2, "09:00", "18:00", DayType::Work),
        ];
        let before = compute_period_stats(&records, policy_table(), 960);

        records[1].clock_out = Some(t("19:30"));
        let after = compute_period_stats(&records, policy_table(), 960);

        assert_eq!(before.days[0], after.days[0]);
        assert_eq!(after.total_minutes - before.total_minutes, 90);
        assert_eq!(after.difference_minutes, 90);
    }

    #[test]
    fn test_missing_policy_falls_back_to_work_day() {
        let policies: HashMap<DayType, DayTypePolicy> = HashMap::new();
        let records = vec![record(1, "09:00", "18:00", DayType::HalfLeave)];
        let stats = compute_period_stats(&records, &policies, 480);

        assert_eq!(stats.bonus_minutes, 0);
        assert_eq!(stats.total_minutes, 480);
        assert_eq!(day_type_target_minutes(&records, &policies), 480);
    }

    #[test]
    fn test_monthly_target_truncates_hours() {
        // 40 * 30 / 7 = 171.4 -> 171 hours
        assert_eq!(monthly_target_minutes(30), 171 * 60);
        assert_eq!(monthly_target_minutes(31), 177 * 60);
        assert_eq!(monthly_target_minutes(28), 160 * 60);
        assert_eq!(monthly_target_minutes(29), 165 * 60);
    }

    #[test]
    fn test_day_type_target() {
        let records = vec![
            record(1, "09:00", "18:00", DayType::Work),
            record(2, "09:00", "21:00", DayType::FreeDinner),
        ];
        assert_eq!(day_type_target_minutes(&records, policy_table()), 1080);
    }

    #[test]
    fn test_idempotent() {
        let rec = record(1, "08:47", "17:59", DayType::QuarterLeave);
        let policy = policy_for(DayType::QuarterLeave);
        assert_eq!(compute_day_stats(&rec, &policy), compute_day_stats(&rec, &policy));
    }
}
