//! Day-type policy table.
//!
//! Every [`DayType`] maps to exactly one [`DayTypePolicy`]; the table is
//! immutable and shared process-wide.

use crate::types::*;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Standard working day, in minutes
pub const STANDARD_DAY_MINUTES: u32 = 8 * 60;

/// Cached policy table, built once from [`policy_for`]
static POLICY_TABLE: Lazy<HashMap<DayType, DayTypePolicy>> = Lazy::new(|| {
    DayType::ALL
        .into_iter()
        .map(|day_type| (day_type, policy_for(day_type)))
        .collect()
});

/// Get a reference to the cached policy table
pub fn policy_table() -> &'static HashMap<DayType, DayTypePolicy> {
    &POLICY_TABLE
}

/// The policy for a day-type
///
/// Exhaustive over [`DayType`], so adding a variant without a policy does
/// not compile.
pub fn policy_for(day_type: DayType) -> DayTypePolicy {
    let (bonus_minutes, fixed_break_minutes, target_minutes, is_full_day_off) = match day_type {
        DayType::Work => (0, 0, STANDARD_DAY_MINUTES, false),
        DayType::FullLeave => (STANDARD_DAY_MINUTES, 0, STANDARD_DAY_MINUTES, true),
        DayType::HalfLeave => (240, 0, STANDARD_DAY_MINUTES, false),
        DayType::QuarterLeave => (120, 0, STANDARD_DAY_MINUTES, false),
        // Late shift: longer target with a fixed dinner break
        DayType::FreeDinner => (0, 30, 600, false),
        DayType::RefreshDay => (240, 0, STANDARD_DAY_MINUTES, false),
        DayType::Holiday => (STANDARD_DAY_MINUTES, 0, STANDARD_DAY_MINUTES, true),
    };

    DayTypePolicy {
        day_type,
        bonus_minutes,
        fixed_break_minutes,
        target_minutes,
        is_full_day_off,
    }
}
