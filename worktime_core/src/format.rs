//! Formatting helpers for minute counts.

/// `HH:MM`, with a leading `-` for negative values
pub fn minutes_to_hhmm(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 60, abs % 60)
}

/// `8h 05m`, with a leading `-` for negative values
pub fn hours_minutes(minutes: i64) -> String {
    let sign = if minutes < 0 { "-" } else { "" };
    let abs = minutes.unsigned_abs();
    format!("{}{}h {:02}m", sign, abs / 60, abs % 60)
}

/// `+HH:MM` / `-HH:MM`, bare `00:00` for zero
pub fn signed_hhmm(minutes: i64) -> String {
    if minutes > 0 {
        format!("+{}", minutes_to_hhmm(minutes))
    } else {
        minutes_to_hhmm(minutes)
    }
}

/// Plus/minus display: `+30`, `-15`, `0`
pub fn signed_minutes(minutes: i64) -> String {
    if minutes > 0 {
        format!("+{}", minutes)
    } else {
        minutes.to_string()
    }
}
