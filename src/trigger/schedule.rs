// src/trigger/schedule.rs

//! Cron schedule parsing for [`CronTrigger`](super::CronTrigger)s.
//!
//! Timer ticks come from an external source; the engine only validates that
//! a configured expression is a schedule at all.

use cron::Schedule;

/// Convert a 5- or 6-field expression into the 7-field form the `cron`
/// crate expects (`sec min hour day month weekday year`).
pub fn normalize_cron_expression(expr: &str) -> String {
    let expr = expr.trim();
    let fields: Vec<&str> = expr.split_whitespace().collect();
    match fields.len() {
        5 => format!("0 {expr} *"),
        6 => format!("0 {expr}"),
        _ => expr.to_string(),
    }
}

/// Parse a cron expression, returning a human-readable error on failure.
pub fn parse_schedule(expr: &str) -> Result<Schedule, String> {
    if expr.trim().is_empty() {
        return Err("cron expression is empty".to_string());
    }

    normalize_cron_expression(expr)
        .parse::<Schedule>()
        .map_err(|e| format!("invalid cron expression '{expr}': {e}"))
}
