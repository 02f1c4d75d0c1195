//! `mm:ss` timestamp formatting for progress displays

use std::time::Duration;

/// Format a position or duration in seconds as `mm:ss`.
///
/// Minutes are unbounded (an hour-long track renders as `65:00`), seconds
/// are zero-padded to two digits. Non-finite or negative values — the
/// "no duration yet" cases — render as `00:00`.
pub fn format_timestamp(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }

    let total = seconds as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format an optional [`Duration`] as `mm:ss`, with `None` rendering as
/// `00:00`.
pub fn format_duration(duration: Option<Duration>) -> String {
    match duration {
        Some(d) => format_timestamp(d.as_secs_f64()),
        None => "00:00".to_string(),
    }
}
