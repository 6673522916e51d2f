//! Relative time formatting for history listings

use chrono::{DateTime, Utc};

/// Formats `timestamp` relative to `now`: `Just now`, `{h}h ago`,
/// `{d}d ago`, or the calendar date once it is a week old.
pub fn format_relative(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(timestamp);
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if hours < 1 {
        "Just now".to_string()
    } else if hours < 24 {
        format!("{}h ago", hours)
    } else if days < 7 {
        format!("{}d ago", days)
    } else {
        timestamp.format("%Y-%m-%d").to_string()
    }
}
