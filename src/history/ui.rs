//! Display strings for history entries.
//!
//! The history list shows two lines per entry: a title (`METHOD url`) and a
//! subtitle with the status glyph, code and elapsed time. These helpers
//! produce that text so the presentation layer only has to place it.

use super::models::{HistoryEntry, StatusBucket};
use chrono::{DateTime, Utc};

/// Title line for a history row: `"METHOD url"`.
pub fn entry_title(entry: &HistoryEntry) -> String {
    format!("{} {}", entry.method(), entry.url())
}

/// Subtitle line for a history row.
///
/// Format: `"<glyph> Status: <code> | Time: <ms>ms"`. Failures show status 0
/// and time 0 with the failure glyph.
///
/// # Arguments
///
/// * `entry` - The history entry to describe
///
/// # Returns
///
/// The subtitle text, e.g. `"✅ Status: 200 | Time: 12.5ms"`.
pub fn entry_subtitle(entry: &HistoryEntry) -> String {
    let time = if entry.response.is_failure() {
        "0".to_string()
    } else {
        format_millis(entry.response.elapsed_ms())
    };
    format!(
        "{} Status: {} | Time: {}ms",
        entry.status_bucket().glyph(),
        entry.response.status_code(),
        time
    )
}

/// Formats both lines for every entry, in the order given.
pub fn format_history_list<'a, I>(entries: I) -> Vec<(String, String)>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    entries
        .into_iter()
        .map(|entry| (entry_title(entry), entry_subtitle(entry)))
        .collect()
}

/// Formats milliseconds rounded to two decimals. Whole values keep one
/// decimal place.
///
/// ```
/// use rappit::history::ui::format_millis;
///
/// assert_eq!(format_millis(0.0), "0.0");
/// assert_eq!(format_millis(120.0), "120.0");
/// assert_eq!(format_millis(12.3456), "12.35");
/// assert_eq!(format_millis(12.5), "12.5");
/// ```
pub fn format_millis(ms: f64) -> String {
    let rounded = (ms * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Formats a byte count in a human-readable format.
///
/// # Returns
///
/// String representation like "1.23 KB" or "456 B".
pub fn format_size(size: usize) -> String {
    if size < 1024 {
        format!("{} B", size)
    } else if size < 1024 * 1024 {
        format!("{:.2} KB", size as f64 / 1024.0)
    } else {
        format!("{:.2} MB", size as f64 / (1024.0 * 1024.0))
    }
}

/// Formats a relative time description (e.g., "2 hours ago", "yesterday").
///
/// # Arguments
///
/// * `timestamp` - The UTC timestamp to describe
/// * `now` - The reference time
pub fn format_relative_time(timestamp: &DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(*timestamp);

    if duration.num_seconds() < 60 {
        "just now".to_string()
    } else if duration.num_minutes() < 60 {
        let minutes = duration.num_minutes();
        format!("{} minute{} ago", minutes, plural(minutes))
    } else if duration.num_hours() < 24 {
        let hours = duration.num_hours();
        format!("{} hour{} ago", hours, plural(hours))
    } else if duration.num_days() == 1 {
        "yesterday".to_string()
    } else {
        format!("{} days ago", duration.num_days())
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Creates a summary line for the cache contents.
///
/// Format: `"Total: N | ✅ a | ⚠️ b | ❌ c"`.
pub fn format_history_stats<'a, I>(entries: I) -> String
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    let (mut total, mut success, mut redirect, mut failure) = (0, 0, 0, 0);
    for entry in entries {
        total += 1;
        match entry.status_bucket() {
            StatusBucket::Success => success += 1,
            StatusBucket::Redirect => redirect += 1,
            StatusBucket::Failure => failure += 1,
        }
    }

    format!(
        "Total: {} | {} {} | {} {} | {} {}",
        total,
        StatusBucket::Success.glyph(),
        success,
        StatusBucket::Redirect.glyph(),
        redirect,
        StatusBucket::Failure.glyph(),
        failure
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::RequestFingerprint;
    use crate::models::{HttpResponse, ResponseRecord};
    use chrono::Duration;
    use std::collections::HashMap;

    fn create_test_entry(method: &str, url: &str, response: ResponseRecord) -> HistoryEntry {
        HistoryEntry::new(RequestFingerprint::new(method, url), "", HashMap::new(), response)
    }

    fn completed(status: u16, ms: f64) -> ResponseRecord {
        let mut response = HttpResponse::new(status, "");
        response.response_time_ms = ms;
        response.into()
    }

    #[test]
    fn test_entry_title() {
        let url = "https://api.example.com/users/1";
        let entry = create_test_entry("DELETE", url, completed(204, 5.0));
        assert_eq!(entry_title(&entry), "DELETE https://api.example.com/users/1");
    }

    #[test]
    fn test_entry_subtitle_buckets() {
        let ok = create_test_entry("GET", "u", completed(200, 12.5));
        assert_eq!(entry_subtitle(&ok), "✅ Status: 200 | Time: 12.5ms");

        let moved = create_test_entry("GET", "u", completed(301, 3.0));
        assert_eq!(entry_subtitle(&moved), "⚠️ Status: 301 | Time: 3.0ms");

        let missing = create_test_entry("GET", "u", completed(404, 8.25));
        assert_eq!(entry_subtitle(&missing), "❌ Status: 404 | Time: 8.25ms");

        let failed = create_test_entry("GET", "u", ResponseRecord::failed("refused"));
        assert_eq!(entry_subtitle(&failed), "❌ Status: 0 | Time: 0ms");
    }

    #[test]
    fn test_format_history_list() {
        let entries = vec![
            create_test_entry("GET", "a", completed(200, 1.0)),
            create_test_entry("POST", "b", completed(500, 2.0)),
        ];
        let lines = format_history_list(&entries);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].0, "POST b");
        assert!(lines[1].1.starts_with("❌"));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }

    #[test]
    fn test_format_relative_time() {
        let now = Utc::now();
        assert_eq!(format_relative_time(&now, now), "just now");
        assert_eq!(format_relative_time(&(now - Duration::minutes(1)), now), "1 minute ago");
        assert_eq!(format_relative_time(&(now - Duration::minutes(5)), now), "5 minutes ago");
        assert_eq!(format_relative_time(&(now - Duration::hours(3)), now), "3 hours ago");
        assert_eq!(format_relative_time(&(now - Duration::days(1)), now), "yesterday");
        assert_eq!(format_relative_time(&(now - Duration::days(9)), now), "9 days ago");
    }

    #[test]
    fn test_format_history_stats() {
        let entries = vec![
            create_test_entry("GET", "a", completed(200, 1.0)),
            create_test_entry("GET", "b", completed(302, 1.0)),
            create_test_entry("GET", "c", ResponseRecord::failed("x")),
        ];
        assert_eq!(format_history_stats(&entries), "Total: 3 | ✅ 1 | ⚠️ 1 | ❌ 1");
    }
}
