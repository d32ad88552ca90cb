//! Search functionality for request history.
//!
//! This module provides search and filtering over history entries, allowing
//! users to quickly find past requests by URL, method, or content. Results
//! keep the order they were given in, so searching an ordered view yields
//! hits most recent first.

use super::models::{HistoryEntry, StatusBucket};

/// Searches history entries using case-insensitive substring matching.
///
/// Searches across multiple fields:
/// - URL
/// - HTTP method
/// - Request body
/// - Response body (failures match on their error text)
///
/// An empty query matches everything.
///
/// # Arguments
///
/// * `query` - The search term to match against
/// * `entries` - The history entries to search through
///
/// # Returns
///
/// The matching entries, in their original order.
pub fn search_history<'a, I>(query: &str, entries: I) -> Vec<&'a HistoryEntry>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    let query_lower = query.trim().to_lowercase();

    entries
        .into_iter()
        .filter(|entry| query_lower.is_empty() || matches_query(entry, &query_lower))
        .collect()
}

fn matches_query(entry: &HistoryEntry, query_lower: &str) -> bool {
    entry.url().to_lowercase().contains(query_lower)
        || entry.method().to_lowercase().contains(query_lower)
        || entry.request_body.to_lowercase().contains(query_lower)
        || entry.response.body().to_lowercase().contains(query_lower)
}

/// Filters history entries by HTTP method (case-insensitive).
pub fn filter_by_method<'a, I>(method: &str, entries: I) -> Vec<&'a HistoryEntry>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    entries
        .into_iter()
        .filter(|entry| entry.method().eq_ignore_ascii_case(method))
        .collect()
}

/// Filters history entries by status bucket.
///
/// # Arguments
///
/// * `bucket` - Success, redirect or failure
/// * `entries` - The history entries to filter
pub fn filter_by_bucket<'a, I>(bucket: StatusBucket, entries: I) -> Vec<&'a HistoryEntry>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    entries
        .into_iter()
        .filter(|entry| entry.status_bucket() == bucket)
        .collect()
}

/// Filters history entries by exact status code.
pub fn filter_by_status<'a, I>(status_code: u16, entries: I) -> Vec<&'a HistoryEntry>
where
    I: IntoIterator<Item = &'a HistoryEntry>,
{
    entries
        .into_iter()
        .filter(|entry| entry.response.status_code() == status_code)
        .collect()
}
