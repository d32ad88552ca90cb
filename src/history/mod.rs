//! Request history tracking.
//!
//! This module keeps the most recent request/response exchanges in memory,
//! one entry per method and URL, so users can review past requests and
//! reload them into the editor.
//!
//! # Features
//!
//! - Insert-or-update keyed by method + URL
//! - Most-recent-first ordering
//! - Fixed capacity with eviction of the least recently touched entry
//! - Search, filtering and display helpers
//!
//! # Example
//!
//! ```
//! use rappit::history::HistoryCache;
//! use rappit::models::{HttpResponse, ResponseRecord};
//! use std::collections::HashMap;
//!
//! let mut history = HistoryCache::new();
//! for url in ["http://x/a", "http://x/b", "http://x/c"] {
//!     history.record("GET", url, HttpResponse::new(200, "OK").into(), "", &HashMap::new());
//! }
//!
//! let urls: Vec<_> = history.ordered_view().map(|entry| entry.url()).collect();
//! assert_eq!(urls, ["http://x/c", "http://x/b", "http://x/a"]);
//! ```

pub mod cache;
pub mod models;
pub mod search;
pub mod ui;

// Re-export commonly used types
pub use cache::{HistoryCache, HistoryChange, MAX_HISTORY_ITEMS};
pub use models::{HistoryEntry, RequestFingerprint, StatusBucket};
pub use search::{filter_by_bucket, filter_by_method, filter_by_status, search_history};
pub use ui::{entry_subtitle, entry_title, format_history_list, format_history_stats};
