//! Data models for request history.
//!
//! This module defines the core data structures stored by the
//! [`HistoryCache`](super::HistoryCache).

use crate::models::ResponseRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Identity of a history slot: the method and URL of a request.
///
/// Both parts are compared exactly. `get` and `GET` are different slots, and
/// so are URLs that differ only in their query string or case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestFingerprint {
    /// HTTP method as supplied.
    pub method: String,

    /// URL, verbatim.
    pub url: String,
}

impl RequestFingerprint {
    /// Creates a fingerprint from a method and URL.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }

    /// Renders the `METHOD_url` string form.
    ///
    /// # Examples
    ///
    /// ```
    /// use rappit::history::RequestFingerprint;
    ///
    /// let fingerprint = RequestFingerprint::new("GET", "https://api.example.com/users?page=2");
    /// assert_eq!(fingerprint.key(), "GET_https://api.example.com/users?page=2");
    /// ```
    pub fn key(&self) -> String {
        format!("{}_{}", self.method, self.url)
    }
}

impl fmt::Display for RequestFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.method, self.url)
    }
}

/// Coarse classification of a response for list glyphs and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusBucket {
    /// Status in [200, 300).
    Success,

    /// Status in [300, 400).
    Redirect,

    /// Everything else, including transport failures (status 0).
    Failure,
}

impl StatusBucket {
    /// Classifies a status code.
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            200..=299 => StatusBucket::Success,
            300..=399 => StatusBucket::Redirect,
            _ => StatusBucket::Failure,
        }
    }

    /// Emoji shown next to entries in this bucket.
    pub fn glyph(&self) -> &'static str {
        match self {
            StatusBucket::Success => "✅",
            StatusBucket::Redirect => "⚠️",
            StatusBucket::Failure => "❌",
        }
    }
}

/// A single entry in the request history.
///
/// The request body and headers are those of the first send for this
/// fingerprint; later sends replace only the response and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Method and URL; unique within a cache.
    pub fingerprint: RequestFingerprint,

    /// Raw, unformatted request body.
    pub request_body: String,

    /// Request headers as composed.
    pub request_headers: HashMap<String, String>,

    /// Latest response recorded for this fingerprint.
    pub response: ResponseRecord,

    /// When this entry was last inserted or updated.
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates a new history entry stamped with the current time.
    ///
    /// # Arguments
    ///
    /// * `fingerprint` - Method and URL of the request
    /// * `request_body` - Raw body that was sent
    /// * `request_headers` - Headers that were sent
    /// * `response` - The recorded outcome
    pub fn new(
        fingerprint: RequestFingerprint,
        request_body: impl Into<String>,
        request_headers: HashMap<String, String>,
        response: ResponseRecord,
    ) -> Self {
        Self {
            fingerprint,
            request_body: request_body.into(),
            request_headers,
            response,
            recorded_at: Utc::now(),
        }
    }

    /// HTTP method of the request.
    pub fn method(&self) -> &str {
        &self.fingerprint.method
    }

    /// URL of the request.
    pub fn url(&self) -> &str {
        &self.fingerprint.url
    }

    /// Status bucket of the latest response.
    pub fn status_bucket(&self) -> StatusBucket {
        StatusBucket::from_status(self.response.status_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HttpResponse;

    #[test]
    fn test_fingerprint_key_and_display() {
        let fingerprint = RequestFingerprint::new("POST", "http://x/y");
        assert_eq!(fingerprint.key(), "POST_http://x/y");
        assert_eq!(fingerprint.to_string(), fingerprint.key());
    }

    #[test]
    fn test_fingerprint_is_case_sensitive() {
        let upper = RequestFingerprint::new("GET", "http://x/A");
        assert_ne!(RequestFingerprint::new("get", "http://x/A"), upper);
        assert_ne!(RequestFingerprint::new("GET", "http://x/a"), upper);
    }

    #[test]
    fn test_fingerprint_parts_cannot_collide() {
        // Both render as "A_B_C" but are different slots.
        let left = RequestFingerprint::new("A_B", "C");
        let right = RequestFingerprint::new("A", "B_C");
        assert_eq!(left.key(), right.key());
        assert_ne!(left, right);
    }

    #[test]
    fn test_status_bucket_boundaries() {
        assert_eq!(StatusBucket::from_status(0), StatusBucket::Failure);
        assert_eq!(StatusBucket::from_status(199), StatusBucket::Failure);
        assert_eq!(StatusBucket::from_status(200), StatusBucket::Success);
        assert_eq!(StatusBucket::from_status(299), StatusBucket::Success);
        assert_eq!(StatusBucket::from_status(300), StatusBucket::Redirect);
        assert_eq!(StatusBucket::from_status(399), StatusBucket::Redirect);
        assert_eq!(StatusBucket::from_status(404), StatusBucket::Failure);
        assert_eq!(StatusBucket::Redirect.glyph(), "⚠️");
    }

    #[test]
    fn test_entry_bucket_for_failure() {
        let entry = HistoryEntry::new(
            RequestFingerprint::new("GET", "http://x"),
            "",
            HashMap::new(),
            ResponseRecord::failed("timed out"),
        );
        assert_eq!(entry.status_bucket(), StatusBucket::Failure);

        let ok = HistoryEntry {
            response: HttpResponse::new(201, "Created").into(),
            ..entry
        };
        assert_eq!(ok.status_bucket(), StatusBucket::Success);
        assert_eq!(ok.method(), "GET");
        assert_eq!(ok.url(), "http://x");
    }
}
