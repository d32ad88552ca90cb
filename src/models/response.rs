//! HTTP response records.
//!
//! The transport collaborator hands the core one [`ResponseRecord`] per send:
//! either a completed [`HttpResponse`] or a failure description. Records are
//! deserialized leniently so that a collaborator producing partial data still
//! yields a usable record with neutral defaults.

use super::request::find_header;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A completed HTTP response as reported by the transport.
///
/// Every field carries a serde default: a record missing `status_code` or
/// `response_time_ms` reads as status 0 and time 0 instead of failing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpResponse {
    /// HTTP status code (e.g. 200, 404). Zero when unknown.
    pub status_code: u16,

    /// Status reason phrase (e.g. "OK", "Not Found").
    #[serde(alias = "reason")]
    pub reason_phrase: String,

    /// Response headers as key-value pairs.
    pub headers: HashMap<String, String>,

    /// Decoded response body.
    pub body: String,

    /// Wall-clock time of the exchange in milliseconds.
    #[serde(alias = "response_time")]
    pub response_time_ms: f64,

    /// Size of the raw response content in bytes.
    #[serde(alias = "size")]
    pub size_bytes: usize,

    /// Final URL after redirects.
    #[serde(alias = "url")]
    pub final_url: String,
}

impl HttpResponse {
    /// Creates a response with the given status and reason, all other fields empty.
    pub fn new(status_code: u16, reason_phrase: impl Into<String>) -> Self {
        Self {
            status_code,
            reason_phrase: reason_phrase.into(),
            ..Default::default()
        }
    }

    /// Checks if the response status indicates success (2xx).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Checks if the response status indicates a redirection (3xx).
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Checks if the response status indicates a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Checks if the response status indicates a server error (5xx).
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Gets the Content-Type header value, matching the name case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        find_header(&self.headers, "content-type")
    }

    /// Adds a header to the response.
    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.insert(name.into(), value.into());
    }

    /// Sets the body and updates `size_bytes` to its UTF-8 length.
    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
        self.size_bytes = self.body.len();
    }
}

/// Outcome of a single send as delivered by the transport.
///
/// Connection errors and timeouts are data, not faults: they arrive as
/// [`ResponseRecord::Failed`] and are recorded into history like any other
/// exchange.
///
/// Serialized untagged. On input, an object with a string `error` field is a
/// failure; anything else must read as an [`HttpResponse`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseRecord {
    /// The request could not be completed.
    Failed {
        /// Human-readable transport error.
        error: String,
    },

    /// The server answered.
    Completed(HttpResponse),
}

impl ResponseRecord {
    /// Creates a failure record.
    pub fn failed(error: impl Into<String>) -> Self {
        ResponseRecord::Failed {
            error: error.into(),
        }
    }

    /// Returns the completed response, if any.
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            ResponseRecord::Completed(response) => Some(response),
            ResponseRecord::Failed { .. } => None,
        }
    }

    /// Returns the transport error, if this record is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            ResponseRecord::Failed { error } => Some(error),
            ResponseRecord::Completed(_) => None,
        }
    }

    /// Whether this record describes a transport failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, ResponseRecord::Failed { .. })
    }

    /// Status code; failures report the synthetic status 0.
    pub fn status_code(&self) -> u16 {
        self.response().map_or(0, |r| r.status_code)
    }

    /// Reason phrase; empty for failures.
    pub fn reason_phrase(&self) -> &str {
        self.response().map_or("", |r| r.reason_phrase.as_str())
    }

    /// Elapsed time in milliseconds; failures report 0.
    pub fn elapsed_ms(&self) -> f64 {
        self.response().map_or(0.0, |r| r.response_time_ms)
    }

    /// Response size in bytes; failures report 0.
    pub fn size_bytes(&self) -> usize {
        self.response().map_or(0, |r| r.size_bytes)
    }

    /// Body text to display. Failures render as `Request Error: <error>`.
    pub fn body(&self) -> String {
        match self {
            ResponseRecord::Completed(response) => response.body.clone(),
            ResponseRecord::Failed { error } => format!("Request Error: {}", error),
        }
    }

    /// Declared Content-Type of a completed response.
    pub fn content_type(&self) -> Option<&str> {
        self.response().and_then(HttpResponse::content_type)
    }
}

impl<'de> Deserialize<'de> for ResponseRecord {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Untagged buffering cannot hold arbitrary-precision numbers.
        let value = Value::deserialize(deserializer)?;
        if let Some(error) = value.get("error").and_then(Value::as_str) {
            return Ok(ResponseRecord::failed(error));
        }

        serde_json::from_value(value)
            .map(ResponseRecord::Completed)
            .map_err(D::Error::custom)
    }
}

impl From<HttpResponse> for ResponseRecord {
    fn from(response: HttpResponse) -> Self {
        ResponseRecord::Completed(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_ranges() {
        assert!(HttpResponse::new(204, "No Content").is_success());
        assert!(HttpResponse::new(301, "Moved").is_redirect());
        assert!(HttpResponse::new(404, "Not Found").is_client_error());
        assert!(HttpResponse::new(503, "Unavailable").is_server_error());
        assert!(!HttpResponse::new(0, "").is_success());
    }

    #[test]
    fn test_content_type_case_insensitive() {
        let mut response = HttpResponse::new(200, "OK");
        response.add_header("content-TYPE", "application/xml");
        assert_eq!(response.content_type(), Some("application/xml"));
    }

    #[test]
    fn test_set_body_updates_size() {
        let mut response = HttpResponse::new(200, "OK");
        response.set_body("héllo");
        assert_eq!(response.size_bytes, 6);
    }

    #[test]
    fn test_failed_record_accessors() {
        let record = ResponseRecord::failed("connection refused");
        assert!(record.is_failure());
        assert_eq!(record.status_code(), 0);
        assert_eq!(record.elapsed_ms(), 0.0);
        assert_eq!(record.size_bytes(), 0);
        assert_eq!(record.body(), "Request Error: connection refused");
        assert_eq!(record.content_type(), None);
    }

    #[test]
    fn test_deserialize_partial_record_uses_defaults() {
        let record: ResponseRecord = serde_json::from_value(json!({
            "body": "hello"
        }))
        .unwrap();

        assert_eq!(record.status_code(), 0);
        assert_eq!(record.elapsed_ms(), 0.0);
        assert_eq!(record.body(), "hello");
    }

    #[test]
    fn test_deserialize_original_field_names() {
        let record: ResponseRecord = serde_json::from_value(json!({
            "status_code": 201,
            "headers": {"Content-Type": "application/json"},
            "body": "{}",
            "response_time": 12.5,
            "size": 2,
            "url": "https://example.com/final",
            "reason": "Created"
        }))
        .unwrap();

        let response = record.response().unwrap();
        assert_eq!(response.status_code, 201);
        assert_eq!(response.reason_phrase, "Created");
        assert_eq!(response.response_time_ms, 12.5);
        assert_eq!(response.size_bytes, 2);
        assert_eq!(response.final_url, "https://example.com/final");
    }

    #[test]
    fn test_deserialize_record_from_text() {
        let text = concat!(
            r#"{"status_code": 200, "reason": "OK", "body": "[]", "#,
            r#""response_time": 87.25, "size": 2}"#
        );
        let record: ResponseRecord = serde_json::from_str(text).unwrap();
        assert_eq!(record.status_code(), 200);
        assert_eq!(record.elapsed_ms(), 87.25);
        assert_eq!(record.size_bytes(), 2);

        let failed: ResponseRecord =
            serde_json::from_str(r#"{"error": "timed out", "status_code": 0, "response_time": 0}"#)
                .unwrap();
        assert_eq!(failed, ResponseRecord::failed("timed out"));
    }

    #[test]
    fn test_record_round_trips_through_json_text() {
        let mut response = HttpResponse::new(201, "Created");
        response.set_body("{}");
        response.response_time_ms = 12.5;
        let record = ResponseRecord::from(response);

        let text = serde_json::to_string(&record).unwrap();
        let back: ResponseRecord = serde_json::from_str(&text).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_deserialize_error_record() {
        let record: ResponseRecord = serde_json::from_value(json!({
            "error": "timed out",
            "status_code": 0,
            "response_time": 0
        }))
        .unwrap();

        assert_eq!(record.error(), Some("timed out"));
    }
}
