//! HTTP request drafts.
//!
//! A [`RequestDraft`] is what the user has composed in the request editor:
//! method, URL, header rows and a raw body. The method is kept exactly as
//! supplied because it participates, case-sensitively, in the history
//! fingerprint.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Methods the request editor offers, in display order.
pub const STANDARD_METHODS: &[&str] = &["GET", "POST", "PUT", "DELETE", "PATCH", "HEAD", "OPTIONS"];

/// Methods for which a missing Content-Type is filled in when a body is present.
const BODY_METHODS: &[&str] = &["POST", "PUT", "PATCH"];

/// Content type assumed for bodies when nothing else is declared.
pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// A request as composed by the user, before it is handed to a transport.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestDraft {
    /// HTTP method as typed or selected (e.g. "GET").
    pub method: String,

    /// Target URL, used verbatim.
    pub url: String,

    /// Request headers.
    pub headers: HashMap<String, String>,

    /// Raw request body; may be empty.
    pub body: String,
}

impl RequestDraft {
    /// Creates a draft with no headers and an empty body.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: String::new(),
        }
    }

    /// Builder-style header insertion.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Builder-style body assignment.
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Checks the URL has both a scheme and a host.
    ///
    /// # Examples
    ///
    /// ```
    /// use rappit::models::RequestDraft;
    ///
    /// assert!(RequestDraft::new("GET", "https://api.example.com/users").validate_url());
    /// assert!(!RequestDraft::new("GET", "api.example.com/users").validate_url());
    /// ```
    pub fn validate_url(&self) -> bool {
        validate_url(&self.url)
    }

    /// Looks up a header value, matching the name case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Content type of the body: the Content-Type header, or `default`.
    ///
    /// This is the hint used when formatting or minifying the request body.
    pub fn body_content_type<'a>(&'a self, default: &'a str) -> &'a str {
        self.header("content-type").unwrap_or(default)
    }

    /// Headers to put on the wire.
    ///
    /// For POST, PUT and PATCH with a non-blank body, a missing Content-Type
    /// is filled in with `default_content_type`.
    pub fn effective_headers(&self, default_content_type: &str) -> HashMap<String, String> {
        let mut headers = self.headers.clone();
        let sends_body = BODY_METHODS
            .iter()
            .any(|m| m.eq_ignore_ascii_case(&self.method));

        if sends_body && !self.body.trim().is_empty() && self.header("content-type").is_none() {
            headers.insert("Content-Type".to_string(), default_content_type.to_string());
        }

        headers
    }
}

/// Checks a URL string has both a scheme and a host.
pub fn validate_url(url: &str) -> bool {
    match Url::parse(url) {
        Ok(parsed) => {
            !parsed.scheme().is_empty() && parsed.host_str().map_or(false, |h| !h.is_empty())
        }
        Err(_) => false,
    }
}

/// Looks up a header value, matching the name case-insensitively.
pub fn find_header<'a>(headers: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Builds a header map from editor rows.
///
/// Keys and values are trimmed; rows where either is empty are skipped. Later
/// rows win over earlier ones with the same key.
pub fn collect_headers<I, K, V>(rows: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut headers = HashMap::new();
    for (key, value) in rows {
        let key = key.as_ref().trim();
        let value = value.as_ref().trim();
        if !key.is_empty() && !value.is_empty() {
            headers.insert(key.to_string(), value.to_string());
        }
    }
    headers
}
