//! Built-in sample requests for the "Examples" menu.
//!
//! Each sample is a ready-to-send [`RequestDraft`] against a public test API.

use crate::models::RequestDraft;
use serde_json::json;

/// Menu section a sample is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleSection {
    Get,
    Post,
}

impl SampleSection {
    pub fn title(&self) -> &'static str {
        match self {
            SampleSection::Get => "GET Examples",
            SampleSection::Post => "POST Examples",
        }
    }
}

/// A named sample request.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleRequest {
    /// Stable identifier, e.g. `"github_get"`.
    pub key: &'static str,

    /// Menu label.
    pub label: &'static str,

    pub section: SampleSection,
    pub draft: RequestDraft,
}

fn sample(
    key: &'static str,
    label: &'static str,
    section: SampleSection,
    draft: RequestDraft,
) -> SampleRequest {
    SampleRequest {
        key,
        label,
        section,
        draft,
    }
}

/// Pretty-printed JSON body for a sample.
fn pretty(value: serde_json::Value) -> String {
    serde_json::to_string_pretty(&value).unwrap_or_default()
}

/// All samples, in menu order.
pub fn sample_requests() -> Vec<SampleRequest> {
    use SampleSection::{Get, Post};

    vec![
        sample(
            "jsonplaceholder_get",
            "JSONPlaceholder Posts",
            Get,
            RequestDraft::new("GET", "https://jsonplaceholder.typicode.com/posts/1")
                .with_header("Content-Type", "application/json"),
        ),
        sample(
            "github_get",
            "GitHub User",
            Get,
            RequestDraft::new("GET", "https://api.github.com/users/fkkarakurt")
                .with_header("Accept", "application/vnd.github.v3+json"),
        ),
        sample(
            "randomuser_get",
            "Random User",
            Get,
            RequestDraft::new("GET", "https://randomuser.me/api/")
                .with_header("Content-Type", "application/json"),
        ),
        sample(
            "xml_example",
            "XML Example",
            Get,
            RequestDraft::new("GET", "https://httpbin.org/xml")
                .with_header("Accept", "application/xml"),
        ),
        sample(
            "html_example",
            "HTML Example",
            Get,
            RequestDraft::new("GET", "https://httpbin.org/html").with_header("Accept", "text/html"),
        ),
        sample(
            "jsonplaceholder_post",
            "JSONPlaceholder Create",
            Post,
            RequestDraft::new("POST", "https://jsonplaceholder.typicode.com/posts")
                .with_header("Content-Type", "application/json")
                .with_body(pretty(json!({
                    "title": "Rappit Test",
                    "body": "This is a test post from Rappit",
                    "userId": 1
                }))),
        ),
        sample(
            "httpbin_post",
            "HTTPBin POST",
            Post,
            RequestDraft::new("POST", "https://httpbin.org/post")
                .with_header("Content-Type", "application/json")
                .with_body(pretty(json!({
                    "name": "Rappit",
                    "type": "API Testing Tool",
                    "version": "1.0"
                }))),
        ),
    ]
}

/// Looks up a sample draft by key.
///
/// ```
/// use rappit::samples::find_sample;
///
/// let draft = find_sample("xml_example").unwrap();
/// assert_eq!(draft.url, "https://httpbin.org/xml");
/// assert!(find_sample("nope").is_none());
/// ```
pub fn find_sample(key: &str) -> Option<RequestDraft> {
    sample_requests()
        .into_iter()
        .find(|s| s.key == key)
        .map(|s| s.draft)
}
