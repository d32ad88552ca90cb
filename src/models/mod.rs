//! Data models for request drafts and response records.
//!
//! These types are shared by the formatter, the history cache and the
//! session layer.

pub mod request;
pub mod response;

pub use request::{
    collect_headers, find_header, validate_url, RequestDraft, DEFAULT_CONTENT_TYPE,
    STANDARD_METHODS,
};
pub use response::{HttpResponse, ResponseRecord};
