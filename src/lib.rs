//! Rappit core
//!
//! The non-GUI heart of the Rappit API testing client: everything that turns
//! raw request and response data into what the window shows, without touching
//! a widget.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **models**: Request drafts and response records
//! - **formatter**: Content kind detection, pretty-printing and minification
//!   for JSON, XML and HTML
//! - **history**: Bounded most-recently-used history keyed by method + URL
//! - **text_search**: Find-in-response with circular match navigation
//! - **session**: The send flow, from draft validation through a pluggable
//!   transport to display and history
//! - **samples**: Built-in example requests
//! - **config**: Settings loading and validation
//!
//! # Display flow
//!
//! 1. The editor composes a [`RequestDraft`](models::RequestDraft)
//! 2. [`Workbench::dispatch`](session::Workbench::dispatch) validates it and
//!    runs the transport on a worker thread
//! 3. The resulting [`ResponseRecord`](models::ResponseRecord) is formatted by
//!    content type for the response pane
//! 4. The exchange is recorded into [`HistoryCache`](history::HistoryCache),
//!    whose ordered view feeds the history list
//!
//! # Example
//!
//! ```
//! use rappit::formatter::format_content;
//!
//! let body = r#"{"name":"Rappit","tags":["api","client",]}"#;
//! let formatted = format_content(body, Some("application/json"));
//! assert_eq!(
//!     formatted,
//!     "{\n  \"name\": \"Rappit\",\n  \"tags\": [\n    \"api\",\n    \"client\"\n  ]\n}"
//! );
//! ```

pub mod config;
pub mod formatter;
pub mod history;
pub mod models;
pub mod samples;
pub mod session;
pub mod text_search;

pub use formatter::{format_content, minify_content, ContentKind, FormatError};
pub use history::{HistoryCache, HistoryEntry, RequestFingerprint};
pub use models::{HttpResponse, RequestDraft, ResponseRecord};
pub use session::{PreparedRequest, SessionError, Transport, Workbench};
