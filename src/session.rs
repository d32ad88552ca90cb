//! Request/response round trips.
//!
//! A [`Workbench`] holds the state behind one editor window: configuration,
//! history, and the content type of the last response. A send goes through
//! three steps:
//!
//! 1. [`Workbench::dispatch`] validates the draft and runs the [`Transport`]
//!    on a worker thread, returning a [`PendingResponse`].
//! 2. The caller polls ([`PendingResponse::try_take`]) or blocks
//!    ([`PendingResponse::wait`]) for the record.
//! 3. [`Workbench::complete`] formats the record for display and records the
//!    exchange into history, on the caller's thread.
//!
//! The network client itself is a collaborator behind [`Transport`].

use crate::config::{get_config, AppConfig};
use crate::formatter::{detect_language, format_content, minify_content, Language};
use crate::history::{HistoryCache, HistoryEntry, RequestFingerprint, StatusBucket};
use crate::history::ui::format_millis;
use crate::models::{RequestDraft, ResponseRecord};
use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use thiserror::Error;

/// Errors that stop a request before it reaches the transport, or lose its
/// result afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// The URL field is empty.
    #[error("Please enter a URL")]
    EmptyUrl,

    /// The URL lacks a scheme or host.
    #[error("Please enter a valid URL: {0}")]
    InvalidUrl(String),

    /// The worker thread ended without delivering a record.
    #[error("request worker exited without a response")]
    WorkerLost,
}

/// A validated request, ready for the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: String,
    pub url: String,

    /// Draft headers plus any filled-in Content-Type.
    pub headers: HashMap<String, String>,

    /// Body to send; `None` when the draft body is blank.
    pub body: Option<String>,

    pub timeout: Duration,
    pub validate_ssl: bool,
}

/// Sends prepared requests.
///
/// Implementations report connection errors and timeouts as
/// [`ResponseRecord::Failed`]; they must not panic.
pub trait Transport: Send + Sync {
    fn send(&self, request: &PreparedRequest) -> ResponseRecord;
}

impl<F> Transport for F
where
    F: Fn(&PreparedRequest) -> ResponseRecord + Send + Sync,
{
    fn send(&self, request: &PreparedRequest) -> ResponseRecord {
        self(request)
    }
}

/// Handle to a request running on a worker thread.
#[derive(Debug)]
pub struct PendingResponse {
    draft: RequestDraft,
    receiver: Receiver<ResponseRecord>,
}

impl PendingResponse {
    /// The draft as it was when the request was dispatched.
    pub fn draft(&self) -> &RequestDraft {
        &self.draft
    }

    /// Blocks until the transport returns.
    pub fn wait(&self) -> Result<ResponseRecord, SessionError> {
        self.receiver.recv().map_err(|_| SessionError::WorkerLost)
    }

    /// Returns the record if the transport has finished, without blocking.
    pub fn try_take(&self) -> Result<Option<ResponseRecord>, SessionError> {
        match self.receiver.try_recv() {
            Ok(record) => Ok(Some(record)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(SessionError::WorkerLost),
        }
    }

    pub fn into_draft(self) -> RequestDraft {
        self.draft
    }
}

/// A response rendered for the response pane and status bar.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayedResponse {
    /// Body text to show: formatted, raw, or the transport error as reported.
    pub body: String,

    /// Highlighting language for `body`.
    pub language: Language,

    /// E.g. `"✅ 200 OK"` or `"❌ Request Failed"`.
    pub status_line: String,

    /// E.g. `"⏱️ 12.5ms"`; `None` for failures.
    pub time_label: Option<String>,

    /// E.g. `"📦 512 bytes"`; `None` for failures.
    pub size_label: Option<String>,
}

impl DisplayedResponse {
    fn render(record: &ResponseRecord, auto_format: bool) -> Self {
        let response = match record {
            ResponseRecord::Completed(response) => response,
            ResponseRecord::Failed { error } => {
                return Self {
                    body: error.clone(),
                    language: Language::PlainText,
                    status_line: format!("{} Request Failed", StatusBucket::Failure.glyph()),
                    time_label: None,
                    size_label: None,
                }
            }
        };

        let content_type = response.content_type();
        let body = if auto_format {
            format_content(&response.body, content_type)
        } else {
            response.body.clone()
        };

        let status_line = format!(
            "{} {} {}",
            StatusBucket::from_status(response.status_code).glyph(),
            response.status_code,
            response.reason_phrase
        );

        Self {
            body,
            language: detect_language(&response.body, content_type),
            status_line: status_line.trim_end().to_string(),
            time_label: Some(format!("⏱️ {}ms", format_millis(response.response_time_ms))),
            size_label: Some(format!("📦 {} bytes", response.size_bytes)),
        }
    }
}

/// A history entry reloaded into the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredEntry {
    /// Request fields to put back into the editor.
    pub draft: RequestDraft,

    /// The stored response, rendered.
    pub response: DisplayedResponse,

    pub entry: HistoryEntry,
}

/// State behind one editor window.
#[derive(Debug)]
pub struct Workbench {
    config: AppConfig,
    history: HistoryCache,
    last_content_type: Option<String>,
}

impl Default for Workbench {
    fn default() -> Self {
        Self::new(get_config())
    }
}

impl Workbench {
    /// Creates a workbench with a history sized by `config.history_limit`.
    pub fn new(config: AppConfig) -> Self {
        Self {
            history: HistoryCache::with_capacity(config.history_limit),
            config,
            last_content_type: None,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Replaces the configuration, resizing history if the limit changed.
    ///
    /// # Returns
    ///
    /// Fingerprints of entries evicted by a smaller limit.
    pub fn set_config(&mut self, config: AppConfig) -> Vec<RequestFingerprint> {
        let evicted = self.history.set_capacity(config.history_limit);
        self.config = config;
        evicted
    }

    pub fn history(&self) -> &HistoryCache {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryCache {
        &mut self.history
    }

    /// Content-Type of the last completed response, used as the formatting
    /// hint for the response pane.
    pub fn last_content_type(&self) -> Option<&str> {
        self.last_content_type.as_deref()
    }

    /// A blank draft carrying the configured default headers.
    pub fn new_draft(&self) -> RequestDraft {
        RequestDraft {
            method: "GET".to_string(),
            headers: self.config.default_headers.clone(),
            ..RequestDraft::default()
        }
    }

    /// Validates a draft and builds the request handed to the transport.
    ///
    /// # Errors
    ///
    /// [`SessionError::EmptyUrl`] for a blank URL and
    /// [`SessionError::InvalidUrl`] for one without scheme or host.
    pub fn prepare(&self, draft: &RequestDraft) -> Result<PreparedRequest, SessionError> {
        let url = draft.url.trim();
        if url.is_empty() {
            return Err(SessionError::EmptyUrl);
        }
        if !draft.validate_url() {
            return Err(SessionError::InvalidUrl(url.to_string()));
        }

        let body = if draft.body.trim().is_empty() {
            None
        } else {
            Some(draft.body.clone())
        };

        Ok(PreparedRequest {
            method: draft.method.clone(),
            url: draft.url.clone(),
            headers: draft.effective_headers(&self.config.default_content_type),
            body,
            timeout: self.config.timeout_duration(),
            validate_ssl: self.config.validate_ssl,
        })
    }

    /// Starts a send on a worker thread.
    ///
    /// The draft is captured as it is now; [`Workbench::complete`] should be
    /// called with [`PendingResponse::draft`] once the record arrives.
    pub fn dispatch<T>(
        &self,
        transport: Arc<T>,
        draft: &RequestDraft,
    ) -> Result<PendingResponse, SessionError>
    where
        T: Transport + ?Sized + 'static,
    {
        let request = self.prepare(draft)?;
        let (sender, receiver) = mpsc::channel();

        log::debug!("dispatching {} {}", request.method, request.url);
        thread::spawn(move || {
            let record = transport.send(&request);
            // The receiver may be gone if the caller gave up waiting.
            let _ = sender.send(record);
        });

        Ok(PendingResponse {
            draft: draft.clone(),
            receiver,
        })
    }

    /// Renders a finished send and records it into history.
    ///
    /// A completed response also becomes the formatting hint for later
    /// format/minify of the response pane; a failure leaves the hint as is.
    pub fn complete(&mut self, draft: &RequestDraft, record: ResponseRecord) -> DisplayedResponse {
        if let Some(response) = record.response() {
            self.last_content_type = response.content_type().map(str::to_string);
        }

        let displayed = DisplayedResponse::render(&record, self.config.auto_format_response);

        if self.config.save_history {
            let change = self.history.record_draft(draft, record);
            log::debug!("history {:?} for {} {}", change, draft.method, draft.url);
        }

        displayed
    }

    /// Dispatches, waits and completes in one call.
    pub fn send_and_wait<T>(
        &mut self,
        transport: Arc<T>,
        draft: &RequestDraft,
    ) -> Result<DisplayedResponse, SessionError>
    where
        T: Transport + ?Sized + 'static,
    {
        let pending = self.dispatch(transport, draft)?;
        let record = pending.wait()?;
        Ok(self.complete(pending.draft(), record))
    }

    /// Pretty-prints the draft body, hinted by its Content-Type.
    ///
    /// A blank body is returned unchanged.
    pub fn format_request_body(&self, draft: &RequestDraft) -> String {
        if draft.body.trim().is_empty() {
            return draft.body.clone();
        }
        let hint = draft.body_content_type(&self.config.default_content_type);
        format_content(&draft.body, Some(hint))
    }

    /// Minifies the draft body, hinted by its Content-Type.
    pub fn minify_request_body(&self, draft: &RequestDraft) -> String {
        if draft.body.trim().is_empty() {
            return draft.body.clone();
        }
        let hint = draft.body_content_type(&self.config.default_content_type);
        minify_content(&draft.body, Some(hint))
    }

    /// Pretty-prints response pane text, hinted by the last response's type.
    pub fn format_response_body(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        format_content(text, self.last_content_type())
    }

    /// Minifies response pane text, hinted by the last response's type.
    pub fn minify_response_body(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return text.to_string();
        }
        minify_content(text, self.last_content_type())
    }

    /// Reloads a history entry: its request as a draft, its response rendered.
    pub fn restore(&self, fingerprint: &RequestFingerprint) -> Option<RestoredEntry> {
        let entry = self.history.lookup(fingerprint)?;

        let draft = RequestDraft {
            method: entry.method().to_string(),
            url: entry.url().to_string(),
            headers: entry.request_headers.clone(),
            body: entry.request_body.clone(),
        };

        Some(RestoredEntry {
            draft,
            response: DisplayedResponse::render(&entry.response, true),
            entry: entry.clone(),
        })
    }
}
