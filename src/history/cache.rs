//! Bounded most-recently-used request history.
//!
//! Entries are kept in a deque ordered by recency: the front is rank 0, the
//! most recently inserted or updated entry. Re-sending a request moves its
//! entry to the front; inserting a new fingerprint past capacity evicts the
//! entry at the back.

use super::models::{HistoryEntry, RequestFingerprint};
use crate::models::{RequestDraft, ResponseRecord};
use chrono::Utc;
use std::collections::{vec_deque, HashMap, VecDeque};

/// Default number of entries the cache retains.
pub const MAX_HISTORY_ITEMS: usize = 20;

/// What a call to [`HistoryCache::record`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryChange {
    /// A new fingerprint was added at rank 0, possibly evicting the oldest.
    Inserted {
        evicted: Option<RequestFingerprint>,
    },

    /// An existing entry got the new response and moved to rank 0.
    Updated,

    /// Nothing was recorded (empty URL).
    Ignored,
}

/// Ordered, bounded mapping from request fingerprint to the latest exchange.
#[derive(Debug, Clone)]
pub struct HistoryCache {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
    revision: u64,
}

impl Default for HistoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryCache {
    /// Creates an empty cache holding at most [`MAX_HISTORY_ITEMS`] entries.
    pub fn new() -> Self {
        Self::with_capacity(MAX_HISTORY_ITEMS)
    }

    /// Creates an empty cache with the given capacity (at least 1).
    ///
    /// The capacity is only a bound; storage grows with the entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            revision: 0,
        }
    }

    /// Records the outcome of a send.
    ///
    /// An existing entry for the same method and URL keeps its request body
    /// and headers; only its response and timestamp change before it moves to
    /// rank 0. A new entry is inserted at rank 0, evicting the entry at the
    /// highest rank if the cache is full. An empty URL records nothing.
    ///
    /// # Arguments
    ///
    /// * `method` - HTTP method, compared case-sensitively
    /// * `url` - Request URL, compared verbatim
    /// * `response` - Outcome of the send
    /// * `request_body` - Raw body that was sent
    /// * `request_headers` - Headers that were sent
    ///
    /// # Examples
    ///
    /// ```
    /// use rappit::history::{HistoryCache, HistoryChange};
    /// use rappit::models::{HttpResponse, ResponseRecord};
    /// use std::collections::HashMap;
    ///
    /// let mut cache = HistoryCache::new();
    /// let ok: ResponseRecord = HttpResponse::new(200, "OK").into();
    ///
    /// let change = cache.record("GET", "http://localhost/a", ok.clone(), "", &HashMap::new());
    /// assert_eq!(change, HistoryChange::Inserted { evicted: None });
    ///
    /// let change = cache.record("GET", "http://localhost/a", ok, "", &HashMap::new());
    /// assert_eq!(change, HistoryChange::Updated);
    /// assert_eq!(cache.len(), 1);
    /// ```
    pub fn record(
        &mut self,
        method: &str,
        url: &str,
        response: ResponseRecord,
        request_body: &str,
        request_headers: &HashMap<String, String>,
    ) -> HistoryChange {
        if url.is_empty() {
            return HistoryChange::Ignored;
        }

        let fingerprint = RequestFingerprint::new(method, url);
        self.revision += 1;

        if let Some(position) = self.position(&fingerprint) {
            if let Some(mut entry) = self.entries.remove(position) {
                entry.response = response;
                entry.recorded_at = Utc::now();
                self.entries.push_front(entry);
            }
            return HistoryChange::Updated;
        }

        self.entries.push_front(HistoryEntry::new(
            fingerprint,
            request_body,
            request_headers.clone(),
            response,
        ));

        let evicted = if self.entries.len() > self.capacity {
            self.entries.pop_back().map(|entry| entry.fingerprint)
        } else {
            None
        };
        if let Some(fingerprint) = &evicted {
            log::debug!("history full, evicted {}", fingerprint);
        }

        HistoryChange::Inserted { evicted }
    }

    /// Records a send described by a request draft.
    pub fn record_draft(
        &mut self,
        draft: &RequestDraft,
        response: ResponseRecord,
    ) -> HistoryChange {
        self.record(&draft.method, &draft.url, response, &draft.body, &draft.headers)
    }

    /// Looks up the entry for a fingerprint.
    pub fn lookup(&self, fingerprint: &RequestFingerprint) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.fingerprint == *fingerprint)
    }

    /// Removes the entry for a fingerprint. Removing an absent key is a no-op.
    pub fn remove(&mut self, fingerprint: &RequestFingerprint) -> Option<HistoryEntry> {
        let position = self.position(fingerprint)?;
        self.revision += 1;
        self.entries.remove(position)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.revision += 1;
        }
    }

    /// Iterates entries from rank 0 (most recent) to the oldest.
    ///
    /// The iterator is cheap to clone, so a consumer can restart it; the
    /// borrow keeps the cache from changing underneath it.
    pub fn ordered_view(&self) -> vec_deque::Iter<'_, HistoryEntry> {
        self.entries.iter()
    }

    /// Clones the current entries, most recent first.
    pub fn snapshot(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }

    /// Changes the capacity (at least 1), evicting the oldest entries that no
    /// longer fit.
    ///
    /// # Returns
    ///
    /// Fingerprints of the evicted entries, most recent first.
    pub fn set_capacity(&mut self, capacity: usize) -> Vec<RequestFingerprint> {
        self.capacity = capacity.max(1);
        if self.entries.len() <= self.capacity {
            return Vec::new();
        }

        self.revision += 1;
        self.entries
            .drain(self.capacity..)
            .map(|entry| entry.fingerprint)
            .collect()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Counter bumped by every mutation.
    ///
    /// A presentation layer can compare revisions to decide whether to
    /// re-render the list.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn position(&self, fingerprint: &RequestFingerprint) -> Option<usize> {
        self.entries.iter().position(|entry| entry.fingerprint == *fingerprint)
    }
}
