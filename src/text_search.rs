//! Find-in-response.
//!
//! [`TextSearch`] finds every case-insensitive occurrence of a needle in a
//! displayed body and keeps a cursor that cycles through them.

use regex::RegexBuilder;
use std::ops::Range;

/// Matches of one needle in one haystack, with a circular cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextSearch {
    matches: Vec<Range<usize>>,
    current: Option<usize>,
}

impl TextSearch {
    /// Finds all non-overlapping, case-insensitive occurrences of `needle`.
    ///
    /// The needle is trimmed first; an empty needle matches nothing. Ranges
    /// are byte offsets into `haystack`. The cursor starts on the first match.
    ///
    /// # Examples
    ///
    /// ```
    /// use rappit::text_search::TextSearch;
    ///
    /// let mut search = TextSearch::new("Error: error at ERROR", "error");
    /// assert_eq!(search.len(), 3);
    /// assert_eq!(search.label().as_deref(), Some("1/3"));
    ///
    /// search.previous_match();
    /// assert_eq!(search.label().as_deref(), Some("3/3"));
    /// ```
    pub fn new(haystack: &str, needle: &str) -> Self {
        let needle = needle.trim();
        if needle.is_empty() {
            return Self::default();
        }

        let matches: Vec<Range<usize>> = match RegexBuilder::new(&regex::escape(needle))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern.find_iter(haystack).map(|m| m.range()).collect(),
            Err(e) => {
                log::debug!("search pattern rejected: {}", e);
                Vec::new()
            }
        };

        let current = if matches.is_empty() { None } else { Some(0) };
        Self { matches, current }
    }

    /// All match ranges, in document order.
    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// The match under the cursor.
    pub fn current(&self) -> Option<Range<usize>> {
        self.current.map(|i| self.matches[i].clone())
    }

    /// Moves to the next match, wrapping from the last to the first.
    pub fn next_match(&mut self) -> Option<Range<usize>> {
        let count = self.matches.len();
        self.current = self.current.map(|i| (i + 1) % count);
        self.current()
    }

    /// Moves to the previous match, wrapping from the first to the last.
    pub fn previous_match(&mut self) -> Option<Range<usize>> {
        let count = self.matches.len();
        self.current = self.current.map(|i| (i + count - 1) % count);
        self.current()
    }

    /// Position label such as `"2/5"`, or `None` without matches.
    pub fn label(&self) -> Option<String> {
        self.current
            .map(|i| format!("{}/{}", i + 1, self.matches.len()))
    }
}
