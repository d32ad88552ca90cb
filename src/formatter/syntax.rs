//! Highlighting language selection for displayed bodies.
//!
//! The highlighter itself lives in the presentation layer; this module only
//! decides which language definition it should load.

/// Language types supported for syntax highlighting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Language {
    /// JSON syntax
    Json,
    /// XML syntax
    Xml,
    /// HTML syntax
    Html,
    /// Plain text (no highlighting)
    PlainText,
}

impl Language {
    /// Returns the id the highlighter knows this language by.
    pub fn id(&self) -> &'static str {
        match self {
            Language::Json => "json",
            Language::Xml => "xml",
            Language::Html => "html",
            Language::PlainText => "text",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Picks the highlighting language for a body.
///
/// A content type naming json, xml or html wins outright. Otherwise text
/// that opens with `{` or `[` and parses is JSON, and text that opens with
/// `<` is HTML when it contains an `<html` tag, XML when it does not.
///
/// # Examples
///
/// ```
/// use rappit::formatter::syntax::{detect_language, Language};
///
/// assert_eq!(detect_language("{\"a\": 1}", None), Language::Json);
/// assert_eq!(detect_language("<html><body/></html>", None), Language::Html);
/// assert_eq!(detect_language("anything", Some("application/xml")), Language::Xml);
/// assert_eq!(detect_language("", Some("application/json")), Language::PlainText);
/// ```
pub fn detect_language(content: &str, content_type: Option<&str>) -> Language {
    if content.is_empty() {
        return Language::PlainText;
    }

    if let Some(hint) = content_type.map(str::to_lowercase) {
        if hint.contains("json") {
            return Language::Json;
        } else if hint.contains("xml") {
            return Language::Xml;
        } else if hint.contains("html") {
            return Language::Html;
        }
    }

    let trimmed = content.trim();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        if serde_json::from_str::<serde_json::Value>(trimmed).is_ok() {
            return Language::Json;
        }
    } else if trimmed.starts_with('<') {
        return if trimmed.to_lowercase().contains("<html") {
            Language::Html
        } else {
            Language::Xml
        };
    }

    Language::PlainText
}
