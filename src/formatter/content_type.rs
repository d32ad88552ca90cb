//! Content kind detection.
//!
//! Classifies text as JSON, XML, HTML or plain text, either from a MIME-like
//! type hint or by sniffing the text itself.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Root-element prefixes that mark a document as XML without further checks
/// on the first tag.
const XML_PREFIXES: &[&str] = &["<?xml", "<soap:", "<rss", "<feed"];

/// Lowercase markers, any one of which classifies text as HTML.
const HTML_MARKERS: &[&str] = &[
    "<!doctype html",
    "<html",
    "<head",
    "<body",
    "<div",
    "<p>",
    "<span",
    "<h1",
    "<h2",
    "<table",
    "<style",
    "<script",
];

static LEADING_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<[a-zA-Z][a-zA-Z0-9]*[\s>/]").expect("Failed to compile leading tag regex")
});

static OPEN_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([a-zA-Z][a-zA-Z0-9]*)(?:\s|>|/)").expect("Failed to compile open tag regex")
});

static CLOSE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"</([a-zA-Z][a-zA-Z0-9]*)>").expect("Failed to compile close tag regex")
});

/// Content kind classification used to pick a formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentKind {
    /// JSON document or JSON-like text.
    Json,
    /// XML document.
    Xml,
    /// HTML document or fragment.
    Html,
    /// Anything else; formatting is a no-op.
    PlainText,
}

impl ContentKind {
    /// Returns a human-readable name for the kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Json => "JSON",
            ContentKind::Xml => "XML",
            ContentKind::Html => "HTML",
            ContentKind::PlainText => "Plain Text",
        }
    }
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Maps a MIME-like type hint to a kind by case-insensitive substring match.
///
/// `json` is checked before `xml`, which is checked before `html`, so
/// `application/xhtml+xml` maps to XML.
///
/// # Examples
///
/// ```
/// use rappit::formatter::content_type::{kind_from_hint, ContentKind};
///
/// assert_eq!(kind_from_hint(Some("application/json; charset=utf-8")), Some(ContentKind::Json));
/// assert_eq!(kind_from_hint(Some("TEXT/HTML")), Some(ContentKind::Html));
/// assert_eq!(kind_from_hint(Some("text/plain")), None);
/// assert_eq!(kind_from_hint(None), None);
/// ```
pub fn kind_from_hint(type_hint: Option<&str>) -> Option<ContentKind> {
    let hint = type_hint?.to_lowercase();

    if hint.contains("json") {
        Some(ContentKind::Json)
    } else if hint.contains("xml") {
        Some(ContentKind::Xml)
    } else if hint.contains("html") {
        Some(ContentKind::Html)
    } else {
        None
    }
}

/// Classifies text by structure alone: JSON, then XML, then HTML, else plain.
pub fn sniff_kind(content: &str) -> ContentKind {
    if looks_like_json(content) {
        ContentKind::Json
    } else if looks_like_xml(content) {
        ContentKind::Xml
    } else if looks_like_html(content) {
        ContentKind::Html
    } else {
        ContentKind::PlainText
    }
}

/// Detects the kind of `content`, consulting `type_hint` first.
///
/// A hinted kind is accepted only if its formatter succeeds on the content;
/// otherwise detection falls through to [`sniff_kind`]. Empty or
/// whitespace-only content is always plain text.
///
/// # Examples
///
/// ```
/// use rappit::formatter::content_type::{detect_kind, ContentKind};
///
/// assert_eq!(detect_kind(r#"{"ok": true}"#, None), ContentKind::Json);
/// assert_eq!(detect_kind("<a><b>x</b></a>", None), ContentKind::Xml);
/// assert_eq!(detect_kind("not json or xml", None), ContentKind::PlainText);
/// assert_eq!(detect_kind("   ", Some("application/json")), ContentKind::PlainText);
/// ```
pub fn detect_kind(content: &str, type_hint: Option<&str>) -> ContentKind {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return ContentKind::PlainText;
    }

    if let Some(kind) = kind_from_hint(type_hint) {
        if super::try_format(trimmed, kind).is_ok() {
            return kind;
        }
        log::debug!("hinted {} did not format, sniffing content instead", kind);
    }

    sniff_kind(trimmed)
}

/// JSON check: bracketed by `{}` or `[]` and either parses, or at least
/// contains a quote plus a colon or bracket.
///
/// The second branch is a loose heuristic: broken JSON still classifies as
/// JSON so that formatting reports the parse error to the user.
pub fn looks_like_json(content: &str) -> bool {
    let content = content.trim();
    if content.is_empty() {
        return false;
    }

    let bracketed = (content.starts_with('{') && content.ends_with('}'))
        || (content.starts_with('[') && content.ends_with(']'));
    if !bracketed {
        return false;
    }

    if serde_json::from_str::<serde_json::Value>(content).is_ok() {
        return true;
    }

    content.contains('"') && content.contains([':', '[', '{'])
}

/// XML check: a known root prefix or a leading alphabetic tag, confirmed by
/// at least one open or close tag anywhere in the text.
pub fn looks_like_xml(content: &str) -> bool {
    let content = content.trim();
    if content.is_empty() {
        return false;
    }

    let starts_like_xml = XML_PREFIXES.iter().any(|p| content.starts_with(p))
        || LEADING_TAG_REGEX.is_match(content);
    if !starts_like_xml {
        return false;
    }

    OPEN_TAG_REGEX.is_match(content) || CLOSE_TAG_REGEX.is_match(content)
}

/// HTML check: any well-known HTML marker, case-insensitively.
pub fn looks_like_html(content: &str) -> bool {
    let lower = content.trim().to_lowercase();
    if lower.is_empty() {
        return false;
    }

    HTML_MARKERS.iter().any(|marker| lower.contains(marker))
}
