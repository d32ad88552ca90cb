//! Content formatter.
//!
//! This module detects whether a body is JSON, XML, HTML or plain text and
//! renders it pretty-printed or minified for display. Everything here is
//! pure and synchronous.
//!
//! The display functions ([`format_content`], [`format_as`]) never fail:
//! a body that cannot be formatted comes back prefixed with an error marker
//! line (see [`ErrorMarker`]). [`try_format`] exposes the same pipeline with
//! a typed error instead.

pub mod content_type;
pub mod html;
pub mod json;
pub mod markup;
pub mod syntax;
pub mod xml;

pub use content_type::{detect_kind, kind_from_hint, sniff_kind, ContentKind};
pub use syntax::{detect_language, Language};

use content_type::{looks_like_html, looks_like_json, looks_like_xml};
use thiserror::Error;

/// Errors that can occur while formatting a body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// JSON parsing or serialization error.
    #[error("JSON formatting error: {0}")]
    Json(String),

    /// XML parse error from the document parser.
    #[error("XML formatting error: {0}")]
    Xml(String),

    /// HTML indentation error.
    #[error("HTML formatting error: {0}")]
    Html(String),

    /// The line-based indenter hit an unterminated tag.
    #[error("Markup indentation error: {0}")]
    Markup(String),
}

impl FormatError {
    /// The underlying message, without the variant prefix.
    pub fn message(&self) -> &str {
        match self {
            FormatError::Json(msg)
            | FormatError::Xml(msg)
            | FormatError::Html(msg)
            | FormatError::Markup(msg) => msg,
        }
    }
}

/// The marker line prepended to content that failed to format.
///
/// Each format uses its own comment syntax so the marked text still reads
/// naturally in a highlighter for that language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMarker {
    Json,
    Xml,
    Html,
}

impl ErrorMarker {
    const ALL: [ErrorMarker; 3] = [ErrorMarker::Json, ErrorMarker::Xml, ErrorMarker::Html];

    /// Text every marked output starts with.
    pub fn prefix(&self) -> &'static str {
        match self {
            ErrorMarker::Json => "/* JSON Format Error: ",
            ErrorMarker::Xml => "<!-- XML Format Error: ",
            ErrorMarker::Html => "<!-- HTML Format Error: ",
        }
    }

    fn suffix(&self) -> &'static str {
        match self {
            ErrorMarker::Json => " */",
            ErrorMarker::Xml | ErrorMarker::Html => " -->",
        }
    }

    /// The marker for a content kind, if that kind has a formatter.
    pub fn for_kind(kind: ContentKind) -> Option<Self> {
        match kind {
            ContentKind::Json => Some(ErrorMarker::Json),
            ContentKind::Xml => Some(ErrorMarker::Xml),
            ContentKind::Html => Some(ErrorMarker::Html),
            ContentKind::PlainText => None,
        }
    }

    /// Renders the marker line followed by a newline and the original text.
    ///
    /// # Examples
    ///
    /// ```
    /// use rappit::formatter::ErrorMarker;
    ///
    /// let marked = ErrorMarker::Json.wrap("EOF while parsing", "{");
    /// assert_eq!(marked, "/* JSON Format Error: EOF while parsing */\n{");
    /// ```
    pub fn wrap(&self, message: &str, original: &str) -> String {
        format!("{}{}{}\n{}", self.prefix(), message, self.suffix(), original)
    }
}

/// Recognises the marker at the start of a formatted text.
pub fn error_marker(text: &str) -> Option<ErrorMarker> {
    ErrorMarker::ALL
        .into_iter()
        .find(|marker| text.starts_with(marker.prefix()))
}

/// Formats content as the given kind, returning a typed error on failure.
///
/// JSON gets one trailing-comma repair pass; XML falls back to the line
/// indenter; plain text is returned unchanged.
pub fn try_format(content: &str, kind: ContentKind) -> Result<String, FormatError> {
    match kind {
        ContentKind::Json => json::format_json_lenient(content),
        ContentKind::Xml => xml::format_xml_lenient(content),
        ContentKind::Html => html::format_html_pretty(content),
        ContentKind::PlainText => Ok(content.to_string()),
    }
}

/// Formats content as the given kind, embedding failures as an error marker.
///
/// # Examples
///
/// ```
/// use rappit::formatter::{format_as, ContentKind};
///
/// assert_eq!(format_as("[1,2]", ContentKind::Json), "[\n  1,\n  2\n]");
/// assert_eq!(format_as("as is", ContentKind::PlainText), "as is");
/// ```
pub fn format_as(content: &str, kind: ContentKind) -> String {
    match kind {
        ContentKind::Json => json::format_json(content),
        ContentKind::Xml => xml::format_xml(content),
        ContentKind::Html => html::format_html(content),
        ContentKind::PlainText => content.to_string(),
    }
}

/// Formats a body for display.
///
/// Whitespace-only input is returned unchanged. Otherwise the trimmed text is
/// formatted with the kind named by `type_hint`; if that produces an error
/// marker, the kind is sniffed from the text instead. Text that sniffs as
/// plain is returned exactly as given.
///
/// # Arguments
///
/// * `content` - Raw body text
/// * `type_hint` - MIME-like type, matched by substring (`json`, `xml`, `html`)
///
/// # Returns
///
/// The formatted text, or the original text behind an error marker.
///
/// # Examples
///
/// ```
/// use rappit::formatter::format_content;
///
/// let formatted = format_content(r#"{"a":1,"b":[1,2,]}"#, Some("application/json"));
/// assert_eq!(formatted, "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ]\n}");
///
/// assert_eq!(format_content("not json or xml", None), "not json or xml");
/// ```
pub fn format_content(content: &str, type_hint: Option<&str>) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return content.to_string();
    }

    if let Some(kind) = kind_from_hint(type_hint) {
        let formatted = format_as(trimmed, kind);
        if error_marker(&formatted) != ErrorMarker::for_kind(kind) {
            return formatted;
        }
        log::debug!("content did not format as hinted {}, sniffing", kind);
    }

    match sniff_kind(trimmed) {
        ContentKind::PlainText => content.to_string(),
        kind => format_as(trimmed, kind),
    }
}

/// Minifies a body.
///
/// JSON (sniffed, or named by the hint) is re-serialized compactly, or
/// returned unchanged if it does not parse. Sniffed XML or HTML loses its
/// comments and inter-tag whitespace. Anything else is returned unchanged.
///
/// # Examples
///
/// ```
/// use rappit::formatter::minify_content;
///
/// assert_eq!(minify_content("{\n  \"a\": [1, 2]\n}", None), r#"{"a":[1,2]}"#);
/// assert_eq!(minify_content("<a>\n  <b>x</b>\n</a>", None), "<a><b>x</b></a>");
/// assert_eq!(minify_content("plain  text", None), "plain  text");
/// ```
pub fn minify_content(content: &str, type_hint: Option<&str>) -> String {
    if looks_like_json(content) || kind_from_hint(type_hint) == Some(ContentKind::Json) {
        json::minify_json_safe(content)
    } else if looks_like_xml(content) || looks_like_html(content) {
        markup::minify_markup(content)
    } else {
        content.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message() {
        let err = FormatError::Xml("mismatched tag: line 1, column 6".to_string());
        assert_eq!(err.message(), "mismatched tag: line 1, column 6");
        assert_eq!(err.to_string(), "XML formatting error: mismatched tag: line 1, column 6");
    }

    #[test]
    fn test_error_marker_recognition() {
        assert_eq!(error_marker("/* JSON Format Error: x */\n{"), Some(ErrorMarker::Json));
        assert_eq!(error_marker("<!-- XML Format Error: x -->\n<a"), Some(ErrorMarker::Xml));
        assert_eq!(error_marker("<!-- HTML Format Error: x -->\n<p"), Some(ErrorMarker::Html));
        assert_eq!(error_marker("<!-- a normal comment -->"), None);
        assert_eq!(error_marker("{}"), None);
    }

    #[test]
    fn test_format_content_json_repair() {
        let formatted = format_content("  {\"a\":1,\"b\":[1,2,]}\n", None);
        assert_eq!(formatted, "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ]\n}");
    }

    #[test]
    fn test_format_content_xml_hint() {
        let formatted = format_content("<a><b>x</b></a>", Some("application/xml"));
        assert_eq!(
            formatted,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n  <b>x</b>\n</a>"
        );
    }

    #[test]
    fn test_format_content_wrong_hint_falls_back() {
        let formatted = format_content("<a><b>x</b></a>", Some("application/json"));
        assert!(formatted.starts_with("<?xml"));
        assert!(formatted.ends_with("</a>"));
    }

    #[test]
    fn test_format_content_whitespace_and_plain_unchanged() {
        assert_eq!(format_content("   \n ", Some("application/json")), "   \n ");
        assert_eq!(format_content("  hello  ", None), "  hello  ");
    }

    #[test]
    fn test_format_content_broken_json_is_marked() {
        let formatted = format_content(r#"{"key": value}"#, Some("application/json"));
        assert_eq!(error_marker(&formatted), Some(ErrorMarker::Json));
        assert!(formatted.ends_with("\n{\"key\": value}"));
    }

    #[test]
    fn test_format_content_html_sniffed() {
        let formatted = format_content("<!DOCTYPE html><html><body><p>Hi</p></body></html>", None);
        assert_eq!(
            formatted,
            "<!DOCTYPE html>\n<html>\n  <body>\n    <p>Hi</p>\n  </body>\n</html>"
        );
    }

    #[test]
    fn test_try_format_typed_error() {
        assert!(matches!(try_format("{", ContentKind::Json), Err(FormatError::Json(_))));
        assert!(matches!(try_format("<a><b", ContentKind::Xml), Err(FormatError::Xml(_))));
        assert_eq!(try_format("x", ContentKind::PlainText).unwrap(), "x");
    }

    #[test]
    fn test_minify_content_json_by_hint_invalid_is_identity() {
        let input = "{oops";
        assert_eq!(minify_content(input, Some("application/json")), input);
    }

    #[test]
    fn test_minify_content_html() {
        let html = "<div>\n  <!-- hidden -->\n  <p>Hello   there</p>\n</div>";
        assert_eq!(minify_content(html, Some("text/html")), "<div><p>Hello there</p></div>");
    }
}
