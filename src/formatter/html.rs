//! HTML formatting.
//!
//! HTML is rarely well-formed enough for a real parser, so formatting goes
//! straight through the line-based indenter with HTML nesting rules.

use crate::formatter::markup::{indent_markup, MarkupFlavor};
use crate::formatter::{ErrorMarker, FormatError};

/// Re-indents HTML with two spaces per level.
///
/// Void elements (`<br>`, `<img>`, ...) never open a level, and neither does
/// an element whose closing tag is on the same line.
///
/// # Examples
///
/// ```
/// use rappit::formatter::html::format_html_pretty;
///
/// let formatted = format_html_pretty("<div><p>Hi</p><br></div>").unwrap();
/// assert_eq!(formatted, "<div>\n  <p>Hi</p>\n  <br>\n</div>");
/// ```
pub fn format_html_pretty(html: &str) -> Result<String, FormatError> {
    indent_markup(html.trim(), MarkupFlavor::Html)
        .map_err(|e| FormatError::Html(e.message().to_string()))
}

/// Formats HTML for display, embedding any failure as an error marker.
pub fn format_html(html: &str) -> String {
    match format_html_pretty(html) {
        Ok(formatted) => formatted,
        Err(e) => {
            log::debug!("HTML formatting failed: {}", e);
            ErrorMarker::Html.wrap(e.message(), html)
        }
    }
}
