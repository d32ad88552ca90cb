//! JSON formatting with pretty-print, repair, minification, and validation.
//!
//! This module provides:
//! - Pretty-printing with 2-space indentation, preserving key order and
//!   non-ASCII text
//! - A single repair pass for trailing commas
//! - Minification for compact view
//! - Error-marker rendering for the display path
//!
//! Numbers are carried as their source text, so integers beyond 64 bits and
//! long decimals print exactly as received. Documents nested deeper than 128
//! arrays or objects are rejected with serde_json's `recursion limit
//! exceeded` error.

use crate::formatter::{ErrorMarker, FormatError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static TRAILING_OBJECT_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\}").expect("Failed to compile trailing object comma regex"));

static TRAILING_ARRAY_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*\]").expect("Failed to compile trailing array comma regex"));

/// Formats JSON with pretty-printing using 2-space indentation.
///
/// Strict: no repair is attempted. Nesting deeper than 128 levels fails
/// with `recursion limit exceeded`.
///
/// # Examples
///
/// ```
/// use rappit::formatter::json::format_json_pretty;
///
/// let formatted = format_json_pretty(r#"{"name":"John","age":30}"#).unwrap();
/// assert_eq!(formatted, "{\n  \"name\": \"John\",\n  \"age\": 30\n}");
/// ```
pub fn format_json_pretty(json: &str) -> Result<String, FormatError> {
    let value: Value = serde_json::from_str(json).map_err(|e| FormatError::Json(e.to_string()))?;
    serde_json::to_string_pretty(&value).map_err(|e| FormatError::Json(e.to_string()))
}

/// Removes commas that directly precede a closing `}` or `]`.
///
/// This is textual: a string literal containing `, }` is rewritten too.
pub fn repair_trailing_commas(json: &str) -> String {
    let repaired = TRAILING_OBJECT_COMMA.replace_all(json, "}");
    TRAILING_ARRAY_COMMA.replace_all(&repaired, "]").into_owned()
}

/// Pretty-prints JSON, retrying once after [`repair_trailing_commas`].
///
/// When both attempts fail, the error carries the message of the *first*
/// parse failure, which points at the user's actual mistake.
///
/// # Examples
///
/// ```
/// use rappit::formatter::json::format_json_lenient;
///
/// let formatted = format_json_lenient(r#"{"a":1,"b":[1,2,]}"#).unwrap();
/// assert_eq!(formatted, "{\n  \"a\": 1,\n  \"b\": [\n    1,\n    2\n  ]\n}");
/// ```
pub fn format_json_lenient(json: &str) -> Result<String, FormatError> {
    match format_json_pretty(json) {
        Ok(formatted) => Ok(formatted),
        Err(original_error) => {
            let repaired = repair_trailing_commas(json);
            if repaired == json {
                return Err(original_error);
            }
            format_json_pretty(&repaired).map_err(|_| original_error)
        }
    }
}

/// Formats JSON for display, embedding any failure as an error marker.
///
/// On failure the result is `/* JSON Format Error: <message> */` on its own
/// line followed by the unmodified input.
pub fn format_json(json: &str) -> String {
    match format_json_lenient(json) {
        Ok(formatted) => formatted,
        Err(e) => {
            log::debug!("JSON formatting failed: {}", e);
            ErrorMarker::Json.wrap(e.message(), json)
        }
    }
}

/// Minifies JSON by re-serializing it without whitespace.
///
/// # Examples
///
/// ```
/// use rappit::formatter::json::minify_json;
///
/// let minified = minify_json("{\n  \"name\": \"John\",\n  \"age\": 30\n}").unwrap();
/// assert_eq!(minified, r#"{"name":"John","age":30}"#);
/// ```
pub fn minify_json(json: &str) -> Result<String, FormatError> {
    let value: Value = serde_json::from_str(json).map_err(|e| FormatError::Json(e.to_string()))?;

    let mut buf = Vec::with_capacity(json.len());
    serde_json::to_writer(&mut buf, &value).map_err(|e| FormatError::Json(e.to_string()))?;

    String::from_utf8(buf).map_err(|e| FormatError::Json(e.to_string()))
}

/// Minifies JSON, returning the input unchanged if it does not parse.
pub fn minify_json_safe(json: &str) -> String {
    minify_json(json).unwrap_or_else(|_| json.to_string())
}
