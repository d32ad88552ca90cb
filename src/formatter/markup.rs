//! Line-based markup indentation and minification.
//!
//! The indenter does not parse: it puts every tag on its own line and tracks
//! a nesting counter. It serves HTML directly and is the fallback for XML
//! that the DOM parser rejects.

use crate::formatter::FormatError;
use once_cell::sync::Lazy;
use regex::Regex;

/// HTML elements that never have content or a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const INDENT: &str = "  ";

static TAG_BOUNDARY_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">\s*<").expect("Failed to compile tag boundary regex"));

static TAG_NAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9]*)").expect("Failed to compile tag name regex")
});

static COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("Failed to compile comment regex"));

static WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("Failed to compile whitespace regex"));

static INTER_TAG_WHITESPACE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">\s+<").expect("Failed to compile inter-tag whitespace regex"));

/// Which nesting rules the indenter applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupFlavor {
    /// A tag opens a level unless the line also contains any closing tag.
    Xml,
    /// Void elements never open a level; an element closed on the same line
    /// does not either.
    Html,
}

/// What a single line of split markup is, for indentation purposes.
#[derive(Debug, PartialEq, Eq)]
enum LineKind {
    /// `<?xml ...?>` or `<!DOCTYPE ...>`: printed flush left.
    Prologue,
    /// Comments, CDATA, processing instructions: current level, no change.
    Passive,
    Closing,
    SelfClosing,
    Opening,
    Text,
}

/// Re-indents markup with two spaces per nesting level.
///
/// Fails only if a tag is never terminated by `>`.
///
/// # Examples
///
/// ```
/// use rappit::formatter::markup::{indent_markup, MarkupFlavor};
///
/// let html = "<ul><li>one</li><li>two<br></li></ul>";
/// let formatted = indent_markup(html, MarkupFlavor::Html).unwrap();
/// assert_eq!(formatted, "<ul>\n  <li>one</li>\n  <li>two<br>\n  </li>\n</ul>");
/// ```
pub fn indent_markup(content: &str, flavor: MarkupFlavor) -> Result<String, FormatError> {
    let split = TAG_BOUNDARY_REGEX.replace_all(content, ">\n<");
    let lines = join_continued_tags(&split)?;

    let mut formatted: Vec<String> = Vec::with_capacity(lines.len());
    let mut indent_level: usize = 0;

    for line in &lines {
        match classify_line(line, flavor) {
            LineKind::Prologue => formatted.push(line.clone()),
            LineKind::Passive | LineKind::SelfClosing | LineKind::Text => {
                formatted.push(indented(indent_level, line));
            }
            LineKind::Closing => {
                indent_level = indent_level.saturating_sub(1);
                formatted.push(indented(indent_level, line));
            }
            LineKind::Opening => {
                formatted.push(indented(indent_level, line));
                if opens_level(line, flavor) {
                    indent_level += 1;
                }
            }
        }
    }

    Ok(formatted.join("\n"))
}

/// Minifies XML or HTML text.
///
/// Comments are dropped (including multi-line ones), whitespace runs become a
/// single space, whitespace between tags disappears, and the result is trimmed.
///
/// # Examples
///
/// ```
/// use rappit::formatter::markup::minify_markup;
///
/// let xml = "<root>\n  <!-- note -->\n  <child>  some   text </child>\n</root>\n";
/// assert_eq!(minify_markup(xml), "<root><child> some text </child></root>");
/// ```
pub fn minify_markup(content: &str) -> String {
    let without_comments = COMMENT_REGEX.replace_all(content, "");
    let collapsed = WHITESPACE_REGEX.replace_all(&without_comments, " ");
    let tight = INTER_TAG_WHITESPACE_REGEX.replace_all(&collapsed, "><");
    tight.trim().to_string()
}

/// Splits into trimmed, non-empty lines, re-joining tags whose attributes
/// span several lines.
fn join_continued_tags(content: &str) -> Result<Vec<String>, FormatError> {
    let mut lines = Vec::new();
    let mut pending: Option<String> = None;

    for raw in content.split('\n') {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let line = match pending.take() {
            Some(mut open) => {
                open.push(' ');
                open.push_str(line);
                open
            }
            None => line.to_string(),
        };

        if line.starts_with('<') && !line.contains('>') {
            pending = Some(line);
        } else {
            lines.push(line);
        }
    }

    if let Some(open) = pending {
        return Err(FormatError::Markup(format!(
            "unterminated tag: {}",
            preview(&open)
        )));
    }

    Ok(lines)
}

fn classify_line(line: &str, flavor: MarkupFlavor) -> LineKind {
    if line.starts_with("<?") {
        if line.starts_with("<?xml") {
            LineKind::Prologue
        } else {
            LineKind::Passive
        }
    } else if line.starts_with("<!") {
        if line.to_ascii_lowercase().starts_with("<!doctype") {
            LineKind::Prologue
        } else {
            LineKind::Passive
        }
    } else if line.starts_with("</") {
        LineKind::Closing
    } else if line.ends_with("/>") {
        LineKind::SelfClosing
    } else if line.starts_with('<') {
        if flavor == MarkupFlavor::Html && is_void_line(line) {
            LineKind::SelfClosing
        } else {
            LineKind::Opening
        }
    } else {
        LineKind::Text
    }
}

fn is_void_line(line: &str) -> bool {
    tag_name(line).map_or(false, |name| VOID_ELEMENTS.contains(&name.as_str()))
}

fn opens_level(line: &str, flavor: MarkupFlavor) -> bool {
    match flavor {
        MarkupFlavor::Xml => !line.contains("</"),
        MarkupFlavor::Html => match tag_name(line) {
            Some(name) => !line
                .to_ascii_lowercase()
                .contains(&format!("</{}>", name)),
            None => false,
        },
    }
}

/// Lowercased name of the tag a line starts with.
fn tag_name(line: &str) -> Option<String> {
    TAG_NAME_REGEX
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_ascii_lowercase())
}

fn indented(level: usize, line: &str) -> String {
    format!("{}{}", INDENT.repeat(level), line)
}

fn preview(text: &str) -> String {
    const MAX: usize = 40;
    if text.chars().count() <= MAX {
        text.to_string()
    } else {
        let cut: String = text.chars().take(MAX).collect();
        format!("{}...", cut)
    }
}
