//! XML formatting with proper parsing and pretty-printing.
//!
//! This module provides:
//! - A small DOM parser ([`parse_xml`]) for well-formed documents
//! - Pretty-printing with 2-space indentation
//! - Graceful fallback to the line-based indenter for malformed XML
//! - Error-marker rendering for the display path

use crate::formatter::markup::{indent_markup, MarkupFlavor};
use crate::formatter::{ErrorMarker, FormatError};

/// Declaration prepended to documents that do not carry one.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Default indentation for XML formatting (2 spaces).
const XML_INDENT: &str = "  ";

/// Deepest element nesting the document parser accepts. Deeper documents
/// are left to the line indenter.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    /// Pseudo-attributes of the `<?xml ...?>` declaration, in source order.
    pub declaration: Option<Vec<(String, String)>>,

    /// Comments, processing instructions and the doctype before the root.
    pub prolog: Vec<XmlNode>,

    /// The document element.
    pub root: XmlElement,

    /// Comments and processing instructions after the root.
    pub epilog: Vec<XmlNode>,
}

/// An element with its attributes and children.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

/// A node of the document tree. Text is stored with entities decoded.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, data: String },
    Doctype(String),
}

/// Formats XML with pretty-printing, requiring a well-formed document.
///
/// A standard declaration is prepended when the input lacks one. An element
/// whose only child is text stays on one line; empty elements collapse to
/// `<name/>`; blank lines are dropped.
///
/// # Examples
///
/// ```
/// use rappit::formatter::xml::format_xml_pretty;
///
/// let formatted = format_xml_pretty("<a><b>x</b></a>").unwrap();
/// assert_eq!(formatted, "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<a>\n  <b>x</b>\n</a>");
/// ```
pub fn format_xml_pretty(xml: &str) -> Result<String, FormatError> {
    let document = parse_xml(&with_declaration(xml.trim()))?;
    Ok(write_document(&document))
}

/// Pretty-prints XML, falling back to the line-based indenter when the
/// document does not parse.
///
/// If the fallback fails as well, the error of the DOM parser is returned.
pub fn format_xml_lenient(xml: &str) -> Result<String, FormatError> {
    let source = with_declaration(xml.trim());

    match parse_xml(&source) {
        Ok(document) => Ok(write_document(&document)),
        Err(parse_error) => {
            log::debug!("XML parse failed, using line indenter: {}", parse_error);
            indent_markup(&source, MarkupFlavor::Xml).map_err(|_| parse_error)
        }
    }
}

/// Formats XML for display, embedding any failure as an error marker.
///
/// On failure the result is `<!-- XML Format Error: <message> -->` on its own
/// line followed by the unmodified input.
pub fn format_xml(xml: &str) -> String {
    match format_xml_lenient(xml) {
        Ok(formatted) => formatted,
        Err(e) => ErrorMarker::Xml.wrap(e.message(), xml),
    }
}

fn with_declaration(xml: &str) -> String {
    if xml.starts_with("<?xml") {
        xml.to_string()
    } else {
        format!("{}\n{}", XML_DECLARATION, xml)
    }
}

/// Parses a complete XML document.
///
/// Errors carry an expat-style message with a 1-based line and 0-based
/// column, e.g. `mismatched tag: line 1, column 8`.
pub fn parse_xml(xml: &str) -> Result<XmlDocument, FormatError> {
    XmlParser::new(xml).parse_document()
}

struct XmlParser<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> XmlParser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn parse_document(&mut self) -> Result<XmlDocument, FormatError> {
        if self.input.starts_with('\u{feff}') {
            self.pos += '\u{feff}'.len_utf8();
        }

        let declaration = if self.at_declaration() {
            Some(self.parse_declaration()?)
        } else {
            None
        };

        let mut prolog = Vec::new();
        let mut seen_doctype = false;
        let root = loop {
            self.skip_whitespace();
            if self.at_end() {
                return Err(self.error("no element found"));
            }
            if self.starts_with("<!--") {
                prolog.push(self.parse_comment()?);
            } else if self.starts_with("<!DOCTYPE") {
                if seen_doctype {
                    return Err(self.error("syntax error"));
                }
                seen_doctype = true;
                prolog.push(self.parse_doctype()?);
            } else if self.starts_with("<?") {
                prolog.push(self.parse_processing_instruction()?);
            } else if self.starts_with("<") && self.peek_nth(1).map_or(false, is_name_start) {
                break self.parse_element()?;
            } else {
                return Err(self.error("syntax error"));
            }
        };

        let mut epilog = Vec::new();
        loop {
            self.skip_whitespace();
            if self.at_end() {
                break;
            }
            if self.starts_with("<!--") {
                epilog.push(self.parse_comment()?);
            } else if self.starts_with("<?") {
                epilog.push(self.parse_processing_instruction()?);
            } else {
                return Err(self.error("junk after document element"));
            }
        }

        Ok(XmlDocument {
            declaration,
            prolog,
            root,
            epilog,
        })
    }

    fn at_declaration(&self) -> bool {
        self.starts_with("<?xml") && self.peek_nth(5).map_or(false, char::is_whitespace)
    }

    fn parse_declaration(&mut self) -> Result<Vec<(String, String)>, FormatError> {
        self.bump("<?xml".len());
        let mut pseudo_attributes = Vec::new();
        loop {
            self.skip_whitespace();
            if self.starts_with("?>") {
                self.bump(2);
                return Ok(pseudo_attributes);
            }
            if self.at_end() {
                return Err(self.error("unclosed token"));
            }
            pseudo_attributes.push(self.parse_attribute()?);
        }
    }

    fn parse_element(&mut self) -> Result<XmlElement, FormatError> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error("nesting too deep"));
        }

        self.depth += 1;
        let element = self.parse_element_body();
        self.depth -= 1;
        element
    }

    fn parse_element_body(&mut self) -> Result<XmlElement, FormatError> {
        self.bump(1); // '<'
        let name = self.read_name()?.to_string();
        let mut attributes: Vec<(String, String)> = Vec::new();

        loop {
            let had_space = self.skip_whitespace();
            if self.starts_with("/>") {
                self.bump(2);
                return Ok(XmlElement {
                    name,
                    attributes,
                    children: Vec::new(),
                });
            }
            if self.starts_with(">") {
                self.bump(1);
                break;
            }
            if self.at_end() {
                return Err(self.error("unclosed token"));
            }
            if !had_space {
                return Err(self.error("not well-formed (invalid token)"));
            }
            let attribute = self.parse_attribute()?;
            if attributes.iter().any(|(existing, _)| *existing == attribute.0) {
                return Err(self.error("duplicate attribute"));
            }
            attributes.push(attribute);
        }

        let children = self.parse_content(&name)?;
        Ok(XmlElement {
            name,
            attributes,
            children,
        })
    }

    fn parse_content(&mut self, parent: &str) -> Result<Vec<XmlNode>, FormatError> {
        let mut children = Vec::new();

        loop {
            if self.at_end() {
                return Err(self.error("no element found"));
            }

            if self.starts_with("</") {
                let tag_start = self.pos;
                self.bump(2);
                let closing = self.read_name()?;
                if closing != parent {
                    self.pos = tag_start;
                    return Err(self.error("mismatched tag"));
                }
                self.skip_whitespace();
                if !self.starts_with(">") {
                    return Err(self.error("not well-formed (invalid token)"));
                }
                self.bump(1);
                return Ok(children);
            } else if self.starts_with("<!--") {
                children.push(self.parse_comment()?);
            } else if self.starts_with("<![CDATA[") {
                self.bump("<![CDATA[".len());
                let data = self.take_until("]]>")?;
                children.push(XmlNode::CData(data.to_string()));
            } else if self.starts_with("<?") {
                children.push(self.parse_processing_instruction()?);
            } else if self.starts_with("<") {
                if !self.peek_nth(1).map_or(false, is_name_start) {
                    return Err(self.error("not well-formed (invalid token)"));
                }
                children.push(XmlNode::Element(self.parse_element()?));
            } else {
                let text = self.parse_text()?;
                children.push(XmlNode::Text(text));
            }
        }
    }

    fn parse_text(&mut self) -> Result<String, FormatError> {
        let input = self.input;
        let start = self.pos;
        let end = input[start..].find('<').map_or(input.len(), |i| start + i);
        let raw = &input[start..end];
        let decoded = decode_entities(raw).map_err(|(offset, message)| {
            self.pos = start + offset;
            self.error(message)
        })?;
        self.pos = end;
        Ok(decoded)
    }

    fn parse_attribute(&mut self) -> Result<(String, String), FormatError> {
        let name = self.read_name()?.to_string();
        self.skip_whitespace();
        if !self.starts_with("=") {
            return Err(self.error("not well-formed (invalid token)"));
        }
        self.bump(1);
        self.skip_whitespace();

        let quote = match self.peek_nth(0) {
            Some(q @ ('"' | '\'')) => q,
            _ => return Err(self.error("not well-formed (invalid token)")),
        };
        self.bump(1);

        let input = self.input;
        let start = self.pos;
        let len = input[start..]
            .find(quote)
            .ok_or_else(|| self.error("unclosed token"))?;
        let raw = &input[start..start + len];
        if let Some(offset) = raw.find('<') {
            self.pos = start + offset;
            return Err(self.error("not well-formed (invalid token)"));
        }
        let value = decode_entities(raw).map_err(|(offset, message)| {
            self.pos = start + offset;
            self.error(message)
        })?;
        self.pos = start + len + 1;

        Ok((name, value))
    }

    fn parse_comment(&mut self) -> Result<XmlNode, FormatError> {
        self.bump("<!--".len());
        let data = self.take_until("-->")?;
        Ok(XmlNode::Comment(data.to_string()))
    }

    fn parse_processing_instruction(&mut self) -> Result<XmlNode, FormatError> {
        let start = self.pos;
        self.bump(2);
        let target = self.read_name()?.to_string();
        if target.eq_ignore_ascii_case("xml") {
            self.pos = start;
            return Err(self.error("XML or text declaration not at start of entity"));
        }
        self.skip_whitespace();
        let data = self.take_until("?>")?.trim_end().to_string();
        Ok(XmlNode::ProcessingInstruction { target, data })
    }

    fn parse_doctype(&mut self) -> Result<XmlNode, FormatError> {
        let start = self.pos;
        let mut depth = 0usize;
        let mut quote: Option<char> = None;

        for (offset, c) in self.rest().char_indices() {
            match (quote, c) {
                (Some(q), c) if c == q => quote = None,
                (Some(_), _) => {}
                (None, '"' | '\'') => quote = Some(c),
                (None, '[') => depth += 1,
                (None, ']') => depth = depth.saturating_sub(1),
                (None, '>') if depth == 0 => {
                    let end = start + offset + 1;
                    self.pos = end;
                    return Ok(XmlNode::Doctype(self.input[start..end].to_string()));
                }
                _ => {}
            }
        }

        Err(self.error("unclosed token"))
    }

    fn read_name(&mut self) -> Result<&'a str, FormatError> {
        let input = self.input;
        let start = self.pos;
        let mut chars = input[start..].char_indices();

        match chars.next() {
            Some((_, c)) if is_name_start(c) => {}
            _ => return Err(self.error("not well-formed (invalid token)")),
        }

        let end = chars
            .find(|&(_, c)| !is_name_char(c))
            .map_or(input.len(), |(i, _)| start + i);
        self.pos = end;
        Ok(&input[start..end])
    }

    fn take_until(&mut self, delimiter: &str) -> Result<&'a str, FormatError> {
        let input = self.input;
        let start = self.pos;
        match input[start..].find(delimiter) {
            Some(len) => {
                self.pos = start + len + delimiter.len();
                Ok(&input[start..start + len])
            }
            None => Err(self.error("unclosed token")),
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Delimiters are ASCII, so byte bumps always land on char boundaries.
    fn bump(&mut self, bytes: usize) {
        self.pos = (self.pos + bytes).min(self.input.len());
    }

    fn skip_whitespace(&mut self) -> bool {
        let rest = self.rest();
        let trimmed = rest.trim_start_matches([' ', '\t', '\n', '\r']);
        let skipped = rest.len() - trimmed.len();
        self.pos += skipped;
        skipped > 0
    }

    fn error(&self, message: &str) -> FormatError {
        let consumed = &self.input[..self.pos];
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rfind('\n')
            .map_or(consumed.chars().count(), |nl| consumed[nl + 1..].chars().count());
        FormatError::Xml(format!("{}: line {}, column {}", message, line, column))
    }
}

fn is_name_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == ':'
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric()
        || matches!(c, '_' | ':' | '-' | '.')
        || (!c.is_ascii() && !c.is_whitespace())
}

/// Decodes the predefined and numeric character references.
///
/// On failure returns the byte offset of the offending `&` and a message.
fn decode_entities(raw: &str) -> Result<String, (usize, &'static str)> {
    if !raw.contains('&') {
        return Ok(raw.to_string());
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    let mut offset = 0;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let semi = after
            .find(';')
            .ok_or((offset + amp, "not well-formed (invalid token)"))?;
        let entity = &after[..semi];

        let decoded = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                u32::from_str_radix(&entity[2..], 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or((offset + amp, "reference to invalid character number"))?
            }
            _ if entity.starts_with('#') => entity[1..]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .ok_or((offset + amp, "reference to invalid character number"))?,
            _ => return Err((offset + amp, "undefined entity")),
        };
        out.push(decoded);

        let consumed = amp + 1 + semi + 1;
        offset += consumed;
        rest = &rest[consumed..];
    }

    out.push_str(rest);
    Ok(out)
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

/// Serializes a document with 2-space indentation and no blank lines.
fn write_document(document: &XmlDocument) -> String {
    let mut out = String::new();

    match &document.declaration {
        Some(pseudo_attributes) => {
            out.push_str("<?xml");
            for (name, value) in pseudo_attributes {
                out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
            }
            out.push_str("?>\n");
        }
        None => {
            out.push_str(XML_DECLARATION);
            out.push('\n');
        }
    }

    for node in &document.prolog {
        write_node(node, "", &mut out);
    }
    write_element(&document.root, "", &mut out);
    for node in &document.epilog {
        write_node(node, "", &mut out);
    }

    out.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_element(element: &XmlElement, indent: &str, out: &mut String) {
    out.push_str(indent);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attributes {
        out.push_str(&format!(" {}=\"{}\"", name, escape_attribute(value)));
    }

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }

    out.push('>');
    match element.children.as_slice() {
        [XmlNode::Text(text)] => out.push_str(&escape_text(text)),
        [XmlNode::CData(data)] => out.push_str(&format!("<![CDATA[{}]]>", data)),
        children => {
            out.push('\n');
            let child_indent = format!("{}{}", indent, XML_INDENT);
            for child in children {
                write_node(child, &child_indent, out);
            }
            out.push_str(indent);
        }
    }
    out.push_str(&format!("</{}>\n", element.name));
}

fn write_node(node: &XmlNode, indent: &str, out: &mut String) {
    match node {
        XmlNode::Element(element) => write_element(element, indent, out),
        XmlNode::Text(text) => {
            out.push_str(indent);
            out.push_str(&escape_text(text));
            out.push('\n');
        }
        XmlNode::CData(data) => out.push_str(&format!("{}<![CDATA[{}]]>\n", indent, data)),
        XmlNode::Comment(data) => out.push_str(&format!("{}<!--{}-->\n", indent, data)),
        XmlNode::ProcessingInstruction { target, data } if data.is_empty() => {
            out.push_str(&format!("{}<?{}?>\n", indent, target));
        }
        XmlNode::ProcessingInstruction { target, data } => {
            out.push_str(&format!("{}<?{} {}?>\n", indent, target, data));
        }
        XmlNode::Doctype(raw) => {
            out.push_str(raw);
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DECL: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

    #[test]
    fn test_format_xml_pretty_nested() {
        let xml = "<root><parent><child>text</child></parent></root>";
        let formatted = format_xml_pretty(xml).unwrap();
        assert_eq!(
            formatted,
            format!("{}\n<root>\n  <parent>\n    <child>text</child>\n  </parent>\n</root>", DECL)
        );
    }

    #[test]
    fn test_format_xml_pretty_attributes_in_order() {
        let xml = r#"<root id="1" name="test"><child attr="a &amp; b">text</child></root>"#;
        let formatted = format_xml_pretty(xml).unwrap();

        assert!(formatted.contains(r#"<root id="1" name="test">"#));
        assert!(formatted.contains(r#"  <child attr="a &amp; b">text</child>"#));
    }

    #[test]
    fn test_format_xml_self_closing_and_empty() {
        let formatted = format_xml_pretty("<root><child/><empty></empty></root>").unwrap();
        assert_eq!(formatted, format!("{}\n<root>\n  <child/>\n  <empty/>\n</root>", DECL));
    }

    #[test]
    fn test_format_xml_keeps_existing_declaration() {
        let xml = "<?xml version='1.0'?><root/>";
        assert_eq!(format_xml_pretty(xml).unwrap(), "<?xml version=\"1.0\"?>\n<root/>");
    }

    #[test]
    fn test_format_xml_reindents_pretty_input() {
        let xml = "<root>\n    <a>1</a>\n\n    <b>2</b>\n</root>";
        let formatted = format_xml_pretty(xml).unwrap();
        assert_eq!(formatted, format!("{}\n<root>\n  <a>1</a>\n  <b>2</b>\n</root>", DECL));
    }

    #[test]
    fn test_format_xml_mixed_content() {
        let formatted = format_xml_pretty("<root>text<child>nested</child>more</root>").unwrap();
        assert_eq!(
            formatted,
            format!("{}\n<root>\n  text\n  <child>nested</child>\n  more\n</root>", DECL)
        );
    }

    #[test]
    fn test_format_xml_comments_cdata_and_pi() {
        let xml = "<!-- head --><root><?render fast?><![CDATA[a<b]]><x/></root>";
        let formatted = format_xml_pretty(xml).unwrap();
        assert_eq!(
            formatted,
            format!(
                "{}\n<!-- head -->\n<root>\n  <?render fast?>\n  <![CDATA[a<b]]>\n  <x/>\n</root>",
                DECL
            )
        );
    }

    #[test]
    fn test_format_xml_escapes_round_trip() {
        let formatted = format_xml_pretty("<m>a &lt; b &amp;&#65;&#x42;</m>").unwrap();
        assert!(formatted.ends_with("<m>a &lt; b &amp;AB</m>"));
    }

    #[test]
    fn test_parse_xml_errors() {
        let mismatched = parse_xml("<a><b></a>").unwrap_err();
        assert_eq!(mismatched, FormatError::Xml("mismatched tag: line 1, column 6".to_string()));

        let message = |xml: &str| parse_xml(xml).unwrap_err().message().to_string();
        assert!(message("<a>").starts_with("no element found"));
        assert!(message("<a/><b/>").starts_with("junk after document element"));
        assert!(message("<a>&nbsp;</a>").starts_with("undefined entity"));
        assert!(message(r#"<a x="1" x="2"/>"#).starts_with("duplicate attribute"));
        assert!(message("hello").starts_with("syntax error"));
        assert!(message("<?xml version=\"1.0\"?>\n<?xml version=\"1.0\"?><a/>")
            .starts_with("XML or text declaration not at start of entity: line 2"));
    }

    #[test]
    fn test_parse_xml_doctype_with_internal_subset() {
        let xml = "<!DOCTYPE note [<!ELEMENT note (#PCDATA)>]><note>hi</note>";
        let document = parse_xml(xml).unwrap();
        assert_eq!(
            document.prolog,
            vec![XmlNode::Doctype("<!DOCTYPE note [<!ELEMENT note (#PCDATA)>]>".to_string())]
        );
        assert_eq!(document.root.name, "note");
    }

    #[test]
    fn test_parse_xml_namespaces_and_unicode() {
        let xml = r#"<soap:Envelope xmlns:soap="urn:x"><ürün ad="çay"/></soap:Envelope>"#;
        let document = parse_xml(xml).unwrap();
        assert_eq!(document.root.name, "soap:Envelope");
        match &document.root.children[0] {
            XmlNode::Element(child) => {
                assert_eq!(child.name, "ürün");
                assert_eq!(child.attributes, vec![("ad".to_string(), "çay".to_string())]);
            }
            other => panic!("Expected element, got {:?}", other),
        }
    }

    #[test]
    fn test_format_xml_lenient_falls_back_to_indenter() {
        let formatted = format_xml_lenient("<a><b>x</b>").unwrap();
        assert_eq!(formatted, format!("{}\n<a>\n  <b>x</b>", DECL));
    }

    #[test]
    fn test_format_xml_error_marker_when_both_fail() {
        let input = "<a><b attr=\"x\"";
        let output = format_xml(input);

        assert!(output.starts_with("<!-- XML Format Error: "));
        assert!(output.ends_with(&format!(" -->\n{}", input)));
    }

    #[test]
    fn test_parse_xml_rejects_excessive_nesting() {
        let depth = MAX_NESTING_DEPTH + 1;
        let xml = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));

        let err = parse_xml(&xml).unwrap_err();
        assert!(err.message().starts_with("nesting too deep: line 1"));

        let depth = MAX_NESTING_DEPTH;
        let at_limit = format!("{}{}", "<a>".repeat(depth), "</a>".repeat(depth));
        assert!(parse_xml(&at_limit).is_ok());
    }

    #[test]
    fn test_format_xml_deep_nesting_uses_indenter() {
        let depth = 1000;
        let xml = format!("{}x{}", "<a>".repeat(depth), "</a>".repeat(depth));

        let formatted = format_xml_lenient(&xml).unwrap();
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines[0], DECL);
        assert_eq!(lines.len(), 1 + 2 * depth - 1);
        assert_eq!(lines[depth], format!("{}<a>x</a>", "  ".repeat(depth - 1)));
        assert_eq!(lines.last().copied(), Some("</a>"));
    }
}
