//! Serialization of [`Node`] trees to XML text.
//!
//! The tree is pushed depth-first through a [`quick_xml::Writer`]: start
//! tag with attributes in the node's order, text, children, end tag.
//! Childless, textless nodes become self-closing elements.
//!
//! Text is written as stored. Entity and character references already in it
//! are kept, while a bare `<`, `>` or `&` is escaped so the output stays
//! well-formed.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::{Error, Node, Result};

/// Output settings for the serializer.
///
/// The defaults produce a standalone UTF-8 document indented by two spaces,
/// with `<empty />` elements and a final newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Byte repeated for each level of indentation.
    pub indent_char: u8,

    /// Indentation width per depth level. Zero disables pretty printing.
    pub indent_size: usize,

    /// Emit `<?xml version="1.0" encoding="UTF-8"?>` first.
    pub declaration: bool,

    /// Write self-closing elements as `<name />` rather than `<name/>`.
    pub space_before_self_close: bool,

    /// End the output with a newline.
    pub trailing_newline: bool,
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            indent_char: b' ',
            indent_size: 2,
            declaration: true,
            space_before_self_close: true,
            trailing_newline: true,
        }
    }
}

impl SerializeOptions {
    /// Options for a fragment: no declaration and no trailing newline.
    pub fn fragment() -> Self {
        Self {
            declaration: false,
            trailing_newline: false,
            ..Self::default()
        }
    }
}

/// Serialize `node` as a standalone document with default options.
///
/// # Example
///
/// ```rust
/// use xml_node::{Node, serialize};
///
/// let mut family = Node::new("family").with_attribute("name", "Aircury family");
/// family.add_child(Node::new("father").with_text("Jose")).unwrap();
/// family.add_child(Node::new("pet")).unwrap();
///
/// assert_eq!(
///     serialize(&family).unwrap(),
///     "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
///      <family name=\"Aircury family\">\n  \
///      <father>Jose</father>\n  \
///      <pet />\n\
///      </family>\n"
/// );
/// ```
pub fn serialize(node: &Node) -> Result<String> {
    serialize_with_options(node, &SerializeOptions::default())
}

/// Serialize `node` with explicit [`SerializeOptions`].
pub fn serialize_with_options(node: &Node, options: &SerializeOptions) -> Result<String> {
    let mut buffer = Vec::new();
    write_to(node, &mut buffer, options)?;

    let output = String::from_utf8_lossy(&buffer).into_owned();
    tracing::debug!(
        root = node.name(),
        bytes = output.len(),
        "Serialized node tree"
    );
    Ok(output)
}

/// Write `node` into `sink`.
///
/// The writer only lives for the duration of this call.
pub fn write_to<W: Write>(node: &Node, sink: W, options: &SerializeOptions) -> Result<()> {
    let mut writer = if options.indent_size > 0 {
        Writer::new_with_indent(sink, options.indent_char, options.indent_size)
    } else {
        Writer::new(sink)
    };

    if options.declaration {
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    }

    write_node(&mut writer, node, options)?;

    if options.trailing_newline {
        writer.get_mut().write_all(b"\n")?;
    }
    Ok(())
}

/// Serialize `node` into the file at `path`, replacing its contents.
pub fn write_file(
    node: &Node,
    path: impl AsRef<std::path::Path>,
    options: &SerializeOptions,
) -> Result<()> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut sink = std::io::BufWriter::new(file);
    write_to(node, &mut sink, options)?;
    sink.flush()?;
    Ok(())
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node, options: &SerializeOptions) -> Result<()> {
    if node.name().is_empty() {
        return Err(Error::EmptyElementName);
    }

    let mut start = BytesStart::new(node.name());
    for (name, value) in node.attributes() {
        start.push_attribute((name.as_str(), value.as_str()));
    }

    if node.text().is_empty() && node.children().is_empty() {
        let start = if options.space_before_self_close {
            pad_self_closing(&start, node.name().len())
        } else {
            start
        };
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;

    if !node.text().is_empty() {
        writer.write_event(Event::Text(BytesText::from_escaped(escape_text(node.text()))))?;
    }

    for child in node.children() {
        write_node(writer, child, options)?;
    }

    writer.write_event(Event::End(BytesEnd::new(node.name())))?;
    Ok(())
}

/// Escape markup characters in `text`, leaving entity references alone.
fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['<', '>', '&']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 8);
    for (position, ch) in text.char_indices() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' if !starts_with_reference(&text[position..]) => escaped.push_str("&amp;"),
            _ => escaped.push(ch),
        }
    }
    Cow::Owned(escaped)
}

/// Whether `text` begins with `&name;`, `&#N;` or `&#xH;`.
fn starts_with_reference(text: &str) -> bool {
    let Some(end) = text.find(';') else {
        return false;
    };
    let body = &text[1..end];

    if let Some(hex) = body.strip_prefix("#x") {
        return !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    if let Some(digits) = body.strip_prefix('#') {
        return !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit());
    }

    let mut chars = body.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == ':')
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

/// Re-create `start` with a trailing space so it renders as `<name ... />`.
fn pad_self_closing(start: &BytesStart<'_>, name_len: usize) -> BytesStart<'static> {
    let mut content = String::from_utf8_lossy(start).into_owned();
    content.push(' ');
    BytesStart::from_content(content, name_len)
}
