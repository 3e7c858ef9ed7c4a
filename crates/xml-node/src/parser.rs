//! XML parser that builds [`Node`] trees.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesEnd, BytesStart, Event};

use crate::{Node, ParseError, Result};

/// Parse XML from a string, producing a [`Node`] tree.
///
/// # Example
///
/// ```rust
/// use xml_node::parse;
///
/// let note = parse("<note><to>Tove</to><from>Jani</from></note>").unwrap();
/// assert_eq!(note.name(), "note");
/// assert_eq!(note.named_child("to", &[]).unwrap().text(), "Tove");
/// ```
///
/// # Errors
///
/// Returns [`Error::Parse`](crate::Error::Parse) if the XML is malformed.
pub fn parse(content: &str) -> Result<Node> {
    let mut parser = XmlParser::new(content);
    let root = parser.parse()?;
    tracing::debug!(
        root = root.name(),
        elements = parser.elements,
        "Parsed XML document"
    );
    Ok(root)
}

/// Read and parse the XML file at `path`.
///
/// The path is passed to the filesystem unmodified. Read failures are
/// reported as [`Error::Io`](crate::Error::Io).
pub fn parse_file(path: impl AsRef<Path>) -> Result<Node> {
    let content = std::fs::read_to_string(path.as_ref())?;
    parse(&content)
}

/// Internal parser state.
struct XmlParser<'a> {
    /// The quick-xml reader.
    reader: Reader<&'a [u8]>,

    /// Stack of elements being built.
    stack: Vec<BuildNode>,

    /// Number of elements completed so far.
    elements: usize,
}

/// An element whose end tag has not been seen yet.
struct BuildNode {
    node: Node,

    /// Direct text accumulated so far, entities kept as written.
    text: String,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            stack: Vec::new(),
            elements: 0,
        }
    }

    fn parse(&mut self) -> Result<Node> {
        let mut root: Option<Node> = None;

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let node = self.start_node(&e)?;
                    self.stack.push(BuildNode {
                        node,
                        text: String::new(),
                    });
                }
                Ok(Event::End(e)) => {
                    let node = self.handle_end(&e)?;
                    self.attach(node, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let node = self.start_node(&e)?;
                    self.elements += 1;
                    self.attach(node, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    // Text outside the root element is ignored
                    if let Some(current) = self.stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e));
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(current) = self.stack.last_mut() {
                        let content = String::from_utf8_lossy(&e);
                        current.text.push_str(&escape(&*content));
                    }
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_) | Event::DocType(_)) => {
                    // Skip comments, processing instructions, declarations and DOCTYPE
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(ParseError::Syntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    }
                    .into());
                }
            }
        }

        if let Some(open) = self.stack.last() {
            return Err(ParseError::UnexpectedEof {
                expected: format!("closing tag </{}>", open.node.name()),
            }
            .into());
        }

        root.ok_or_else(|| ParseError::EmptyDocument.into())
    }

    fn start_node(&self, e: &BytesStart<'_>) -> Result<Node> {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let mut node = Node::new(name);

        for attr_result in e.attributes() {
            let attr = attr_result.map_err(ParseError::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value().map_err(|err| ParseError::Syntax {
                message: format!("Invalid attribute value: {}", err),
                position: Some(self.reader.buffer_position()),
            })?;
            node.set_attribute(key, value.into_owned());
        }

        Ok(node)
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) -> Result<Node> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        let BuildNode { mut node, text } =
            self.stack.pop().ok_or_else(|| ParseError::InvalidStructure {
                message: format!("Unexpected closing tag </{}>", end_name),
            })?;

        // Verify tag names match
        if node.name() != end_name {
            return Err(ParseError::MismatchedEndTag {
                expected: node.name().to_string(),
                found: end_name,
            }
            .into());
        }

        node.set_text(text);
        self.elements += 1;
        Ok(node)
    }

    /// Hand a completed element to its parent, or make it the root.
    fn attach(&mut self, node: Node, root: &mut Option<Node>) -> Result<()> {
        match self.stack.last_mut() {
            Some(parent) => {
                parent.node.add_child(node)?;
            }
            None if root.is_some() => return Err(ParseError::MultipleRoots.into()),
            None => *root = Some(node),
        }
        Ok(())
    }
}
