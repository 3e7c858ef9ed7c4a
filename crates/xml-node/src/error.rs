//! Error types for building, querying and (de)serializing node trees.

use thiserror::Error;

/// Result type alias for xml-node operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the node tree and by the XML text boundary.
///
/// The data-model variants are programmer or data errors surfaced at the
/// point of misuse. `Parse`, `Io` and `Xml` come from the text engine and
/// are passed through as-is.
#[derive(Debug, Error)]
pub enum Error {
    /// A keyed operation was attempted on a collection without an index attribute.
    #[error("{context}: the collection is not indexed by any attribute")]
    NotIndexed { context: String },

    /// A node joining an indexed collection lacks the index attribute.
    #[error(
        "A collection indexed by the attribute '{attribute}' was given a <{node}> that doesn't have it"
    )]
    MissingIndexAttribute { attribute: String, node: String },

    /// Two nodes in one indexed collection would share the same key.
    #[error(
        "Nodes indexed by the attribute '{attribute}' must be unique, but '{value}' is repeated"
    )]
    DuplicateIndexValue { attribute: String, value: String },

    /// An exactly-one lookup matched zero or several children.
    #[error(
        "Expected exactly one <{name}> matching {}, but found {count}. Maybe it wasn't asked to be created if missing?",
        format_filter(.attributes)
    )]
    CardinalityMismatch {
        name: String,
        attributes: Vec<(String, String)>,
        count: usize,
    },

    /// Attribute lookup for a key the node does not carry.
    #[error("<{node}> has no attribute '{attribute}'")]
    MissingAttribute { node: String, attribute: String },

    /// An accessor that must return a node was called on an empty collection.
    #[error("{operation}() called on an empty collection")]
    EmptyCollection { operation: &'static str },

    /// An explicit key disagrees with the node's own index attribute.
    #[error("Key '{key}' does not match the node's '{attribute}' attribute ('{actual}')")]
    KeyMismatch {
        key: String,
        attribute: String,
        actual: String,
    },

    /// A node with an empty name cannot be written as an element.
    #[error("Cannot serialize an element with an empty name")]
    EmptyElementName,

    /// The XML text could not be turned into a tree.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// Reading or writing the underlying file or stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The XML writer reported a failure.
    #[error("XML writer error: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Failures reported while reading XML text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// XML syntax error from quick-xml.
    #[error("XML syntax error: {message}{}", .position.map(|p| format!(" at byte {p}")).unwrap_or_default())]
    Syntax {
        message: String,
        /// Byte offset where the error occurred.
        position: Option<u64>,
    },

    /// Input ended while an element was still open.
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    /// End tag does not close the innermost open element.
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    /// Structurally invalid document (e.g. a stray closing tag).
    #[error("Invalid XML structure: {message}")]
    InvalidStructure { message: String },

    /// No root element.
    #[error("Empty XML document: no root element found")]
    EmptyDocument,

    /// More than one top-level element.
    #[error("Invalid XML: multiple root elements")]
    MultipleRoots,
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Syntax {
            message: err.to_string(),
            position: None,
        }
    }
}

impl From<quick_xml::events::attributes::AttrError> for ParseError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        ParseError::Syntax {
            message: format!("Attribute error: {}", err),
            position: None,
        }
    }
}

fn format_filter(attributes: &[(String, String)]) -> String {
    if attributes.is_empty() {
        return "no attributes".to_string();
    }
    let pairs: Vec<String> = attributes
        .iter()
        .map(|(name, value)| format!("{}=\"{}\"", name, value))
        .collect();
    format!("[{}]", pairs.join(", "))
}
