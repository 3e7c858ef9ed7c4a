//! In-memory XML node trees with indexed children.
//!
//! This crate provides a [`Node`] type for building and querying XML
//! documents ad hoc, plus parsing and serialization through [`quick-xml`].
//!
//! # Overview
//!
//! The main types are:
//! - [`Node`]: A named element with attributes, trimmed text and owned children
//! - [`NodeCollection`]: An ordered, optionally attribute-keyed view of nodes
//! - [`Attributes`]: The ordered attribute map of a node
//! - [`SerializeOptions`]: Output settings for [`serialize_with_options`]
//!
//! Every node groups its children by element name. Queries by name go through
//! that group, and a group may be indexed by one attribute to enforce unique
//! keys and allow keyed lookups.
//!
//! # Example
//!
//! ```rust
//! use xml_node::{Node, parse};
//!
//! let mut document = Node::new("config");
//! document
//!     .get_named_child("server", &[("host", "localhost")], true)
//!     .unwrap()
//!     .get_named_child("port", &[], true)
//!     .unwrap()
//!     .set_text("8080");
//!
//! let xml = document.serialize().unwrap();
//! let parsed = parse(&xml).unwrap();
//!
//! let server = parsed.named_child("server", &[("host", "localhost")]).unwrap();
//! assert_eq!(server.named_child("port", &[]).unwrap().text(), "8080");
//! ```
//!
//! # Get-or-create
//!
//! [`Node::get_named_children`] and [`Node::get_named_child`] take a
//! `create_if_missing` flag. When set and nothing matches, a child with the
//! requested name and attributes is appended first, so incremental builders
//! need no separate "exists?" branch. [`Node::get_named_child`] requires
//! exactly one match and reports [`Error::CardinalityMismatch`] otherwise.

pub mod collection;
pub mod error;
mod index;
pub mod node;
pub mod parser;
pub mod writer;

// Re-export main types
pub use collection::NodeCollection;
pub use error::{Error, ParseError, Result};
pub use node::{AttributeFilter, Attributes, Node};
pub use parser::{parse, parse_file};
pub use writer::{SerializeOptions, serialize, serialize_with_options, write_file, write_to};
