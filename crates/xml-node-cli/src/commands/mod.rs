//! Command implementations for the xmlnode CLI
//!
//! Each command module handles the CLI interface and delegates to
//! xml-node for parsing, querying and serialization.

pub mod fmt;
pub mod query;
