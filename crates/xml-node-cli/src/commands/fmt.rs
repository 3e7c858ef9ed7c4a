//! Fmt command implementation.
//!
//! Re-serializes a document with the library's writer. Whitespace-only text
//! and comments do not survive, and childless elements come out self-closing.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;
use xml_node::SerializeOptions;

/// Arguments for the fmt command
#[derive(Debug)]
pub struct FmtArgs {
    pub file: PathBuf,
    pub indent: Option<usize>,
    pub tabs: bool,
    pub no_declaration: bool,
    /// Output file; stdout when absent
    pub output: Option<PathBuf>,
}

impl FmtArgs {
    fn serialize_options(&self) -> SerializeOptions {
        SerializeOptions {
            indent_char: if self.tabs { b'\t' } else { b' ' },
            indent_size: self.indent.unwrap_or(if self.tabs { 1 } else { 2 }),
            declaration: !self.no_declaration,
            ..SerializeOptions::default()
        }
    }
}

/// Execute the fmt command
pub fn execute(args: FmtArgs) -> Result<()> {
    let root = xml_node::parse_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let options = args.serialize_options();

    match &args.output {
        Some(path) => {
            xml_node::write_file(&root, path, &options)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(input = %args.file.display(), output = %path.display(), "Formatted document");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            xml_node::write_to(&root, &mut lock, &options).context("Failed to write to stdout")?;
            lock.flush()?;
        }
    }

    Ok(())
}
