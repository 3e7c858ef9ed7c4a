//! Query command implementation.
//!
//! A query is a list of steps walked from the root element. Each step names
//! a child element and optionally a set of attributes it must carry:
//!
//! ```text
//! xmlnode query pizza.xml ingredient[name=cheese]
//! xmlnode query style.xml locale terms term[name=editor,form=short]
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};
use xml_node::{Node, SerializeOptions};

/// Arguments for the query command
#[derive(Debug)]
pub struct QueryArgs {
    pub file: PathBuf,
    pub steps: Vec<String>,
}

/// One parsed query step.
#[derive(Debug, PartialEq, Eq)]
struct Step {
    name: String,
    attributes: Vec<(String, String)>,
}

impl Step {
    fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        let (name, filter) = match source.split_once('[') {
            Some((name, rest)) => {
                let Some(filter) = rest.strip_suffix(']') else {
                    bail!("Unterminated attribute filter in step '{}'", source);
                };
                (name, Some(filter))
            }
            None => (source, None),
        };

        if name.is_empty() {
            bail!("Step '{}' has no element name", source);
        }

        let mut attributes = Vec::new();
        for pair in filter.into_iter().flat_map(|f| f.split(',')) {
            let pair = pair.trim();
            if pair.is_empty() {
                continue;
            }
            let Some((key, value)) = pair.split_once('=') else {
                bail!("Expected key=value in step '{}', got '{}'", source, pair);
            };
            attributes.push((key.trim().to_string(), value.trim().to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            attributes,
        })
    }

    /// Replace `current` with the matching named children of each node in it.
    fn apply<'a>(&self, current: &[&'a Node]) -> Vec<&'a Node> {
        let filter: Vec<(&str, &str)> = self
            .attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();

        current
            .iter()
            .copied()
            .flat_map(|node| node.named_children(&self.name, &filter).into_iter())
            .collect()
    }
}

/// Follow `steps` from `root`, returning every node reached by the last one.
fn run_query<'a>(root: &'a Node, steps: &[Step]) -> Vec<&'a Node> {
    let mut current = vec![root];
    for step in steps {
        current = step.apply(&current);
        debug!(step = %step.name, matches = current.len(), "Applied query step");
    }
    current
}

/// Execute the query command
pub fn execute(args: QueryArgs) -> Result<()> {
    let steps = args
        .steps
        .iter()
        .map(|step| Step::parse(step))
        .collect::<Result<Vec<_>>>()?;

    let root = xml_node::parse_file(&args.file)
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    let matches = run_query(&root, &steps);

    let options = SerializeOptions {
        declaration: false,
        ..SerializeOptions::default()
    };
    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    for node in &matches {
        xml_node::write_to(node, &mut lock, &options).context("Failed to write to stdout")?;
    }
    lock.flush()?;

    info!(matches = matches.len(), "Query complete");
    Ok(())
}
