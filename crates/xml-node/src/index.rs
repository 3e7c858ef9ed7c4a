//! Attribute-keyed uniqueness index.
//!
//! Shared by the named child groups of a [`Node`] and by free-standing
//! [`NodeCollection`](crate::NodeCollection)s. Keys map to positions within
//! the owning sequence, never to the nodes themselves.

use std::collections::HashMap;

use crate::{Error, Node, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AttributeIndex {
    attribute: String,
    keys: HashMap<String, usize>,
}

impl AttributeIndex {
    /// Build an index over `nodes`, in order.
    ///
    /// Fails on the first node lacking `attribute` or repeating a value; no
    /// partially built index escapes.
    pub(crate) fn build<'n, I>(attribute: &str, nodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'n Node>,
    {
        let mut index = Self {
            attribute: attribute.to_string(),
            keys: HashMap::new(),
        };

        for (position, node) in nodes.into_iter().enumerate() {
            let key = index.key_for(node)?.to_string();
            index.keys.insert(key, position);
        }

        tracing::trace!(
            attribute,
            entries = index.keys.len(),
            "Built attribute index"
        );
        Ok(index)
    }

    /// Re-key an already validated subset of nodes under the same attribute.
    pub(crate) fn project(&self, nodes: &[&Node]) -> Self {
        let keys = nodes
            .iter()
            .enumerate()
            .filter_map(|(position, node)| {
                node.attributes()
                    .get(&self.attribute)
                    .map(|key| (key.clone(), position))
            })
            .collect();

        Self {
            attribute: self.attribute.clone(),
            keys,
        }
    }

    pub(crate) fn attribute(&self) -> &str {
        &self.attribute
    }

    /// Check that `node` may join the index and return its key.
    pub(crate) fn key_for<'n>(&self, node: &'n Node) -> Result<&'n str> {
        let key = node.attributes().get(&self.attribute).ok_or_else(|| {
            Error::MissingIndexAttribute {
                attribute: self.attribute.clone(),
                node: node.name().to_string(),
            }
        })?;

        if self.keys.contains_key(key) {
            return Err(Error::DuplicateIndexValue {
                attribute: self.attribute.clone(),
                value: key.clone(),
            });
        }

        Ok(key.as_str())
    }

    pub(crate) fn insert(&mut self, key: &str, position: usize) {
        self.keys.insert(key.to_string(), position);
    }

    pub(crate) fn position(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }
}
