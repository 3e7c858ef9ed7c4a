//! Ordered, optionally attribute-indexed collections of borrowed nodes.

use crate::index::AttributeIndex;
use crate::node::AttributeFilter;
use crate::{Error, Node, Result};

/// An ordered sequence of node references.
///
/// A collection starts unindexed. [`NodeCollection::index_by_attribute`]
/// turns it into a keyed collection: from then on every member must carry
/// the index attribute and its values must be unique. There is no way back
/// to unindexed, but re-indexing by another attribute is allowed.
///
/// Membership is by identity: the same node can only be recognised through
/// the same reference, not through an equal copy.
#[derive(Debug, Clone, Default)]
pub struct NodeCollection<'a> {
    nodes: Vec<&'a Node>,
    index: Option<AttributeIndex>,
}

impl<'a> NodeCollection<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(nodes: Vec<&'a Node>, index: Option<AttributeIndex>) -> Self {
        Self { nodes, index }
    }

    /// The attribute this collection is keyed by, if any.
    pub fn index_by(&self) -> Option<&str> {
        self.index.as_ref().map(AttributeIndex::attribute)
    }

    /// Append `node` at the end.
    ///
    /// Unindexed collections accept anything. Indexed ones require the index
    /// attribute with an unused value.
    pub fn push(&mut self, node: &'a Node) -> Result<()> {
        let position = self.nodes.len();
        if let Some(index) = self.index.as_mut() {
            let key = index.key_for(node)?;
            index.insert(key, position);
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Append `node` under an explicit key.
    ///
    /// Only valid on an indexed collection, and `key` must equal the node's
    /// own value for the index attribute.
    pub fn insert_indexed(&mut self, key: &str, node: &'a Node) -> Result<()> {
        let index = self.index.as_ref().ok_or_else(|| Error::NotIndexed {
            context: format!("inserting under the key '{}'", key),
        })?;

        if let Some(actual) = node.attributes().get(index.attribute()) {
            if actual != key {
                return Err(Error::KeyMismatch {
                    key: key.to_string(),
                    attribute: index.attribute().to_string(),
                    actual: actual.clone(),
                });
            }
        }

        self.push(node)
    }

    /// Key the collection by `attribute`, re-validating every member.
    ///
    /// On failure the collection keeps its previous index state.
    pub fn index_by_attribute(&mut self, attribute: &str) -> Result<&mut Self> {
        let index = AttributeIndex::build(attribute, self.nodes.iter().copied())?;
        self.index = Some(index);
        Ok(self)
    }

    /// Keyed lookup. Fails when the collection is not indexed.
    pub fn get(&self, key: &str) -> Result<Option<&'a Node>> {
        let index = self.index.as_ref().ok_or_else(|| Error::NotIndexed {
            context: format!("looking up the key '{}'", key),
        })?;
        Ok(index.position(key).map(|position| self.nodes[position]))
    }

    /// Positional lookup.
    pub fn get_by_index(&self, position: usize) -> Option<&'a Node> {
        self.nodes.get(position).copied()
    }

    /// Members accepted by `predicate`, in order.
    ///
    /// The result keeps this collection's index attribute.
    pub fn filter<F>(&self, mut predicate: F) -> NodeCollection<'a>
    where
        F: FnMut(&Node) -> bool,
    {
        let nodes: Vec<&'a Node> = self
            .nodes
            .iter()
            .copied()
            .filter(|node| predicate(node))
            .collect();
        let index = self.index.as_ref().map(|index| index.project(&nodes));

        NodeCollection { nodes, index }
    }

    /// Members whose `name` attribute equals `value`.
    pub fn filter_by_attribute(&self, name: &str, value: &str) -> NodeCollection<'a> {
        self.filter(|node| node.attributes().get(name).is_some_and(|v| v == value))
    }

    /// Members carrying every given attribute with the given value.
    pub fn filter_by_attributes(&self, attributes: &AttributeFilter<'_>) -> NodeCollection<'a> {
        self.filter(|node| node.matches_attributes(attributes))
    }

    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes.iter().copied()
    }

    pub fn first(&self) -> Result<&'a Node> {
        self.nodes
            .first()
            .copied()
            .ok_or(Error::EmptyCollection { operation: "first" })
    }

    pub fn last(&self) -> Result<&'a Node> {
        self.nodes
            .last()
            .copied()
            .ok_or(Error::EmptyCollection { operation: "last" })
    }

    /// Remove and return the last member.
    pub fn pop(&mut self) -> Result<&'a Node> {
        let node = self
            .nodes
            .pop()
            .ok_or(Error::EmptyCollection { operation: "pop" })?;
        self.reindex();
        Ok(node)
    }

    /// Remove the first occurrence of `node` (by identity).
    ///
    /// Returns whether anything was removed.
    pub fn remove(&mut self, node: &Node) -> bool {
        let Some(position) = self.nodes.iter().position(|n| std::ptr::eq(*n, node)) else {
            return false;
        };
        self.nodes.remove(position);
        self.reindex();
        true
    }

    /// Whether `node` itself (not an equal copy) is a member.
    pub fn contains(&self, node: &Node) -> bool {
        self.nodes.iter().any(|n| std::ptr::eq(*n, node))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn reindex(&mut self) {
        if let Some(index) = self.index.as_ref() {
            self.index = Some(index.project(&self.nodes));
        }
    }
}

impl<'a> From<Vec<&'a Node>> for NodeCollection<'a> {
    fn from(nodes: Vec<&'a Node>) -> Self {
        Self { nodes, index: None }
    }
}

impl<'a> IntoIterator for NodeCollection<'a> {
    type Item = &'a Node;
    type IntoIter = std::vec::IntoIter<&'a Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a, 'c> IntoIterator for &'c NodeCollection<'a> {
    type Item = &'a Node;
    type IntoIter = std::iter::Copied<std::slice::Iter<'c, &'a Node>>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter().copied()
    }
}
