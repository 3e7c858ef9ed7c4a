//! The node tree: named elements with attributes, text and indexed children.

use indexmap::IndexMap;

use crate::index::AttributeIndex;
use crate::{Error, NodeCollection, Result};

/// Attributes of a node, in insertion order.
///
/// Keys are unique. Values are always strings; callers convert numbers and
/// other values when setting them.
pub type Attributes = IndexMap<String, String>;

/// An attribute filter used by the named-children queries.
///
/// A child matches when it carries every listed key with the same value.
/// Extra attributes on the child are allowed.
pub type AttributeFilter<'f> = [(&'f str, &'f str)];

/// A named XML element owning its children.
///
/// Besides the ordered `children`, every node keeps a per-name group of its
/// children so lookups by element name do not scan siblings. A group can be
/// additionally indexed by one attribute, which then must be present and
/// unique on every member.
///
/// # Example
///
/// ```rust
/// use xml_node::Node;
///
/// let mut pizza = Node::new("pizza");
/// pizza.add_child(Node::new("ingredient").with_attribute("name", "peperoni")).unwrap();
/// pizza.add_child(Node::new("ingredient").with_attribute("name", "cheese")).unwrap();
/// pizza.add_child(Node::new("slice")).unwrap();
///
/// assert_eq!(pizza.named_children("ingredient", &[]).len(), 2);
///
/// pizza.index_by_attribute("ingredient", "name").unwrap();
/// let peperoni = pizza.indexed_child("ingredient", "peperoni").unwrap().unwrap();
/// assert_eq!(peperoni.attribute("name").unwrap(), "peperoni");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    name: String,
    attributes: Attributes,
    text: String,
    children: Vec<Node>,
    groups: IndexMap<String, ChildGroup>,
}

/// Positions in `Node::children` of the children sharing one name.
#[derive(Debug, Clone, Default, PartialEq)]
struct ChildGroup {
    positions: Vec<usize>,
    index: Option<AttributeIndex>,
}

impl Node {
    /// Create a node with no attributes, text or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Attributes::new(),
            text: String::new(),
            children: Vec::new(),
            groups: IndexMap::new(),
        }
    }

    /// Builder-style attribute setter.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder-style setter for several attributes, kept in iteration order.
    pub fn with_attributes<I, K, V>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (name, value) in attributes {
            self.set_attribute(name, value);
        }
        self
    }

    /// Builder-style text setter. The text is trimmed.
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        self.set_text(text);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct text content, already trimmed.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text content, trimming leading and trailing whitespace.
    pub fn set_text(&mut self, text: impl AsRef<str>) {
        self.text = text.as_ref().trim().to_string();
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Get an attribute value, failing if the node doesn't have it.
    pub fn attribute(&self, name: &str) -> Result<&str> {
        self.attributes
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| Error::MissingAttribute {
                node: self.name.clone(),
                attribute: name.to_string(),
            })
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Create or overwrite an attribute. A new attribute goes last.
    ///
    /// Changing the attribute a parent group is indexed by is not tracked by
    /// that index. Keyed lookups skip a member whose attribute no longer
    /// matches its key, but the old key stays reserved, so adding a sibling
    /// with that value is still rejected. Call [`Node::index_by_attribute`]
    /// on the parent to re-key.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, returning its value. Absent attributes are a no-op.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// All children in insertion order.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Every named group of children, in order of first appearance.
    pub fn named_groups(&self) -> impl Iterator<Item = (&str, NodeCollection<'_>)> + '_ {
        self.groups
            .iter()
            .map(|(name, group)| (name.as_str(), self.group_view(group)))
    }

    /// Append `child` and register it in the group for its name.
    ///
    /// When that group is indexed by an attribute, the child must carry the
    /// attribute with a value not already used in the group. On failure
    /// neither `children` nor the group is modified.
    pub fn add_child(&mut self, child: Node) -> Result<&mut Node> {
        let position = self.children.len();
        let group = self.groups.entry(child.name.clone()).or_default();

        if let Some(index) = group.index.as_mut() {
            let key = index.key_for(&child)?.to_string();
            index.insert(&key, group.positions.len());
        }

        group.positions.push(position);
        self.children.push(child);
        Ok(&mut self.children[position])
    }

    /// Index the children named `child_name` by `attribute`.
    ///
    /// The group is created empty if no such child exists yet, so later
    /// insertions are validated. Calling it again re-keys the group by the
    /// new attribute. If any member lacks the attribute or two members share
    /// a value, the previous index state is kept.
    pub fn index_by_attribute(&mut self, child_name: &str, attribute: &str) -> Result<&mut Self> {
        let children = &self.children;
        let group = self.groups.entry(child_name.to_string()).or_default();

        let index = AttributeIndex::build(
            attribute,
            group.positions.iter().map(|&position| &children[position]),
        )?;
        group.index = Some(index);

        Ok(self)
    }

    /// Children named `child_name` whose attributes include every pair in
    /// `attributes`. Returns an empty collection when nothing matches.
    pub fn named_children(&self, child_name: &str, attributes: &AttributeFilter<'_>) -> NodeCollection<'_> {
        match self.groups.get(child_name) {
            Some(group) => {
                let all = self.group_view(group);
                if attributes.is_empty() {
                    all
                } else {
                    all.filter_by_attributes(attributes)
                }
            }
            None => NodeCollection::new(),
        }
    }

    /// Like [`Node::named_children`], but when nothing matches and
    /// `create_if_missing` is set, first appends a new child named
    /// `child_name` carrying `attributes`.
    pub fn get_named_children(
        &mut self,
        child_name: &str,
        attributes: &AttributeFilter<'_>,
        create_if_missing: bool,
    ) -> Result<NodeCollection<'_>> {
        if create_if_missing && self.matching_positions(child_name, attributes).is_empty() {
            self.create_child(child_name, attributes)?;
        }

        Ok(self.named_children(child_name, attributes))
    }

    /// The single child named `child_name` matching `attributes`.
    ///
    /// Fails with [`Error::CardinalityMismatch`] unless exactly one child
    /// matches.
    pub fn named_child(&self, child_name: &str, attributes: &AttributeFilter<'_>) -> Result<&Node> {
        let positions = self.matching_positions(child_name, attributes);
        match positions.as_slice() {
            [position] => Ok(&self.children[*position]),
            _ => Err(cardinality_error(child_name, attributes, positions.len())),
        }
    }

    /// Get-or-create counterpart of [`Node::named_child`].
    ///
    /// With `create_if_missing`, a missing child is created so the call
    /// always yields exactly one node unless several already match. The
    /// returned reference allows building further beneath it.
    pub fn get_named_child(
        &mut self,
        child_name: &str,
        attributes: &AttributeFilter<'_>,
        create_if_missing: bool,
    ) -> Result<&mut Node> {
        let positions = self.matching_positions(child_name, attributes);
        match positions.as_slice() {
            [position] => Ok(&mut self.children[*position]),
            [] if create_if_missing => self.create_child(child_name, attributes),
            _ => Err(cardinality_error(child_name, attributes, positions.len())),
        }
    }

    /// Keyed lookup in a group indexed by an attribute.
    ///
    /// Fails with [`Error::NotIndexed`] when the children named `child_name`
    /// are not indexed.
    pub fn indexed_child(&self, child_name: &str, value: &str) -> Result<Option<&Node>> {
        let (group, index) = self.indexed_group(child_name)?;
        Ok(index
            .position(value)
            .map(|ordinal| &self.children[group.positions[ordinal]])
            .filter(|child| child.carries_key(index, value)))
    }

    /// Keyed get-or-create.
    ///
    /// When the key is absent and `create_if_missing` is set, a child named
    /// `child_name` with only the index attribute set to `value` is appended.
    /// A key held by a member whose attribute has since changed yields `None`.
    pub fn get_indexed_child(
        &mut self,
        child_name: &str,
        value: &str,
        create_if_missing: bool,
    ) -> Result<Option<&mut Node>> {
        let (group, index) = self.indexed_group(child_name)?;

        if let Some(ordinal) = index.position(value) {
            let position = group.positions[ordinal];
            if !self.children[position].carries_key(index, value) {
                return Ok(None);
            }
            return Ok(Some(&mut self.children[position]));
        }

        if !create_if_missing {
            return Ok(None);
        }

        let child = Node::new(child_name).with_attribute(index.attribute(), value);
        tracing::debug!(parent = %self.name, child = child_name, value, "Creating missing indexed child");
        self.add_child(child).map(Some)
    }

    /// Serialize this node as a standalone document with default options.
    pub fn serialize(&self) -> Result<String> {
        crate::writer::serialize(self)
    }

    fn group_view<'a>(&'a self, group: &ChildGroup) -> NodeCollection<'a> {
        let nodes = group
            .positions
            .iter()
            .map(|&position| &self.children[position])
            .collect();
        NodeCollection::from_parts(nodes, group.index.clone())
    }

    fn indexed_group(&self, child_name: &str) -> Result<(&ChildGroup, &AttributeIndex)> {
        self.groups
            .get(child_name)
            .and_then(|group| group.index.as_ref().map(|index| (group, index)))
            .ok_or_else(|| Error::NotIndexed {
                context: format!("children named <{}>", child_name),
            })
    }

    fn matching_positions(&self, child_name: &str, attributes: &AttributeFilter<'_>) -> Vec<usize> {
        let Some(group) = self.groups.get(child_name) else {
            return Vec::new();
        };

        group
            .positions
            .iter()
            .copied()
            .filter(|&position| self.children[position].matches_attributes(attributes))
            .collect()
    }

    fn create_child(&mut self, child_name: &str, attributes: &AttributeFilter<'_>) -> Result<&mut Node> {
        tracing::debug!(parent = %self.name, child = child_name, "Creating missing child");
        let child = Node::new(child_name).with_attributes(attributes.iter().copied());
        self.add_child(child)
    }

    fn carries_key(&self, index: &AttributeIndex, value: &str) -> bool {
        self.attributes.get(index.attribute()).is_some_and(|v| v == value)
    }

    pub(crate) fn matches_attributes(&self, attributes: &AttributeFilter<'_>) -> bool {
        attributes
            .iter()
            .all(|(name, value)| self.attributes.get(*name).is_some_and(|v| v == value))
    }
}

fn cardinality_error(child_name: &str, attributes: &AttributeFilter<'_>, count: usize) -> Error {
    Error::CardinalityMismatch {
        name: child_name.to_string(),
        attributes: attributes
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
        count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pizza() -> Node {
        let mut pizza = Node::new("pizza");
        pizza
            .add_child(Node::new("ingredient").with_attribute("name", "peperoni"))
            .unwrap();
        pizza
            .add_child(
                Node::new("ingredient").with_attributes([("name", "cheese"), ("type", "cheddar")]),
            )
            .unwrap();
        pizza
            .add_child(
                Node::new("ingredient").with_attributes([("name", "cheese"), ("type", "gouda")]),
            )
            .unwrap();
        pizza.add_child(Node::new("slice")).unwrap();
        pizza
    }

    #[test]
    fn test_new_trims_text() {
        let node = Node::new("father").with_text("  Jose \n");
        assert_eq!(node.name(), "father");
        assert_eq!(node.text(), "Jose");
        assert!(node.children().is_empty());
        assert!(node.attributes().is_empty());
    }

    #[test]
    fn test_attribute_access() {
        let mut city = Node::new("city");
        let mut car = Node::new("car").with_attribute("make", "Seat");

        assert!(!city.has_attribute("name"));
        city.set_attribute("name", "London");
        assert!(city.has_attribute("name"));
        assert!(car.has_attribute("make"));
        assert_eq!(city.attribute("name").unwrap(), "London");

        assert_eq!(city.remove_attribute("name"), Some("London".to_string()));
        assert!(!city.has_attribute("name"));
        assert_eq!(city.remove_attribute("population"), None);

        car.remove_attribute("make");
        assert!(!car.has_attribute("make"));

        let mut cave = Node::new("cave");
        cave.set_attribute("altitude", "1000m");
        assert_eq!(cave.attribute("altitude").unwrap(), "1000m");
        cave.set_attribute("altitude", 800.to_string() + "m");
        assert_eq!(cave.attribute("altitude").unwrap(), "800m");
    }

    #[test]
    fn test_missing_attribute() {
        let node = Node::new("fail");
        let err = node.attribute("name").unwrap_err();
        assert!(matches!(
            err,
            Error::MissingAttribute { ref node, ref attribute } if node == "fail" && attribute == "name"
        ));
    }

    #[test]
    fn test_set_attribute_keeps_order() {
        let mut node = Node::new("a").with_attributes([("x", "1"), ("y", "2")]);
        node.set_attribute("x", "3");
        node.set_attribute("z", "4");
        let keys: Vec<&str> = node.attributes().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_add_child_groups_by_name() {
        let pizza = pizza();

        assert_eq!(pizza.children().len(), 4);
        let ingredients = pizza.named_children("ingredient", &[]);
        assert_eq!(ingredients.len(), 3);
        assert!(std::ptr::eq(ingredients.first().unwrap(), &pizza.children()[0]));
        assert!(std::ptr::eq(ingredients.last().unwrap(), &pizza.children()[2]));

        let slices = pizza.named_children("slice", &[]);
        assert_eq!(slices.len(), 1);
        assert!(std::ptr::eq(slices.first().unwrap(), &pizza.children()[3]));
    }

    #[test]
    fn test_add_child_returns_child() {
        let mut family = Node::new("family");
        let father = family.add_child(Node::new("father")).unwrap();
        father.add_child(Node::new("car")).unwrap();

        assert_eq!(family.children()[0].children().len(), 1);
    }

    #[test]
    fn test_named_groups_in_first_appearance_order() {
        let pizza = pizza();
        let names: Vec<(&str, usize)> = pizza
            .named_groups()
            .map(|(name, nodes)| (name, nodes.len()))
            .collect();
        assert_eq!(names, vec![("ingredient", 3), ("slice", 1)]);
    }

    #[test]
    fn test_index_by_attribute() {
        let mut pizza = Node::new("pizza");
        pizza
            .add_child(Node::new("ingredient").with_attribute("name", "peperoni"))
            .unwrap();
        pizza
            .add_child(Node::new("ingredient").with_attribute("name", "cheese"))
            .unwrap();
        pizza.add_child(Node::new("slice")).unwrap();

        let ingredients = pizza.named_children("ingredient", &[]);
        assert!(matches!(ingredients.get("cheese"), Err(Error::NotIndexed { .. })));

        pizza.index_by_attribute("ingredient", "name").unwrap();

        assert_eq!(pizza.named_children("ingredient", &[]).len(), 2);
        assert_eq!(pizza.named_children("slice", &[]).len(), 1);

        let peperoni = pizza.indexed_child("ingredient", "peperoni").unwrap().unwrap();
        assert!(std::ptr::eq(peperoni, &pizza.children()[0]));
        assert!(pizza.indexed_child("ingredient", "cheese").unwrap().is_some());
        assert!(pizza.indexed_child("ingredient", "sweetcorn").unwrap().is_none());

        let ingredients = pizza.named_children("ingredient", &[]);
        assert_eq!(ingredients.index_by(), Some("name"));
        assert!(std::ptr::eq(
            ingredients.get("cheese").unwrap().unwrap(),
            &pizza.children()[1]
        ));
    }

    #[test]
    fn test_index_by_attribute_with_no_nodes() {
        let mut pizza = Node::new("pizza");
        pizza.index_by_attribute("ingredient", "name").unwrap();
        pizza
            .add_child(Node::new("ingredient").with_attribute("name", "peperoni"))
            .unwrap();

        let peperoni = pizza.indexed_child("ingredient", "peperoni").unwrap().unwrap();
        assert_eq!(peperoni.attribute("name").unwrap(), "peperoni");
    }

    #[test]
    fn test_index_by_attribute_collision_keeps_previous_state() {
        let mut pizza = Node::new("pizza");
        let peperoni = Node::new("ingredient").with_attribute("name", "peperoni");
        pizza.add_child(peperoni.clone()).unwrap();
        pizza.add_child(peperoni).unwrap();

        let result = pizza.index_by_attribute("ingredient", "name");
        assert!(matches!(result, Err(Error::DuplicateIndexValue { .. })));
        assert_eq!(pizza.named_children("ingredient", &[]).index_by(), None);
        assert!(matches!(
            pizza.indexed_child("ingredient", "peperoni"),
            Err(Error::NotIndexed { .. })
        ));
    }

    #[test]
    fn test_index_by_attribute_missing_attribute() {
        let mut pizza = Node::new("pizza");
        pizza
            .add_child(Node::new("ingredient").with_attribute("name", "peperoni"))
            .unwrap();

        let result = pizza.index_by_attribute("ingredient", "quality");
        assert!(matches!(result, Err(Error::MissingIndexAttribute { .. })));
    }

    #[test]
    fn test_add_child_to_indexed_group_requires_attribute() {
        let mut pizza = Node::new("pizza");
        pizza.index_by_attribute("ingredient", "name").unwrap();

        let result = pizza.add_child(Node::new("ingredient").with_attribute("quality", "high"));
        assert!(matches!(result, Err(Error::MissingIndexAttribute { .. })));
        assert!(pizza.children().is_empty());
        assert!(pizza.named_children("ingredient", &[]).is_empty());
    }

    #[test]
    fn test_add_child_to_indexed_group_rejects_duplicate() {
        let mut pizza = Node::new("pizza");
        pizza.index_by_attribute("ingredient", "name").unwrap();
        pizza
            .add_child(Node::new("ingredient").with_attribute("name", "cheese"))
            .unwrap();

        let result = pizza.add_child(Node::new("ingredient").with_attribute("name", "cheese"));
        assert!(matches!(result, Err(Error::DuplicateIndexValue { .. })));
        assert_eq!(pizza.children().len(), 1);
        assert_eq!(pizza.named_children("ingredient", &[]).len(), 1);
    }

    #[test]
    fn test_reindex_by_other_attribute() {
        let mut pizza = Node::new("pizza");
        pizza
            .add_child(Node::new("ingredient").with_attributes([("name", "cheese"), ("type", "cheddar")]))
            .unwrap();
        pizza
            .add_child(Node::new("ingredient").with_attributes([("name", "ham"), ("type", "york")]))
            .unwrap();

        pizza.index_by_attribute("ingredient", "name").unwrap();
        pizza.index_by_attribute("ingredient", "type").unwrap();

        assert!(pizza.indexed_child("ingredient", "york").unwrap().is_some());
        assert!(pizza.indexed_child("ingredient", "ham").unwrap().is_none());
    }

    #[test]
    fn test_named_children_filtering() {
        let mut pizza = pizza();

        let ingredients = pizza.named_children("ingredient", &[]);
        assert!(ingredients.contains(&pizza.children()[0]));
        assert!(!ingredients.contains(&pizza.children()[3]));

        let cheeses = pizza.named_children("ingredient", &[("name", "cheese")]);
        assert_eq!(cheeses.len(), 2);
        assert_eq!(cheeses.last().unwrap().attribute("type").unwrap(), "gouda");

        assert!(pizza.named_children("eaters", &[]).is_empty());
        assert!(pizza.named_children("ingredient", &[("name", "sweetcorn")]).is_empty());

        assert!(
            pizza
                .get_named_children("ingredient", &[("name", "sweetcorn")], false)
                .unwrap()
                .is_empty()
        );
        assert_eq!(pizza.children().len(), 4);

        let sweetcorn = pizza
            .get_named_children("ingredient", &[("name", "sweetcorn")], true)
            .unwrap();
        assert_eq!(sweetcorn.len(), 1);

        let eaters = pizza.get_named_children("eater", &[], true).unwrap();
        assert_eq!(eaters.len(), 1);
        assert_eq!(pizza.children().len(), 6);
    }

    #[test]
    fn test_get_named_children_returns_existing_without_creating() {
        let mut pizza = pizza();
        let cheeses = pizza
            .get_named_children("ingredient", &[("name", "cheese")], true)
            .unwrap();
        assert_eq!(cheeses.len(), 2);
        assert_eq!(pizza.children().len(), 4);
    }

    #[test]
    fn test_named_child() {
        let mut pizza = pizza();

        let slice = pizza.named_child("slice", &[]).unwrap();
        assert!(std::ptr::eq(slice, &pizza.children()[3]));

        let peperoni = pizza.named_child("ingredient", &[("name", "peperoni")]).unwrap();
        assert!(std::ptr::eq(peperoni, &pizza.children()[0]));

        let eater = pizza.get_named_child("eater", &[], true).unwrap();
        assert_eq!(eater.name(), "eater");
        assert!(eater.attributes().is_empty());
        assert!(eater.children().is_empty());

        assert_eq!(pizza.children().len(), 5);
        assert!(pizza.get_named_child("eater", &[], true).is_ok());
        assert_eq!(pizza.children().len(), 5);
    }

    #[test]
    fn test_named_child_invalid_number_of_matches() {
        let mut pizza = pizza();

        let err = pizza
            .get_named_child("ingredient", &[("name", "cheese")], true)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::CardinalityMismatch { ref name, count: 2, .. } if name == "ingredient"
        ));

        let err = pizza.named_child("eater", &[]).unwrap_err();
        assert!(matches!(err, Error::CardinalityMismatch { count: 0, .. }));
    }

    #[test]
    fn test_get_named_child_creates_with_attributes() {
        let mut config = Node::new("config");
        config
            .get_named_child("server", &[("host", "localhost")], true)
            .unwrap()
            .get_named_child("port", &[], true)
            .unwrap()
            .set_text("8080");

        let server = config.named_child("server", &[("host", "localhost")]).unwrap();
        assert_eq!(server.named_child("port", &[]).unwrap().text(), "8080");
    }

    #[test]
    fn test_get_named_child_in_indexed_group_needs_index_attribute() {
        let mut pizza = Node::new("pizza");
        pizza.index_by_attribute("ingredient", "name").unwrap();

        let result = pizza.get_named_child("ingredient", &[("type", "gouda")], true);
        assert!(matches!(result, Err(Error::MissingIndexAttribute { .. })));
        assert!(pizza.children().is_empty());
    }

    #[test]
    fn test_get_indexed_child() {
        let mut pizza = Node::new("pizza");
        pizza.index_by_attribute("ingredient", "name").unwrap();

        assert!(pizza.get_indexed_child("ingredient", "ham", false).unwrap().is_none());

        let ham = pizza.get_indexed_child("ingredient", "ham", true).unwrap().unwrap();
        assert_eq!(ham.attribute("name").unwrap(), "ham");
        ham.set_attribute("sliced", "yes");

        assert_eq!(pizza.children().len(), 1);
        let again = pizza.get_indexed_child("ingredient", "ham", true).unwrap().unwrap();
        assert_eq!(again.attribute("sliced").unwrap(), "yes");
        assert_eq!(pizza.children().len(), 1);
        assert_eq!(pizza.named_children("ingredient", &[]).len(), 1);
    }

    #[test]
    fn test_indexed_lookup_skips_member_whose_key_changed() {
        let mut pizza = Node::new("pizza");
        pizza.index_by_attribute("ingredient", "name").unwrap();
        pizza
            .get_indexed_child("ingredient", "ham", true)
            .unwrap()
            .unwrap()
            .remove_attribute("name");

        assert!(pizza.indexed_child("ingredient", "ham").unwrap().is_none());
        assert!(pizza.get_indexed_child("ingredient", "ham", false).unwrap().is_none());

        // The key stays taken until the group is re-keyed
        let err = pizza.add_child(Node::new("ingredient").with_attribute("name", "ham"));
        assert!(matches!(err, Err(Error::DuplicateIndexValue { .. })));

        pizza.children[0].set_attribute("name", "ham");
        let ham = pizza.indexed_child("ingredient", "ham").unwrap().unwrap();
        assert!(std::ptr::eq(ham, &pizza.children()[0]));
    }

    #[test]
    fn test_get_indexed_child_not_indexed() {
        let mut pizza = pizza();
        let err = pizza.get_indexed_child("ingredient", "cheese", true).unwrap_err();
        assert!(matches!(err, Error::NotIndexed { ref context } if context.contains("ingredient")));

        let err = pizza.indexed_child("eater", "bob").unwrap_err();
        assert!(matches!(err, Error::NotIndexed { .. }));
    }
}
