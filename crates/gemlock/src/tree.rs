//! The parsed lockfile tree.
//!
//! A [`Node`] maps keys to [`Entry`] values. Keys that never receive nested
//! lines stay [`Entry::Leaf`]; a key becomes an [`Entry::Node`] as soon as a
//! deeper line is placed beneath it. The node keeps the leaf attributes of the
//! line that introduced it, so `rails (7.0.4)` followed by indented
//! requirements still reports its version.

use serde::Serialize;
use std::collections::BTreeMap;

/// Attributes inferred from the value part of a lockfile line.
///
/// At most one family of fields is populated: `path`, or `version` and
/// `outsourced`, or `sha`. An empty leaf is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Leaf {
    /// Set when the raw value contains a `/`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Text between the parentheses of a version value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// The parenthesised value carried a trailing `!`.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub outsourced: bool,

    /// Set when the raw value contains a hexadecimal revision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl Leaf {
    /// Returns true if no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.path.is_none() && self.version.is_none() && !self.outsourced && self.sha.is_none()
    }
}

/// A value stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Entry {
    /// A key with nested children.
    Node(Node),
    /// A key without children.
    Leaf(Leaf),
    /// A collapsed single value, produced for `BUNDLED WITH`.
    Scalar(String),
}

impl Entry {
    /// Returns the nested node, if this entry has children.
    #[must_use]
    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Returns the leaf, if this entry has no children.
    #[must_use]
    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Returns the collapsed scalar value.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the attributes of the line that introduced this key.
    ///
    /// Works for both leaves and nodes; scalars carry no attributes.
    #[must_use]
    pub fn attributes(&self) -> Option<&Leaf> {
        match self {
            Self::Node(node) => Some(&node.attributes),
            Self::Leaf(leaf) => Some(leaf),
            Self::Scalar(_) => None,
        }
    }

    /// Shorthand for the `version` attribute.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.attributes().and_then(|leaf| leaf.version.as_deref())
    }

    /// Turns a leaf into a node that keeps its attributes, then returns it.
    ///
    /// A scalar is replaced by an empty node.
    pub(crate) fn make_node(&mut self) -> &mut Node {
        if !matches!(self, Self::Node(_)) {
            let attributes = match std::mem::replace(self, Self::Leaf(Leaf::default())) {
                Self::Leaf(leaf) => leaf,
                _ => Leaf::default(),
            };
            *self = Self::Node(Node {
                attributes,
                children: BTreeMap::new(),
            });
        }

        match self {
            Self::Node(node) => node,
            _ => unreachable!("entry was converted to a node above"),
        }
    }

    fn depth(&self) -> usize {
        match self {
            Self::Node(node) => node.depth(),
            Self::Leaf(_) | Self::Scalar(_) => 0,
        }
    }
}

impl From<Leaf> for Entry {
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

/// A mapping from keys to entries.
///
/// Serialises as a flat object: the node's own attributes sit next to its
/// children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    #[serde(flatten)]
    attributes: Leaf,

    #[serde(flatten)]
    children: BTreeMap<String, Entry>,
}

impl Node {
    /// Creates an empty node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attributes of the line that introduced this node.
    #[must_use]
    pub fn attributes(&self) -> &Leaf {
        &self.attributes
    }

    /// Returns the entry stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.children.get(key)
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.children.get_mut(key)
    }

    /// Stores `entry` under `key`, returning the entry it replaced.
    pub fn insert(&mut self, key: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.children.insert(key.into(), entry.into())
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.children.contains_key(key)
    }

    /// Follows `path` from this node, one key per level.
    #[must_use]
    pub fn lookup(&self, path: &[&str]) -> Option<&Entry> {
        let (first, rest) = path.split_first()?;
        let entry = self.get(first)?;
        if rest.is_empty() {
            Some(entry)
        } else {
            entry.as_node()?.lookup(rest)
        }
    }

    /// Iterates over the child keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Iterates over `(key, entry)` pairs in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Entry)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of direct children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    /// Returns true if the node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of key levels below this node.
    ///
    /// An empty node has depth 0; a node holding only leaves has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .values()
            .map(|entry| entry.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Serialises the tree as pretty-printed JSON.
    ///
    /// A node's attributes share its object with its children, so a child
    /// named `path`, `version`, `outsourced` or `sha` collides with the
    /// attribute of the same name. The key is then written twice here, and
    /// [`Node::to_json_value`] keeps only the child.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Serialises the tree into a [`serde_json::Value`].
    ///
    /// On a key collision between an attribute and a child, the child wins.
    ///
    /// # Errors
    ///
    /// Returns an error if serialisation fails.
    pub fn to_json_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn version(v: &str) -> Leaf {
        Leaf {
            version: Some(v.to_string()),
            ..Leaf::default()
        }
    }

    #[test]
    fn make_node_keeps_leaf_attributes() {
        let mut entry = Entry::Leaf(version("7.0.4"));
        entry.make_node().insert("actionpack", version("= 7.0.4"));

        let node = entry.as_node().unwrap();
        assert_eq!(node.attributes().version.as_deref(), Some("7.0.4"));
        assert_eq!(node.get("actionpack").unwrap().version(), Some("= 7.0.4"));
    }

    #[test]
    fn lookup_walks_nested_nodes() {
        let mut specs = Node::new();
        specs.insert("rake", version("13.0.6"));
        let mut gem = Node::new();
        gem.insert("specs", Entry::Node(specs));
        let mut root = Node::new();
        root.insert("GEM", Entry::Node(gem));

        assert_eq!(
            root.lookup(&["GEM", "specs", "rake"]).unwrap().version(),
            Some("13.0.6")
        );
        assert!(root.lookup(&["GEM", "missing"]).is_none());
        assert!(root.lookup(&["GEM", "specs", "rake", "deeper"]).is_none());
        assert!(root.lookup(&[]).is_none());
    }

    #[test]
    fn depth_counts_key_levels() {
        let mut inner = Node::new();
        inner.insert("bar", Leaf::default());
        let mut root = Node::new();
        assert_eq!(root.depth(), 0);
        root.insert("FOO", Entry::Node(inner));
        root.insert("BAZ", Leaf::default());
        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn serializes_like_a_plain_object() {
        let mut rails = Entry::Leaf(version("7.0.4"));
        rails.make_node().insert("rack", Leaf::default());
        let mut root = Node::new();
        root.insert("rails", rails);
        root.insert(
            "local",
            Leaf {
                version: Some("0.1.0".to_string()),
                outsourced: true,
                ..Leaf::default()
            },
        );
        root.insert("BUNDLED WITH", Entry::Scalar("2.4.10".to_string()));

        assert_eq!(
            root.to_json_value().unwrap(),
            json!({
                "rails": { "version": "7.0.4", "rack": {} },
                "local": { "version": "0.1.0", "outsourced": true },
                "BUNDLED WITH": "2.4.10"
            })
        );
    }

    #[test]
    fn child_named_like_an_attribute_wins_in_json() {
        let mut gem = Entry::Leaf(version("1.0"));
        gem.make_node().insert("version", Leaf::default());
        let mut root = Node::new();
        root.insert("gem", gem);

        assert_eq!(root.to_json_value().unwrap(), json!({ "gem": { "version": {} } }));
        let pretty = root.to_json_pretty().unwrap();
        assert_eq!(pretty.matches("\"version\"").count(), 2);
    }

    #[test]
    fn empty_leaf_reports_empty() {
        assert!(Leaf::default().is_empty());
        assert!(!version("1.0").is_empty());
    }
}
