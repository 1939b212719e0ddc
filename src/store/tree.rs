//! In-memory node/attribute tree
//!
//! Nodes are addressed by `/`-separated paths from the root (`"/"` or `""`
//! is the root itself). Children and attributes are kept in name order.

use crate::params::{normalize, AttrValue, ParamValue};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute set of a node.
pub type Attrs = BTreeMap<String, AttrValue>;

/// A group node: attributes plus named children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    attrs: Attrs,
    #[serde(default)]
    children: BTreeMap<String, Node>,
}

impl Node {
    /// Attributes of this node.
    #[must_use]
    pub const fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    /// Child names in name order.
    pub fn child_names(&self) -> impl Iterator<Item = &str> {
        self.children.keys().map(String::as_str)
    }

    /// Direct child by name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.get(name)
    }

    /// Direct children in name order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &Self)> {
        self.children.iter().map(|(k, v)| (k.as_str(), v))
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Join a parent path and a child name.
#[must_use]
pub fn join(parent: &str, name: &str) -> String {
    let parent = parent.trim_end_matches('/');
    format!("{parent}/{name}")
}

/// Whole experiment tree, as seen inside a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tree {
    root: Node,
}

impl Tree {
    /// Empty tree (root only).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Whether a node exists at `path`.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.node(path).is_ok()
    }

    /// Node at `path`.
    ///
    /// # Errors
    /// `NotFound` if any segment is missing
    pub fn node(&self, path: &str) -> Result<&Node> {
        segments(path).try_fold(&self.root, |node, seg| {
            node.children
                .get(seg)
                .ok_or_else(|| Error::NotFound(format!("node {path}")))
        })
    }

    fn node_mut(&mut self, path: &str) -> Result<&mut Node> {
        segments(path).try_fold(&mut self.root, |node, seg| {
            node.children
                .get_mut(seg)
                .ok_or_else(|| Error::NotFound(format!("node {path}")))
        })
    }

    /// Create an empty child group and return its path.
    ///
    /// # Errors
    /// - `NotFound` if the parent does not exist
    /// - `AlreadyExists` if the parent already has a child of that name
    /// - `InvalidInput` if the name is empty or contains `/`
    pub fn create_child(&mut self, parent: &str, name: &str) -> Result<String> {
        if name.is_empty() || name.contains('/') {
            return Err(Error::InvalidInput(format!("invalid node name {name:?}")));
        }
        let child_path = join(parent, name);
        let node = self.node_mut(parent)?;
        if node.children.contains_key(name) {
            return Err(Error::AlreadyExists {
                what: "node",
                name: child_path,
            });
        }
        node.children.insert(name.to_string(), Node::default());
        Ok(child_path)
    }

    /// Child names of the node at `path`, in name order.
    ///
    /// # Errors
    /// `NotFound` if the node does not exist
    pub fn list_children(&self, path: &str) -> Result<Vec<String>> {
        Ok(self.node(path)?.child_names().map(str::to_string).collect())
    }

    /// Attribute set of the node at `path`.
    ///
    /// # Errors
    /// `NotFound` if the node does not exist
    pub fn attrs(&self, path: &str) -> Result<&Attrs> {
        Ok(&self.node(path)?.attrs)
    }

    /// Single attribute, `None` if the node has no such key.
    ///
    /// # Errors
    /// `NotFound` if the node does not exist
    pub fn get_attr(&self, path: &str, key: &str) -> Result<Option<&AttrValue>> {
        Ok(self.node(path)?.attrs.get(key))
    }

    /// Set an attribute, normalizing the value first. Overwrites silently.
    ///
    /// # Errors
    /// `NotFound` if the node does not exist
    pub fn set_attr(&mut self, path: &str, key: &str, value: &ParamValue) -> Result<()> {
        self.node_mut(path)?
            .attrs
            .insert(key.to_string(), normalize(value));
        Ok(())
    }

    /// Set an attribute that is already in persistable form.
    ///
    /// # Errors
    /// `NotFound` if the node does not exist
    pub fn put_attr(&mut self, path: &str, key: &str, value: impl Into<AttrValue>) -> Result<()> {
        self.node_mut(path)?
            .attrs
            .insert(key.to_string(), value.into());
        Ok(())
    }
}
