//! Arena-backed resource trees.
//!
//! Nodes are stored in pre-order in a flat `Vec`; parent and child links are
//! [`NodeIndex`] values into that vector rather than live references.

use std::collections::BTreeMap;
use std::fmt;

use respatch_types::{ContentHash, ContentHasher, TypeTag};
use serde::{Deserialize, Serialize};

use crate::spec::NodeSpec;

/// Index of a node inside one [`ResourceTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeIndex(usize);

impl NodeIndex {
    /// Position of the node in its tree's arena.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeIndex({})", self.0)
    }
}

/// A node in a hierarchical binary asset container.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceNode {
    type_tag: TypeTag,
    name: String,
    payload: Vec<u8>,
    shares_data: bool,
    properties: BTreeMap<String, serde_json::Value>,
    parent: Option<NodeIndex>,
    children: Vec<NodeIndex>,
    content_hash: ContentHash,
}

impl ResourceNode {
    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's own bytes, excluding its children.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Whether this node aliases a later sibling's real data.
    pub fn shares_data(&self) -> bool {
        self.shares_data
    }

    /// Placement settings recorded for this node by its container.
    pub fn properties(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.properties
    }

    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Real children, in container order.
    pub fn children(&self) -> &[NodeIndex] {
        &self.children
    }

    /// Hash of the node's full reconstructed bytes, children included.
    pub fn content_hash(&self) -> ContentHash {
        self.content_hash
    }
}

/// An opened container file: an arena of [`ResourceNode`]s with one root.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceTree {
    nodes: Vec<ResourceNode>,
}

impl ResourceTree {
    /// Build a tree from its owned description, hashing bottom-up.
    pub fn from_spec(spec: NodeSpec) -> Self {
        let mut tree = Self {
            nodes: Vec::with_capacity(spec.subtree_len()),
        };
        tree.insert(spec, None);
        tree
    }

    fn insert(&mut self, spec: NodeSpec, parent: Option<NodeIndex>) -> NodeIndex {
        let NodeSpec {
            type_tag,
            name,
            payload,
            shares_data,
            properties,
            children,
        } = spec;

        let index = NodeIndex(self.nodes.len());
        self.nodes.push(ResourceNode {
            type_tag,
            name,
            payload,
            shares_data,
            properties,
            parent,
            children: Vec::new(),
            content_hash: ContentHash::null(),
        });

        let child_indices: Vec<NodeIndex> = children
            .into_iter()
            .map(|child| self.insert(child, Some(index)))
            .collect();

        let mut child_hashes = Vec::with_capacity(child_indices.len() * 32);
        for child in &child_indices {
            child_hashes.extend_from_slice(self.nodes[child.0].content_hash.as_bytes());
        }

        let node = &mut self.nodes[index.0];
        // BTreeMap keys serialize in sorted order, so this is canonical.
        let properties = serde_json::to_vec(&node.properties).unwrap_or_default();
        node.content_hash = ContentHasher::NODE.hash_parts(&[
            node.type_tag.as_str().as_bytes(),
            node.name.as_bytes(),
            node.payload.as_slice(),
            properties.as_slice(),
            child_hashes.as_slice(),
        ]);
        node.children = child_indices;
        index
    }

    /// Rebuild the owned description of the whole tree.
    pub fn to_spec(&self) -> NodeSpec {
        self.spec_of(self.root())
    }

    fn spec_of(&self, index: NodeIndex) -> NodeSpec {
        let node = self.node(index);
        NodeSpec {
            type_tag: node.type_tag.clone(),
            name: node.name.clone(),
            payload: node.payload.clone(),
            shares_data: node.shares_data,
            properties: node.properties.clone(),
            children: node.children.iter().map(|&c| self.spec_of(c)).collect(),
        }
    }

    /// The container file's own root node.
    pub fn root(&self) -> NodeIndex {
        NodeIndex(0)
    }

    /// Look up a node. Panics if `index` came from a different tree.
    pub fn node(&self, index: NodeIndex) -> &ResourceNode {
        &self.nodes[index.0]
    }

    /// Look up a node, returning `None` for out-of-range indices.
    pub fn get(&self, index: NodeIndex) -> Option<&ResourceNode> {
        self.nodes.get(index.0)
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        &self.node(index).children
    }

    pub fn parent(&self, index: NodeIndex) -> Option<NodeIndex> {
        self.node(index).parent
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: a tree has at least its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in pre-order, root first.
    pub fn iter_preorder(&self) -> impl Iterator<Item = (NodeIndex, &ResourceNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }

    /// First child of `parent` named `name`.
    pub fn child_named(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&c| self.node(c).name == name)
    }

    /// Follow a chain of child names from the root.
    pub fn resolve(&self, names: &[&str]) -> Option<NodeIndex> {
        names
            .iter()
            .try_fold(self.root(), |current, name| self.child_named(current, name))
    }

    /// Set or clear the shared-data flag of one node.
    ///
    /// This is the hook used by the color-reduction step. The flag does not
    /// contribute to node bytes, so no hash changes.
    pub fn set_shares_data(&mut self, index: NodeIndex, shares_data: bool) {
        self.nodes[index.0].shares_data = shares_data;
    }
}
