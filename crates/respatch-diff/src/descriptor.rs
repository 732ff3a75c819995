//! Node descriptors: the comparison view of one snapshot.
//!
//! A [`DescriptorTree`] is built fresh for every comparison. Descriptors live
//! in a flat, append-only arena in pre-order, and parent/child/sibling links
//! are [`DescriptorId`] indices into it.

use std::collections::HashMap;
use std::fmt;

use respatch_store::{NodeIndex, ResourceTree};
use respatch_types::{ContentHash, TypeTag};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classifier::Classifier;

/// Which of the two compared snapshots a node belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Old,
    New,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Old => write!(f, "old"),
            Self::New => write!(f, "new"),
        }
    }
}

/// Reference back to the resource node a descriptor was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeRef {
    pub side: Side,
    pub node: NodeIndex,
}

/// How a node differs between the two snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Present in both snapshots with the same content.
    #[default]
    Unchanged,
    /// Present in both snapshots with different content.
    Altered,
    /// Only present in the new snapshot.
    Added,
    /// Only present in the old snapshot.
    Removed,
    /// Kept in a patch only because a descendant changed.
    ContainerChanged,
}

impl ChangeKind {
    pub fn is_changed(self) -> bool {
        self != Self::Unchanged
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unchanged => "unchanged",
            Self::Altered => "altered",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::ContainerChanged => "container-changed",
        };
        f.write_str(s)
    }
}

/// Index of a descriptor inside one [`DescriptorTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptorId(usize);

impl DescriptorId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Comparison view of one resource node.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeDescriptor {
    /// Identity key: ancestor name chain below the file root, with
    /// occurrence suffixes for repeated sibling names. Unique within one
    /// snapshot; see [`path_segment`] for the encoding.
    pub path: String,
    pub content_hash: ContentHash,
    pub type_tag: TypeTag,
    /// Only populated when the node was classified as a container.
    pub children: Vec<DescriptorId>,
    pub parent: Option<DescriptorId>,
    /// Whether this node aliases a later sibling's real content.
    pub shares_data: bool,
    pub change: ChangeKind,
    pub origin: NodeRef,
}

/// All descriptors of one snapshot, in pre-order.
#[derive(Clone, Debug, PartialEq)]
pub struct DescriptorTree {
    side: Side,
    nodes: Vec<NodeDescriptor>,
    roots: Vec<DescriptorId>,
}

impl DescriptorTree {
    /// Describe every descendant of `tree`'s root.
    ///
    /// The root's direct children are always described; below them the walk
    /// only descends into nodes the classifier calls containers. The
    /// resource tree is never modified.
    pub fn build(tree: &ResourceTree, side: Side, classifier: &Classifier<'_>) -> Self {
        let mut descriptors = Self {
            side,
            nodes: Vec::with_capacity(tree.len().saturating_sub(1)),
            roots: Vec::new(),
        };
        descriptors.roots = descriptors.build_children(tree, tree.root(), None, "", classifier);
        debug!(
            %side,
            descriptors = descriptors.nodes.len(),
            nodes = tree.len(),
            "built descriptor tree"
        );
        descriptors
    }

    fn build_children(
        &mut self,
        tree: &ResourceTree,
        index: NodeIndex,
        parent: Option<DescriptorId>,
        parent_path: &str,
        classifier: &Classifier<'_>,
    ) -> Vec<DescriptorId> {
        let mut occurrences: HashMap<&str, usize> = HashMap::new();
        let mut ids = Vec::with_capacity(tree.children(index).len());
        for &child in tree.children(index) {
            let name = tree.node(child).name();
            let occurrence = occurrences.entry(name).or_insert(0);
            *occurrence += 1;
            let segment = path_segment(name, *occurrence);
            let path = if parent_path.is_empty() {
                segment
            } else {
                format!("{parent_path}/{segment}")
            };
            ids.push(self.build_one(tree, child, parent, path, classifier));
        }
        ids
    }

    fn build_one(
        &mut self,
        tree: &ResourceTree,
        index: NodeIndex,
        parent: Option<DescriptorId>,
        path: String,
        classifier: &Classifier<'_>,
    ) -> DescriptorId {
        let node = tree.node(index);
        let id = DescriptorId(self.nodes.len());
        self.nodes.push(NodeDescriptor {
            path: path.clone(),
            content_hash: node.content_hash(),
            type_tag: node.type_tag().clone(),
            children: Vec::new(),
            parent,
            shares_data: node.shares_data(),
            change: ChangeKind::Unchanged,
            origin: NodeRef {
                side: self.side,
                node: index,
            },
        });

        if classifier.is_container(tree, index) {
            let children = self.build_children(tree, index, Some(id), &path, classifier);
            self.nodes[id.0].children = children;
        }
        id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Descriptors of the root's direct children.
    pub fn roots(&self) -> &[DescriptorId] {
        &self.roots
    }

    pub fn get(&self, id: DescriptorId) -> &NodeDescriptor {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: DescriptorId) -> &mut NodeDescriptor {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Flattened view: every descriptor id in pre-order.
    pub fn preorder(&self) -> impl DoubleEndedIterator<Item = DescriptorId> + ExactSizeIterator {
        (0..self.nodes.len()).map(DescriptorId)
    }

    /// The ordered sequence `id` belongs to: its parent's children, or the
    /// top-level descriptors.
    pub fn siblings_of(&self, id: DescriptorId) -> &[DescriptorId] {
        match self.get(id).parent {
            Some(parent) => &self.get(parent).children,
            None => &self.roots,
        }
    }

    /// First descriptor with the given path.
    pub fn find(&self, path: &str) -> Option<DescriptorId> {
        self.preorder().find(|&id| self.get(id).path == path)
    }
}

/// One path segment for the `occurrence`-th sibling (1-based) named `name`.
///
/// `\`, `[`, `]` and `/` inside the name are escaped with `\`, so an
/// unescaped `[k]` is always an occurrence suffix and an unescaped `/` is
/// always a separator. Distinct (name, occurrence) pairs never produce the
/// same segment.
pub fn path_segment(name: &str, occurrence: usize) -> String {
    let mut segment = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if matches!(c, '\\' | '[' | ']' | '/') {
            segment.push('\\');
        }
        segment.push(c);
    }
    if occurrence > 1 {
        segment.push_str(&format!("[{occurrence}]"));
    }
    segment
}
