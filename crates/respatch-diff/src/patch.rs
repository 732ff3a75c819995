//! The pruned patch tree returned by a comparison.

use std::fmt;

use respatch_types::{ContentHash, TypeTag};
use serde::{Deserialize, Serialize};

use crate::descriptor::{ChangeKind, DescriptorId, DescriptorTree, NodeRef};

/// Index of a node inside one [`Patch`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PatchId(usize);

impl PatchId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// One changed node, or a container kept because something below it changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchNode {
    pub path: String,
    pub type_tag: TypeTag,
    pub content_hash: ContentHash,
    /// `ContainerChanged` wins over `Altered`: a container whose own bytes
    /// changed as well is still `ContainerChanged`. Compare `content_hash`
    /// with the old side to detect that.
    pub change: ChangeKind,
    /// The resource node to export (new side) or delete (old side).
    pub origin: NodeRef,
    pub children: Vec<PatchId>,
}

/// The minimal description of what changed between two snapshots.
///
/// Every leaf is `Altered`, `Added` or `Removed`, and no subtree is entirely
/// unchanged. `Removed` nodes are listed at the top level, after the kept
/// part of the new snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    nodes: Vec<PatchNode>,
    roots: Vec<PatchId>,
}

impl Patch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// Prune the matched new-snapshot descriptors and append the removals.
    ///
    /// `new` must already carry its change kinds. `removed` lists old
    /// descriptors with no counterpart, in old pre-order.
    pub(crate) fn from_descriptors(
        new: &DescriptorTree,
        old: &DescriptorTree,
        removed: &[DescriptorId],
    ) -> Self {
        // Pre-order puts every child after its parent, so a reverse walk
        // settles children first.
        let mut subtree_changed = vec![false; new.len()];
        for id in new.preorder().rev() {
            let descriptor = new.get(id);
            subtree_changed[id.index()] = descriptor.change.is_changed()
                || descriptor
                    .children
                    .iter()
                    .any(|child| subtree_changed[child.index()]);
        }

        let mut patch = Self::new();
        for &root in new.roots() {
            if let Some(id) = patch.keep(new, root, &subtree_changed) {
                patch.roots.push(id);
            }
        }

        for &id in removed {
            let descriptor = old.get(id);
            let patch_id = patch.push(PatchNode {
                path: descriptor.path.clone(),
                type_tag: descriptor.type_tag.clone(),
                content_hash: descriptor.content_hash,
                change: ChangeKind::Removed,
                origin: descriptor.origin,
                children: Vec::new(),
            });
            patch.roots.push(patch_id);
        }
        patch
    }

    fn keep(
        &mut self,
        tree: &DescriptorTree,
        id: DescriptorId,
        subtree_changed: &[bool],
    ) -> Option<PatchId> {
        if !subtree_changed[id.index()] {
            return None;
        }
        let descriptor = tree.get(id);
        let patch_id = self.push(PatchNode {
            path: descriptor.path.clone(),
            type_tag: descriptor.type_tag.clone(),
            content_hash: descriptor.content_hash,
            change: descriptor.change,
            origin: descriptor.origin,
            children: Vec::new(),
        });

        let children: Vec<PatchId> = descriptor
            .children
            .iter()
            .filter_map(|&child| self.keep(tree, child, subtree_changed))
            .collect();

        let node = &mut self.nodes[patch_id.0];
        if !children.is_empty() && node.change != ChangeKind::Added {
            node.change = ChangeKind::ContainerChanged;
        }
        node.children = children;
        Some(patch_id)
    }

    fn push(&mut self, node: PatchNode) -> PatchId {
        let id = PatchId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    /// Returns `true` if the snapshots were identical.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes at every depth.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Top-level patch nodes.
    pub fn roots(&self) -> &[PatchId] {
        &self.roots
    }

    pub fn get(&self, id: PatchId) -> Option<&PatchNode> {
        self.nodes.get(id.0)
    }

    /// All nodes in pre-order, each with its depth (0 for top level).
    pub fn iter(&self) -> PatchIter<'_> {
        PatchIter {
            patch: self,
            stack: self.roots.iter().rev().map(|&id| (id, 0)).collect(),
        }
    }

    /// First node with the given path.
    pub fn find(&self, path: &str) -> Option<&PatchNode> {
        self.iter().map(|(node, _)| node).find(|node| node.path == path)
    }

    /// All nodes with the given change kind, in pre-order.
    pub fn with_change(&self, change: ChangeKind) -> impl Iterator<Item = &PatchNode> {
        self.iter()
            .map(|(node, _)| node)
            .filter(move |node| node.change == change)
    }

    /// Counts per change kind.
    pub fn summary(&self) -> PatchSummary {
        let mut summary = PatchSummary::default();
        for node in &self.nodes {
            match node.change {
                ChangeKind::Altered => summary.altered += 1,
                ChangeKind::Added => summary.added += 1,
                ChangeKind::Removed => summary.removed += 1,
                ChangeKind::ContainerChanged => summary.container_changed += 1,
                ChangeKind::Unchanged => {}
            }
        }
        summary
    }
}

/// Pre-order iterator over a [`Patch`].
pub struct PatchIter<'a> {
    patch: &'a Patch,
    stack: Vec<(PatchId, usize)>,
}

impl<'a> Iterator for PatchIter<'a> {
    type Item = (&'a PatchNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (id, depth) = self.stack.pop()?;
        let node = self.patch.get(id)?;
        self.stack
            .extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        Some((node, depth))
    }
}

/// Number of patch nodes per change kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSummary {
    pub altered: usize,
    pub added: usize,
    pub removed: usize,
    pub container_changed: usize,
}

impl PatchSummary {
    /// Nodes that are themselves changed (containers excluded).
    pub fn changed(&self) -> usize {
        self.altered + self.added + self.removed
    }
}

impl fmt::Display for PatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} altered, {} added, {} removed",
            self.altered, self.added, self.removed
        )
    }
}
