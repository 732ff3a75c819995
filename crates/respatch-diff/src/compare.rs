//! Loader-backed comparisons.
//!
//! [`compare_snapshots`] owns both snapshot acquisitions for the duration of
//! the call. On success both trees move into the returned [`PatchBundle`],
//! which releases them through the loader when dropped.

use std::path::Path;

use respatch_store::{ResourceLoader, ResourceNode, ResourceTree, SnapshotHandle};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::config::ClassifierConfig;
use crate::descriptor::Side;
use crate::error::{DiffError, DiffResult};
use crate::matcher::diff_trees;
use crate::patch::{Patch, PatchNode};
use crate::sidecar::settings_record;

/// A patch together with the two snapshots its nodes refer to.
#[derive(Debug)]
pub struct PatchBundle<'l> {
    patch: Patch,
    old: SnapshotHandle<'l>,
    new: SnapshotHandle<'l>,
}

impl<'l> PatchBundle<'l> {
    pub fn patch(&self) -> &Patch {
        &self.patch
    }

    pub fn old_tree(&self) -> &ResourceTree {
        self.old.tree()
    }

    pub fn new_tree(&self) -> &ResourceTree {
        self.new.tree()
    }

    /// The resource node a patch node was built from.
    ///
    /// Returns `None` if `node` belongs to a different patch.
    pub fn original(&self, node: &PatchNode) -> Option<&ResourceNode> {
        let tree = match node.origin.side {
            Side::Old => self.old_tree(),
            Side::New => self.new_tree(),
        };
        tree.get(node.origin.node)
    }

    /// Sidecar settings record for a patch node's original resource.
    pub fn settings_for(
        &self,
        node: &PatchNode,
        config: &ClassifierConfig,
    ) -> Option<Map<String, Value>> {
        self.original(node)
            .map(|resource| settings_record(resource, config))
    }

    /// Keep only the patch; both snapshots are released.
    pub fn into_patch(self) -> Patch {
        self.patch
    }

    /// Take the patch and both trees, detaching them from the loader.
    pub fn into_parts(self) -> (Patch, ResourceTree, ResourceTree) {
        (self.patch, self.old.detach(), self.new.detach())
    }
}

/// Open two snapshots of the same container file and compare them.
///
/// If either snapshot fails to load the comparison fails with
/// [`DiffError::LoadFailure`] and any snapshot already opened is released.
pub fn compare_snapshots<'l>(
    loader: &'l dyn ResourceLoader,
    old_path: &Path,
    new_path: &Path,
    config: &ClassifierConfig,
) -> DiffResult<PatchBundle<'l>> {
    let old = open(loader, Side::Old, old_path)?;
    let new = open(loader, Side::New, new_path)?;

    let patch = diff_trees(old.tree(), new.tree(), config);
    info!(
        old = %old_path.display(),
        new = %new_path.display(),
        summary = %patch.summary(),
        "comparison complete"
    );
    Ok(PatchBundle { patch, old, new })
}

fn open<'l>(loader: &'l dyn ResourceLoader, side: Side, path: &Path) -> DiffResult<SnapshotHandle<'l>> {
    SnapshotHandle::open(loader, path).map_err(|source| {
        warn!(%side, path = %path.display(), error = %source, "snapshot failed to load");
        DiffError::LoadFailure {
            side,
            path: path.to_path_buf(),
            source,
        }
    })
}
