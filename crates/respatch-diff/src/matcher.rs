//! Descriptor matching: the core of a comparison.
//!
//! New-snapshot descriptors are matched against old-snapshot descriptors by
//! path. Each old descriptor can be consumed by at most one match; whatever
//! is left in the old pool afterwards was removed.

use std::collections::{HashMap, VecDeque};

use respatch_store::ResourceTree;
use tracing::{debug, trace};

use crate::classifier::Classifier;
use crate::config::{ClassifierConfig, SharedDataScan};
use crate::descriptor::{ChangeKind, DescriptorId, DescriptorTree, Side};
use crate::patch::Patch;
use crate::shared::group_root;

/// Compare two opened snapshots of the same container file.
///
/// Total and deterministic: identical snapshots yield an empty patch, and
/// the same inputs always yield the same patch.
pub fn diff_trees(old: &ResourceTree, new: &ResourceTree, config: &ClassifierConfig) -> Patch {
    let classifier = Classifier::new(config);
    let mut old_descriptors = DescriptorTree::build(old, Side::Old, &classifier);
    let mut new_descriptors = DescriptorTree::build(new, Side::New, &classifier);

    let removed = match_descriptors(
        &mut old_descriptors,
        &mut new_descriptors,
        config.shared_data_scan,
    );
    let patch = Patch::from_descriptors(&new_descriptors, &old_descriptors, &removed);

    debug!(
        old = old_descriptors.len(),
        new = new_descriptors.len(),
        patch = patch.len(),
        summary = %patch.summary(),
        "compared snapshots"
    );
    patch
}

/// Classify every new descriptor and return the unmatched old ones.
///
/// Walks the new descriptors in pre-order. Candidates for a path are kept in
/// old pre-order, so if a malformed tree repeats a path the earliest
/// remaining old descriptor wins. Unmatched old descriptors are marked
/// [`ChangeKind::Removed`] and returned in old pre-order.
pub fn match_descriptors(
    old: &mut DescriptorTree,
    new: &mut DescriptorTree,
    scan: SharedDataScan,
) -> Vec<DescriptorId> {
    let mut consumed = vec![false; old.len()];
    {
        let old_view: &DescriptorTree = old;
        let mut pool: HashMap<&str, VecDeque<DescriptorId>> = HashMap::with_capacity(old_view.len());
        for id in old_view.preorder() {
            pool.entry(old_view.get(id).path.as_str())
                .or_default()
                .push_back(id);
        }

        let new_ids: Vec<DescriptorId> = new.preorder().collect();
        for id in new_ids {
            let descriptor = new.get(id);
            let change = match pool
                .get_mut(descriptor.path.as_str())
                .and_then(VecDeque::pop_front)
            {
                Some(old_id) => {
                    consumed[old_id.index()] = true;
                    if is_altered(old_view, old_id, new, id, scan) {
                        ChangeKind::Altered
                    } else {
                        ChangeKind::Unchanged
                    }
                }
                None => ChangeKind::Added,
            };
            if change.is_changed() {
                trace!(path = %descriptor.path, %change, "classified descriptor");
            }
            new.get_mut(id).change = change;
        }
    }

    let removed: Vec<DescriptorId> = old
        .preorder()
        .filter(|id| !consumed[id.index()])
        .collect();
    for &id in &removed {
        let descriptor = old.get_mut(id);
        descriptor.change = ChangeKind::Removed;
        trace!(path = %descriptor.path, "classified descriptor as removed");
    }
    removed
}

fn is_altered(
    old: &DescriptorTree,
    old_id: DescriptorId,
    new: &DescriptorTree,
    new_id: DescriptorId,
    scan: SharedDataScan,
) -> bool {
    if old.get(old_id).content_hash != new.get(new_id).content_hash {
        return true;
    }
    // Equal own hashes can still hide a change to the aliased owner.
    let old_root = group_root(old, old.siblings_of(old_id), old_id, scan);
    let new_root = group_root(new, new.siblings_of(new_id), new_id, scan);
    old.get(old_root).content_hash != new.get(new_root).content_hash
}
