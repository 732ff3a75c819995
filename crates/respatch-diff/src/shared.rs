//! Shared-data group resolution.
//!
//! A texture or palette marked as sharing data stores no real pixels of its
//! own; it reuses the bytes of a later sibling. Comparing such a node by its
//! own hash alone misses changes made to the owner, so the matcher also
//! compares the hash of the group's owner (the group root).

use crate::config::SharedDataScan;
use crate::descriptor::{DescriptorId, DescriptorTree};

/// Find the descriptor that owns the content `id` aliases.
///
/// `siblings` is the ordered sequence `id` belongs to. A node that does not
/// share data is its own root. Otherwise the scan walks forward from `id`'s
/// position; with [`SharedDataScan::FirstOwner`] it stops at the first
/// sibling that owns its data, with [`SharedDataScan::SequenceEnd`] it never
/// stops early. If no owner is found the last visited sibling is the root.
pub fn group_root(
    tree: &DescriptorTree,
    siblings: &[DescriptorId],
    id: DescriptorId,
    scan: SharedDataScan,
) -> DescriptorId {
    if !tree.get(id).shares_data {
        return id;
    }
    let Some(start) = siblings.iter().position(|&s| s == id) else {
        return id;
    };

    let mut root = id;
    for &candidate in &siblings[start..] {
        root = candidate;
        let owns_data = match scan {
            SharedDataScan::FirstOwner => !tree.get(candidate).shares_data,
            SharedDataScan::SequenceEnd => false,
        };
        if owns_data {
            break;
        }
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Classifier;
    use crate::config::ClassifierConfig;
    use crate::descriptor::Side;
    use respatch_store::{NodeSpec, ResourceTree};
    use respatch_types::TypeTag;

    fn textures(shares: &[bool]) -> DescriptorTree {
        let children = shares.iter().enumerate().map(|(i, &s)| {
            let tex = NodeSpec::new(TypeTag::TEXTURE, format!("t{i}")).with_payload(vec![i as u8]);
            if s {
                tex.sharing_data()
            } else {
                tex
            }
        });
        let spec = NodeSpec::new(TypeTag::ARCHIVE, "root")
            .with_child(NodeSpec::new(TypeTag::RESOURCE_GROUP, "Textures").with_children(children));
        let config = ClassifierConfig::default();
        DescriptorTree::build(&ResourceTree::from_spec(spec), Side::Old, &Classifier::new(&config))
    }

    fn root_name(tree: &DescriptorTree, name: &str, scan: SharedDataScan) -> String {
        let id = tree.find(&format!("Textures/{name}")).unwrap();
        let root = group_root(tree, tree.siblings_of(id), id, scan);
        tree.get(root).path.clone()
    }

    #[test]
    fn owner_is_its_own_root() {
        let tree = textures(&[false, true, false]);
        assert_eq!(root_name(&tree, "t0", SharedDataScan::FirstOwner), "Textures/t0");
        assert_eq!(root_name(&tree, "t0", SharedDataScan::SequenceEnd), "Textures/t0");
    }

    #[test]
    fn first_owner_stops_at_next_owning_sibling() {
        let tree = textures(&[true, true, false, false]);
        assert_eq!(root_name(&tree, "t0", SharedDataScan::FirstOwner), "Textures/t2");
        assert_eq!(root_name(&tree, "t1", SharedDataScan::FirstOwner), "Textures/t2");
    }

    #[test]
    fn sequence_end_walks_to_last_sibling() {
        let tree = textures(&[true, true, false, false]);
        assert_eq!(root_name(&tree, "t0", SharedDataScan::SequenceEnd), "Textures/t3");
    }

    #[test]
    fn no_owner_resolves_to_last_visited() {
        let tree = textures(&[false, true, true]);
        assert_eq!(root_name(&tree, "t1", SharedDataScan::FirstOwner), "Textures/t2");
    }

    #[test]
    fn scan_never_looks_backwards() {
        let tree = textures(&[false, true]);
        assert_eq!(root_name(&tree, "t1", SharedDataScan::FirstOwner), "Textures/t1");
    }

    #[test]
    fn id_outside_sequence_is_its_own_root() {
        let tree = textures(&[true, false]);
        let id = tree.find("Textures/t0").unwrap();
        assert_eq!(group_root(&tree, &[], id, SharedDataScan::FirstOwner), id);
    }
}
