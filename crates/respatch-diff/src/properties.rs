//! Property tests over randomly generated snapshot pairs.

use std::collections::BTreeSet;

use proptest::prelude::*;
use respatch_store::{NodeSpec, ResourceTree};
use respatch_types::TypeTag;

use crate::classifier::Classifier;
use crate::config::{ClassifierConfig, ClassifierRule, SharedDataScan};
use crate::descriptor::{ChangeKind, DescriptorTree, Side};
use crate::matcher::diff_trees;

fn leaf() -> impl Strategy<Value = NodeSpec> {
    (
        prop::sample::select(vec![TypeTag::TEXTURE, TypeTag::PALETTE, TypeTag::RAW, TypeTag::BONE]),
        prop::sample::select(vec!["a", "b", "a[2]", "a/b", "Bones"]),
        prop::collection::vec(any::<u8>(), 0..3),
        any::<bool>(),
    )
        .prop_map(|(tag, name, payload, shares)| {
            let spec = NodeSpec::new(tag, name).with_payload(payload);
            if shares {
                spec.sharing_data()
            } else {
                spec
            }
        })
}

fn node() -> impl Strategy<Value = NodeSpec> {
    leaf().prop_recursive(3, 32, 4, |inner| {
        (
            prop::sample::select(vec![
                TypeTag::RESOURCE_GROUP,
                TypeTag::MODEL,
                TypeTag::MODEL_GROUP,
                TypeTag::BONE,
                TypeTag::TEXTURE,
            ]),
            prop::sample::select(vec!["a", "b", "a[2]", "Bones", "Definitions"]),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, name, children)| NodeSpec::new(tag, name).with_children(children))
    })
}

fn snapshot() -> impl Strategy<Value = ResourceTree> {
    prop::collection::vec(node(), 0..4).prop_map(|children| {
        ResourceTree::from_spec(NodeSpec::new(TypeTag::ARCHIVE, "root").with_children(children))
    })
}

fn descriptor_paths(tree: &ResourceTree, config: &ClassifierConfig) -> BTreeSet<String> {
    let descriptors = DescriptorTree::build(tree, Side::Old, &Classifier::new(config));
    descriptors
        .preorder()
        .map(|id| descriptors.get(id).path.clone())
        .collect()
}

/// Old and new snapshot of one texture folder that differ only in the payload
/// of `owner`, a non-sharing texture preceded by a run of `aliases` sharing
/// textures. `before` and `after` are the sharing flags of the surrounding
/// siblings.
fn owner_change(before: &[bool], aliases: usize, after: &[bool]) -> (ResourceTree, ResourceTree) {
    let build = |owner_payload: u8| {
        let texture = |name: String, shares: bool| {
            let spec = NodeSpec::new(TypeTag::TEXTURE, name).with_payload(vec![7]);
            if shares {
                spec.sharing_data()
            } else {
                spec
            }
        };
        let mut children: Vec<NodeSpec> = before
            .iter()
            .enumerate()
            .map(|(i, &shares)| texture(format!("p{i}"), shares))
            .collect();
        // A non-sharing separator ends any run started by `before`.
        children.push(texture("sep".to_string(), false));
        children.extend((0..aliases).map(|i| texture(format!("s{i}"), true)));
        children.push(
            NodeSpec::new(TypeTag::TEXTURE, "owner").with_payload(vec![owner_payload]),
        );
        children.extend(
            after
                .iter()
                .enumerate()
                .map(|(i, &shares)| texture(format!("q{i}"), shares)),
        );
        ResourceTree::from_spec(
            NodeSpec::new(TypeTag::ARCHIVE, "root")
                .with_child(NodeSpec::new(TypeTag::RESOURCE_GROUP, "Textures").with_children(children)),
        )
    };
    (build(1), build(2))
}

proptest! {
    #[test]
    fn owner_change_alters_every_alias_in_its_run(
        before in prop::collection::vec(any::<bool>(), 0..3),
        aliases in 1usize..4,
        after in prop::collection::vec(any::<bool>(), 0..3),
    ) {
        let (old, new) = owner_change(&before, aliases, &after);
        let config = ClassifierConfig::default().with_shared_data_scan(SharedDataScan::FirstOwner);
        let patch = diff_trees(&old, &new, &config);

        let mut altered: Vec<String> = patch
            .with_change(ChangeKind::Altered)
            .map(|n| n.path.clone())
            .collect();
        altered.sort();
        let mut expected: Vec<String> = (0..aliases).map(|i| format!("Textures/s{i}")).collect();
        expected.push("Textures/owner".to_string());
        expected.sort();
        prop_assert_eq!(altered, expected);
        prop_assert_eq!(patch.summary().added + patch.summary().removed, 0);
    }

    #[test]
    fn identical_snapshots_produce_empty_patch(tree in snapshot()) {
        let copy = tree.clone();
        prop_assert!(diff_trees(&tree, &copy, &ClassifierConfig::default()).is_empty());
    }

    #[test]
    fn comparison_is_deterministic(old in snapshot(), new in snapshot()) {
        let config = ClassifierConfig::default();
        prop_assert_eq!(diff_trees(&old, &new, &config), diff_trees(&old, &new, &config));
    }

    #[test]
    fn added_and_removed_paths_are_conserved(old in snapshot(), new in snapshot()) {
        let config = ClassifierConfig::default();
        let patch = diff_trees(&old, &new, &config);
        let old_paths = descriptor_paths(&old, &config);
        let new_paths = descriptor_paths(&new, &config);

        let mut removed: Vec<String> = patch
            .with_change(ChangeKind::Removed)
            .map(|n| n.path.clone())
            .collect();
        removed.sort();
        let expected_removed: Vec<String> = old_paths.difference(&new_paths).cloned().collect();
        prop_assert_eq!(removed, expected_removed);

        let mut added: Vec<String> = patch
            .with_change(ChangeKind::Added)
            .map(|n| n.path.clone())
            .collect();
        added.sort();
        let expected_added: Vec<String> = new_paths.difference(&old_paths).cloned().collect();
        prop_assert_eq!(added, expected_added);
    }

    #[test]
    fn patch_is_fully_pruned(old in snapshot(), new in snapshot()) {
        let patch = diff_trees(&old, &new, &ClassifierConfig::default());
        for (node, _) in patch.iter() {
            prop_assert_ne!(node.change, ChangeKind::Unchanged);
            if node.children.is_empty() {
                prop_assert!(matches!(
                    node.change,
                    ChangeKind::Altered | ChangeKind::Added | ChangeKind::Removed
                ));
            }
            if node.change == ChangeKind::ContainerChanged {
                prop_assert!(!node.children.is_empty());
            }
        }
    }

    #[test]
    fn whitelisted_containers_are_descended(tree in snapshot()) {
        let config = ClassifierConfig::default();
        let descriptors = DescriptorTree::build(&tree, Side::New, &Classifier::new(&config));
        for id in descriptors.preorder() {
            let descriptor = descriptors.get(id);
            let node = tree.node(descriptor.origin.node);
            if config.rule_for(node.type_tag()) == &ClassifierRule::Container
                && !node.children().is_empty()
            {
                prop_assert_eq!(descriptor.children.len(), node.children().len());
            }
        }
    }
}
