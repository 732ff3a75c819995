//! Sidecar settings records.
//!
//! An exporter writes each exported node's placement settings next to the
//! node's bytes. Derived and transient fields (indices, group ids, redirect
//! targets, tree links) are excluded by the configured field blacklist.

use respatch_store::ResourceNode;
use serde_json::{Map, Value};

use crate::config::ClassifierConfig;

/// The node's placement settings minus blacklisted fields.
pub fn settings_record(node: &ResourceNode, config: &ClassifierConfig) -> Map<String, Value> {
    node.properties()
        .iter()
        .filter(|(field, _)| !config.is_blacklisted_field(field))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use respatch_store::{NodeSpec, ResourceTree};
    use respatch_types::TypeTag;
    use serde_json::json;

    fn placed_node() -> ResourceTree {
        ResourceTree::from_spec(
            NodeSpec::new(TypeTag::RESOURCE_PACK, "Model")
                .with_property("compression", json!("ExtendedLZ77"))
                .with_property("file_index", json!(3))
                .with_property("group_id", json!(1))
                .with_property("redirect_target", json!("Model2")),
        )
    }

    #[test]
    fn blacklisted_fields_are_dropped() {
        let tree = placed_node();
        let record = settings_record(tree.node(tree.root()), &ClassifierConfig::default());
        assert_eq!(Value::Object(record), json!({ "compression": "ExtendedLZ77" }));
    }

    #[test]
    fn empty_blacklist_keeps_everything() {
        let tree = placed_node();
        let record = settings_record(tree.node(tree.root()), &ClassifierConfig::empty());
        assert_eq!(record.len(), 4);
    }
}
