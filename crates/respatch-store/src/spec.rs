use std::collections::BTreeMap;

use respatch_types::TypeTag;
use serde::{Deserialize, Serialize};

/// Owned, recursive description of a resource node and its subtree.
///
/// `NodeSpec` is how trees are written by hand in tests and how snapshots
/// are dumped to disk. [`ResourceTree::from_spec`](crate::ResourceTree::from_spec)
/// turns it into an arena with computed hashes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Resource type of the node.
    pub type_tag: TypeTag,
    /// Node name. Not required to be unique among siblings.
    pub name: String,
    /// The node's own bytes, excluding its children. Hex in dumps.
    #[serde(default, with = "hex_payload", skip_serializing_if = "Vec::is_empty")]
    pub payload: Vec<u8>,
    /// Whether the node reuses a later sibling's real pixel/palette data.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shares_data: bool,
    /// Placement settings stored alongside the node in its container.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, serde_json::Value>,
    /// Ordered child nodes.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    /// Create a childless node with an empty payload.
    pub fn new(type_tag: TypeTag, name: impl Into<String>) -> Self {
        Self {
            type_tag,
            name: name.into(),
            payload: Vec::new(),
            shares_data: false,
            properties: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Set the node's own bytes.
    pub fn with_payload(mut self, payload: impl Into<Vec<u8>>) -> Self {
        self.payload = payload.into();
        self
    }

    /// Append one child.
    pub fn with_child(mut self, child: NodeSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Append several children in order.
    pub fn with_children(mut self, children: impl IntoIterator<Item = NodeSpec>) -> Self {
        self.children.extend(children);
        self
    }

    /// Mark the node as aliasing a sibling's data.
    pub fn sharing_data(mut self) -> Self {
        self.shares_data = true;
        self
    }

    /// Set one placement property.
    pub fn with_property(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn subtree_len(&self) -> usize {
        1 + self.children.iter().map(NodeSpec::subtree_len).sum::<usize>()
    }
}

mod hex_payload {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        hex::decode(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_collects_children_in_order() {
        let spec = NodeSpec::new(TypeTag::RESOURCE_GROUP, "Textures")
            .with_child(NodeSpec::new(TypeTag::TEXTURE, "a"))
            .with_children([
                NodeSpec::new(TypeTag::TEXTURE, "b"),
                NodeSpec::new(TypeTag::TEXTURE, "c"),
            ]);
        let names: Vec<_> = spec.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(spec.subtree_len(), 4);
    }

    #[test]
    fn dump_format_is_compact() {
        let spec = NodeSpec::new(TypeTag::TEXTURE, "Eyes").with_payload(vec![0xde, 0xad]);
        let value = serde_json::to_value(&spec).unwrap();
        assert_eq!(
            value,
            json!({ "type_tag": "TEX0", "name": "Eyes", "payload": "dead" })
        );
    }

    #[test]
    fn dump_format_parses_defaults() {
        let spec: NodeSpec = serde_json::from_value(json!({
            "type_tag": "ARC",
            "name": "root",
            "children": [
                { "type_tag": "TEX0", "name": "Eyes", "shares_data": true,
                  "properties": { "compression": "lz77" } }
            ]
        }))
        .unwrap();
        assert!(spec.payload.is_empty());
        assert!(spec.children[0].shares_data);
        assert_eq!(spec.children[0].properties["compression"], json!("lz77"));
    }

    #[test]
    fn dump_format_rejects_bad_hex() {
        let result: Result<NodeSpec, _> = serde_json::from_value(json!({
            "type_tag": "TEX0", "name": "x", "payload": "zz"
        }));
        assert!(result.is_err());
    }
}
