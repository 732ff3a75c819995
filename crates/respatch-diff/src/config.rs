//! Classifier configuration: which resource types are diffed structurally.
//!
//! The rule table is plain data so alternate rule sets can be loaded from
//! TOML and substituted in tests. Nothing here is process-wide state.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use respatch_types::TypeTag;
use serde::{Deserialize, Serialize};

use crate::error::{DiffError, DiffResult};

/// How a resource type is classified for diff granularity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassifierRule {
    /// Always a container: children are diffed individually.
    Container,
    /// Always an atomic leaf, even if the node has real children.
    Leaf,
    /// Container only if no child has a name outside this set.
    ContainerIfChildrenNamed(Vec<String>),
    /// Container only if the node has at least one child.
    ContainerIfAnyChildren,
}

/// How the shared-data group root is located among siblings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SharedDataScan {
    /// Stop at the first following sibling that owns its data.
    #[default]
    FirstOwner,
    /// Always walk to the last sibling. Matches patches produced by older
    /// tooling, which never stopped early.
    SequenceEnd,
}

/// Immutable rule set consumed by the classifier and descriptor builder.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Group-root scan policy for shared-data siblings.
    pub shared_data_scan: SharedDataScan,
    /// Grouping types that map to folders when a patch is exported.
    pub folder_types: BTreeSet<TypeTag>,
    /// Fields never written to a node's sidecar settings record.
    pub field_blacklist: BTreeSet<String>,
    /// Per-type classification. Types not listed are leaves.
    pub rules: BTreeMap<TypeTag, ClassifierRule>,
}

static LEAF: ClassifierRule = ClassifierRule::Leaf;

impl Default for ClassifierConfig {
    fn default() -> Self {
        let containers = [
            TypeTag::ARCHIVE,
            TypeTag::RESOURCE_PACK,
            TypeTag::RESOURCE_GROUP,
            TypeTag::MODEL_GROUP,
            TypeTag::BONE_ANIMATION,
            TypeTag::EFFECT_PACK,
            TypeTag::EFFECT_TEXTURES,
            TypeTag::EFFECT_LIST,
        ];
        let mut rules: BTreeMap<TypeTag, ClassifierRule> = containers
            .into_iter()
            .map(|tag| (tag, ClassifierRule::Container))
            .collect();
        rules.insert(
            TypeTag::MODEL,
            ClassifierRule::ContainerIfChildrenNamed(vec![
                "Bones".to_string(),
                "Definitions".to_string(),
            ]),
        );
        rules.insert(TypeTag::BONE, ClassifierRule::ContainerIfAnyChildren);

        let folder_types = [
            TypeTag::ARCHIVE,
            TypeTag::RESOURCE_PACK,
            TypeTag::RESOURCE_GROUP,
            TypeTag::MODEL_GROUP,
        ]
        .into_iter()
        .collect();

        let field_blacklist = [
            "file_type",
            "file_index",
            "group_id",
            "redirect_index",
            "redirect_target",
            "children",
            "parent",
        ]
        .into_iter()
        .map(String::from)
        .collect();

        Self {
            shared_data_scan: SharedDataScan::default(),
            folder_types,
            field_blacklist,
            rules,
        }
    }
}

impl ClassifierConfig {
    /// A rule set with no containers, folders, or blacklisted fields.
    pub fn empty() -> Self {
        Self {
            shared_data_scan: SharedDataScan::default(),
            folder_types: BTreeSet::new(),
            field_blacklist: BTreeSet::new(),
            rules: BTreeMap::new(),
        }
    }

    /// Add or replace the rule for one type.
    pub fn with_rule(mut self, tag: TypeTag, rule: ClassifierRule) -> Self {
        self.rules.insert(tag, rule);
        self
    }

    /// Select the shared-data scan policy.
    pub fn with_shared_data_scan(mut self, scan: SharedDataScan) -> Self {
        self.shared_data_scan = scan;
        self
    }

    /// The rule for `tag`, defaulting to [`ClassifierRule::Leaf`].
    pub fn rule_for(&self, tag: &TypeTag) -> &ClassifierRule {
        self.rules.get(tag).unwrap_or(&LEAF)
    }

    /// Whether `tag` is a folder grouping type.
    pub fn is_folder(&self, tag: &TypeTag) -> bool {
        self.folder_types.contains(tag)
    }

    /// Whether `field` is excluded from sidecar settings records.
    pub fn is_blacklisted_field(&self, field: &str) -> bool {
        self.field_blacklist.contains(field)
    }

    /// Parse a rule set from TOML. Missing sections keep their defaults.
    pub fn from_toml_str(s: &str) -> DiffResult<Self> {
        toml::from_str(s).map_err(|e| DiffError::Config(e.to_string()))
    }

    /// Read and parse a TOML rule file.
    pub fn from_toml_file(path: &Path) -> DiffResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| DiffError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Render the rule set as TOML.
    pub fn to_toml_string(&self) -> DiffResult<String> {
        toml::to_string(self).map_err(|e| DiffError::Config(e.to_string()))
    }
}
