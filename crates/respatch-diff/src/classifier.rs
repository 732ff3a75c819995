//! Container classification.
//!
//! Decides whether a node's children are diffed individually or whether the
//! node is compared as one opaque blob. Classification is best-effort: any
//! type the rule table does not recognise is a leaf, and the predicate never
//! fails.

use respatch_store::{NodeIndex, ResourceTree};

use crate::config::{ClassifierConfig, ClassifierRule};

/// Stateless container predicate over one rule set.
#[derive(Clone, Copy, Debug)]
pub struct Classifier<'c> {
    config: &'c ClassifierConfig,
}

impl<'c> Classifier<'c> {
    pub fn new(config: &'c ClassifierConfig) -> Self {
        Self { config }
    }

    /// The rule set this classifier applies.
    pub fn config(&self) -> &'c ClassifierConfig {
        self.config
    }

    /// Whether the node at `index` must have its children diffed.
    ///
    /// Depends only on the node's type tag and, for the conditional rules,
    /// its real children. It never looks at any other snapshot.
    pub fn is_container(&self, tree: &ResourceTree, index: NodeIndex) -> bool {
        let node = tree.node(index);
        match self.config.rule_for(node.type_tag()) {
            ClassifierRule::Container => true,
            ClassifierRule::Leaf => false,
            ClassifierRule::ContainerIfChildrenNamed(allowed) => node
                .children()
                .iter()
                .all(|&child| allowed.iter().any(|name| name == tree.node(child).name())),
            ClassifierRule::ContainerIfAnyChildren => !node.children().is_empty(),
        }
    }
}
