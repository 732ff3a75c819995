//! Resource-tree diff engine.
//!
//! Given two snapshots of the same hierarchical container file, computes a
//! minimal [`Patch`] describing which nodes were altered, added or removed.
//!
//! A comparison runs in four steps:
//!
//! 1. **Classify**: the [`Classifier`] decides per node whether its children
//!    are diffed individually (container) or the node is one opaque blob.
//! 2. **Describe**: each snapshot becomes a [`DescriptorTree`] keyed by path.
//! 3. **Match**: new descriptors are matched to old ones by path; hashes and
//!    shared-data group roots decide whether a match was altered.
//! 4. **Prune**: unchanged subtrees are dropped and removals are appended.
//!
//! # Key Types
//!
//! - [`ClassifierConfig`] / [`ClassifierRule`] -- Data-driven container rules
//! - [`DescriptorTree`] / [`NodeDescriptor`] -- Per-snapshot comparison view
//! - [`Patch`] / [`PatchNode`] / [`ChangeKind`] -- The pruned result
//! - [`PatchBundle`] -- A patch plus the snapshots its nodes refer to

pub mod classifier;
pub mod compare;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod matcher;
pub mod patch;
pub mod shared;
pub mod sidecar;

#[cfg(test)]
mod properties;

pub use classifier::Classifier;
pub use compare::{compare_snapshots, PatchBundle};
pub use config::{ClassifierConfig, ClassifierRule, SharedDataScan};
pub use descriptor::{ChangeKind, DescriptorId, DescriptorTree, NodeDescriptor, NodeRef, Side};
pub use error::{DiffError, DiffResult};
pub use matcher::{diff_trees, match_descriptors};
pub use patch::{Patch, PatchId, PatchIter, PatchNode, PatchSummary};
pub use shared::group_root;
pub use sidecar::settings_record;
