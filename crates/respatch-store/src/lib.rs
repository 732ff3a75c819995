//! Resource-tree model and snapshot loaders for respatch.
//!
//! A container file (archive, resource pack, effect pack, ...) is a tree of
//! typed resource nodes. This crate holds that tree in an append-only arena
//! ([`ResourceTree`]) and provides the loader seam through which the diff
//! engine acquires snapshots.
//!
//! # Resource Model
//!
//! - [`ResourceTree`] -- arena of [`ResourceNode`]s addressed by [`NodeIndex`]
//! - [`NodeSpec`] -- owned, recursive description of a tree; also the
//!   on-disk dump format read by [`DumpLoader`]
//!
//! # Loaders
//!
//! All loaders implement the [`ResourceLoader`] trait:
//!
//! - [`InMemoryLoader`] -- `HashMap`-based loader for tests and embedding
//! - [`DumpLoader`] -- reads JSON snapshot dumps from disk
//!
//! A [`SnapshotHandle`] scopes one opened tree and returns it to its loader
//! on drop unless it is explicitly detached.
//!
//! # Design Rules
//!
//! 1. A `ResourceTree` is immutable once built, except for the shared-data
//!    flag, which is not part of the node bytes.
//! 2. Node hashes always cover the node's serialized children.
//! 3. Loaders are reentrant: concurrent `open` calls are always safe.
//! 4. All I/O and parse errors are propagated, never silently ignored.

pub mod dump;
pub mod error;
pub mod handle;
pub mod memory;
pub mod node;
pub mod spec;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use dump::DumpLoader;
pub use error::{LoadError, LoadResult};
pub use handle::SnapshotHandle;
pub use memory::InMemoryLoader;
pub use node::{NodeIndex, ResourceNode, ResourceTree};
pub use spec::NodeSpec;
pub use traits::ResourceLoader;
