use std::path::Path;

use crate::error::LoadResult;
use crate::node::ResourceTree;

/// Source of resource-tree snapshots.
///
/// All implementations must satisfy these invariants:
/// - `open` is reentrant: independent comparisons may open snapshots from
///   several threads at once.
/// - Every tree returned by `open` is eventually passed back to `close`
///   exactly once, unless its owner explicitly detached it (see
///   [`SnapshotHandle::detach`](crate::SnapshotHandle::detach)).
/// - Parse and I/O failures are returned as errors, never panics.
pub trait ResourceLoader: Send + Sync {
    /// Open the snapshot stored at `path` and build its resource tree.
    fn open(&self, path: &Path) -> LoadResult<ResourceTree>;

    /// Release a tree previously returned by [`open`](Self::open).
    ///
    /// The default implementation simply drops the tree.
    fn close(&self, tree: ResourceTree) {
        drop(tree);
    }
}
