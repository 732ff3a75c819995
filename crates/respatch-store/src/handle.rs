use std::ops::Deref;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::LoadResult;
use crate::node::ResourceTree;
use crate::traits::ResourceLoader;

/// Scoped ownership of one opened snapshot.
///
/// The tree is returned to its loader when the handle is dropped, on every
/// exit path. Handing the tree to someone else is explicit: call
/// [`detach`](Self::detach), after which the loader is no longer involved.
pub struct SnapshotHandle<'l> {
    loader: &'l dyn ResourceLoader,
    path: PathBuf,
    // Only `None` after `detach` or during `drop`.
    tree: Option<ResourceTree>,
}

impl<'l> SnapshotHandle<'l> {
    /// Open the snapshot at `path` through `loader`.
    pub fn open(loader: &'l dyn ResourceLoader, path: impl AsRef<Path>) -> LoadResult<Self> {
        let path = path.as_ref();
        let tree = loader.open(path)?;
        Ok(Self {
            loader,
            path: path.to_path_buf(),
            tree: Some(tree),
        })
    }

    /// The path this snapshot was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The opened tree.
    pub fn tree(&self) -> &ResourceTree {
        self.tree.as_ref().expect("snapshot handle used after detach")
    }

    /// Take the tree out of the handle without closing it.
    ///
    /// The caller becomes responsible for the tree; the loader's `close` is
    /// never called for it.
    pub fn detach(mut self) -> ResourceTree {
        debug!(path = %self.path.display(), "detached snapshot from loader");
        self.tree.take().expect("snapshot handle used after detach")
    }
}

impl Deref for SnapshotHandle<'_> {
    type Target = ResourceTree;

    fn deref(&self) -> &ResourceTree {
        self.tree()
    }
}

impl Drop for SnapshotHandle<'_> {
    fn drop(&mut self) {
        if let Some(tree) = self.tree.take() {
            debug!(path = %self.path.display(), "releasing snapshot");
            self.loader.close(tree);
        }
    }
}

impl std::fmt::Debug for SnapshotHandle<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotHandle")
            .field("path", &self.path)
            .field("nodes", &self.tree.as_ref().map(ResourceTree::len))
            .finish()
    }
}
