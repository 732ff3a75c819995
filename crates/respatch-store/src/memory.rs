use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use tracing::debug;

use crate::error::{LoadError, LoadResult};
use crate::node::ResourceTree;
use crate::spec::NodeSpec;
use crate::traits::ResourceLoader;

/// In-memory, HashMap-based snapshot loader.
///
/// Intended for tests and embedding. Snapshots are registered under a path
/// and a fresh [`ResourceTree`] is built on every `open`. The loader counts
/// trees that have been opened but not yet closed, so callers can check that
/// every acquisition was released.
pub struct InMemoryLoader {
    snapshots: RwLock<HashMap<PathBuf, NodeSpec>>,
    open_trees: AtomicUsize,
}

impl InMemoryLoader {
    /// Create a new empty loader.
    pub fn new() -> Self {
        Self {
            snapshots: RwLock::new(HashMap::new()),
            open_trees: AtomicUsize::new(0),
        }
    }

    /// Register (or replace) the snapshot stored under `path`.
    pub fn insert(&self, path: impl Into<PathBuf>, spec: NodeSpec) {
        self.snapshots
            .write()
            .expect("lock poisoned")
            .insert(path.into(), spec);
    }

    /// Forget the snapshot stored under `path`. Returns `true` if it existed.
    pub fn remove(&self, path: &Path) -> bool {
        self.snapshots
            .write()
            .expect("lock poisoned")
            .remove(path)
            .is_some()
    }

    /// Number of registered snapshots.
    pub fn len(&self) -> usize {
        self.snapshots.read().expect("lock poisoned").len()
    }

    /// Returns `true` if no snapshot is registered.
    pub fn is_empty(&self) -> bool {
        self.snapshots.read().expect("lock poisoned").is_empty()
    }

    /// Trees handed out by `open` and not yet returned through `close`.
    pub fn open_trees(&self) -> usize {
        self.open_trees.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceLoader for InMemoryLoader {
    fn open(&self, path: &Path) -> LoadResult<ResourceTree> {
        let spec = {
            let map = self.snapshots.read().expect("lock poisoned");
            map.get(path)
                .cloned()
                .ok_or_else(|| LoadError::NotFound(path.to_path_buf()))?
        };
        let tree = ResourceTree::from_spec(spec);
        let open = self.open_trees.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(path = %path.display(), nodes = tree.len(), open, "opened in-memory snapshot");
        Ok(tree)
    }

    fn close(&self, tree: ResourceTree) {
        let open = self.open_trees.fetch_sub(1, Ordering::SeqCst).saturating_sub(1);
        debug!(nodes = tree.len(), open, "closed in-memory snapshot");
    }
}

impl std::fmt::Debug for InMemoryLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryLoader")
            .field("snapshot_count", &self.len())
            .field("open_trees", &self.open_trees())
            .finish()
    }
}
