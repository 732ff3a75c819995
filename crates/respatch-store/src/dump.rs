use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{LoadError, LoadResult};
use crate::node::ResourceTree;
use crate::spec::NodeSpec;
use crate::traits::ResourceLoader;

/// Loader for JSON snapshot dumps on disk.
///
/// A dump is a serialized [`NodeSpec`] describing the whole container file.
/// Relative paths are resolved against an optional base directory.
#[derive(Clone, Debug, Default)]
pub struct DumpLoader {
    base: Option<PathBuf>,
}

impl DumpLoader {
    /// Loader resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loader resolving relative paths against `base`.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self {
            base: Some(base.into()),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Write `tree` as a pretty-printed JSON dump.
    pub fn write(&self, path: &Path, tree: &ResourceTree) -> LoadResult<()> {
        let resolved = self.resolve(path);
        let data = serde_json::to_vec_pretty(&tree.to_spec())
            .map_err(|e| LoadError::Serialization(e.to_string()))?;
        fs::write(&resolved, data).map_err(|source| LoadError::Io {
            path: resolved.clone(),
            source,
        })?;
        debug!(path = %resolved.display(), nodes = tree.len(), "wrote snapshot dump");
        Ok(())
    }
}

impl ResourceLoader for DumpLoader {
    fn open(&self, path: &Path) -> LoadResult<ResourceTree> {
        let resolved = self.resolve(path);
        let data = fs::read(&resolved).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                LoadError::NotFound(resolved.clone())
            } else {
                LoadError::Io {
                    path: resolved.clone(),
                    source,
                }
            }
        })?;
        let spec: NodeSpec = serde_json::from_slice(&data).map_err(|e| {
            warn!(path = %resolved.display(), error = %e, "malformed snapshot dump");
            LoadError::Malformed {
                path: resolved.clone(),
                reason: e.to_string(),
            }
        })?;
        let tree = ResourceTree::from_spec(spec);
        debug!(path = %resolved.display(), nodes = tree.len(), "opened snapshot dump");
        Ok(tree)
    }
}
