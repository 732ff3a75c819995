use std::path::PathBuf;

/// Errors from loading or writing resource-tree snapshots.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// No snapshot is registered or stored under this path.
    #[error("snapshot not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error from the underlying storage backend.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot exists but could not be parsed into a resource tree.
    #[error("malformed snapshot {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// A tree could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for loader operations.
pub type LoadResult<T> = Result<T, LoadError>;
