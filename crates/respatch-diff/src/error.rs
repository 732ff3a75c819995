//! Error types for the diff crate.

use std::path::PathBuf;

use respatch_store::LoadError;

use crate::descriptor::Side;

/// Errors that can occur during a comparison.
///
/// Matching and pruning are total; the only runtime failure is a snapshot
/// that cannot be opened.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// One of the two snapshots could not be opened or parsed.
    #[error("failed to load {side} snapshot {}: {source}", path.display())]
    LoadFailure {
        side: Side,
        path: PathBuf,
        #[source]
        source: LoadError,
    },

    /// A classifier rule set could not be read or parsed.
    #[error("invalid classifier configuration: {0}")]
    Config(String),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
