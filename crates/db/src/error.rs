use std::path::PathBuf;

use pushwave_core::error::CoreError;

/// Errors from the subscription store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The candidate was rejected before touching storage.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The store file exists but could not be read or written.
    #[error("Subscription store I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store file is not valid JSON or holds malformed entries.
    #[error("Subscription store at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
