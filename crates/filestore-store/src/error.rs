use std::io;
use std::path::PathBuf;

use filestore_types::TypeError;

/// Errors from object store operations.
///
/// Expected absence (missing key, failed precondition, empty scan) is never
/// an error; those surface as `None`, `false` or an empty iterator. Every
/// variant here is a hard failure the caller has to handle.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while walking a store tree.
    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    /// A metadata sidecar exists but cannot be decoded.
    #[error("corrupt metadata at {}: {source}", .path.display())]
    CorruptMetadata {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A metadata record could not be encoded.
    #[error("metadata encoding error: {0}")]
    Encode(serde_json::Error),

    /// The key cannot address an object (e.g. it has no segments).
    #[error("invalid key {key:?}: {source}")]
    InvalidKey { key: String, source: TypeError },

    /// The store name cannot be used as a directory name.
    #[error("invalid store name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A TOML configuration document could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A temporary file could not be renamed into place.
    #[error("atomic rename failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
