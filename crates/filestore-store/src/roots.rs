//! Root directories owned by a store.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tempfile::TempDir;
use tracing::info;

use crate::error::{StoreError, StoreResult};

/// One of a store's two trees.
///
/// A persistent root is `<root>/<name>` and outlives the store. An
/// ephemeral root is a temporary directory removed when the `Root` drops,
/// on every exit path including unwinding.
#[derive(Debug)]
pub(crate) enum Root {
    Persistent(PathBuf),
    Ephemeral(TempDir),
}

impl Root {
    /// Open `<base>/<name>`, creating it if needed, or allocate a temporary
    /// directory when no base is configured.
    pub(crate) fn open(base: Option<&Path>, name: &str, tree: &str) -> StoreResult<Self> {
        match base {
            Some(base) => {
                let dir = base.join(name);
                fs::create_dir_all(&dir)?;
                Ok(Self::Persistent(dir))
            }
            None => {
                let dir = tempfile::Builder::new()
                    .prefix(&format!("{name}-{tree}-"))
                    .tempdir()?;
                info!(store = name, tree, path = %dir.path().display(), "allocated ephemeral root");
                Ok(Self::Ephemeral(dir))
            }
        }
    }

    pub(crate) fn path(&self) -> &Path {
        match self {
            Self::Persistent(dir) => dir.as_path(),
            Self::Ephemeral(dir) => dir.path(),
        }
    }

    pub(crate) fn is_ephemeral(&self) -> bool {
        matches!(self, Self::Ephemeral(_))
    }
}

/// Validate a store name: it must be exactly one normal path component.
pub(crate) fn validate_name(name: &str) -> StoreResult<()> {
    let invalid = |reason: &str| StoreError::InvalidName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("store name must not be empty"));
    }
    if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        return Err(invalid("store name must not contain a path separator"));
    }
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(invalid("store name must be a plain directory name")),
    }
}
