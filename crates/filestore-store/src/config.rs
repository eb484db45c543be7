use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::StoreResult;

/// How payloads and sidecars are written to disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteMode {
    /// Truncate and overwrite the target file in place. Concurrent readers
    /// may observe a partially written file.
    #[default]
    Direct,
    /// Write a temporary file next to the target, fsync it, then rename it
    /// into place. Data is renamed before the sidecar.
    ///
    /// The temporary file is named `.filestore-<random>.tmp` and sits in the
    /// target's directory until the rename. While a `put` is in flight, or
    /// after a crash interrupts one, [`list`](crate::Filestore::list) and
    /// [`count`](crate::Filestore::count) report it as a key; reading that
    /// key returns `None` because it has no sidecar.
    AtomicRename,
}

/// Configuration for a [`Filestore`](crate::Filestore).
///
/// Roots left unset are allocated as ephemeral temporary directories that
/// live exactly as long as the store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Store name; becomes a directory under each persistent root.
    pub name: String,
    /// Root for payload files.
    #[serde(default)]
    pub data_root: Option<PathBuf>,
    /// Root for metadata sidecars. Independent of `data_root`.
    #[serde(default)]
    pub metadata_root: Option<PathBuf>,
    #[serde(default)]
    pub write_mode: WriteMode,
}

impl StoreConfig {
    /// Configuration for an ephemeral store with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_root: None,
            metadata_root: None,
            write_mode: WriteMode::default(),
        }
    }

    pub fn with_data_root(mut self, root: impl AsRef<Path>) -> Self {
        self.data_root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn with_metadata_root(mut self, root: impl AsRef<Path>) -> Self {
        self.metadata_root = Some(root.as_ref().to_path_buf());
        self
    }

    pub fn with_write_mode(mut self, mode: WriteMode) -> Self {
        self.write_mode = mode;
        self
    }

    /// Parse a configuration from a TOML document.
    ///
    /// ```
    /// use filestore_store::{StoreConfig, WriteMode};
    ///
    /// let config = StoreConfig::from_toml_str(r#"
    ///     name = "assets"
    ///     data_root = "/var/lib/filestore/data"
    ///     write_mode = "atomic_rename"
    /// "#).unwrap();
    /// assert_eq!(config.name, "assets");
    /// assert!(config.metadata_root.is_none());
    /// assert_eq!(config.write_mode, WriteMode::AtomicRename);
    /// ```
    pub fn from_toml_str(s: &str) -> StoreResult<Self> {
        Ok(toml::from_str(s)?)
    }
}
