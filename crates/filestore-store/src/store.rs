use std::path::{Path, PathBuf};

use filestore_types::{ObjectKey, ObjectMetadata};
use tracing::{debug, warn};

use crate::body::ObjectBody;
use crate::conditions::GetConditions;
use crate::config::{StoreConfig, WriteMode};
use crate::error::{StoreError, StoreResult};
use crate::files;
use crate::roots::{validate_name, Root};
use crate::sidecar;

/// Object store on top of a local filesystem.
///
/// Each object is two files at the same relative path: the raw payload under
/// the data root and a JSON metadata record under the metadata root. Every
/// mutating operation touches both, but not atomically; a key with only one
/// half present reads as absent.
///
/// All operations are synchronous and provide no locking. Concurrent writers
/// to the same key race at the filesystem level.
pub struct Filestore {
    name: String,
    data: Root,
    metadata: Root,
    write_mode: WriteMode,
}

impl Filestore {
    /// Open a store from its configuration.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        validate_name(&config.name)?;
        let data = Root::open(config.data_root.as_deref(), &config.name, "data")?;
        let metadata = Root::open(config.metadata_root.as_deref(), &config.name, "meta")?;

        debug!(
            store = %config.name,
            data = %data.path().display(),
            metadata = %metadata.path().display(),
            write_mode = ?config.write_mode,
            "opened filestore"
        );

        Ok(Self {
            name: config.name,
            data,
            metadata,
            write_mode: config.write_mode,
        })
    }

    /// A store whose trees are both temporary and deleted on drop.
    pub fn ephemeral(name: impl Into<String>) -> StoreResult<Self> {
        Self::open(StoreConfig::new(name))
    }

    /// A store persisted under `<data_root>/<name>` and `<metadata_root>/<name>`.
    pub fn with_roots(
        name: impl Into<String>,
        data_root: impl AsRef<Path>,
        metadata_root: impl AsRef<Path>,
    ) -> StoreResult<Self> {
        Self::open(
            StoreConfig::new(name)
                .with_data_root(data_root)
                .with_metadata_root(metadata_root),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory holding payload files.
    pub fn data_dir(&self) -> &Path {
        self.data.path()
    }

    /// Directory holding metadata sidecars.
    pub fn metadata_dir(&self) -> &Path {
        self.metadata.path()
    }

    pub fn write_mode(&self) -> WriteMode {
        self.write_mode
    }

    /// Returns `true` if either tree is removed when the store drops.
    pub fn is_ephemeral(&self) -> bool {
        self.data.is_ephemeral() || self.metadata.is_ephemeral()
    }

    fn data_path(&self, key: &ObjectKey) -> PathBuf {
        self.data.path().join(key.to_native_path())
    }

    fn metadata_path(&self, key: &ObjectKey) -> PathBuf {
        self.metadata.path().join(key.to_native_path())
    }

    // ---------------------------------------------------------------
    // Object operations
    // ---------------------------------------------------------------

    /// Store `payload` under `key`, replacing any previous object.
    ///
    /// The payload is written first, then its freshly generated metadata
    /// record. Returns the record. A key with no segments is rejected; any
    /// filesystem failure is returned as-is and nothing is rolled back.
    pub fn put(&self, key: &str, payload: &[u8]) -> StoreResult<ObjectMetadata> {
        let key = ObjectKey::parse(key).map_err(|source| StoreError::InvalidKey {
            key: key.to_string(),
            source,
        })?;
        let record = ObjectMetadata::generate(payload);

        files::write(&self.data_path(&key), payload, self.write_mode)?;
        sidecar::write(&self.metadata_path(&key), &record, self.write_mode)?;

        debug!(
            store = %self.name,
            %key,
            size = record.content_size,
            hash = %record.hash.short_hex(),
            "put object"
        );
        Ok(record)
    }

    /// Read the object stored under `key`.
    pub fn get(&self, key: &str) -> StoreResult<Option<ObjectBody>> {
        self.get_if(key, &GetConditions::default())
    }

    /// Read the object stored under `key` if every precondition holds.
    ///
    /// Returns `None` when the object is missing, when either of its two
    /// files is missing, or when a precondition fails.
    pub fn get_if(&self, key: &str, conditions: &GetConditions) -> StoreResult<Option<ObjectBody>> {
        let Ok(key) = ObjectKey::parse(key) else {
            return Ok(None);
        };
        let Some(record) = sidecar::read(&self.metadata_path(&key))? else {
            return Ok(None);
        };
        if !conditions.matches(&record) {
            debug!(store = %self.name, %key, "precondition failed");
            return Ok(None);
        }
        match files::open(&self.data_path(&key))? {
            Some(file) => Ok(Some(ObjectBody::new(file, record))),
            None => {
                warn!(store = %self.name, %key, "metadata present without data file");
                Ok(None)
            }
        }
    }

    /// Read only the metadata record for `key`.
    ///
    /// The payload is not read, but its file must be present: a sidecar
    /// without data reads as absent, as it does for [`get`](Self::get).
    pub fn head(&self, key: &str) -> StoreResult<Option<ObjectMetadata>> {
        let Ok(key) = ObjectKey::parse(key) else {
            return Ok(None);
        };
        let Some(record) = sidecar::read(&self.metadata_path(&key))? else {
            return Ok(None);
        };
        if !files::is_file(&self.data_path(&key))? {
            warn!(store = %self.name, %key, "metadata present without data file");
            return Ok(None);
        }
        Ok(Some(record))
    }

    /// Remove the object stored under `key`.
    ///
    /// Both files are removed independently and a missing file is not an
    /// error. Returns `true` if the data file existed and was removed.
    pub fn delete(&self, key: &str) -> StoreResult<bool> {
        let Ok(key) = ObjectKey::parse(key) else {
            return Ok(false);
        };
        let data_removed = files::remove(&self.data_path(&key))?;
        let metadata_removed = files::remove(&self.metadata_path(&key))?;

        if data_removed != metadata_removed {
            warn!(
                store = %self.name,
                %key,
                data_removed,
                metadata_removed,
                "deleted half of an inconsistent object"
            );
        } else if data_removed {
            debug!(store = %self.name, %key, "deleted object");
        }
        Ok(data_removed)
    }

    /// Returns `true` if a payload file is stored under `key`.
    ///
    /// A key that resolves to a directory, because it is a prefix of other
    /// keys, does not exist as an object.
    pub fn exists(&self, key: &str) -> StoreResult<bool> {
        let Ok(key) = ObjectKey::parse(key) else {
            return Ok(false);
        };
        Ok(files::is_file(&self.data_path(&key))?)
    }
}

impl std::fmt::Debug for Filestore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Filestore")
            .field("name", &self.name)
            .field("data_dir", &self.data_dir())
            .field("metadata_dir", &self.metadata_dir())
            .field("write_mode", &self.write_mode)
            .finish()
    }
}
