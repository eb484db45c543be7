//! Metadata sidecar persistence.

use std::path::Path;

use filestore_types::ObjectMetadata;

use crate::config::WriteMode;
use crate::error::{StoreError, StoreResult};
use crate::files;

/// Read the sidecar at `path`. A missing sidecar is `None`, not an error.
pub(crate) fn read(path: &Path) -> StoreResult<Option<ObjectMetadata>> {
    let Some(bytes) = files::read(path)? else {
        return Ok(None);
    };
    let record = ObjectMetadata::from_json(&bytes).map_err(|source| StoreError::CorruptMetadata {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(record))
}

pub(crate) fn write(path: &Path, record: &ObjectMetadata, mode: WriteMode) -> StoreResult<()> {
    let bytes = record.to_json().map_err(StoreError::Encode)?;
    files::write(path, &bytes, mode)
}
