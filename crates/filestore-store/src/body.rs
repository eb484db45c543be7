use std::fs::File;
use std::io::{self, Read};

use filestore_types::ObjectMetadata;

/// Readable handle to a stored payload.
///
/// Wraps the open data file; bytes are streamed from disk, not copied up
/// front. The metadata record the read was served under travels with it.
#[derive(Debug)]
pub struct ObjectBody {
    file: File,
    metadata: ObjectMetadata,
}

impl ObjectBody {
    pub(crate) fn new(file: File, metadata: ObjectMetadata) -> Self {
        Self { file, metadata }
    }

    /// The metadata record that satisfied the read.
    pub fn metadata(&self) -> &ObjectMetadata {
        &self.metadata
    }

    /// Read the remaining payload into memory.
    ///
    /// The buffer is sized from the open file, not from the sidecar's
    /// `content_size`, which may be stale.
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let len = usize::try_from(self.file.metadata()?.len()).unwrap_or(0);
        let mut buf = Vec::with_capacity(len);
        self.file.read_to_end(&mut buf)?;
        Ok(buf)
    }
}

impl Read for ObjectBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }
}
