//! Single-file primitives shared by the payload and sidecar paths.
//!
//! "Not found" is folded into `None`/`false` here so that the object
//! operations above only ever see real failures as errors. A path that
//! exists but is a directory (a key that is a prefix of other keys) counts as
//! absent too.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use crate::config::WriteMode;
use crate::error::StoreResult;

/// Returns `true` for errors that mean "nothing stored at this path".
pub(crate) fn is_absent(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

/// Metadata of `path` if it is a regular file.
fn regular_file(path: &Path) -> io::Result<Option<fs::Metadata>> {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_file() => Ok(Some(meta)),
        Ok(_) => Ok(None),
        Err(e) if is_absent(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

pub(crate) fn is_file(path: &Path) -> io::Result<bool> {
    Ok(regular_file(path)?.is_some())
}

/// Read a whole file, or `None` if there is no regular file at `path`.
pub(crate) fn read(path: &Path) -> io::Result<Option<Vec<u8>>> {
    if regular_file(path)?.is_none() {
        return Ok(None);
    }
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if is_absent(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Open a file for streaming reads, or `None` if it is absent.
pub(crate) fn open(path: &Path) -> io::Result<Option<File>> {
    if regular_file(path)?.is_none() {
        return Ok(None);
    }
    match File::open(path) {
        Ok(file) => Ok(Some(file)),
        Err(e) if is_absent(&e) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Remove a file. Returns `false` if there was nothing to remove.
pub(crate) fn remove(path: &Path) -> io::Result<bool> {
    if regular_file(path)?.is_none() {
        return Ok(false);
    }
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if is_absent(&e) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Write `bytes` to `path`, creating parent directories as needed.
pub(crate) fn write(path: &Path, bytes: &[u8], mode: WriteMode) -> StoreResult<()> {
    let parent = match path.parent() {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    match mode {
        WriteMode::Direct => fs::write(path, bytes)?,
        WriteMode::AtomicRename => {
            let mut tmp = tempfile::Builder::new()
                .prefix(".filestore-")
                .suffix(".tmp")
                .tempfile_in(parent)?;
            tmp.write_all(bytes)?;
            tmp.as_file().sync_all()?;
            tmp.persist(path)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_paths_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope");
        assert_eq!(read(&path).unwrap(), None);
        assert!(open(&path).unwrap().is_none());
        assert!(!remove(&path).unwrap());
        assert!(!is_file(&path).unwrap());
    }

    #[test]
    fn directories_are_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        let path = dir.path().join("sub");
        assert_eq!(read(&path).unwrap(), None);
        assert!(!remove(&path).unwrap());
        assert!(path.is_dir());
    }

    #[test]
    fn path_below_a_file_is_absent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("leaf"), b"x").unwrap();
        let path = dir.path().join("leaf").join("below");
        assert_eq!(read(&path).unwrap(), None);
        assert!(!is_file(&path).unwrap());
    }

    #[test]
    fn write_creates_parents_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("c");
        write(&path, b"first value", WriteMode::Direct).unwrap();
        write(&path, b"second", WriteMode::Direct).unwrap();
        assert_eq!(read(&path).unwrap().as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn atomic_write_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("obj");
        write(&path, b"one", WriteMode::AtomicRename).unwrap();
        write(&path, b"two", WriteMode::AtomicRename).unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"two");
        let names: Vec<_> = fs::read_dir(dir.path().join("a"))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["obj"]);
    }

    #[test]
    fn remove_reports_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f");
        fs::write(&path, b"").unwrap();
        assert!(remove(&path).unwrap());
        assert!(!path.exists());
        assert!(!remove(&path).unwrap());
    }
}
