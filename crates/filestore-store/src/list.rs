//! Prefix-scoped enumeration, counting and bulk clearing.

use std::fs;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use filestore_types::{key_to_path, ObjectKey};
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{StoreError, StoreResult};
use crate::files::is_absent;
use crate::store::Filestore;

/// Lazy iterator over the keys under a prefix.
///
/// Keys are produced as the directory walk advances; nothing is collected up
/// front. The iterator is single-pass: call [`Filestore::list`] again to
/// re-walk the tree. Within a directory, entries are visited in file-name
/// order.
pub struct Keys<'a> {
    walker: Option<walkdir::IntoIter>,
    root: PathBuf,
    _store: PhantomData<&'a Filestore>,
}

impl Keys<'_> {
    fn empty(root: PathBuf) -> Self {
        Self {
            walker: None,
            root,
            _store: PhantomData,
        }
    }
}

impl Iterator for Keys<'_> {
    type Item = StoreResult<ObjectKey>;

    fn next(&mut self) -> Option<Self::Item> {
        let walker = self.walker.as_mut()?;
        loop {
            let entry = match walker.next()? {
                Ok(entry) => entry,
                // Removed between readdir and stat; nothing to report.
                Err(e) if e.io_error().is_some_and(is_absent) => continue,
                Err(e) => return Some(Err(e.into())),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(&self.root) else {
                continue;
            };
            return Some(
                ObjectKey::from_native_path(relative).map_err(|source| StoreError::InvalidKey {
                    key: relative.display().to_string(),
                    source,
                }),
            );
        }
    }
}

impl std::fmt::Debug for Keys<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Keys")
            .field("root", &self.root)
            .field("exhausted", &self.walker.is_none())
            .finish()
    }
}

impl Filestore {
    /// Enumerate the keys of all objects under `prefix`.
    ///
    /// The prefix is matched per segment: `"a"` covers `a/1` and `a/b/2` but
    /// not `ab/1`. An empty prefix covers the whole store. A prefix that does
    /// not name an existing directory yields nothing.
    pub fn list(&self, prefix: &str) -> StoreResult<Keys<'_>> {
        let root = self.data_dir().to_path_buf();
        let top = root.join(key_to_path(prefix));

        match fs::metadata(&top) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(Keys::empty(root)),
            Err(e) if is_absent(&e) => return Ok(Keys::empty(root)),
            Err(e) => return Err(e.into()),
        }

        let walker = WalkDir::new(&top)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();
        Ok(Keys {
            walker: Some(walker),
            root,
            _store: PhantomData,
        })
    }

    /// Number of objects under `prefix`; walks the tree like [`list`](Self::list).
    pub fn count(&self, prefix: &str) -> StoreResult<usize> {
        self.list(prefix)?
            .try_fold(0, |n, key| key.map(|_| n + 1))
    }

    /// Remove every object from the store.
    ///
    /// Files are removed first, then the directories they leave empty. Both
    /// roots remain in place and the store stays usable.
    pub fn clear(&self) -> StoreResult<()> {
        let data = clear_tree(self.data_dir())?;
        let metadata = clear_tree(self.metadata_dir())?;
        debug!(store = %self.name(), data, metadata, "cleared store");
        Ok(())
    }
}

/// Empty `root` without removing it. Returns the number of files removed.
fn clear_tree(root: &Path) -> StoreResult<usize> {
    if !root.exists() {
        fs::create_dir_all(root)?;
        return Ok(0);
    }

    let mut removed = 0;
    for entry in WalkDir::new(root).min_depth(1).contents_first(true) {
        let entry = entry?;
        let result = if entry.file_type().is_dir() {
            fs::remove_dir(entry.path())
        } else {
            fs::remove_file(entry.path()).map(|()| removed += 1)
        };
        match result {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(removed)
}
