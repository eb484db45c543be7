//! Key codec: portable object keys to native filesystem paths and back.
//!
//! Keys always use `/` as separator, whatever the host platform. Leading,
//! trailing and repeated separators collapse, so `"/a//b/"` names the same
//! object as `"a/b"`. Keys are not sanitised against `..` segments; callers
//! are trusted to stay inside the store root.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Separator used in portable keys.
pub const KEY_SEPARATOR: char = '/';

/// Map a key onto a relative native path.
///
/// Total over any input: empty segments are dropped and the rest become one
/// path component each. An input with no segments maps to the empty path.
///
/// ```
/// use std::path::PathBuf;
/// use filestore_types::key_to_path;
///
/// assert_eq!(key_to_path("/a//b/"), ["a", "b"].iter().collect::<PathBuf>());
/// assert_eq!(key_to_path(""), PathBuf::new());
/// ```
pub fn key_to_path(key: &str) -> PathBuf {
    segments(key).collect()
}

/// Map a relative native path back onto a key.
///
/// Only meaningful for paths produced by walking a store's own tree; root,
/// prefix and `.`/`..` components are ignored rather than interpreted.
pub fn path_to_key(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn segments(key: &str) -> impl Iterator<Item = &str> {
    key.split(KEY_SEPARATOR).filter(|part| !part.is_empty())
}

/// A normalized, non-empty object key.
///
/// Stored in canonical form: segments joined by a single `/`, no leading or
/// trailing separator.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Normalize and validate a key.
    pub fn parse(key: &str) -> Result<Self, TypeError> {
        let normalized = segments(key).collect::<Vec<_>>().join("/");
        if normalized.is_empty() {
            return Err(TypeError::EmptyKey);
        }
        Ok(Self(normalized))
    }

    /// Build a key from a path relative to a store root.
    pub fn from_native_path(path: &Path) -> Result<Self, TypeError> {
        let key = path_to_key(path);
        if key.is_empty() {
            return Err(TypeError::EmptyKey);
        }
        Ok(Self(key))
    }

    /// The relative native path this key is stored under.
    pub fn to_native_path(&self) -> PathBuf {
        key_to_path(&self.0)
    }

    /// The canonical key string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectKey({})", self.0)
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ObjectKey {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectKey> for String {
    fn from(key: ObjectKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn collapses_redundant_separators() {
        let expected: PathBuf = ["a", "b", "c"].iter().collect();
        assert_eq!(key_to_path("a/b/c"), expected);
        assert_eq!(key_to_path("/a/b/c"), expected);
        assert_eq!(key_to_path("a//b///c/"), expected);
    }

    #[test]
    fn key_without_segments_maps_to_empty_path() {
        assert_eq!(key_to_path(""), PathBuf::new());
        assert_eq!(key_to_path("///"), PathBuf::new());
    }

    #[test]
    fn path_to_key_uses_forward_slashes() {
        let path: PathBuf = ["dir", "sub", "item"].iter().collect();
        assert_eq!(path_to_key(&path), "dir/sub/item");
    }

    #[test]
    fn parse_normalizes() {
        let key = ObjectKey::parse("/directory-1//item-1/").unwrap();
        assert_eq!(key.as_str(), "directory-1/item-1");
        assert_eq!(key.to_native_path(), ["directory-1", "item-1"].iter().collect::<PathBuf>());
    }

    #[test]
    fn parse_rejects_empty() {
        assert_eq!(ObjectKey::parse(""), Err(TypeError::EmptyKey));
        assert_eq!(ObjectKey::parse("//"), Err(TypeError::EmptyKey));
        assert_eq!(
            ObjectKey::from_native_path(Path::new("")),
            Err(TypeError::EmptyKey)
        );
    }

    #[test]
    fn serde_as_plain_string() {
        let key = ObjectKey::parse("x/y").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"x/y\"");
        let parsed: ObjectKey = serde_json::from_str("\"/x//y\"").unwrap();
        assert_eq!(parsed, key);
        assert!(serde_json::from_str::<ObjectKey>("\"/\"").is_err());
    }

    fn segment() -> impl Strategy<Value = String> {
        // A segment must not be `.` or `..`; native paths fold those away.
        "[a-zA-Z0-9_-][a-zA-Z0-9._-]{0,11}"
    }

    proptest! {
        #[test]
        fn key_path_roundtrip(parts in prop::collection::vec(segment(), 1..6)) {
            let key = parts.join("/");
            prop_assert_eq!(path_to_key(&key_to_path(&key)), key.clone());

            let typed = ObjectKey::parse(&key).unwrap();
            let back = ObjectKey::from_native_path(&typed.to_native_path()).unwrap();
            prop_assert_eq!(back, typed);
        }

        #[test]
        fn leading_separators_are_stripped(parts in prop::collection::vec(segment(), 1..4)) {
            let key = parts.join("/");
            let slashed = format!("//{key}");
            prop_assert_eq!(key_to_path(&slashed), key_to_path(&key));
        }
    }
}
