//! Foundation types for filestore.
//!
//! This crate holds the pieces of the store that never touch the disk: the
//! key codec that maps portable slash-separated keys onto native paths, the
//! content hash, and the metadata record kept beside every stored payload.
//!
//! # Key Types
//!
//! - [`ObjectKey`] — Normalized storage key (`a/b/c`, never a leading slash)
//! - [`ContentHash`] — BLAKE3 digest of a payload, hex on the wire
//! - [`ObjectMetadata`] — Sidecar record: hash, write timestamp, content size

pub mod error;
pub mod hash;
pub mod key;
pub mod metadata;

pub use error::TypeError;
pub use hash::ContentHash;
pub use key::{key_to_path, path_to_key, ObjectKey, KEY_SEPARATOR};
pub use metadata::ObjectMetadata;
