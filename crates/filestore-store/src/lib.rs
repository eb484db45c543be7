//! Filesystem-backed key/value object storage.
//!
//! A [`Filestore`] imitates a minimal object-storage service on top of a
//! local directory tree. Objects are addressed by slash-separated keys; each
//! one is stored as a raw payload file plus a JSON metadata sidecar at the
//! same relative path under a separate root:
//!
//! ```text
//! <data-root>/<store-name>/<key segments>       payload bytes
//! <metadata-root>/<store-name>/<key segments>   {"hash", "mtimestamp", "content_size"}
//! ```
//!
//! Roots that are not configured are allocated as temporary directories and
//! removed when the store is dropped.
//!
//! # Operations
//!
//! - [`Filestore::put`] / [`Filestore::get`] / [`Filestore::get_if`] / [`Filestore::head`]
//! - [`Filestore::delete`] / [`Filestore::exists`]
//! - [`Filestore::list`] / [`Filestore::count`] / [`Filestore::clear`]
//!
//! # Design Rules
//!
//! 1. Absence is a value: missing keys, failed preconditions and empty scans
//!    return `None`, `false` or nothing, never an error.
//! 2. Every other filesystem failure is propagated, never retried or hidden.
//! 3. A key with only one of its two files present reads as absent.
//! 4. No locking; concurrent writers to one key race at the filesystem.
//!
//! ```
//! use filestore_store::{Filestore, GetConditions};
//!
//! let store = Filestore::ephemeral("docs").unwrap();
//! let record = store.put("reports/2024/q1.csv", b"a,b\n1,2\n").unwrap();
//!
//! let body = store
//!     .get_if("reports/2024/q1.csv", &GetConditions::new().if_match(record.hash))
//!     .unwrap()
//!     .expect("object should match");
//! assert_eq!(body.into_bytes().unwrap(), b"a,b\n1,2\n");
//! assert_eq!(store.count("reports").unwrap(), 1);
//! ```

pub mod body;
pub mod conditions;
pub mod config;
pub mod error;
mod files;
pub mod list;
mod roots;
mod sidecar;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use body::ObjectBody;
pub use conditions::GetConditions;
pub use config::{StoreConfig, WriteMode};
pub use error::{StoreError, StoreResult};
pub use list::Keys;
pub use store::Filestore;

pub use filestore_types::{ContentHash, ObjectKey, ObjectMetadata};
