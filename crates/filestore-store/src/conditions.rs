use chrono::{DateTime, Utc};
use filestore_types::{ContentHash, ObjectMetadata};

/// Preconditions for a conditional read.
///
/// Each condition is optional; all that are set must hold for the object to
/// be served. A failed precondition makes the read return nothing rather
/// than an error.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GetConditions {
    /// Serve only if the stored hash equals this one.
    pub if_match: Option<ContentHash>,
    /// Serve only if the object was last written at or before this instant.
    pub if_unchanged_since: Option<DateTime<Utc>>,
}

impl GetConditions {
    /// No preconditions.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn if_match(mut self, hash: ContentHash) -> Self {
        self.if_match = Some(hash);
        self
    }

    pub fn if_unchanged_since(mut self, instant: DateTime<Utc>) -> Self {
        self.if_unchanged_since = Some(instant);
        self
    }

    /// Returns `true` if `record` satisfies every precondition.
    pub fn matches(&self, record: &ObjectMetadata) -> bool {
        if let Some(ref hash) = self.if_match {
            if !record.matches_hash(hash) {
                return false;
            }
        }
        if let Some(since) = self.if_unchanged_since {
            if !record.unchanged_since(since) {
                return false;
            }
        }
        true
    }
}
