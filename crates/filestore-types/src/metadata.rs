use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::hash::ContentHash;

/// Metadata record stored beside every payload.
///
/// Serialized as a JSON object with exactly three fields:
///
/// ```json
/// {"hash": "<64 hex chars>", "mtimestamp": 1700000000.123456, "content_size": 42}
/// ```
///
/// `mtimestamp` is the wall-clock write time in seconds since the Unix epoch
/// with microsecond resolution.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectMetadata {
    /// Digest of the payload bytes.
    pub hash: ContentHash,
    /// Write time, seconds since the epoch.
    pub mtimestamp: f64,
    /// Payload length in bytes.
    pub content_size: u64,
}

impl ObjectMetadata {
    /// Build the record for a payload written now.
    pub fn generate(payload: &[u8]) -> Self {
        Self::generate_at(payload, Utc::now())
    }

    /// Build the record for a payload written at `at`.
    pub fn generate_at(payload: &[u8], at: DateTime<Utc>) -> Self {
        Self {
            hash: ContentHash::of(payload),
            mtimestamp: epoch_seconds(at),
            content_size: payload.len() as u64,
        }
    }

    /// The write time as a timestamp.
    ///
    /// Exact inverse of the representation used by [`generate_at`](Self::generate_at),
    /// so `record.unchanged_since(record.written_at())` always holds.
    pub fn written_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_micros(self.written_at_micros()).unwrap_or_default()
    }

    /// Returns `true` if the object was last written at or before `instant`.
    ///
    /// Compared at microsecond resolution, the precision of `mtimestamp`.
    pub fn unchanged_since(&self, instant: DateTime<Utc>) -> bool {
        self.written_at_micros() <= instant.timestamp_micros()
    }

    /// Returns `true` if the recorded digest equals `hash`.
    pub fn matches_hash(&self, hash: &ContentHash) -> bool {
        self.hash == *hash
    }

    /// Encode as the on-disk JSON document.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode from the on-disk JSON document.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    fn written_at_micros(&self) -> i64 {
        (self.mtimestamp * 1e6).round() as i64
    }
}

fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp() as f64 + f64::from(at.timestamp_subsec_micros()) / 1e6
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + Duration::microseconds(123_456)
    }

    #[test]
    fn records_hash_and_size() {
        let meta = ObjectMetadata::generate(b"test-0-value");
        assert_eq!(meta.hash, ContentHash::of(b"test-0-value"));
        assert_eq!(meta.content_size, 12);
    }

    #[test]
    fn empty_payload() {
        let meta = ObjectMetadata::generate(b"");
        assert_eq!(meta.content_size, 0);
        assert_eq!(meta.hash, ContentHash::of(b""));
    }

    #[test]
    fn timestamp_has_microsecond_resolution() {
        let at = fixed_time();
        let meta = ObjectMetadata::generate_at(b"x", at);
        assert_eq!(meta.written_at(), at);
    }

    #[test]
    fn generate_uses_current_time() {
        let before = Utc::now();
        let meta = ObjectMetadata::generate(b"x");
        let after = Utc::now();
        assert!(!meta.unchanged_since(before - Duration::seconds(1)));
        assert!(meta.unchanged_since(after));
    }

    #[test]
    fn unchanged_since_is_inclusive() {
        let at = fixed_time();
        let meta = ObjectMetadata::generate_at(b"x", at);
        assert!(meta.unchanged_since(at));
        assert!(meta.unchanged_since(meta.written_at()));
        assert!(meta.unchanged_since(at + Duration::days(1)));
        assert!(!meta.unchanged_since(at - Duration::days(1)));
        assert!(!meta.unchanged_since(at - Duration::microseconds(1)));
    }

    #[test]
    fn matches_hash_exactly() {
        let meta = ObjectMetadata::generate(b"payload");
        assert!(meta.matches_hash(&ContentHash::of(b"payload")));
        assert!(!meta.matches_hash(&ContentHash::of(b"payload!")));
    }

    #[test]
    fn json_has_fixed_field_names() {
        let meta = ObjectMetadata::generate_at(b"abc", fixed_time());
        let value: serde_json::Value = serde_json::from_slice(&meta.to_json().unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 3);
        assert_eq!(obj["hash"], serde_json::json!(ContentHash::of(b"abc").to_hex()));
        assert_eq!(obj["content_size"], serde_json::json!(3));
        assert!(obj["mtimestamp"].is_f64());
    }

    #[test]
    fn json_roundtrip_preserves_timestamp() {
        let meta = ObjectMetadata::generate(b"serde");
        let decoded = ObjectMetadata::from_json(&meta.to_json().unwrap()).unwrap();
        assert_eq!(decoded, meta);
        assert!(decoded.unchanged_since(meta.written_at()));
    }

    #[test]
    fn rejects_malformed_record() {
        assert!(ObjectMetadata::from_json(b"{\"hash\": \"nope\"}").is_err());
        assert!(ObjectMetadata::from_json(b"not json").is_err());
    }
}
