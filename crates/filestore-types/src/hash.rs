use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Digest of a stored payload.
///
/// A `ContentHash` is the BLAKE3 hash of the exact bytes written under a key.
/// It is used for change detection and conditional reads, never as a
/// security boundary. On disk and in serialized records it is always the
/// 64-character lowercase hex form.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContentHash([u8; DIGEST_LEN]);

const DIGEST_LEN: usize = blake3::OUT_LEN;

impl ContentHash {
    /// Hash raw payload bytes.
    pub fn of(payload: &[u8]) -> Self {
        Self(blake3::hash(payload).into())
    }

    /// Lowercase hex form, as written to sidecars.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Leading 8 hex characters, for log lines.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Decode the hex form read back from a sidecar.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let mut digest = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut digest).map_err(|e| match e {
            hex::FromHexError::InvalidStringLength | hex::FromHexError::OddLength => {
                TypeError::InvalidLength {
                    expected: DIGEST_LEN,
                    actual: s.len() / 2,
                }
            }
            other => TypeError::InvalidHex(other.to_string()),
        })?;
        Ok(Self(digest))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", self.short_hex())
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn of_is_deterministic() {
        assert_eq!(ContentHash::of(b"hello world"), ContentHash::of(b"hello world"));
    }

    #[test]
    fn different_payloads_differ() {
        assert_ne!(ContentHash::of(b"hello"), ContentHash::of(b"world"));
    }

    #[test]
    fn hashes_exact_bytes() {
        assert_eq!(
            ContentHash::of(b"abc").to_hex(),
            blake3::hash(b"abc").to_hex().as_str()
        );
    }

    #[test]
    fn empty_payload_has_a_hash() {
        let hash = ContentHash::of(b"");
        assert_eq!(hash.to_hex().len(), 64);
    }

    #[test]
    fn hex_roundtrip() {
        let hash = ContentHash::of(b"test");
        assert_eq!(ContentHash::from_hex(&hash.to_hex()), Ok(hash));
    }

    #[test]
    fn rejects_bad_hex() {
        assert!(matches!(
            ContentHash::from_hex(&"zz".repeat(32)),
            Err(TypeError::InvalidHex(_))
        ));
        assert_eq!(
            ContentHash::from_hex("abcd"),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 2
            })
        );
    }

    #[test]
    fn serializes_as_hex_string() {
        let hash = ContentHash::of(b"serde test");
        let json = serde_json::to_string(&hash).unwrap();
        assert_eq!(json, format!("\"{}\"", hash.to_hex()));
        let parsed: ContentHash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, hash);
    }

    #[test]
    fn short_hex_is_8_chars() {
        assert_eq!(ContentHash::of(b"test").short_hex().len(), 8);
    }
}
