use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Digest identifying a resource node's content, children included.
///
/// Produced by [`ContentHasher::NODE`](crate::ContentHasher::NODE) while a
/// tree is built. Two snapshots hold the same node exactly when its digest
/// is the same on both sides. Rendered as 64 hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// Placeholder for a node whose digest is not computed yet.
    pub const fn null() -> Self {
        Self([0u8; 32])
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// First four bytes as hex, for listings.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let digest: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
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
    use crate::hasher::ContentHasher;
    use proptest::prelude::*;

    fn texture_digest(payload: &[u8]) -> ContentHash {
        ContentHasher::NODE.hash_parts(&[b"TEX0".as_slice(), b"Eyes".as_slice(), payload])
    }

    #[test]
    fn listing_form_is_prefix_of_full_hex() {
        let digest = texture_digest(b"pixels");
        assert_eq!(digest.short_hex().len(), 8);
        assert!(digest.to_hex().starts_with(&digest.short_hex()));
        assert_eq!(format!("{digest:?}"), format!("ContentHash({})", digest.short_hex()));
    }

    #[test]
    fn placeholder_differs_from_any_node_digest() {
        assert_ne!(texture_digest(b""), ContentHash::null());
        assert_eq!(ContentHash::null().as_bytes(), &[0u8; 32]);
    }

    #[test]
    fn truncated_hex_reports_length() {
        let hex = texture_digest(b"pixels").to_hex();
        assert_eq!(
            ContentHash::from_hex(&hex[..8]),
            Err(TypeError::InvalidLength {
                expected: 32,
                actual: 4
            })
        );
        assert!(matches!(ContentHash::from_hex("xy"), Err(TypeError::InvalidHex(_))));
    }

    #[test]
    fn patch_json_carries_full_hex() {
        let digest = texture_digest(b"pixels");
        let json = serde_json::to_value(digest).unwrap();
        assert_eq!(json, serde_json::Value::String(digest.to_hex()));
        assert_eq!(serde_json::from_value::<ContentHash>(json).unwrap(), digest);
        assert!(serde_json::from_str::<ContentHash>("\"abcd\"").is_err());
    }

    proptest! {
        #[test]
        fn displayed_digest_parses_back(bytes in proptest::array::uniform32(any::<u8>())) {
            let digest = ContentHash::from_hash(bytes);
            prop_assert_eq!(ContentHash::from_hex(&digest.to_string()).unwrap(), digest);
        }
    }
}
