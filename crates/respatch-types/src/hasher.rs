use crate::hash::ContentHash;

/// BLAKE3 hasher bound to one domain tag.
///
/// The tag is fed to BLAKE3 ahead of the fields, so digests from another
/// domain or another version of the node layout never coincide.
pub struct ContentHasher {
    domain: &'static str,
}

impl ContentHasher {
    /// Node digests: type tag, name, payload, properties, child digests.
    pub const NODE: Self = Self {
        domain: "respatch-node-v1",
    };

    /// Digest an ordered list of fields.
    ///
    /// Each field is prefixed with its length, so moving bytes from one
    /// field into its neighbour changes the digest.
    pub fn hash_parts(&self, parts: &[&[u8]]) -> ContentHash {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.domain.as_bytes());
        hasher.update(b":");
        for part in parts {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        ContentHash::from_hash(*hasher.finalize().as_bytes())
    }
}
