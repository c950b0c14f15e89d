use serde::{Deserialize, Serialize};
use sha1::{Digest as _, Sha1};
use std::fmt;

use crate::types::ObjectKind;
use crate::Error;

/// length of a raw digest in bytes
pub const DIGEST_LEN: usize = 20;

/// length of a digest in hex characters
pub const DIGEST_HEX_LEN: usize = DIGEST_LEN * 2;

/// SHA-1 digest used for content addressing
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; DIGEST_LEN]);

impl Digest {
    /// zero digest (useful as sentinel)
    pub const ZERO: Digest = Digest([0u8; DIGEST_LEN]);

    /// create from raw bytes
    pub fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// create from a slice that must be exactly 20 bytes long
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; DIGEST_LEN] = bytes.try_into().ok()?;
        Some(Self(arr))
    }

    /// parse from hex string (40 chars, either case)
    pub fn from_hex(s: &str) -> crate::Result<Self> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(Error::InvalidDigestHex(s.to_string()));
        }
        let mut arr = [0u8; DIGEST_LEN];
        hex::decode_to_slice(s, &mut arr).map_err(|_| Error::InvalidDigestHex(s.to_string()))?;
        Ok(Self(arr))
    }

    /// get raw bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// split into path components for object store
    /// returns (first 2 hex chars, remaining 38 hex chars)
    pub fn to_path_components(&self) -> (String, String) {
        let hex = self.to_hex();
        (hex[..2].to_string(), hex[2..].to_string())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &self.to_hex()[..12])
    }
}

impl Serialize for Digest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// digest of arbitrary bytes
pub fn digest(bytes: &[u8]) -> Digest {
    Digest(Sha1::digest(bytes).into())
}

/// digest of an object given its kind and body
///
/// equivalent to `digest(&codec::encode(..))` but feeds the header
/// straight into the hasher instead of building the framed buffer.
pub fn hash_object(kind: ObjectKind, body: &[u8]) -> Digest {
    let mut hasher = ObjectHasher::new(kind, body.len() as u64);
    hasher.update(body);
    hasher.finalize()
}

/// streaming hasher for objects whose body length is known up front
pub struct ObjectHasher {
    hasher: Sha1,
}

impl ObjectHasher {
    /// create new hasher, writing the `<kind> <len>\0` header immediately
    pub fn new(kind: ObjectKind, body_len: u64) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(kind.as_str().as_bytes());
        hasher.update(b" ");
        hasher.update(body_len.to_string().as_bytes());
        hasher.update([0u8]);
        Self { hasher }
    }

    /// feed body bytes
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
    }

    /// finalize and return digest
    pub fn finalize(self) -> Digest {
        Digest(self.hasher.finalize().into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_hex_roundtrip() {
        let original = Digest::from_hex("abcdef0123456789abcdef0123456789abcdef01").unwrap();
        let hex = original.to_hex();
        let parsed = Digest::from_hex(&hex).unwrap();
        assert_eq!(original, parsed);
    }

    #[test]
    fn test_digest_uppercase_hex_normalized() {
        let d = Digest::from_hex("ABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        assert_eq!(d.to_hex(), "abcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn test_digest_invalid_hex() {
        assert!(Digest::from_hex("not valid hex").is_err());
        assert!(Digest::from_hex("abcd").is_err()); // too short
        // too long
        assert!(Digest::from_hex("abcdef0123456789abcdef0123456789abcdef01ff").is_err());
        assert!(Digest::from_hex("zzcdef0123456789abcdef0123456789abcdef01").is_err());
    }

    #[test]
    fn test_digest_path_components() {
        let d = Digest::from_hex("abcdef0123456789abcdef0123456789abcdef01").unwrap();
        let (dir, file) = d.to_path_components();
        assert_eq!(dir, "ab");
        assert_eq!(file, "cdef0123456789abcdef0123456789abcdef01");
        assert_eq!(file.len(), 38);
    }

    #[test]
    fn test_digest_from_slice() {
        assert!(Digest::from_slice(&[0u8; 19]).is_none());
        assert_eq!(Digest::from_slice(&[0u8; 20]), Some(Digest::ZERO));
    }

    #[test]
    fn test_known_blob_vector() {
        let d = digest(b"blob 6\0hello\n");
        assert_eq!(d.to_hex(), "ce013625030ba8dba906f756967f9e9ca394464a");
    }

    #[test]
    fn test_hash_object_matches_framed_digest() {
        let framed = digest(b"blob 6\0hello\n");
        assert_eq!(hash_object(ObjectKind::Blob, b"hello\n"), framed);
    }

    #[test]
    fn test_empty_blob_vector() {
        let d = hash_object(ObjectKind::Blob, b"");
        assert_eq!(d.to_hex(), "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391");
    }

    #[test]
    fn test_digest_determinism() {
        let h1 = digest(b"some content");
        let h2 = digest(b"some content");
        assert_eq!(h1, h2);
        assert_ne!(h1, digest(b"other content"));
    }

    #[test]
    fn test_streaming_hasher() {
        let direct = hash_object(ObjectKind::Blob, b"helloworld");

        let mut streaming = ObjectHasher::new(ObjectKind::Blob, 10);
        streaming.update(b"hello");
        streaming.update(b"world");

        assert_eq!(direct, streaming.finalize());
    }

    #[test]
    fn test_digest_serde_json() {
        let d = Digest::from_hex("abcdef0123456789abcdef0123456789abcdef01").unwrap();
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(json, "\"abcdef0123456789abcdef0123456789abcdef01\"");
        let parsed: Digest = serde_json::from_str(&json).unwrap();
        assert_eq!(d, parsed);
    }
}
