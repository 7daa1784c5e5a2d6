//! SHA-256 content digests.
//!
//! A [`ContentDigest`] names raw uploads that carry no caller-supplied name.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::constants::{DIGEST_HEX_LEN, DIGEST_SIZE};
use crate::error::{EstuaryError, Result};

/// Lowercase hex-encoded SHA-256 digest of raw content bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Computes the digest of `data`.
    pub fn of(data: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(data)))
    }

    /// Parses a 64-character lowercase hex digest.
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(EstuaryError::ValidationError(format!(
                "digest must be {} hex characters, got {}",
                DIGEST_HEX_LEN,
                s.len()
            )));
        }
        if !s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b)) {
            return Err(EstuaryError::ValidationError(
                "digest must be lowercase hex".into(),
            ));
        }
        Ok(Self(s.to_string()))
    }

    /// Returns the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the raw 32 digest bytes.
    pub fn to_bytes(&self) -> [u8; DIGEST_SIZE] {
        let mut out = [0u8; DIGEST_SIZE];
        // Validated on construction
        hex::decode_to_slice(&self.0, &mut out).unwrap_or_default();
        out
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentDigest {
    type Error = EstuaryError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<ContentDigest> for String {
    fn from(digest: ContentDigest) -> Self {
        digest.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use sha2::{Digest, Sha256};

    #[test]
    fn test_hello_vector() {
        assert_eq!(
            ContentDigest::of(b"hello").as_str(),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            ContentDigest::of(b"").to_string(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_from_hex_rejects_bad_input() {
        assert!(ContentDigest::from_hex("abc").is_err());
        let upper = "2CF24DBA5FB0A30E26E83B2AC5B9E29E1B161E5C1FA7425E73043362938B9824";
        assert!(ContentDigest::from_hex(upper).is_err());
        let not_hex = "z".repeat(DIGEST_HEX_LEN);
        assert!(ContentDigest::from_hex(&not_hex).is_err());
    }

    #[test]
    fn test_serde_is_a_plain_string() {
        let digest = ContentDigest::of(b"hello");
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{}\"", digest));

        let back: ContentDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
        assert!(serde_json::from_str::<ContentDigest>("\"nope\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_digest_matches_sha256(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let digest = ContentDigest::of(&data);
            prop_assert_eq!(digest.as_str().len(), DIGEST_HEX_LEN);
            prop_assert_eq!(digest.as_str(), hex::encode(Sha256::digest(&data)));
            prop_assert_eq!(digest.to_bytes().to_vec(), Sha256::digest(&data).to_vec());
        }

        #[test]
        fn prop_repetition_changes_nothing(data in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(ContentDigest::of(&data), ContentDigest::of(&data.clone()));
        }
    }
}
