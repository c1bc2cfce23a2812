//! SHA-256 digests of manifest documents

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::canonical;

/// Length of a digest in bytes
pub const DIGEST_LEN: usize = 32;

/// SHA-256 digest, shown and stored as 64 lowercase hex characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContentHash([u8; DIGEST_LEN]);

impl ContentHash {
    /// Wrap a raw digest
    #[must_use]
    pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw digest
    #[must_use]
    pub const fn bytes(&self) -> &[u8; DIGEST_LEN] {
        &self.0
    }

    /// Digest of `data`
    #[must_use]
    pub fn digest(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Digest of the canonical text of a JSON document
    ///
    /// Two documents that differ only in key order or whitespace hash equal.
    #[must_use]
    pub fn of_json(value: &serde_json::Value) -> Self {
        Self::digest(canonical::to_string(value).as_bytes())
    }

    /// [`Self::of_json`] for any serializable value
    ///
    /// # Errors
    /// Returns error if `value` has no JSON representation
    pub fn of_serializable<T: Serialize>(value: &T) -> Result<Self, HashError> {
        Ok(Self::of_json(&serde_json::to_value(value)?))
    }

    /// First 8 bytes in hex, for log lines
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..8])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for ContentHash {
    type Err = HashError;

    /// Surrounding whitespace (a trailing newline in a hash file) is ignored
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.len() != DIGEST_LEN * 2 {
            return Err(HashError::Length(text.len()));
        }
        let mut bytes = [0u8; DIGEST_LEN];
        hex::decode_to_slice(text, &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for ContentHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Failure to parse or produce a [`ContentHash`]
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    /// Text is not 64 hex characters long
    #[error("expected 64 hex characters, found {0}")]
    Length(usize),

    /// Text contains non-hex characters
    #[error("not a hex digest: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Value could not be converted to JSON
    #[error("cannot encode value as json: {0}")]
    Json(#[from] serde_json::Error),
}
