//! msx content hashing
//!
//! Content-addressed hashing of JSON documents.
//!
//! # Core Concepts
//!
//! - [`ContentHash`]: 32-byte SHA-256 digest used to detect manifest changes
//! - [`canonical`]: key-sorted, ASCII-only JSON encoding that feeds the hash
//!
//! # Example
//!
//! ```rust
//! use msx_hash::ContentHash;
//! use serde_json::json;
//!
//! let a = ContentHash::of_json(&json!({"b": 1, "a": [true, null]}));
//! let b = ContentHash::of_json(&json!({"a": [true, null], "b": 1}));
//! assert_eq!(a, b);
//! ```

#![warn(unreachable_pub)]

pub mod canonical;
mod hash;

pub use hash::{ContentHash, HashError, DIGEST_LEN};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn formatting_of_source_text_does_not_change_hash() {
        let compact: serde_json::Value =
            serde_json::from_str(r#"[{"id":"abc","tags":["rock"]}]"#).unwrap();
        let spaced: serde_json::Value = serde_json::from_str(
            "[\n  {\n    \"tags\": [ \"rock\" ],\n    \"id\": \"abc\"\n  }\n]\n",
        )
        .unwrap();

        assert_eq!(ContentHash::of_json(&compact), ContentHash::of_json(&spaced));
    }

    #[test]
    fn hash_matches_digest_of_canonical_text() {
        let value = json!({"name": "Mossy Rock", "id": "tdyrdbbfa"});
        let text = canonical::to_string(&value);
        assert_eq!(text, r#"{"id": "tdyrdbbfa", "name": "Mossy Rock"}"#);
        assert_eq!(ContentHash::of_json(&value), ContentHash::digest(text.as_bytes()));
    }
}
