//! Encoding utilities for base64 blobs.
//!
//! Compiled modules and pure input bytes travel through JSON (templates, the
//! `build` output) as base64 strings. The serde helpers below keep that mapping in
//! one place so every type that carries bytes reads and writes the same form.

use anyhow::{anyhow, Result};
use base64::Engine;

// =============================================================================
// Base64 Encoding/Decoding
// =============================================================================

/// Encode bytes to base64 string.
pub fn base64_encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode base64 string to bytes with context-aware error message.
///
/// # Arguments
/// * `b64` - Base64 encoded string
/// * `context` - Description for error messages (e.g., "module bytecode", "pure input")
///
/// # Examples
///
/// ```
/// use sui_ptb_types::encoding::base64_decode;
///
/// assert_eq!(base64_decode("AQID", "module bytecode").unwrap(), vec![1, 2, 3]);
/// assert!(base64_decode("not base64!", "module bytecode").is_err());
/// ```
pub fn base64_decode(b64: &str, context: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(b64)
        .map_err(|e| anyhow!("Failed to decode {} from base64: {}", context, e))
}

// =============================================================================
// Serde Helpers
// =============================================================================

/// Serde helper for a list of byte blobs stored as base64 strings.
///
/// Use with `#[serde(with = "base64_vec")]` on a `Vec<Vec<u8>>` field.
pub mod base64_vec {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(blobs: &[Vec<u8>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let encoded: Vec<String> = blobs.iter().map(|b| super::base64_encode(b)).collect();
        encoded.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Vec<u8>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let encoded = Vec::<String>::deserialize(deserializer)?;
        encoded
            .iter()
            .map(|s| super::base64_decode(s, "module bytecode").map_err(serde::de::Error::custom))
            .collect()
    }
}

/// Serde helper for an optional list of byte blobs stored as base64 strings.
pub mod base64_vec_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(blobs: &Option<Vec<Vec<u8>>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match blobs {
            Some(blobs) => super::base64_vec::serialize(blobs, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<Vec<u8>>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Wrapper(#[serde(with = "super::base64_vec")] Vec<Vec<u8>>);

        Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|w| w.0))
    }
}

/// Serde helper for a single byte blob stored as a base64 string.
pub mod base64_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::base64_encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::base64_decode(&s, "pure input").map_err(serde::de::Error::custom)
    }
}
