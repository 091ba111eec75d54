//! Address and object id forms.
//!
//! Callers type ids however they like (`0x2`, `0X2`, a full 64-digit id). The block
//! keeps them verbatim; these helpers give the canonical form where it matters:
//! deduplicating object inputs, BCS-encoding addresses and the id-length advisory.

use anyhow::{anyhow, Result};

// =============================================================================
// Constants
// =============================================================================

/// Prefix every hex address literal carries.
pub const ADDRESS_PREFIX: &str = "0x";

/// Length of a fully-expanded id literal: `0x` plus 64 hex digits.
pub const CANONICAL_ID_LENGTH: usize = 2 + 64;

// =============================================================================
// Normalization
// =============================================================================

/// Canonical `0x` + 64 lowercase hex digit form of an address or id.
///
/// Short ids are left-padded with zeros; anything longer than 64 digits is cut.
///
/// # Arguments
/// * `addr` - Address literal, with or without the `0x` prefix (either case)
///
/// # Examples
///
/// ```
/// use sui_ptb_types::address::normalize_address;
///
/// let clock = normalize_address("0X6");
/// assert_eq!(clock.len(), 66);
/// assert!(clock.ends_with("0006"));
/// ```
pub fn normalize_address(addr: &str) -> String {
    let trimmed = addr.trim();
    let digits = match trimmed.get(..2) {
        Some(prefix) if prefix.eq_ignore_ascii_case(ADDRESS_PREFIX) => &trimmed[2..],
        _ => trimmed,
    };
    let digits: String = digits
        .chars()
        .take(64)
        .collect::<String>()
        .to_ascii_lowercase();
    format!("{}{:0>64}", ADDRESS_PREFIX, digits)
}

// =============================================================================
// Validation
// =============================================================================

/// Whether `literal` is an `0x`-prefixed hex string of 1 to 64 digits.
pub fn is_hex_address(literal: &str) -> bool {
    match literal.strip_prefix(ADDRESS_PREFIX) {
        Some(hex) => {
            !hex.is_empty() && hex.len() <= 64 && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

/// Whether `id` already has the ledger's fixed canonical length.
///
/// Only the length is checked; short forms such as `0x2` are legal on chain but
/// are usually a sign of a truncated copy-paste in an editor.
pub fn is_canonical_id(id: &str) -> bool {
    id.len() == CANONICAL_ID_LENGTH
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a hex address literal into its 32 raw bytes.
///
/// # Arguments
/// * `addr` - `0x`-prefixed hex literal of 1 to 64 digits
///
/// # Examples
///
/// ```
/// use sui_ptb_types::address::address_bytes;
///
/// let clock = address_bytes("0x6").unwrap();
/// assert_eq!(clock[31], 6);
/// assert!(address_bytes("0xnothex").is_err());
/// ```
pub fn address_bytes(addr: &str) -> Result<[u8; 32]> {
    if !is_hex_address(addr.trim()) {
        return Err(anyhow!("Invalid address '{}'", addr));
    }
    let normalized = normalize_address(addr);
    let decoded = hex::decode(&normalized[2..])
        .map_err(|e| anyhow!("Invalid address hex '{}': {}", addr, e))?;
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&decoded);
    Ok(bytes)
}
