//! Hex conventions at the ledger boundary.
//!
//! Internally everything is lowercase hex without a `0x` prefix; RPC params
//! and responses carry the prefix. Quantities (block numbers, timestamps,
//! statuses) are hex-encoded integers per the JSON-RPC convention.

use crate::LedgerError;

/// Strip an optional `0x`/`0X` prefix and lowercase.
pub fn strip_hex_prefix(value: &str) -> String {
    let trimmed = value.trim();
    let bare = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    bare.to_ascii_lowercase()
}

/// Add the `0x` prefix expected by RPC params.
pub fn with_hex_prefix(value: &str) -> String {
    if value.starts_with("0x") || value.starts_with("0X") {
        value.to_ascii_lowercase()
    } else {
        format!("0x{}", value.to_ascii_lowercase())
    }
}

/// Parse a hex quantity such as `"0x10"` into an integer.
pub fn parse_quantity(value: &str) -> Result<u64, LedgerError> {
    let bare = strip_hex_prefix(value);
    u64::from_str_radix(&bare, 16)
        .map_err(|_| LedgerError::Malformed(format!("bad hex quantity: {value}")))
}

/// Render an integer as an RPC hex quantity.
pub fn quantity(value: u64) -> String {
    format!("0x{value:x}")
}

/// A u64 as a 32-byte left-padded log topic.
pub fn u64_topic(value: u64) -> String {
    format!("0x{value:064x}")
}

/// Extract the address packed into a 32-byte log topic (last 20 bytes).
pub fn topic_address(topic: &str) -> Result<String, LedgerError> {
    let bare = strip_hex_prefix(topic);
    if bare.len() < 40 || !bare.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(LedgerError::Malformed(format!("bad address topic: {topic}")));
    }
    Ok(bare[bare.len() - 40..].to_string())
}
