//! Address normalization for the accumulation key.
//!
//! Sources spell the same contract differently: checksummed or lower-case,
//! with or without the `0x` prefix, short or zero-padded. Every spelling that
//! parses as a 20-byte EVM address collapses to its EIP-55 checksum form,
//! which is both the map key and the address written to the output.

use std::str::FromStr;

use alloy_primitives::Address;

/// Hex digits in a 20-byte address.
const ADDRESS_HEX_LEN: usize = 40;

/// Parse a hex address leniently.
///
/// The `0x` prefix is optional. Short inputs are left-padded with zeros and
/// longer ones keep their low 20 bytes, so a 32-byte padded word resolves to
/// the address it carries. Returns `None` for anything that is not hex.
pub fn parse_address(address: &str) -> Option<Address> {
    let trimmed = address.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let digits = &digits[digits.len().saturating_sub(ADDRESS_HEX_LEN)..];
    Address::from_str(&format!("{digits:0>ADDRESS_HEX_LEN$}")).ok()
}

/// Canonical accumulation key for an address: the checksummed form when it
/// parses, otherwise trimmed and ASCII lower-cased.
pub fn normalize_address(address: &str) -> String {
    match parse_address(address) {
        Some(parsed) => parsed.to_checksum(None),
        None => address.trim().to_ascii_lowercase(),
    }
}

/// Whether two spellings name the same address.
pub fn same_address(a: &str, b: &str) -> bool {
    match (parse_address(a), parse_address(b)) {
        (Some(a), Some(b)) => a == b,
        (None, None) => a.trim().eq_ignore_ascii_case(b.trim()),
        _ => false,
    }
}
