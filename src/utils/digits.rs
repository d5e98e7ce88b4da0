//! Decimal digit helpers

use num_bigint::BigUint;

use crate::error::{CredictError, Result};

/// Number of decimal digits of a value (`0` has one digit)
pub fn digit_count(value: u64) -> usize {
    value.checked_ilog10().map_or(1, |log| log as usize + 1)
}

/// Convert a hexadecimal string, with or without a `0x` prefix, to decimal.
///
/// Addresses are wider than 64 bits, so the conversion goes through a big integer.
pub fn decimal_from_hex(hex: &str) -> Result<String> {
    let trimmed = hex.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CredictError::InvalidAddress(hex.to_string()));
    }

    BigUint::parse_bytes(digits.as_bytes(), 16)
        .map(|value| value.to_str_radix(10))
        .ok_or_else(|| CredictError::InvalidAddress(hex.to_string()))
}
