//! Modular exponentiation in O(log exponent) multiplications

use std::num::NonZeroU64;

use crate::error::{CredictError, Result};

/// Compute `(base ^ exponent) % modulus`.
///
/// Fails with [`CredictError::InvalidInput`] when `modulus` is zero.
///
/// # Example
/// ```
/// use credict::math::power_mod_n;
///
/// assert_eq!(power_mod_n(5, 23, 187).unwrap(), 180);
/// assert_eq!(power_mod_n(180, 7, 187).unwrap(), 5);
/// ```
pub fn power_mod_n(base: u64, exponent: u64, modulus: u64) -> Result<u64> {
    let modulus = NonZeroU64::new(modulus)
        .ok_or_else(|| CredictError::InvalidInput("modulus must be positive".to_string()))?;
    Ok(pow_mod(base, exponent, modulus))
}

/// Infallible core of [`power_mod_n`] for callers that already hold a valid modulus.
pub(crate) fn pow_mod(base: u64, exponent: u64, modulus: NonZeroU64) -> u64 {
    let m = u128::from(modulus.get());
    let b = u128::from(base) % m;

    let result = match exponent {
        0 => 1 % m,
        1 => b,
        2 => b * b % m,
        odd if odd % 2 == 1 => b * u128::from(pow_mod(base, odd - 1, modulus)) % m,
        even => {
            let half = u128::from(pow_mod(base, even / 2, modulus));
            half * half % m
        }
    };

    // result < m <= u64::MAX
    result as u64
}
