//! Address-bound watermarks
//!
//! A watermark is a subsequence of the non-zero digits of an address written
//! in decimal. Anyone holding the address can check that a watermark could
//! have come from it, without any extra key material.

mod marking;

pub use marking::{mark, split_marked};

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::error::{CredictError, Result};
use crate::utils::decimal_from_hex;

/// Decimal digit string with no leading zero
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Watermark(String);

impl Watermark {
    pub fn digits(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Integer value, when it fits in 64 bits
    pub fn to_u64(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl From<u64> for Watermark {
    fn from(value: u64) -> Self {
        Watermark(value.to_string())
    }
}

impl FromStr for Watermark {
    type Err = CredictError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CredictError::InvalidWatermark(s.to_string()));
        }
        if s.len() > 1 && s.starts_with('0') {
            return Err(CredictError::InvalidWatermark(s.to_string()));
        }
        Ok(Watermark(s.to_string()))
    }
}

impl fmt::Display for Watermark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Creates and checks watermarks for one address
#[derive(Debug, Clone)]
pub struct AddressWatermarker {
    /// Address in base 10
    address_digits: String,
    /// Positions of non-zero digits in `address_digits`
    indices: Vec<usize>,
}

impl AddressWatermarker {
    /// Build from a hexadecimal address such as `0x5290...9EE7`
    pub fn new(address_hex: &str) -> Result<Self> {
        let address_digits = decimal_from_hex(address_hex)?;
        let indices = address_digits
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b != b'0')
            .map(|(i, _)| i)
            .collect();

        Ok(Self {
            address_digits,
            indices,
        })
    }

    /// Address in base 10
    pub fn address_digits(&self) -> &str {
        &self.address_digits
    }

    /// Number of non-zero digit positions; watermarks must be strictly shorter
    pub fn available_digits(&self) -> usize {
        self.indices.len()
    }

    /// Create a watermark of `length` digits using the thread-local RNG
    pub fn create(&self, length: usize) -> Result<Watermark> {
        self.create_with_rng(length, &mut rand::rng())
    }

    /// Sample `length` distinct non-zero positions and read their digits in address order
    pub fn create_with_rng<R: Rng + ?Sized>(&self, length: usize, rng: &mut R) -> Result<Watermark> {
        if length >= self.indices.len() {
            return Err(CredictError::WatermarkLength {
                requested: length,
                available: self.indices.len(),
            });
        }
        if length == 0 {
            return Err(CredictError::InvalidWatermark(
                "watermark length must be positive".to_string(),
            ));
        }

        let mut picked: Vec<usize> = self.indices.choose_multiple(rng, length).copied().collect();
        picked.sort_unstable();

        let address = self.address_digits.as_bytes();
        let digits: String = picked.iter().map(|&i| char::from(address[i])).collect();
        Ok(Watermark(digits))
    }

    /// True when the watermark digits appear in the address in order.
    ///
    /// Each address position is consumed at most once.
    pub fn verify(&self, watermark: &Watermark) -> bool {
        let mut address = self.address_digits.chars();
        watermark
            .digits()
            .chars()
            .all(|digit| address.any(|c| c == digit))
    }

    /// Split a marked value into watermark digits and value digits.
    ///
    /// No verification happens here; call [`AddressWatermarker::verify`] on
    /// the watermark part when authenticity matters.
    pub fn extract(&self, marked_value: u64) -> (String, String) {
        split_marked(marked_value)
    }

    /// Create `rounds` watermarks of `length` digits and require each to verify
    pub fn self_check<R: Rng + ?Sized>(&self, length: usize, rounds: usize, rng: &mut R) -> Result<()> {
        for _ in 0..rounds {
            let watermark = self.create_with_rng(length, rng)?;
            if !self.verify(&watermark) {
                return Err(CredictError::InvalidWatermark(format!(
                    "{} does not verify against its own address",
                    watermark
                )));
            }
        }
        Ok(())
    }
}
