//! Sealed predictions
//!
//! A prediction value is watermarked with the owner's address, marked and
//! encrypted with the owner's keypair. Once the keypair is revealed anyone
//! can decrypt the payload and check the watermark against the address.

use rand::Rng;
use rand::rngs::ThreadRng;
use tracing::debug;

use crate::crypto::{KeyGenerator, KeyPair, decrypt, encrypt};
use crate::error::{CredictError, Result};
use crate::utils::digit_count;
use crate::watermark::{AddressWatermarker, Watermark, mark};
use crate::{
    DEFAULT_KEYGEN_ATTEMPTS, DEFAULT_TARGET_DIGITS, DEFAULT_VERIFICATION_ROUNDS,
    MIN_WATERMARK_LENGTH,
};

/// Options for sealing predictions
#[derive(Debug, Clone)]
pub struct SealerOptions {
    /// Digits in a marked payload (watermark + separator + value)
    pub target_digits: u32,
    /// Shortest watermark accepted when sealing
    pub min_watermark_length: usize,
    /// Watermarks created and verified when the sealer is built
    pub verification_rounds: usize,
}

impl Default for SealerOptions {
    fn default() -> Self {
        Self {
            target_digits: DEFAULT_TARGET_DIGITS,
            min_watermark_length: MIN_WATERMARK_LENGTH,
            verification_rounds: DEFAULT_VERIFICATION_ROUNDS,
        }
    }
}

/// Decrypted and split payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedPayload {
    /// Digits before the first separator
    pub watermark: String,
    /// Digits after the first separator
    pub value_digits: String,
    /// Whether the watermark is a subsequence of the owner's address
    pub authentic: bool,
}

impl OpenedPayload {
    /// Parsed value, if the value digits form a 64-bit integer
    pub fn value(&self) -> Option<u64> {
        self.value_digits.parse().ok()
    }
}

/// Seals prediction values for one address and keypair
pub struct PredictionSealer<R = ThreadRng> {
    keypair: KeyPair,
    watermarker: AddressWatermarker,
    options: SealerOptions,
    rng: R,
}

impl PredictionSealer<ThreadRng> {
    /// Build a sealer using the thread-local RNG
    pub fn new(address: &str, keypair: KeyPair, options: SealerOptions) -> Result<Self> {
        Self::with_rng(address, keypair, options, rand::rng())
    }

    /// Build a sealer with a fresh keypair sized for `options.target_digits`
    pub fn generate<G: Rng>(
        address: &str,
        generator: &mut KeyGenerator<G>,
        options: SealerOptions,
    ) -> Result<Self> {
        let keypair = generator.given_digits(options.target_digits, DEFAULT_KEYGEN_ATTEMPTS)?;
        Self::new(address, keypair, options)
    }
}

impl<R: Rng> PredictionSealer<R> {
    /// Build a sealer and check that full-length watermarks verify for the address
    pub fn with_rng(address: &str, keypair: KeyPair, options: SealerOptions, mut rng: R) -> Result<Self> {
        let watermarker = AddressWatermarker::new(address)?;
        watermarker.self_check(
            options.target_digits as usize,
            options.verification_rounds,
            &mut rng,
        )?;

        Ok(Self {
            keypair,
            watermarker,
            options,
            rng,
        })
    }

    pub fn keypair(&self) -> &KeyPair {
        &self.keypair
    }

    pub fn watermarker(&self) -> &AddressWatermarker {
        &self.watermarker
    }

    pub fn options(&self) -> &SealerOptions {
        &self.options
    }

    /// Watermark, mark and encrypt a value.
    ///
    /// The watermark fills whatever `target_digits` leaves after the value
    /// and the separator, and must be at least `min_watermark_length` long.
    pub fn seal(&mut self, value: u64) -> Result<u64> {
        let available = (self.options.target_digits as usize).saturating_sub(1 + digit_count(value));
        if available < self.options.min_watermark_length {
            return Err(CredictError::WatermarkTooShort {
                available,
                minimum: self.options.min_watermark_length,
            });
        }

        let watermark = self.watermarker.create_with_rng(available, &mut self.rng)?;
        let marked = mark(&watermark, value)?;
        encrypt(marked, &self.keypair)
    }

    /// Decrypt a sealed value and check its watermark
    pub fn open(&self, ciphertext: u64) -> OpenedPayload {
        let marked = decrypt(ciphertext, &self.keypair);
        let (watermark, value_digits) = self.watermarker.extract(marked);

        let authentic = watermark
            .parse::<Watermark>()
            .map(|w| self.watermarker.verify(&w))
            .unwrap_or(false);
        if !authentic {
            debug!(ciphertext, watermark = %watermark, "watermark does not match address");
        }

        OpenedPayload {
            watermark,
            value_digits,
            authentic,
        }
    }
}
