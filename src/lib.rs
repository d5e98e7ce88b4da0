//! # Credict Core
//!
//! A toy asymmetric cipher with address-bound watermarks, used to seal
//! numeric predictions so they can be revealed and attributed later.
//!
//! ## Features
//!
//! - Memoizing integer factorizer over an incrementally grown prime table
//! - Recursive-squaring modular exponentiation
//! - `(n, e, d)` keypairs with `e * d = (p-1)(q-1) + 1`
//! - Digit-subsequence watermarks derived from a hexadecimal address
//!
//! **IMPORTANT**: moduli are factorable by trial division. This is not a
//! secure cipher.
//!
//! ## Example
//!
//! ```
//! use credict::{AddressWatermarker, Factorizer, KeyGenerator, decrypt, encrypt, mark};
//!
//! let mut generator = KeyGenerator::with_rng(Factorizer::with_bound(1_000_000), rand::rng());
//! let keypair = generator.from_pq(100_019, 100_069).unwrap();
//!
//! let watermarker = AddressWatermarker::new("0x52908400098527886E0F7030069857D2E4169EE7").unwrap();
//! let watermark = watermarker.create(6).unwrap();
//! let ciphertext = encrypt(mark(&watermark, 42).unwrap(), &keypair).unwrap();
//!
//! let (found, value) = watermarker.extract(decrypt(ciphertext, &keypair));
//! assert_eq!(found, watermark.digits());
//! assert_eq!(value, "42");
//! ```

pub mod business;
pub mod crypto;
pub mod error;
pub mod math;
pub mod utils;
pub mod watermark;

// Re-export main types
pub use business::{OpenedPayload, PredictionSealer, SealerOptions};
pub use crypto::{KeyGenerator, KeyPair, KeyParams, check_parameter, decrypt, encrypt};
pub use error::{CredictError, Result};
pub use math::{Factorization, Factorizer, PrimeTable, power_mod_n};
pub use watermark::{AddressWatermarker, Watermark, mark, split_marked};

/// Default factorizer coverage (primes up to 10^6)
pub const DEFAULT_FACTORIZER_BOUND: u64 = 1_000_000_000_000;

/// Coverage bound multiplier applied when a larger number shows up
pub const BOUND_GROWTH_FACTOR: u64 = 10;

/// Key primes must be strictly greater than this
pub const MIN_PRIME_EXCLUSIVE: u64 = 10;

/// Smallest digit target for generated keys
pub const MIN_KEY_DIGITS: u32 = 10;

/// Default number of prime pairs tried by key generation
pub const DEFAULT_KEYGEN_ATTEMPTS: usize = 5;

/// Digit between watermark and value in a marked payload
pub const MARK_SEPARATOR: char = '0';

/// Minimum watermark length when sealing
pub const MIN_WATERMARK_LENGTH: usize = 5;

/// Default digits in a marked payload
pub const DEFAULT_TARGET_DIGITS: u32 = 12;

/// Watermarks verified when a sealer is built
pub const DEFAULT_VERIFICATION_ROUNDS: usize = 20;
