//! Encryption and decryption with a validated keypair
//!
//! - ciphertext = plaintext^e mod n
//! - plaintext = ciphertext^d mod n

use super::keygen::KeyPair;
use crate::error::{CredictError, Result};
use crate::math::pow_mod;

/// Encrypt a plaintext in `[0, n)`
///
/// # Example
/// ```
/// use credict::crypto::{KeyGenerator, encrypt, decrypt};
/// use credict::math::Factorizer;
///
/// let mut generator = KeyGenerator::with_rng(Factorizer::with_bound(1_000), rand::rng());
/// let keypair = generator.from_pq(11, 17).unwrap();
///
/// let ciphertext = encrypt(5, &keypair).unwrap();
/// assert_eq!(ciphertext, 180);
/// assert_eq!(decrypt(ciphertext, &keypair), 5);
/// ```
pub fn encrypt(value: u64, keypair: &KeyPair) -> Result<u64> {
    if value >= keypair.n() {
        return Err(CredictError::ValueTooLarge {
            value,
            modulus: keypair.n(),
        });
    }
    Ok(pow_mod(value, keypair.e(), keypair.modulus()))
}

/// Decrypt a ciphertext
pub fn decrypt(ciphertext: u64, keypair: &KeyPair) -> u64 {
    pow_mod(ciphertext, keypair.d(), keypair.modulus())
}
