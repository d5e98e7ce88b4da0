//! Keypair derivation
//!
//! Keys follow the relation `e * d = (p - 1)(q - 1) + 1` rather than the
//! usual modular inverse. `totient + 1` is factorized, its prime-power atoms
//! are shuffled and dealt out between `e` and `d`, so the relation only
//! exists when `totient + 1` has at least two distinct prime factors.
//!
//! **IMPORTANT**: moduli are small enough to factor by trial division. This
//! is not a secure cipher, and the relation must stay as is so persisted
//! keys keep decrypting.

use std::num::NonZeroU64;

use rand::Rng;
use rand::rngs::ThreadRng;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CredictError, Result};
use crate::math::Factorizer;
use crate::{MIN_KEY_DIGITS, MIN_PRIME_EXCLUSIVE};

/// Raw `(n, e, d)` triple as persisted by callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyParams {
    pub n: u64,
    pub e: u64,
    pub d: u64,
}

/// Validated keypair
///
/// Only obtainable through [`check_parameter`], so every instance satisfies
/// `n = p * q` for distinct primes, `e, d > 1` and `e * d = (p-1)(q-1) + 1`.
/// Serializes as `{"n": .., "e": .., "d": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KeyPair {
    n: NonZeroU64,
    e: u64,
    d: u64,
}

impl KeyPair {
    /// Validate and build a keypair
    pub fn new(n: u64, e: u64, d: u64, factorizer: &mut Factorizer) -> Result<Self> {
        check_parameter(factorizer, n, e, d)?;
        let n = NonZeroU64::new(n)
            .ok_or_else(|| CredictError::InvalidKey("modulus must be positive".to_string()))?;
        Ok(Self { n, e, d })
    }

    /// Modulus
    pub fn n(&self) -> u64 {
        self.n.get()
    }

    /// Encryption exponent
    pub fn e(&self) -> u64 {
        self.e
    }

    /// Decryption exponent
    pub fn d(&self) -> u64 {
        self.d
    }

    pub(crate) fn modulus(&self) -> NonZeroU64 {
        self.n
    }

    /// Raw triple for persistence
    pub fn describe(&self) -> KeyParams {
        KeyParams {
            n: self.n(),
            e: self.e,
            d: self.d,
        }
    }
}

/// Check the keypair invariants for a raw `(n, e, d)` triple.
///
/// Fails with [`CredictError::InvalidKey`] when `n` is not the product of two
/// distinct primes, when `e * d != (p-1)(q-1) + 1`, or when `e` or `d` is not
/// above 1.
pub fn check_parameter(factorizer: &mut Factorizer, n: u64, e: u64, d: u64) -> Result<()> {
    let factors = factorizer.factorize(n);
    let multiplicity: u32 = factors.values().sum();
    if factors.len() != 2 || multiplicity != 2 {
        return Err(CredictError::InvalidKey(format!(
            "modulus {} is not a product of two distinct primes",
            n
        )));
    }

    let primes: Vec<u64> = factors.into_keys().collect();
    let totient = u128::from(primes[0] - 1) * u128::from(primes[1] - 1);
    if u128::from(e) * u128::from(d) != totient + 1 {
        return Err(CredictError::InvalidKey("totient formula mismatch".to_string()));
    }

    if e <= 1 || d <= 1 {
        return Err(CredictError::InvalidKey(format!(
            "unexpected (e, d) pair: ({}, {})",
            e, d
        )));
    }

    Ok(())
}

/// Randomized keypair search over a shared factorizer
///
/// The random source is injected so searches can be replayed with a seeded
/// generator.
pub struct KeyGenerator<R = ThreadRng> {
    factorizer: Factorizer,
    rng: R,
}

impl KeyGenerator<ThreadRng> {
    /// Generator with a default factorizer and the thread-local RNG
    pub fn new() -> Self {
        Self::with_rng(Factorizer::new(), rand::rng())
    }
}

impl Default for KeyGenerator<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> KeyGenerator<R> {
    pub fn with_rng(factorizer: Factorizer, rng: R) -> Self {
        Self { factorizer, rng }
    }

    pub fn factorizer(&self) -> &Factorizer {
        &self.factorizer
    }

    pub fn factorizer_mut(&mut self) -> &mut Factorizer {
        &mut self.factorizer
    }

    /// Give back the factorizer with everything it learned
    pub fn into_factorizer(self) -> Factorizer {
        self.factorizer
    }

    /// Derive a keypair from two primes
    ///
    /// # Example
    /// ```
    /// use credict::crypto::KeyGenerator;
    /// use credict::math::Factorizer;
    ///
    /// let mut generator = KeyGenerator::with_rng(Factorizer::with_bound(1_000), rand::rng());
    /// let keypair = generator.from_pq(11, 17).unwrap();
    /// assert_eq!((keypair.n(), keypair.e(), keypair.d()), (187, 23, 7));
    /// ```
    pub fn from_pq(&mut self, p: u64, q: u64) -> Result<KeyPair> {
        for prime in [p, q] {
            if prime <= MIN_PRIME_EXCLUSIVE || !self.factorizer.is_prime(prime) {
                return Err(CredictError::InvalidPrime(prime));
            }
        }

        let target = (p - 1)
            .checked_mul(q - 1)
            .and_then(|totient| totient.checked_add(1))
            .ok_or_else(|| overflow(format!("totient of {} and {}", p, q)))?;
        let n = p
            .checked_mul(q)
            .ok_or_else(|| overflow(format!("modulus {} * {}", p, q)))?;

        let factors = self.factorizer.factorize(target);
        if factors.len() < 2 {
            return Err(CredictError::InsufficientFactors {
                value: target,
                distinct: factors.len(),
            });
        }

        let mut atoms: Vec<u64> = factors
            .iter()
            .flat_map(|(&prime, &count)| std::iter::repeat_n(prime, count as usize))
            .collect();
        atoms.shuffle(&mut self.rng);

        // deal atoms to whichever side is smaller
        let (mut e, mut d) = (1u64, 1u64);
        while let Some(atom) = atoms.pop() {
            if e <= d {
                e *= atom;
            } else {
                d *= atom;
            }
        }
        if e < d {
            std::mem::swap(&mut e, &mut d);
        }

        debug!(p, q, n, e, d, "derived keypair");
        KeyPair::new(n, e, d, &mut self.factorizer)
    }

    /// Derive a keypair whose modulus can hold `num_digits`-digit plaintexts.
    ///
    /// `num_digits` is raised to at least [`MIN_KEY_DIGITS`]. Primes are drawn
    /// from the top `2 * num_digits^3` entries of the prime table after it
    /// has been grown past `11 * 10^(num_digits - 1)`.
    pub fn given_digits(&mut self, num_digits: u32, attempts: usize) -> Result<KeyPair> {
        let num_digits = num_digits.max(MIN_KEY_DIGITS);

        // 1.1 * number cap > some prime > number cap
        let bound = 10u64
            .checked_pow(num_digits - 1)
            .and_then(|cap| cap.checked_mul(11))
            .ok_or_else(|| overflow(format!("bound for {} digits", num_digits)))?;
        self.factorizer.factorize(bound);

        let required = 2 * (num_digits as usize).pow(3);
        let primes = self.factorizer.list_primes();
        if primes.len() < required {
            return Err(CredictError::InsufficientPrimePool {
                required,
                available: primes.len(),
            });
        }
        let pool = primes[primes.len() - required..].to_vec();

        for attempt in 1..=attempts {
            let picked: Vec<u64> = pool.choose_multiple(&mut self.rng, 2).copied().collect();
            let (p, q) = match picked.as_slice() {
                [p, q] => (*p, *q),
                _ => {
                    return Err(CredictError::InsufficientPrimePool {
                        required: 2,
                        available: pool.len(),
                    });
                }
            };

            let Some(target) = (p - 1).checked_mul(q - 1).and_then(|t| t.checked_add(1)) else {
                return Err(overflow(format!("totient of {} and {}", p, q)));
            };
            if self.factorizer.factorize(target).len() < 2 {
                debug!(attempt, p, q, "skipping key candidate with too few factors");
                continue;
            }

            return self.from_pq(p, q);
        }

        Err(CredictError::KeyGenerationExhausted { attempts })
    }

    /// Validate a raw triple against the keypair invariants
    pub fn check_parameter(&mut self, n: u64, e: u64, d: u64) -> Result<()> {
        check_parameter(&mut self.factorizer, n, e, d)
    }

    /// Rebuild a persisted keypair, re-checking every invariant
    pub fn restore(&mut self, params: KeyParams) -> Result<KeyPair> {
        KeyPair::new(params.n, params.e, params.d, &mut self.factorizer)
    }
}

fn overflow(what: String) -> CredictError {
    CredictError::ArithmeticOverflow(what)
}
