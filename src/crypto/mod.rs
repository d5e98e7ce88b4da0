//! Cryptographic operations for Credict
//!
//! This module derives `(n, e, d)` keypairs from two primes and implements
//! textbook modular-exponentiation encryption on top of them.

mod cipher;
pub mod keygen;

pub use cipher::{decrypt, encrypt};
pub use keygen::{KeyGenerator, KeyPair, KeyParams, check_parameter};
