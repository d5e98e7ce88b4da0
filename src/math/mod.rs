//! Number theory for the keypair derivation
//!
//! A memoizing trial-division factorizer backed by an incrementally grown
//! prime table, and a recursive-squaring modular exponentiation.

mod factorizer;
mod modexp;

pub use factorizer::{Factorization, Factorizer, PrimeTable};
pub use modexp::power_mod_n;
pub(crate) use modexp::pow_mod;
