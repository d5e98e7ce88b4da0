//! Error types for Credict Core

use thiserror::Error;

/// Main error type for key generation, encryption and watermarking
#[derive(Error, Debug)]
pub enum CredictError {
    /// Input outside the domain of an arithmetic primitive
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A supplied p or q is too small or not prime
    #[error("Invalid prime {0}: must be a prime greater than 10")]
    InvalidPrime(u64),

    /// totient + 1 does not split into enough distinct primes
    #[error("Need at least 2 distinct prime factors of {value}, got {distinct}")]
    InsufficientFactors { value: u64, distinct: usize },

    /// Prime table too small to sample from safely
    #[error("Too few primes: expected at least {required}, got {available}")]
    InsufficientPrimePool { required: usize, available: usize },

    /// Randomized key search ran out of attempts
    #[error("Ran out of {attempts} attempts to construct a keypair")]
    KeyGenerationExhausted { attempts: usize },

    /// A (n, e, d) triple violates the keypair invariants
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Plaintext not in [0, n)
    #[error("Value {value} is too large for modulus {modulus}")]
    ValueTooLarge { value: u64, modulus: u64 },

    /// Requested watermark length exceeds what the address can provide
    #[error("Watermark length {requested} not available: max {available} digits")]
    WatermarkLength { requested: usize, available: usize },

    /// Value leaves too little room for a watermark
    #[error("Available watermark length {available} is below the minimum {minimum}")]
    WatermarkTooShort { available: usize, minimum: usize },

    /// Address is not a hexadecimal string
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Watermark is not a non-empty decimal digit string
    #[error("Invalid watermark: {0}")]
    InvalidWatermark(String),

    /// Result does not fit in 64 bits
    #[error("Arithmetic overflow: {0}")]
    ArithmeticOverflow(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CredictError {
    fn from(err: serde_json::Error) -> Self {
        CredictError::SerializationError(err.to_string())
    }
}

/// Result type alias for Credict operations
pub type Result<T> = std::result::Result<T, CredictError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CredictError::InvalidPrime(9);
        assert!(err.to_string().contains('9'));

        let err = CredictError::InsufficientFactors { value: 121, distinct: 1 };
        assert_eq!(
            err.to_string(),
            "Need at least 2 distinct prime factors of 121, got 1"
        );

        let err = CredictError::ValueTooLarge { value: 200, modulus: 187 };
        assert_eq!(err.to_string(), "Value 200 is too large for modulus 187");

        let err = CredictError::KeyGenerationExhausted { attempts: 5 };
        assert!(err.to_string().contains('5'));

        let err = CredictError::WatermarkLength { requested: 12, available: 10 };
        assert!(err.to_string().contains("max 10 digits"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<Vec<u64>>("not json").unwrap_err();
        let err: CredictError = json_err.into();
        match err {
            CredictError::SerializationError(msg) => assert!(!msg.is_empty()),
            _ => panic!("Expected SerializationError"),
        }
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "primes.json");
        let err: CredictError = io_err.into();
        assert!(err.to_string().contains("primes.json"));
    }
}
