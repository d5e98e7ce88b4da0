//! High-level sealing API for Credict
//!
//! Composes a keypair and an address watermarker into the payload
//! convention used for sealed predictions.

pub mod sealer;

pub use sealer::{OpenedPayload, PredictionSealer, SealerOptions};
