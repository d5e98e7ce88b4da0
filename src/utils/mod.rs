//! Utility functions

pub mod digits;

pub use digits::{decimal_from_hex, digit_count};
