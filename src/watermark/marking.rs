//! Marked payload convention: `watermark ‖ "0" ‖ value` as one integer

use super::Watermark;
use crate::MARK_SEPARATOR;
use crate::error::{CredictError, Result};

/// Concatenate a watermark, the separator digit and a value.
///
/// The watermark must not contain the separator, otherwise the payload could
/// not be split back unambiguously.
///
/// # Example
/// ```
/// use credict::watermark::{Watermark, mark, split_marked};
///
/// let marked = mark(&Watermark::from(135), 42).unwrap();
/// assert_eq!(marked, 135_042);
/// assert_eq!(split_marked(marked), ("135".to_string(), "42".to_string()));
/// ```
pub fn mark(watermark: &Watermark, value: u64) -> Result<u64> {
    if watermark.digits().contains(MARK_SEPARATOR) {
        return Err(CredictError::InvalidWatermark(format!(
            "{} contains the separator digit",
            watermark
        )));
    }

    format!("{}{}{}", watermark, MARK_SEPARATOR, value)
        .parse()
        .map_err(|_| {
            CredictError::ArithmeticOverflow(format!(
                "marked payload {}{}{}",
                watermark, MARK_SEPARATOR, value
            ))
        })
}

/// Split a marked payload at its first separator digit.
///
/// Returns the watermark digits and the value digits; the value part is empty
/// when no separator is present.
pub fn split_marked(marked_value: u64) -> (String, String) {
    let digits = marked_value.to_string();
    match digits.split_once(MARK_SEPARATOR) {
        Some((watermark, value)) => (watermark.to_string(), value.to_string()),
        None => (digits, String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark() {
        assert_eq!(mark(&Watermark::from(135), 42).unwrap(), 135_042);
        assert_eq!(mark(&Watermark::from(9), 0).unwrap(), 900);
    }

    #[test]
    fn test_mark_rejects_separator_in_watermark() {
        assert!(matches!(
            mark(&Watermark::from(105), 42),
            Err(CredictError::InvalidWatermark(_))
        ));
    }

    #[test]
    fn test_mark_overflow() {
        let watermark: Watermark = "99999999999".parse().unwrap();
        assert!(matches!(
            mark(&watermark, 123_456_789_012),
            Err(CredictError::ArithmeticOverflow(_))
        ));
    }

    #[test]
    fn test_split_keeps_zeros_in_value() {
        assert_eq!(split_marked(1_350_100), ("135".to_string(), "100".to_string()));
        assert_eq!(split_marked(13_500), ("135".to_string(), "0".to_string()));
        assert_eq!(split_marked(13_507_009), ("135".to_string(), "7009".to_string()));
    }

    #[test]
    fn test_split_without_separator() {
        assert_eq!(split_marked(135), ("135".to_string(), String::new()));
    }
}
