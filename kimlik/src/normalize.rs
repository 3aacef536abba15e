//! Canonicalization of raw identifier input.
//!
//! Human-entered identifiers arrive with separators ("123-45-6789",
//! "123 45 6789"). Every transform in this crate operates on the canonical
//! digits-only form, produced here and nowhere else. The canonical form is
//! transient: it is never persisted, and callers receive it in a zeroizing
//! buffer.

use crate::error::Error;
use zeroize::Zeroizing;

/// Exact digit count of a canonical identifier.
pub const NID_DIGITS: usize = 9;

/// Normalizes raw input to the canonical 9-digit form.
///
/// Strips every non-digit character, then requires exactly
/// [`NID_DIGITS`] digits to remain.
///
/// # Example
///
/// ```
/// use kimlik::normalize::normalize;
///
/// let canonical = normalize("123-45-6789").unwrap();
/// assert_eq!(&*canonical, "123456789");
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] when the remaining digit count is not
/// exactly 9 (too short, too long, or empty).
pub fn normalize(input: &str) -> Result<Zeroizing<String>, Error> {
    let digits: Zeroizing<String> = Zeroizing::new(input.chars().filter(char::is_ascii_digit).collect());

    if digits.len() != NID_DIGITS {
        return Err(Error::InvalidFormat { digits: digits.len() });
    }

    Ok(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dashes() {
        assert_eq!(&*normalize("123-45-6789").unwrap(), "123456789");
    }

    #[test]
    fn test_normalize_spaces() {
        assert_eq!(&*normalize("123 45 6789").unwrap(), "123456789");
    }

    #[test]
    fn test_normalize_dots() {
        assert_eq!(&*normalize("123.45.6789").unwrap(), "123456789");
    }

    #[test]
    fn test_normalize_already_canonical() {
        assert_eq!(&*normalize("987654321").unwrap(), "987654321");
    }

    #[test]
    fn test_normalize_too_short() {
        let result = normalize("12345");
        assert!(matches!(result, Err(Error::InvalidFormat { digits: 5 })));
    }

    #[test]
    fn test_normalize_too_long() {
        let result = normalize("1234567890");
        assert!(matches!(result, Err(Error::InvalidFormat { digits: 10 })));
    }

    #[test]
    fn test_normalize_empty() {
        let result = normalize("");
        assert!(matches!(result, Err(Error::InvalidFormat { digits: 0 })));
    }

    #[test]
    fn test_normalize_only_separators() {
        let result = normalize("---   ...");
        assert!(matches!(result, Err(Error::InvalidFormat { digits: 0 })));
    }

    #[test]
    fn test_normalize_leading_zeros_preserved() {
        assert_eq!(&*normalize("000-00-0001").unwrap(), "000000001");
    }

    #[test]
    fn test_normalize_non_ascii_digits_rejected() {
        // Arabic-Indic digits are not canonical digits.
        let result = normalize("١٢٣٤٥٦٧٨٩");
        assert!(matches!(result, Err(Error::InvalidFormat { digits: 0 })));
    }
}
