//! Display-safe masking of identifier values.
//!
//! Every human-facing display path that is not owner-authorized must go
//! through [`mask`] rather than the raw decrypted value. Pure and
//! deterministic; no key material involved.

use crate::error::Error;
use crate::normalize::normalize;

/// Mask shown when no value is present or the input does not normalize.
pub const MASK_PLACEHOLDER: &str = "***-**-****";

/// Masks an identifier for display, keeping only the last 4 digits.
///
/// Input in any separator format is normalized first. Input that does not
/// normalize yields [`MASK_PLACEHOLDER`], never an error: a display path
/// should degrade to the fully masked form rather than fail.
///
/// # Example
///
/// ```
/// use kimlik::mask::mask;
///
/// assert_eq!(mask("123-45-6789"), "***-**-6789");
/// assert_eq!(mask("garbage"), "***-**-****");
/// ```
#[must_use]
pub fn mask(input: &str) -> String {
    match normalize(input) {
        Ok(canonical) => format!("***-**-{}", &canonical[canonical.len() - 4..]),
        Err(_) => MASK_PLACEHOLDER.to_string(),
    }
}

/// Formats a valid identifier with dashes for owner-authorized display.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if the input does not normalize.
pub fn format_id(input: &str) -> Result<String, Error> {
    let canonical = normalize(input)?;
    Ok(format!("{}-{}-{}", &canonical[..3], &canonical[3..5], &canonical[5..]))
}
