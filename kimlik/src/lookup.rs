//! Deterministic lookup tokens for equality search over encrypted data.
//!
//! A [`LookupToken`] is the lowercase hex encoding of
//! `SHA-256(salt || canonical_digits)`. Determinism is the entire reason
//! the token exists: it is the only way an encrypted column can still
//! support an indexed equality predicate. The same identifier under the
//! same salt yields a byte-identical token, across calls and across
//! process restarts.
//!
//! # Security properties
//!
//! The input space is small: 9 decimal digits give 10^9 possible values.
//! An attacker holding both the salt and the token column can invert it by
//! exhaustive search in seconds. The salt defends against precomputed
//! rainbow tables shared across deployments, not against targeted brute
//! force once salt and tokens are both exposed. This is a design property
//! of equality-searchable tokens over a small domain, not a defect; access
//! control over the salt remains mandatory.

use crate::error::Error;
use crate::keyring::Keyring;
use crate::normalize::normalize;
use secrecy::ExposeSecret;
use sha2::{Digest, Sha256};

/// Length of the hex-encoded token (256-bit digest).
pub const LOOKUP_TOKEN_LEN: usize = 64;

/// A deterministic salted digest of a canonical identifier.
///
/// Many [`crate::cipher::Ciphertext`] values may correspond to the same
/// `LookupToken` (same identifier, different random nonce), but each token
/// corresponds to exactly one identifier value, modulo negligible
/// collision risk.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupToken(String);

impl LookupToken {
    /// Wraps a token loaded from storage.
    #[must_use]
    pub fn from_stored(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the 64-character hex token for persistence and equality
    /// predicates.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LookupToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the lookup token for an identifier, normalizing it first.
///
/// # Example
///
/// ```
/// use kimlik::keyring::Keyring;
/// use kimlik::lookup::hash_id;
/// use secrecy::SecretVec;
///
/// let keyring = Keyring::new(
///     SecretVec::new(vec![7u8; 32]),
///     SecretVec::new(b"salt".to_vec()),
/// )?;
///
/// // Separator variants hash identically.
/// assert_eq!(hash_id(&keyring, "123-45-6789")?, hash_id(&keyring, "123456789")?);
/// # Ok::<(), kimlik::error::Error>(())
/// ```
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if the input does not normalize.
pub fn hash_id(keyring: &Keyring, input: &str) -> Result<LookupToken, Error> {
    let canonical = normalize(input)?;
    Ok(hash_canonical(keyring, &canonical))
}

/// Digest of an already-canonical identifier. The record contract uses
/// this to derive the token from the same canonical pass as the
/// ciphertext.
pub(crate) fn hash_canonical(keyring: &Keyring, canonical: &str) -> LookupToken {
    let mut hasher = Sha256::new();
    hasher.update(keyring.salt().expose_secret());
    hasher.update(canonical.as_bytes());

    LookupToken(hex::encode(hasher.finalize()))
}
