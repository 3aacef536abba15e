//! Error types for `kimlik` operations.
//!
//! The taxonomy is a closed set: callers match on the variant kind. None of
//! the messages ever carry plaintext, key, or salt material.

/// Main error type for `kimlik` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Input did not normalize to a valid identifier.
    ///
    /// Recoverable: the caller should prompt for corrected input.
    #[error("invalid identifier: expected exactly 9 digits, got {digits}")]
    InvalidFormat {
        /// Number of digits remaining after separators were stripped
        digits: usize,
    },

    /// Required key or salt material is missing or malformed.
    ///
    /// Fatal at the operation level; indicates a deployment
    /// misconfiguration and should abort startup-sensitive paths.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The underlying cipher operation could not complete.
    ///
    /// Never retried silently: a crypto failure can mask a compromised
    /// environment.
    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    /// Authentication tag mismatch, malformed token, or wrong key.
    ///
    /// Always fails closed. This condition may indicate tampering, so no
    /// partially-decrypted bytes are ever surfaced.
    #[error("decryption failed: token may be corrupted, tampered with, or encrypted under a different key")]
    DecryptionFailed,
}
