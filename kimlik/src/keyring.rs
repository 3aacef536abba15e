//! Process-wide key material.
//!
//! The original design read key and salt from the environment at import
//! time; here they live in an explicit [`Keyring`] constructed once at
//! process startup and passed into the transforms. The keyring validates
//! its material eagerly so that a missing or malformed secret surfaces as
//! [`Error::Configuration`] up front instead of a cryptic failure deep in
//! the call chain.
//!
//! Secrets are held in [`SecretVec`] and are only readable inside this
//! crate. They are never logged, never included in error messages, and
//! never persisted alongside the data they protect.

use crate::error::Error;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use secrecy::{ExposeSecret, SecretVec};

/// Required encryption key size in bytes (256 bits for ChaCha20-Poly1305).
pub const KEY_SIZE: usize = 32;

/// Environment variable holding the base64-encoded encryption key.
pub const KEY_ENV: &str = "KIMLIK_ENCRYPTION_KEY";

/// Environment variable holding the hash salt.
pub const SALT_ENV: &str = "KIMLIK_HASH_SALT";

/// Process-wide symmetric key and hash salt.
///
/// Lifecycle: constructed once at startup, held for the process lifetime.
/// All transforms borrow it; none of them copy the material out.
///
/// # Example
///
/// ```
/// use kimlik::keyring::Keyring;
/// use secrecy::SecretVec;
///
/// let keyring = Keyring::new(
///     SecretVec::new(vec![7u8; 32]),
///     SecretVec::new(b"a-long-random-salt".to_vec()),
/// )?;
/// # Ok::<(), kimlik::error::Error>(())
/// ```
pub struct Keyring {
    key: SecretVec<u8>,
    salt: SecretVec<u8>,
}

impl Keyring {
    /// Creates a keyring from raw key and salt material.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the key is not exactly
    /// [`KEY_SIZE`] bytes or the salt is empty.
    pub fn new(key: SecretVec<u8>, salt: SecretVec<u8>) -> Result<Self, Error> {
        if key.expose_secret().len() != KEY_SIZE {
            return Err(Error::Configuration(format!(
                "encryption key must be {KEY_SIZE} bytes, got {}",
                key.expose_secret().len()
            )));
        }
        if salt.expose_secret().is_empty() {
            return Err(Error::Configuration("hash salt must not be empty".to_string()));
        }
        Ok(Self { key, salt })
    }

    /// Creates a keyring from a base64-encoded key and a salt string.
    ///
    /// This is the externally supplied format: a fixed-format secret for
    /// the cipher and an arbitrary-length secret random string for the
    /// salt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if the key is not valid base64 or
    /// either value fails the [`Keyring::new`] checks.
    pub fn from_base64(key_b64: &str, salt: &str) -> Result<Self, Error> {
        let key = STANDARD
            .decode(key_b64.trim())
            .map_err(|_| Error::Configuration("encryption key is not valid base64".to_string()))?;
        Self::new(SecretVec::new(key), SecretVec::new(salt.as_bytes().to_vec()))
    }

    /// Loads the keyring from the process environment.
    ///
    /// Reads [`KEY_ENV`] (base64) and [`SALT_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] naming the missing variable, or
    /// propagates the [`Keyring::from_base64`] validation errors.
    pub fn from_env() -> Result<Self, Error> {
        let key = std::env::var(KEY_ENV)
            .map_err(|_| Error::Configuration(format!("{KEY_ENV} is not set")))?;
        let salt = std::env::var(SALT_ENV)
            .map_err(|_| Error::Configuration(format!("{SALT_ENV} is not set")))?;
        Self::from_base64(&key, &salt)
    }

    /// Borrows the encryption key. Crate-internal by design.
    pub(crate) fn key(&self) -> &SecretVec<u8> {
        &self.key
    }

    /// Borrows the hash salt. Crate-internal by design.
    pub(crate) fn salt(&self) -> &SecretVec<u8> {
        &self.salt
    }
}

impl std::fmt::Debug for Keyring {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Secrets stay out of Debug output.
        f.debug_struct("Keyring").finish_non_exhaustive()
    }
}
