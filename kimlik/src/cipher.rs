//! Authenticated encryption of identifier values.
//!
//! Ciphertext tokens are self-contained and versionless:
//! `base64(nonce || body+tag)` with a fresh random 96-bit nonce per call,
//! so encrypting the same identifier twice yields two different tokens.
//! Decryption verifies the authentication tag before returning any
//! plaintext and fails closed on tag mismatch, malformed structure, or
//! key mismatch.
//!
//! A future key-version tag can be prefixed to the encoded token without
//! touching this module's cipher logic; the stored column is free-length
//! text.

use crate::error::Error;
use crate::keyring::Keyring;
use crate::normalize::normalize;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chacha20poly1305::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    ChaCha20Poly1305, Nonce,
};
use secrecy::ExposeSecret;
use zeroize::Zeroizing;

/// Nonce size for ChaCha20-Poly1305 (96 bits).
const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag size.
const TAG_SIZE: usize = 16;

/// An opaque authenticated-encryption token, stored in place of plaintext.
///
/// Printable (base64) and self-contained: the random nonce, the encrypted
/// payload, and the authentication tag all live inside the token. Two
/// tokens for the same plaintext are not comparable; equality search goes
/// through [`crate::lookup::LookupToken`] instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext(String);

impl Ciphertext {
    /// Wraps an externally stored token without validating it.
    ///
    /// Validation happens at decryption time: a malformed token fails
    /// closed with [`Error::DecryptionFailed`].
    #[must_use]
    pub fn from_stored(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the printable token for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Ciphertext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Encrypts an identifier, normalizing it first.
///
/// # Errors
///
/// Returns [`Error::InvalidFormat`] if the input does not normalize, or
/// [`Error::EncryptionFailed`] if the cipher operation cannot complete.
pub fn encrypt_id(keyring: &Keyring, input: &str) -> Result<Ciphertext, Error> {
    let canonical = normalize(input)?;
    seal(keyring, canonical.as_bytes())
}

/// Decrypts a token back to the canonical digits.
///
/// The tag is verified before any plaintext is returned; unauthenticated
/// bytes are never surfaced.
///
/// # Errors
///
/// Returns [`Error::DecryptionFailed`] on malformed tokens, tag mismatch,
/// or key mismatch.
pub fn decrypt_id(keyring: &Keyring, token: &Ciphertext) -> Result<Zeroizing<String>, Error> {
    let plaintext = open(keyring, token)?;
    let digits = String::from_utf8(plaintext.to_vec()).map_err(|_| Error::DecryptionFailed)?;
    Ok(Zeroizing::new(digits))
}

/// Encrypts an arbitrary payload under the process key.
///
/// Used for fields that are encrypted without normalization, such as the
/// range-queried values in the store's decrypt-all demonstration.
///
/// # Errors
///
/// Returns [`Error::EncryptionFailed`] if the cipher operation fails.
pub fn seal(keyring: &Keyring, plaintext: &[u8]) -> Result<Ciphertext, Error> {
    let cipher = ChaCha20Poly1305::new_from_slice(keyring.key().expose_secret())
        .map_err(|e| Error::EncryptionFailed(format!("invalid key: {e}")))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from(nonce_bytes);

    let body = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| Error::EncryptionFailed(format!("ChaCha20-Poly1305: {e}")))?;

    let mut token = Vec::with_capacity(NONCE_SIZE + body.len());
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&body);

    Ok(Ciphertext(STANDARD.encode(token)))
}

/// Decrypts an arbitrary payload sealed with [`seal`].
///
/// # Errors
///
/// Returns [`Error::DecryptionFailed`] on any parse or authentication
/// failure. The error carries no detail about which check failed.
pub fn open(keyring: &Keyring, token: &Ciphertext) -> Result<Zeroizing<Vec<u8>>, Error> {
    let raw = STANDARD.decode(&token.0).map_err(|_| Error::DecryptionFailed)?;
    if raw.len() < NONCE_SIZE + TAG_SIZE {
        return Err(Error::DecryptionFailed);
    }

    let (nonce_bytes, body) = raw.split_at(NONCE_SIZE);
    let nonce = Nonce::from_slice(nonce_bytes);

    let cipher = ChaCha20Poly1305::new_from_slice(keyring.key().expose_secret())
        .map_err(|_| Error::DecryptionFailed)?;

    let plaintext = cipher.decrypt(nonce, body).map_err(|_| Error::DecryptionFailed)?;

    Ok(Zeroizing::new(plaintext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretVec;

    fn test_keyring() -> Keyring {
        Keyring::new(SecretVec::new(vec![42u8; 32]), SecretVec::new(b"test-salt".to_vec()))
            .unwrap()
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let keyring = test_keyring();
        let token = encrypt_id(&keyring, "123-45-6789").unwrap();
        let digits = decrypt_id(&keyring, &token).unwrap();
        assert_eq!(&*digits, "123456789");
    }

    #[test]
    fn test_encrypt_normalizes_before_sealing() {
        let keyring = test_keyring();
        let token = encrypt_id(&keyring, "123 45 6789").unwrap();
        assert_eq!(&*decrypt_id(&keyring, &token).unwrap(), "123456789");
    }

    #[test]
    fn test_encrypt_is_nondeterministic() {
        let keyring = test_keyring();
        let token1 = encrypt_id(&keyring, "123456789").unwrap();
        let token2 = encrypt_id(&keyring, "123456789").unwrap();

        // Fresh nonce per call: same input, two distinct tokens.
        assert_ne!(token1, token2);

        assert_eq!(&*decrypt_id(&keyring, &token1).unwrap(), "123456789");
        assert_eq!(&*decrypt_id(&keyring, &token2).unwrap(), "123456789");
    }

    #[test]
    fn test_encrypt_invalid_input() {
        let keyring = test_keyring();
        let result = encrypt_id(&keyring, "12345");
        assert!(matches!(result, Err(Error::InvalidFormat { digits: 5 })));
    }

    #[test]
    fn test_decrypt_wrong_key_fails_closed() {
        let keyring = test_keyring();
        let other = Keyring::new(
            SecretVec::new(vec![7u8; 32]),
            SecretVec::new(b"test-salt".to_vec()),
        )
        .unwrap();

        let token = encrypt_id(&keyring, "123456789").unwrap();
        let result = decrypt_id(&other, &token);
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_decrypt_tampered_token_fails_closed() {
        let keyring = test_keyring();
        let token = encrypt_id(&keyring, "123456789").unwrap();

        // Flip one bit in every byte position of the decoded token.
        let raw = STANDARD.decode(token.as_str()).unwrap();
        for pos in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[pos] ^= 0x01;
            let tampered = Ciphertext(STANDARD.encode(&tampered));
            let result = decrypt_id(&keyring, &tampered);
            assert!(
                matches!(result, Err(Error::DecryptionFailed)),
                "bit flip at byte {pos} was not detected"
            );
        }
    }

    #[test]
    fn test_decrypt_garbage_token() {
        let keyring = test_keyring();
        let result = decrypt_id(&keyring, &Ciphertext::from_stored("not base64 at all !"));
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_decrypt_truncated_token() {
        let keyring = test_keyring();
        let result = decrypt_id(&keyring, &Ciphertext::from_stored(STANDARD.encode([0u8; 8])));
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_decrypt_empty_token() {
        let keyring = test_keyring();
        let result = decrypt_id(&keyring, &Ciphertext::from_stored(""));
        assert!(matches!(result, Err(Error::DecryptionFailed)));
    }

    #[test]
    fn test_seal_open_arbitrary_payload() {
        let keyring = test_keyring();
        let token = seal(&keyring, b"48213.77").unwrap();
        let payload = open(&keyring, &token).unwrap();
        assert_eq!(&payload[..], b"48213.77");
    }

    #[test]
    fn test_token_is_printable() {
        let keyring = test_keyring();
        let token = encrypt_id(&keyring, "987654321").unwrap();
        assert!(token.as_str().chars().all(|c| c.is_ascii_graphic()));
    }
}
