//! The record contract: ciphertext and lookup token as one logical value.
//!
//! [`ProtectedId`] couples a [`Ciphertext`] and a [`LookupToken`] derived
//! from the same canonical identifier. The pair is private, so a record
//! either carries both fields consistently or neither; no partial-write
//! state is observable. The accessor pair here is the only sanctioned
//! path to the logical value, with the two derived fields the only ones
//! exposed for persistence.

use crate::cipher::{self, Ciphertext};
use crate::error::Error;
use crate::keyring::Keyring;
use crate::lookup::{self, LookupToken};
use crate::mask::MASK_PLACEHOLDER;
use crate::normalize::normalize;
use zeroize::Zeroizing;

/// A protected identifier attribute attached to an owning record.
///
/// # Example
///
/// ```
/// use kimlik::keyring::Keyring;
/// use kimlik::record::ProtectedId;
/// use secrecy::SecretVec;
///
/// let keyring = Keyring::new(
///     SecretVec::new(vec![7u8; 32]),
///     SecretVec::new(b"salt".to_vec()),
/// )?;
///
/// let mut nid = ProtectedId::empty();
/// nid.set(&keyring, "987-65-4321")?;
///
/// let digits = nid.get(&keyring)?.unwrap();
/// assert_eq!(&*digits, "987654321");
/// assert_eq!(nid.masked(&keyring)?, "***-**-4321");
/// # Ok::<(), kimlik::error::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProtectedId {
    pair: Option<(Ciphertext, LookupToken)>,
}

impl ProtectedId {
    /// A protected attribute with no value set.
    #[must_use]
    pub const fn empty() -> Self {
        Self { pair: None }
    }

    /// Rehydrates the pair from the two persisted columns.
    ///
    /// Both columns are required together; a half-populated row cannot be
    /// expressed, which keeps the both-or-neither invariant intact across
    /// storage round trips.
    #[must_use]
    pub const fn from_stored(ciphertext: Ciphertext, lookup_token: LookupToken) -> Self {
        Self { pair: Some((ciphertext, lookup_token)) }
    }

    /// Whether a value is currently set.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.pair.is_some()
    }

    /// Assigns the logical value, deriving ciphertext and lookup token
    /// from a single canonical pass.
    ///
    /// Atomic with respect to the two derived fields: if normalization or
    /// either derivation fails, nothing is mutated and any previously
    /// stored pair remains in place.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::InvalidFormat`] and [`Error::EncryptionFailed`]
    /// unchanged.
    pub fn set(&mut self, keyring: &Keyring, value: &str) -> Result<(), Error> {
        let canonical = normalize(value)?;
        let ciphertext = cipher::seal(keyring, canonical.as_bytes())?;
        let lookup_token = lookup::hash_canonical(keyring, &canonical);

        self.pair = Some((ciphertext, lookup_token));
        Ok(())
    }

    /// Removes the logical value, clearing both derived fields together.
    pub fn clear(&mut self) {
        self.pair = None;
    }

    /// Reads the logical value, decrypting on demand.
    ///
    /// Plaintext is not cached across calls; each read decrypts the
    /// stored ciphertext so plaintext lives in memory no longer than
    /// necessary. Returns `Ok(None)` when no value has been set.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::DecryptionFailed`] unchanged.
    pub fn get(&self, keyring: &Keyring) -> Result<Option<Zeroizing<String>>, Error> {
        match &self.pair {
            Some((ciphertext, _)) => cipher::decrypt_id(keyring, ciphertext).map(Some),
            None => Ok(None),
        }
    }

    /// Returns the display-safe masked form of the logical value.
    ///
    /// An absent value masks to the full placeholder. Decryption failures
    /// are propagated, not hidden behind the placeholder: a token that no
    /// longer authenticates may indicate tampering.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::DecryptionFailed`] unchanged.
    pub fn masked(&self, keyring: &Keyring) -> Result<String, Error> {
        match self.get(keyring)? {
            Some(digits) => Ok(crate::mask::mask(&digits)),
            None => Ok(MASK_PLACEHOLDER.to_string()),
        }
    }

    /// The stored ciphertext column value, if set.
    #[must_use]
    pub fn ciphertext(&self) -> Option<&Ciphertext> {
        self.pair.as_ref().map(|(ciphertext, _)| ciphertext)
    }

    /// The stored lookup-token column value, if set.
    ///
    /// Callers searching for records by value compute the candidate's
    /// token with [`crate::lookup::hash_id`] and issue an equality match
    /// against the indexed token column. Decryption-based scanning is not
    /// a supported query path.
    #[must_use]
    pub fn lookup_token(&self) -> Option<&LookupToken> {
        self.pair.as_ref().map(|(_, lookup_token)| lookup_token)
    }
}
