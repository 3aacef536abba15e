//! # `Kimlik`
//!
//! Application-level column encryption for a 9-digit national identity
//! number, with a deterministic lookup token that supports equality search
//! without decryption.
//!
//! ## Transforms
//!
//! - Normalization to the canonical digits-only form
//! - Authenticated encryption (ChaCha20-Poly1305) producing versionless,
//!   self-contained ciphertext tokens
//! - Deterministic salted digest (SHA-256) as an equality-searchable
//!   surrogate
//! - Display masking that reveals only the last 4 digits
//! - A record contract keeping ciphertext and lookup token consistent
//!
//! ## Query strategy
//!
//! This approach is valid for equality-only fields. Fields that need
//! range, sort, or aggregate queries must not be encrypted this way: every
//! such query degrades to fetching and decrypting the full table. See the
//! `kimlik-store` crate for the policy type and a demonstration of both
//! sides of that boundary.
//!
//! ## Example
//!
//! ```rust,ignore
//! use kimlik::prelude::*;
//!
//! let keyring = Keyring::from_env()?;
//!
//! let mut nid = ProtectedId::empty();
//! nid.set(&keyring, "987-65-4321")?;
//!
//! // Persist nid.ciphertext() and nid.lookup_token(); search by
//! // hash_id(&keyring, candidate) against the indexed token column.
//! ```

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cipher;
pub mod error;
pub mod keyring;
pub mod lookup;
pub mod mask;
pub mod normalize;
pub mod record;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::cipher::{decrypt_id, encrypt_id, Ciphertext};
    pub use crate::error::Error;
    pub use crate::keyring::Keyring;
    pub use crate::lookup::{hash_id, LookupToken};
    pub use crate::mask::{format_id, mask};
    pub use crate::normalize::normalize;
    pub use crate::record::ProtectedId;
}
