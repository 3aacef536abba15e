//! # `kimlik-store`
//!
//! SQLite-backed persistence for `kimlik`-protected columns.
//!
//! This crate owns the storage contract of the core library:
//!
//! - the two-column layout per protected attribute
//!   (`<field>_ciphertext`, indexed `<field>_hash`),
//! - the indexed equality-query path through the lookup token,
//! - batch derive-then-persist for bulk writes,
//! - the [`policy::QueryStrategy`] classification that decides whether a
//!   field may carry a hash index at all,
//! - and, deliberately, the decrypt-all failure mode: an encrypted column
//!   that needs range queries ([`applicant::ApplicantStore`]) so the cost
//!   of violating the policy is measurable rather than theoretical.
//!
//! The datastore is consumed only through SELECT/INSERT/index semantics;
//! nothing here depends on SQLite specifics beyond that.

#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod applicant;
pub mod error;
pub mod person;
pub mod policy;
pub mod schema;

pub mod prelude {
    //! Convenience re-exports for common use.
    pub use crate::applicant::ApplicantStore;
    pub use crate::error::StoreError;
    pub use crate::person::{NewPerson, PersonRow, PersonStore};
    pub use crate::policy::QueryStrategy;
}
