//! The decrypt-all failure mode, kept deliberately runnable.
//!
//! Income needs range filters (`income > 10000`) and sorting
//! (`ORDER BY income DESC`). A lookup token cannot serve either, because
//! a one-way digest does not preserve order, so this table stores
//! ciphertext only and every range query here does what the schema forces
//! it to do: fetch every row, decrypt every row, filter and sort in
//! memory. O(n) with per-row cipher cost, against O(log n) for an indexed
//! plain column.
//!
//! This module exists so the policy boundary in
//! [`crate::policy::QueryStrategy`] stays measurable instead of
//! theoretical. Do not model real fields on it.

use crate::error::StoreError;
use crate::schema::init_schema;
use kimlik::cipher::{self, Ciphertext};
use kimlik::keyring::Keyring;
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// An applicant with a decrypted income figure.
#[derive(Debug, Clone, PartialEq)]
pub struct Applicant {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub income: f64,
}

/// Store for the `applicants` table.
pub struct ApplicantStore {
    conn: Connection,
    keyring: Arc<Keyring>,
}

impl ApplicantStore {
    /// Opens (and initializes) a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if the database cannot be opened
    /// or the schema cannot be created.
    pub fn open(path: impl AsRef<Path>, keyring: Arc<Keyring>) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        init_schema(&conn)?;
        Ok(Self { conn, keyring })
    }

    /// Opens an in-memory store, mainly for tests and benchmarks.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] if schema creation fails.
    pub fn open_in_memory(keyring: Arc<Keyring>) -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self { conn, keyring })
    }

    /// Inserts an applicant, encrypting the income figure.
    ///
    /// The income is stored with two decimal places for a stable
    /// representation.
    ///
    /// # Errors
    ///
    /// Propagates [`kimlik::error::Error::EncryptionFailed`] and database
    /// errors.
    pub fn insert(&self, name: &str, email: &str, income: f64) -> Result<i64, StoreError> {
        let ciphertext = cipher::seal(&self.keyring, format!("{income:.2}").as_bytes())?;

        self.conn.execute(
            "INSERT INTO applicants (name, email, income_ciphertext) VALUES (?1, ?2, ?3)",
            (name, email, ciphertext.as_str()),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Returns applicants with income above the threshold, sorted
    /// descending.
    ///
    /// This is the decrypt-all path: there is no index to consult, so the
    /// full table is fetched and decrypted before a single comparison can
    /// happen.
    ///
    /// # Errors
    ///
    /// Propagates [`kimlik::error::Error::DecryptionFailed`] for any row
    /// whose token no longer authenticates, and database errors.
    pub fn incomes_above(&self, threshold: f64) -> Result<Vec<Applicant>, StoreError> {
        let started = Instant::now();

        let mut stmt = self
            .conn
            .prepare("SELECT id, name, email, income_ciphertext FROM applicants")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
            ))
        })?;

        let mut scanned = 0usize;
        let mut matched = Vec::new();
        for row in rows {
            let (id, name, email, token) = row?;
            scanned += 1;

            let plaintext = cipher::open(&self.keyring, &Ciphertext::from_stored(token))?;
            let income = std::str::from_utf8(&plaintext)
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .ok_or(StoreError::Crypto(kimlik::error::Error::DecryptionFailed))?;

            if income > threshold {
                matched.push(Applicant { id, name, email, income });
            }
        }

        matched.sort_by(|a, b| b.income.total_cmp(&a.income));

        debug!(
            scanned,
            matched = matched.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "decrypt-all range scan"
        );
        Ok(matched)
    }

    /// Number of stored applicants.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on query failure.
    pub fn count(&self) -> Result<i64, StoreError> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM applicants", [], |row| row.get(0))?)
    }
}
