//! Storage and query paths for people with a protected identifier.
//!
//! Writes go through the record contract, so a row always carries the
//! ciphertext and lookup token together. The only supported search by
//! identifier value is an equality match on the indexed token column;
//! there is no decryption-based scan here.

use crate::error::StoreError;
use crate::schema::init_schema;
use kimlik::cipher::Ciphertext;
use kimlik::keyring::Keyring;
use kimlik::lookup::{hash_id, LookupToken};
use kimlik::record::ProtectedId;
use rusqlite::{Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Input for a person row; the identifier is raw and may carry
/// separators.
#[derive(Debug, Clone)]
pub struct NewPerson {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    /// Raw identifier; normalized and protected before any write.
    pub national_id: String,
}

/// A person loaded from storage.
#[derive(Debug)]
pub struct PersonRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub national_id: ProtectedId,
}

/// Store for the `people` table.
pub struct PersonStore {
    conn: Connection,
    keyring: Arc<Keyring>,
}

impl PersonStore {
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

    /// Inserts one person, deriving both protected columns first.
    ///
    /// # Errors
    ///
    /// Propagates the core taxonomy for derivation failures; nothing is
    /// written when derivation fails.
    pub fn insert(&self, person: &NewPerson) -> Result<i64, StoreError> {
        let mut nid = ProtectedId::empty();
        nid.set(&self.keyring, &person.national_id)?;

        self.conn.execute(
            "INSERT INTO people (first_name, last_name, email, nid_ciphertext, nid_hash)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            (
                &person.first_name,
                &person.last_name,
                &person.email,
                nid.ciphertext().map(Ciphertext::as_str),
                nid.lookup_token().map(LookupToken::as_str),
            ),
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Inserts many people: derive every `(ciphertext, hash)` pair first,
    /// then persist them in one transaction.
    ///
    /// Derivation happens ahead of the batched write, not per row inside
    /// it, so a single invalid identifier fails the batch before anything
    /// touches the datastore.
    ///
    /// # Errors
    ///
    /// Propagates derivation failures (no rows written) and database
    /// failures (transaction rolled back).
    pub fn insert_batch(&mut self, people: &[NewPerson]) -> Result<usize, StoreError> {
        let started = Instant::now();

        // Batch derive.
        let mut derived = Vec::with_capacity(people.len());
        for person in people {
            let mut nid = ProtectedId::empty();
            nid.set(&self.keyring, &person.national_id)?;
            derived.push(nid);
        }

        // Batch persist.
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO people (first_name, last_name, email, nid_ciphertext, nid_hash)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (person, nid) in people.iter().zip(&derived) {
                stmt.execute((
                    &person.first_name,
                    &person.last_name,
                    &person.email,
                    nid.ciphertext().map(Ciphertext::as_str),
                    nid.lookup_token().map(LookupToken::as_str),
                ))?;
            }
        }
        tx.commit()?;

        debug!(
            rows = people.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "batch insert committed"
        );
        Ok(people.len())
    }

    /// Finds a person by identifier value via the indexed token column.
    ///
    /// The candidate token is computed here, independently of any stored
    /// row, and matched with an equality predicate. The identifier never
    /// reaches the datastore in plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`kimlik::error::Error::InvalidFormat`] (wrapped) for an
    /// un-normalizable candidate, or database errors.
    pub fn find_by_national_id(&self, raw: &str) -> Result<Option<PersonRow>, StoreError> {
        let token = hash_id(&self.keyring, raw)?;

        let row = self
            .conn
            .query_row(
                "SELECT id, first_name, last_name, email, nid_ciphertext, nid_hash
                 FROM people WHERE nid_hash = ?1 LIMIT 1",
                [token.as_str()],
                Self::map_row,
            )
            .optional()?;

        row.map(Self::validate_pair).transpose()
    }

    /// Loads a person by row id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::CorruptRow`] if the row holds only one of
    /// the two derived columns.
    pub fn get(&self, id: i64) -> Result<Option<PersonRow>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, first_name, last_name, email, nid_ciphertext, nid_hash
                 FROM people WHERE id = ?1",
                [id],
                Self::map_row,
            )
            .optional()?;

        row.map(Self::validate_pair).transpose()
    }

    /// Number of stored people.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Database`] on query failure.
    pub fn count(&self) -> Result<i64, StoreError> {
        Ok(self.conn.query_row("SELECT COUNT(*) FROM people", [], |row| row.get(0))?)
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, String, Option<String>, Option<String>)> {
        Ok((
            row.get(0)?,
            row.get(1)?,
            row.get(2)?,
            row.get(3)?,
            row.get(4)?,
            row.get(5)?,
        ))
    }

    /// Rehydrates the protected pair, rejecting half-written rows.
    fn validate_pair(
        (id, first_name, last_name, email, ciphertext, hash): (
            i64,
            String,
            String,
            String,
            Option<String>,
            Option<String>,
        ),
    ) -> Result<PersonRow, StoreError> {
        let national_id = match (ciphertext, hash) {
            (Some(ciphertext), Some(hash)) => ProtectedId::from_stored(
                Ciphertext::from_stored(ciphertext),
                LookupToken::from_stored(hash),
            ),
            (None, None) => ProtectedId::empty(),
            _ => return Err(StoreError::CorruptRow { row_id: id }),
        };

        Ok(PersonRow { id, first_name, last_name, email, national_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretVec;

    fn test_store() -> PersonStore {
        let keyring = Arc::new(
            Keyring::new(
                SecretVec::new(vec![0x33u8; 32]),
                SecretVec::new(b"store-test-salt".to_vec()),
            )
            .unwrap(),
        );
        PersonStore::open_in_memory(keyring).unwrap()
    }

    fn person(first: &str, nid: &str) -> NewPerson {
        NewPerson {
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            email: format!("{first}@example.com"),
            national_id: nid.to_string(),
        }
    }

    #[test]
    fn test_insert_and_find_by_value() {
        let store = test_store();
        let id = store.insert(&person("alice", "987-65-4321")).unwrap();

        let found = store.find_by_national_id("987654321").unwrap().unwrap();
        assert_eq!(found.id, id);
        assert_eq!(found.first_name, "alice");

        let digits = found.national_id.get(store.keyring.as_ref()).unwrap().unwrap();
        assert_eq!(&*digits, "987654321");
    }

    #[test]
    fn test_find_with_separator_variant() {
        let store = test_store();
        store.insert(&person("alice", "123456789")).unwrap();

        // Candidate in a different separator format still matches.
        let found = store.find_by_national_id("123-45-6789").unwrap();
        assert!(found.is_some());
    }

    #[test]
    fn test_find_missing_value() {
        let store = test_store();
        store.insert(&person("alice", "123456789")).unwrap();

        let found = store.find_by_national_id("999999999").unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_find_invalid_candidate() {
        let store = test_store();
        let result = store.find_by_national_id("12345");
        assert!(matches!(
            result,
            Err(StoreError::Crypto(kimlik::error::Error::InvalidFormat { digits: 5 }))
        ));
    }

    #[test]
    fn test_insert_invalid_identifier_writes_nothing() {
        let store = test_store();
        let result = store.insert(&person("alice", "not-a-number"));
        assert!(matches!(result, Err(StoreError::Crypto(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_batch_insert_derives_before_persisting() {
        let mut store = test_store();
        let people = vec![
            person("alice", "111111111"),
            person("bob", "222222222"),
            person("carol", "bad"),
        ];

        // One invalid identifier fails the whole batch before any write.
        let result = store.insert_batch(&people);
        assert!(matches!(result, Err(StoreError::Crypto(_))));
        assert_eq!(store.count().unwrap(), 0);

        let valid = vec![person("alice", "111111111"), person("bob", "222222222")];
        assert_eq!(store.insert_batch(&valid).unwrap(), 2);
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn test_get_round_trips_protected_pair() {
        let store = test_store();
        let id = store.insert(&person("alice", "555-44-3333")).unwrap();

        let row = store.get(id).unwrap().unwrap();
        assert!(row.national_id.is_set());
        assert_eq!(row.national_id.masked(store.keyring.as_ref()).unwrap(), "***-**-3333");
    }

    #[test]
    fn test_half_written_row_is_rejected() {
        let store = test_store();
        store
            .conn
            .execute(
                "INSERT INTO people (first_name, last_name, email, nid_ciphertext, nid_hash)
                 VALUES ('eve', 'X', 'eve@example.com', 'orphan-token', NULL)",
                [],
            )
            .unwrap();

        let id = store.conn.last_insert_rowid();
        let result = store.get(id);
        assert!(matches!(result, Err(StoreError::CorruptRow { .. })));
    }

    #[test]
    fn test_duplicate_identifiers_share_token() {
        let store = test_store();
        store.insert(&person("alice", "123456789")).unwrap();
        store.insert(&person("bob", "123456789")).unwrap();

        // Both rows carry the same token; ciphertexts differ.
        let mut stmt = store
            .conn
            .prepare("SELECT DISTINCT nid_hash FROM people")
            .unwrap();
        let tokens: Vec<String> =
            stmt.query_map([], |row| row.get(0)).unwrap().map(Result::unwrap).collect();
        assert_eq!(tokens.len(), 1);

        let mut stmt = store
            .conn
            .prepare("SELECT DISTINCT nid_ciphertext FROM people")
            .unwrap();
        let ciphertexts: Vec<String> =
            stmt.query_map([], |row| row.get(0)).unwrap().map(Result::unwrap).collect();
        assert_eq!(ciphertexts.len(), 2);
    }
}
