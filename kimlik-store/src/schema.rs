//! Schema layout for protected columns.
//!
//! A protected attribute occupies two datastore columns when its strategy
//! allows equality search, and one when it does not:
//!
//! ```text
//! <field>_ciphertext  TEXT   -- base64 token, free length
//! <field>_hash        TEXT   -- 64 hex chars, indexed (equality-only fields)
//! ```

use crate::error::StoreError;
use crate::policy::QueryStrategy;
use rusqlite::Connection;

/// A protected attribute's column layout, derived from its strategy.
#[derive(Debug, Clone, Copy)]
pub struct ProtectedColumn {
    /// Logical field name, prefix of the physical column names.
    pub name: &'static str,
    /// One-time query-strategy classification for this field.
    pub strategy: QueryStrategy,
}

impl ProtectedColumn {
    /// Physical column holding the ciphertext token.
    #[must_use]
    pub fn ciphertext_column(&self) -> String {
        format!("{}_ciphertext", self.name)
    }

    /// Physical column holding the lookup token, when the strategy
    /// permits one.
    #[must_use]
    pub fn hash_column(&self) -> Option<String> {
        self.strategy.hash_indexable().then(|| format!("{}_hash", self.name))
    }

    /// Column definitions for a CREATE TABLE statement.
    #[must_use]
    pub fn column_ddl(&self) -> String {
        match self.hash_column() {
            Some(hash) => format!("{} TEXT, {hash} TEXT", self.ciphertext_column()),
            None => format!("{} TEXT", self.ciphertext_column()),
        }
    }

    /// Index statement for the lookup-token column.
    ///
    /// `None` for range-class fields: no index can serve range, sort, or
    /// aggregate predicates over ciphertext, and promising one here is
    /// exactly the policy violation this type exists to prevent.
    #[must_use]
    pub fn index_ddl(&self, table: &str) -> Option<String> {
        self.hash_column().map(|hash| {
            format!("CREATE INDEX IF NOT EXISTS idx_{table}_{hash} ON {table} ({hash})")
        })
    }
}

/// The `people` table's protected identifier: equality lookups only.
pub const PERSON_NID: ProtectedColumn =
    ProtectedColumn { name: "nid", strategy: QueryStrategy::EqualityOnly };

/// The `applicants` table's income figure: needs range and sort queries,
/// so it gets ciphertext only and every such query pays the decrypt-all
/// cost.
pub const APPLICANT_INCOME: ProtectedColumn =
    ProtectedColumn { name: "income", strategy: QueryStrategy::RangeSortAggregate };

/// Creates both demonstration tables and the lookup-token index.
///
/// # Errors
///
/// Returns [`StoreError::Database`] if DDL execution fails.
pub fn init_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS people (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            {}
        );
        {};
        CREATE TABLE IF NOT EXISTS applicants (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT NOT NULL,
            {}
        );",
        PERSON_NID.column_ddl(),
        PERSON_NID.index_ddl("people").unwrap_or_default(),
        APPLICANT_INCOME.column_ddl(),
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_field_gets_two_columns() {
        assert_eq!(PERSON_NID.ciphertext_column(), "nid_ciphertext");
        assert_eq!(PERSON_NID.hash_column().as_deref(), Some("nid_hash"));
        assert_eq!(PERSON_NID.column_ddl(), "nid_ciphertext TEXT, nid_hash TEXT");
    }

    #[test]
    fn test_equality_field_gets_an_index() {
        let ddl = PERSON_NID.index_ddl("people").unwrap();
        assert!(ddl.contains("ON people (nid_hash)"));
    }

    #[test]
    fn test_range_field_gets_no_hash_column() {
        assert_eq!(APPLICANT_INCOME.hash_column(), None);
        assert_eq!(APPLICANT_INCOME.column_ddl(), "income_ciphertext TEXT");
        assert_eq!(APPLICANT_INCOME.index_ddl("applicants"), None);
    }

    #[test]
    fn test_init_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        init_schema(&conn).unwrap();
    }
}
