//! Error type for store operations.

/// Errors surfaced by the storage layer.
///
/// Crypto failures pass through unchanged so callers can still match on
/// the core taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A transform failed; the core taxonomy variant is preserved.
    #[error(transparent)]
    Crypto(#[from] kimlik::error::Error),

    /// The underlying datastore rejected an operation.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A row holds only one of the two derived columns.
    ///
    /// The record contract never writes a partial pair, so this indicates
    /// out-of-band modification of the table.
    #[error("corrupt row {row_id}: ciphertext and lookup token must be stored together")]
    CorruptRow {
        /// Row id of the offending record
        row_id: i64,
    },
}
