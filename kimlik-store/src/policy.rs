//! Per-field query-strategy classification.
//!
//! Application-level encryption with a salted-hash index is valid only for
//! fields queried by exact match. A field that participates in ordering,
//! inequality, or numeric aggregation cannot be indexed through a
//! one-way digest: hashes do not preserve order, so every such query
//! degrades to fetching and decrypting the full table.
//!
//! The classification is made once, before schema design. Moving a field
//! from one strategy to the other later means re-encrypting and
//! reindexing the whole table; there is no online in-place conversion.
//! The schema builder consumes this type, so a range-class field simply
//! cannot be given a hash column.

/// How a protected field is allowed to be queried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStrategy {
    /// The field is only ever queried by exact match (identity numbers,
    /// payment-card numbers). Strategy: encrypt + salted-hash index.
    EqualityOnly,

    /// The field participates in range, sort, or aggregate queries.
    /// Application-level field encryption is rejected for these;
    /// alternatives are datastore-level transparent encryption,
    /// order-preserving encryption (explicitly weaker), bucketed range
    /// approximation, or a separately access-controlled reporting copy.
    RangeSortAggregate,
}

impl QueryStrategy {
    /// Whether the schema may promise a hash index for this field.
    #[must_use]
    pub const fn hash_indexable(self) -> bool {
        matches!(self, Self::EqualityOnly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_only_is_indexable() {
        assert!(QueryStrategy::EqualityOnly.hash_indexable());
    }

    #[test]
    fn test_range_class_is_not_indexable() {
        assert!(!QueryStrategy::RangeSortAggregate.hash_indexable());
    }
}
