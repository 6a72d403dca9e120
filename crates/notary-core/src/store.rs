use anyhow::Result;
use notary_types::DocumentRecord;

/// Read-only view of the issued-document registry.
///
/// The verification core never writes: every trust-relevant fact is fixed
/// at issuance time. Keys follow the internal hex convention (lowercase,
/// no `0x` prefix).
pub trait RecordStore: Send + Sync {
    fn by_fingerprint(&self, hash: &str) -> Result<Option<DocumentRecord>>;

    /// Lookup by anchoring transaction id, prefix-insensitive.
    fn by_txn(&self, txn: &str) -> Result<Option<DocumentRecord>>;

    fn by_token(&self, token_id: i64) -> Result<Option<DocumentRecord>>;

    /// Every record in insertion order. Used for the two-field identifier
    /// scan and the fuzzy title fallback, which both need a stable,
    /// deterministic iteration order.
    fn all_ordered(&self) -> Result<Vec<DocumentRecord>>;
}
