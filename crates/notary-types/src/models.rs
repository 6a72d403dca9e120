use serde::{Deserialize, Serialize};

/// One issued document. Rows are append-only: every trust-relevant field is
/// written once at issuance and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: i64,
    pub title: String,
    pub category: String,
    /// 64 lowercase hex chars, no `0x` prefix.
    pub document_hash: String,
    /// Anchoring transaction id. Absent for records issued before anchoring
    /// was mandatory.
    pub txn_hash: Option<String>,
    /// 0 when no token-issuing contract was involved.
    pub token_id: i64,
    pub contract_address: Option<String>,
    pub issuer_address: Option<String>,
    /// Normalized document content captured at issuance time.
    pub content: String,
    /// Set by the store at insert.
    pub timestamp: String,
}

/// Issuance-side insert payload. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub title: String,
    pub category: String,
    pub document_hash: String,
    pub txn_hash: Option<String>,
    pub token_id: i64,
    pub contract_address: Option<String>,
    pub issuer_address: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerifyStatus {
    Verified,
    Failed,
    NotFound,
}

/// Result of one verification request. `not_found` and `failed` are normal,
/// reportable outcomes; only invalid input surfaces as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationOutcome {
    pub status: VerifyStatus,
    pub message: String,
    pub record: Option<DocumentRecord>,
    /// Chain verifier message, verbatim.
    pub chain_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreStatistics {
    pub total_documents: i64,
    pub unique_titles: i64,
    pub unique_categories: i64,
    pub recent_documents: Vec<DocumentRecord>,
}
