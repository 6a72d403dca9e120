/// Database row types; these map directly to SQLite rows.
/// Distinct from the notary-types API models to keep the DB layer
/// independent.

use notary_types::DocumentRecord;

pub struct DocumentRow {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub document_hash: String,
    pub txn_hash: Option<String>,
    pub token_id: i64,
    pub contract_address: Option<String>,
    pub issuer_address: Option<String>,
    pub content: String,
    pub timestamp: String,
}

impl From<DocumentRow> for DocumentRecord {
    fn from(row: DocumentRow) -> Self {
        DocumentRecord {
            id: row.id,
            title: row.title,
            category: row.category,
            document_hash: row.document_hash,
            txn_hash: row.txn_hash,
            token_id: row.token_id,
            contract_address: row.contract_address,
            issuer_address: row.issuer_address,
            content: row.content,
            timestamp: row.timestamp,
        }
    }
}
