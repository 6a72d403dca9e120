use crate::models::DocumentRow;
use crate::Database;
use anyhow::Result;
use notary_core::RecordStore;
use notary_ledger::encoding::strip_hex_prefix;
use notary_types::{DocumentRecord, NewDocument, StoreStatistics};
use rusqlite::{Connection, OptionalExtension};

const COLUMNS: &str =
    "id, title, category, document_hash, txn_hash, token_id, contract_address, issuer_address, content, timestamp";

impl Database {
    // -- Issuance writes --

    /// Insert one issued document and return its assigned id. Hex fields
    /// are normalized to the internal convention (lowercase, no prefix);
    /// an empty transaction id is stored as NULL.
    pub fn insert_document(&self, doc: &NewDocument) -> Result<i64> {
        let txn_hash = doc
            .txn_hash
            .as_deref()
            .map(strip_hex_prefix)
            .filter(|t| !t.is_empty());
        let contract = doc
            .contract_address
            .as_deref()
            .map(strip_hex_prefix)
            .filter(|a| !a.is_empty());
        let issuer = doc
            .issuer_address
            .as_deref()
            .map(strip_hex_prefix)
            .filter(|a| !a.is_empty());

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO documents (title, category, document_hash, txn_hash, token_id, contract_address, issuer_address, content)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    doc.title,
                    doc.category,
                    strip_hex_prefix(&doc.document_hash),
                    txn_hash,
                    doc.token_id,
                    contract,
                    issuer,
                    doc.content,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    // -- Reads --

    pub fn document_by_fingerprint(&self, hash: &str) -> Result<Option<DocumentRecord>> {
        let hash = strip_hex_prefix(hash);
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {COLUMNS} FROM documents WHERE document_hash = ?1 ORDER BY id LIMIT 1"),
                [&hash],
            )
        })
    }

    pub fn document_by_txn(&self, txn: &str) -> Result<Option<DocumentRecord>> {
        let txn = strip_hex_prefix(txn);
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {COLUMNS} FROM documents WHERE txn_hash = ?1 ORDER BY id LIMIT 1"),
                [&txn],
            )
        })
    }

    pub fn document_by_token(&self, token_id: i64) -> Result<Option<DocumentRecord>> {
        self.with_conn(|conn| {
            query_one(
                conn,
                &format!("SELECT {COLUMNS} FROM documents WHERE token_id = ?1 ORDER BY id LIMIT 1"),
                [&token_id],
            )
        })
    }

    /// Full scan in insertion order.
    pub fn all_documents(&self) -> Result<Vec<DocumentRecord>> {
        self.with_conn(|conn| {
            query_many(
                conn,
                &format!("SELECT {COLUMNS} FROM documents ORDER BY id"),
                [],
            )
        })
    }

    pub fn search_by_title(&self, needle: &str) -> Result<Vec<DocumentRecord>> {
        self.with_conn(|conn| {
            query_many(
                conn,
                &format!(
                    "SELECT {COLUMNS} FROM documents WHERE title LIKE ?1 ORDER BY timestamp DESC, id DESC"
                ),
                [format!("%{needle}%")],
            )
        })
    }

    pub fn search_by_category(&self, needle: &str) -> Result<Vec<DocumentRecord>> {
        self.with_conn(|conn| {
            query_many(
                conn,
                &format!(
                    "SELECT {COLUMNS} FROM documents WHERE category LIKE ?1 ORDER BY timestamp DESC, id DESC"
                ),
                [format!("%{needle}%")],
            )
        })
    }

    pub fn recent(&self, limit: u32) -> Result<Vec<DocumentRecord>> {
        self.with_conn(|conn| {
            query_many(
                conn,
                &format!(
                    "SELECT {COLUMNS} FROM documents ORDER BY timestamp DESC, id DESC LIMIT ?1"
                ),
                [limit],
            )
        })
    }

    pub fn statistics(&self) -> Result<StoreStatistics> {
        let (total, titles, categories) = self.with_conn(|conn| {
            let total: i64 =
                conn.query_row("SELECT COUNT(*) FROM documents", [], |r| r.get(0))?;
            let titles: i64 = conn.query_row(
                "SELECT COUNT(DISTINCT title) FROM documents",
                [],
                |r| r.get(0),
            )?;
            let categories: i64 = conn.query_row(
                "SELECT COUNT(DISTINCT category) FROM documents",
                [],
                |r| r.get(0),
            )?;
            Ok((total, titles, categories))
        })?;

        Ok(StoreStatistics {
            total_documents: total,
            unique_titles: titles,
            unique_categories: categories,
            recent_documents: self.recent(5)?,
        })
    }
}

impl RecordStore for Database {
    fn by_fingerprint(&self, hash: &str) -> Result<Option<DocumentRecord>> {
        self.document_by_fingerprint(hash)
    }

    fn by_txn(&self, txn: &str) -> Result<Option<DocumentRecord>> {
        self.document_by_txn(txn)
    }

    fn by_token(&self, token_id: i64) -> Result<Option<DocumentRecord>> {
        self.document_by_token(token_id)
    }

    fn all_ordered(&self) -> Result<Vec<DocumentRecord>> {
        self.all_documents()
    }
}

fn map_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<DocumentRow> {
    Ok(DocumentRow {
        id: row.get(0)?,
        title: row.get(1)?,
        category: row.get(2)?,
        document_hash: row.get(3)?,
        txn_hash: row.get(4)?,
        token_id: row.get(5)?,
        contract_address: row.get(6)?,
        issuer_address: row.get(7)?,
        content: row.get(8)?,
        timestamp: row.get(9)?,
    })
}

fn query_one<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<DocumentRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let row = stmt.query_row(params, map_row).optional()?;
    Ok(row.map(Into::into))
}

fn query_many<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<DocumentRecord>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, map_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows.into_iter().map(Into::into).collect())
}
