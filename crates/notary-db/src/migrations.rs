use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Record store: running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE documents (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                title            TEXT NOT NULL,
                category         TEXT NOT NULL DEFAULT 'General Document',
                document_hash    TEXT NOT NULL,
                txn_hash         TEXT,
                token_id         INTEGER NOT NULL DEFAULT 0,
                contract_address TEXT,
                issuer_address   TEXT,
                content          TEXT NOT NULL DEFAULT '',
                timestamp        TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_documents_hash ON documents(document_hash);
            CREATE INDEX idx_documents_txn ON documents(txn_hash);
            CREATE INDEX idx_documents_token ON documents(token_id);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
