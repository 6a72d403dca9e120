use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use tracing::info;

use notary_core::{
    IdentityResolver, ProvenanceAgent, RecordStore, VerifyRequest, document_fingerprint,
    normalize,
};
use notary_db::Database;
use notary_ledger::{LedgerReader, RpcLedger};
use notary_types::NewDocument;

const USAGE: &str = "\
notary: registry and ledger verification of anchored documents

Usage:
  notary verify <identifier>                    fingerprint or transaction id
  notary verify-content <path> [title]          rescanned text content
  notary provenance <product-id>                fingerprint, txn id, or token id
  notary register <path> <title> [category] [txn-hash]
  notary stats

Environment:
  NOTARY_DB_PATH           record store path (default: notary.db)
  NOTARY_RPC_URL           ledger JSON-RPC endpoint (default: http://127.0.0.1:8545)
  NOTARY_RPC_TIMEOUT_SECS  per-request timeout (default: 30)
  NOTARY_ISSUER_ADDRESS    issuer recorded by `register` (optional)
";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notary=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        eprint!("{USAGE}");
        std::process::exit(2);
    };

    // Config
    let db_path = std::env::var("NOTARY_DB_PATH").unwrap_or_else(|_| "notary.db".into());
    let rpc_url =
        std::env::var("NOTARY_RPC_URL").unwrap_or_else(|_| "http://127.0.0.1:8545".into());
    let timeout_secs: u64 = std::env::var("NOTARY_RPC_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(30);

    let db = Arc::new(Database::open(&PathBuf::from(&db_path))?);
    let ledger: Arc<dyn LedgerReader> =
        Arc::new(RpcLedger::new(rpc_url, Duration::from_secs(timeout_secs))?);
    let store: Arc<dyn RecordStore> = db.clone();

    match command.as_str() {
        "verify" => {
            let identifier = args.get(1).context("usage: notary verify <identifier>")?;
            let resolver = IdentityResolver::new(store, ledger);
            let outcome = resolver
                .resolve(&VerifyRequest::Identifier(identifier.clone()))
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        "verify-content" => {
            let path = args
                .get(1)
                .context("usage: notary verify-content <path> [title]")?;
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {path}"))?;
            let title = args
                .get(2)
                .cloned()
                .unwrap_or_else(|| "Untitled Document".into());
            let resolver = IdentityResolver::new(store, ledger);
            let outcome = resolver
                .resolve(&VerifyRequest::Content { content, title })
                .await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        "provenance" => {
            let product_id = args
                .get(1)
                .context("usage: notary provenance <product-id>")?;
            let agent = ProvenanceAgent::new(store, ledger);
            let report = agent.analyze(product_id).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        "register" => {
            let path = args
                .get(1)
                .context("usage: notary register <path> <title> [category] [txn-hash]")?;
            let title = args
                .get(2)
                .context("usage: notary register <path> <title> [category] [txn-hash]")?;
            let category = args
                .get(3)
                .cloned()
                .unwrap_or_else(|| "General Document".into());
            let txn_hash = args.get(4).cloned();

            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading {path}"))?;
            let document_hash = document_fingerprint(&content, title, &category);
            let id = db.insert_document(&NewDocument {
                title: title.clone(),
                category,
                document_hash: document_hash.clone(),
                txn_hash,
                token_id: 0,
                contract_address: None,
                issuer_address: std::env::var("NOTARY_ISSUER_ADDRESS").ok(),
                content: normalize(&content),
            })?;
            info!(id, "document registered");
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "id": id,
                    "document_hash": document_hash,
                }))?
            );
        }
        "stats" => {
            let stats = db.statistics()?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        other => {
            eprint!("{USAGE}");
            bail!("unknown command: {other}");
        }
    }

    Ok(())
}
