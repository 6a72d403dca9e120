//! Unified verification engine.
//!
//! Phase 1 identifies a stored record: by identifier (fingerprint or
//! transaction id, one two-field scan), or by rescanned content (exact
//! fingerprint first, fuzzy title second). Phase 2 falls back to direct
//! ledger inspection for identifiers never registered locally. Phase 3
//! proves the resolved record's anchor on-ledger.
//!
//! `not_found` and `failed` are normal outcomes; only invalid input and
//! store faults abort the request.

use std::sync::Arc;

use anyhow::Error as StoreError;
use notary_ledger::encoding::strip_hex_prefix;
use notary_ledger::LedgerReader;
use notary_types::{DocumentRecord, VerificationOutcome, VerifyStatus};
use thiserror::Error;
use tracing::{debug, info};

use crate::anchor::{find_embedded_fingerprint, AnchorCheck, ChainAnchorVerifier};
use crate::fingerprint::content_fingerprint;
use crate::normalize::fuzzy_match;
use crate::store::RecordStore;

/// Minimum identifier length at which the direct-ledger fallback treats it
/// as a plausible transaction id.
pub(crate) const PLAUSIBLE_TXN_LEN: usize = 60;

#[derive(Debug, Error)]
pub enum ResolveError {
    /// Caller contract violation: neither an identifier nor content.
    #[error("provide a document identifier or scanned content")]
    InvalidInput,
    /// Unexpected internal fault in the record store.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the caller brings to a verification: an identifier (fingerprint or
/// transaction id, prefix optional), or freshly rescanned content with a
/// display title.
#[derive(Debug, Clone)]
pub enum VerifyRequest {
    Identifier(String),
    Content { content: String, title: String },
}

pub struct IdentityResolver {
    store: Arc<dyn RecordStore>,
    ledger: Arc<dyn LedgerReader>,
    verifier: ChainAnchorVerifier,
}

impl IdentityResolver {
    pub fn new(store: Arc<dyn RecordStore>, ledger: Arc<dyn LedgerReader>) -> Self {
        let verifier = ChainAnchorVerifier::new(ledger.clone());
        Self {
            store,
            ledger,
            verifier,
        }
    }

    /// Deterministic for a fixed record set and ledger state: same request,
    /// same outcome.
    pub async fn resolve(&self, request: &VerifyRequest) -> Result<VerificationOutcome, ResolveError> {
        match request {
            VerifyRequest::Identifier(raw) => self.resolve_identifier(raw).await,
            VerifyRequest::Content { content, title } => self.resolve_content(content, title).await,
        }
    }

    async fn resolve_identifier(&self, raw: &str) -> Result<VerificationOutcome, ResolveError> {
        let id = strip_hex_prefix(raw);
        if id.is_empty() {
            return Err(ResolveError::InvalidInput);
        }
        debug!(identifier = %id, "searching registry by identifier");

        // One scan matches both fields: the identifier may be a document
        // fingerprint or an anchoring transaction id.
        let record = self.store.all_ordered()?.into_iter().find(|r| {
            r.document_hash == id
                || r.txn_hash
                    .as_deref()
                    .is_some_and(|txn| strip_hex_prefix(txn) == id)
        });

        match record {
            Some(record) => {
                info!(title = %record.title, "identity found by identifier");
                Ok(self.prove(record).await)
            }
            None => self.ledger_fallback(&id).await,
        }
    }

    async fn resolve_content(&self, content: &str, title: &str) -> Result<VerificationOutcome, ResolveError> {
        if content.trim().is_empty() && title.trim().is_empty() {
            return Err(ResolveError::InvalidInput);
        }

        let scanned = content_fingerprint(content);
        debug!(fingerprint = %scanned, "scanned content fingerprint");
        let records = self.store.all_ordered()?;

        let record = records
            .iter()
            .find(|r| r.document_hash == scanned)
            .or_else(|| {
                // Alignment fallback for OCR noise: permissive title
                // containment, first match wins in insertion order.
                records.iter().find(|r| fuzzy_match(&r.title, title))
            })
            .cloned();

        match record {
            Some(record) => {
                info!(title = %record.title, "identity found by content");
                Ok(self.prove(record).await)
            }
            None => Ok(not_found()),
        }
    }

    /// Phase 2: the identifier matched nothing locally, but may still be a
    /// transaction anchored by a third party never registered here.
    async fn ledger_fallback(&self, id: &str) -> Result<VerificationOutcome, ResolveError> {
        if id.len() >= PLAUSIBLE_TXN_LEN {
            debug!(txn = %id, "registry miss, probing ledger directly");
            match self.ledger.transaction(id).await {
                Ok(Some(txn)) => {
                    if let Some(candidate) = find_embedded_fingerprint(&txn.input) {
                        info!(fingerprint = %candidate, "found embedded fingerprint in external transaction");
                        let check = self.verifier.verify(id, &candidate).await;
                        let chain_status = check.message();
                        let status = if check.verified() {
                            VerifyStatus::Verified
                        } else {
                            VerifyStatus::Failed
                        };
                        return Ok(VerificationOutcome {
                            status,
                            message: format!("Global chain match: {chain_status}"),
                            record: Some(external_record(id, candidate, txn.from)),
                            chain_status,
                        });
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    // A dead node is not the same thing as "never issued".
                    let chain_status = format!("Protocol error: {err}");
                    return Ok(VerificationOutcome {
                        status: VerifyStatus::Failed,
                        message: format!("Ledger probe failed: {chain_status}"),
                        record: None,
                        chain_status,
                    });
                }
            }
        }
        Ok(not_found())
    }

    /// Phase 3: prove the resolved record's anchor.
    async fn prove(&self, record: DocumentRecord) -> VerificationOutcome {
        let Some(txn) = record.txn_hash.clone() else {
            let chain_status = String::from("No anchoring transaction recorded.");
            return VerificationOutcome {
                status: VerifyStatus::Failed,
                message: format!("Document verification: {chain_status}"),
                record: Some(record),
                chain_status,
            };
        };

        let check = self.verifier.verify(&txn, &record.document_hash).await;
        let chain_status = check.message();
        let status = match check {
            AnchorCheck::Confirmed => VerifyStatus::Verified,
            _ => VerifyStatus::Failed,
        };
        VerificationOutcome {
            status,
            message: format!("Document verification: {chain_status}"),
            record: Some(record),
            chain_status,
        }
    }
}

fn not_found() -> VerificationOutcome {
    VerificationOutcome {
        status: VerifyStatus::NotFound,
        message: "No matching record found in the registry or on-ledger.".into(),
        record: None,
        chain_status: "Search exhausted.".into(),
    }
}

/// Synthetic record for a transaction anchored outside the local registry.
fn external_record(txn: &str, fingerprint: String, issuer: String) -> DocumentRecord {
    DocumentRecord {
        id: 0,
        title: "Verified Protocol Record".into(),
        category: "External Anchor".into(),
        document_hash: fingerprint,
        txn_hash: Some(txn.to_string()),
        token_id: 0,
        contract_address: None,
        issuer_address: Some(issuer),
        content: String::new(),
        timestamp: String::new(),
    }
}
