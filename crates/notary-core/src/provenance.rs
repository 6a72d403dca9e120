//! Provenance reconstruction and anomaly scoring.
//!
//! Operates after resolution, on the same read-only registry and ledger:
//! rebuilds a registration/ownership timeline for one record and condenses
//! it into a confidence-scored authenticity verdict.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use notary_ledger::encoding::strip_hex_prefix;
use notary_ledger::{LedgerError, LedgerReader};
use notary_types::{
    AuthenticityStatus, DocumentRecord, ProvenanceReport, ReportMetadata, TimelineEvent,
};
use tracing::{info, warn};

use crate::anchor::{FINGERPRINT_HEX_LEN, ZERO_ADDRESS};
use crate::resolver::{ResolveError, PLAUSIBLE_TXN_LEN};
use crate::store::RecordStore;

pub struct ProvenanceAgent {
    store: Arc<dyn RecordStore>,
    ledger: Arc<dyn LedgerReader>,
}

impl ProvenanceAgent {
    pub fn new(store: Arc<dyn RecordStore>, ledger: Arc<dyn LedgerReader>) -> Self {
        Self { store, ledger }
    }

    /// Identify `product_id` (fingerprint, then transaction id, then token
    /// id), reconstruct its lifecycle, and score it.
    pub async fn analyze(&self, product_id: &str) -> Result<ProvenanceReport, ResolveError> {
        let id = strip_hex_prefix(product_id);
        let Some(record) = self.lookup(&id)? else {
            return Ok(self.unregistered_report(&id).await);
        };
        info!(title = %record.title, "reconstructing provenance");

        let mut integrity: i64 = 100;
        let mut confidence: i64 = 100;
        let mut risk_flags: Vec<String> = Vec::new();

        let mut timeline = vec![TimelineEvent {
            event: "Genesis Registration".into(),
            actor: record
                .issuer_address
                .clone()
                .unwrap_or_else(|| "system registry".into()),
            timestamp: record.timestamp.clone(),
            status: "verified on-ledger".into(),
            proof: record.txn_hash.clone(),
        }];

        if let Some(contract) = transferable_contract(&record) {
            match self.trace_transfers(&contract, record.token_id as u64).await {
                Ok(events) => timeline.extend(events),
                Err(err) => {
                    warn!(error = %err, "transfer trace failed");
                    risk_flags.push("Transfer history unavailable: ledger read failed.".into());
                }
            }
        }

        // Anomaly rules are cumulative and independent; scores have no
        // floor, so stacked deductions may go negative.
        if record.txn_hash.is_none() {
            risk_flags.push("Genesis transaction proof missing.".into());
            integrity -= 30;
            confidence -= 20;
        }
        if record.document_hash.len() < FINGERPRINT_HEX_LEN {
            risk_flags.push("Fingerprint density below security threshold.".into());
            integrity -= 10;
            confidence -= 10;
        }

        let authenticity_status = if confidence > 80 {
            AuthenticityStatus::Authentic
        } else {
            AuthenticityStatus::Suspicious
        };

        Ok(ProvenanceReport {
            metadata: Some(ReportMetadata {
                title: record.title,
                category: record.category,
                fingerprint: record.document_hash,
                generated_at: Utc::now().to_rfc3339(),
            }),
            authenticity_status,
            ownership_timeline: timeline,
            integrity_score: integrity,
            risk_flags,
            confidence_score: confidence,
        })
    }

    fn lookup(&self, id: &str) -> Result<Option<DocumentRecord>, ResolveError> {
        if let Some(record) = self.store.by_fingerprint(id)? {
            return Ok(Some(record));
        }
        if let Some(record) = self.store.by_txn(id)? {
            return Ok(Some(record));
        }
        if let Ok(token_id) = id.parse::<i64>() {
            if token_id > 0 {
                if let Some(record) = self.store.by_token(token_id)? {
                    return Ok(Some(record));
                }
            }
        }
        Ok(None)
    }

    /// One "Ownership Transfer" entry per non-mint transfer event, in
    /// ledger log order, each timestamped from its block and backed by the
    /// event's transaction id.
    async fn trace_transfers(
        &self,
        contract: &str,
        token_id: u64,
    ) -> Result<Vec<TimelineEvent>, LedgerError> {
        let events = self.ledger.transfer_events(contract, token_id, 0).await?;
        let mut entries = Vec::new();
        for event in events {
            if event.from == ZERO_ADDRESS {
                // The mint is already covered by the genesis entry.
                continue;
            }
            let timestamp = match self.ledger.block(event.block_number).await? {
                Some(block) => format_block_time(block.timestamp),
                None => "unknown".into(),
            };
            entries.push(TimelineEvent {
                event: "Ownership Transfer".into(),
                actor: event.to,
                timestamp,
                status: "verified".into(),
                proof: Some(event.txn_hash),
            });
        }
        Ok(entries)
    }

    /// No registry entry. One direct ledger probe decides between a
    /// counterfeit verdict and an unregistered-but-real transaction.
    async fn unregistered_report(&self, id: &str) -> ProvenanceReport {
        let mut on_ledger = false;
        if id.len() >= PLAUSIBLE_TXN_LEN {
            match self.ledger.transaction(id).await {
                Ok(Some(_)) => on_ledger = true,
                Ok(None) => {}
                Err(err) => warn!(error = %err, "ledger probe failed during provenance lookup"),
            }
        }

        if on_ledger {
            ProvenanceReport {
                metadata: None,
                authenticity_status: AuthenticityStatus::Unknown,
                ownership_timeline: Vec::new(),
                integrity_score: 0,
                risk_flags: vec![
                    "No registry entry found for this product id.".into(),
                    "Transaction exists on-ledger but is not indexed in the registry.".into(),
                ],
                confidence_score: 15,
            }
        } else {
            ProvenanceReport {
                metadata: None,
                authenticity_status: AuthenticityStatus::Counterfeit,
                ownership_timeline: Vec::new(),
                integrity_score: 0,
                risk_flags: vec!["Product id not found in the registry.".into()],
                confidence_score: 0,
            }
        }
    }
}

/// Contract address when the record references a transferable token;
/// the zero address is a no-contract sentinel.
fn transferable_contract(record: &DocumentRecord) -> Option<String> {
    if record.token_id <= 0 {
        return None;
    }
    record
        .contract_address
        .as_deref()
        .map(strip_hex_prefix)
        .filter(|addr| !addr.is_empty() && addr != ZERO_ADDRESS)
}

fn format_block_time(unix_secs: u64) -> String {
    match DateTime::<Utc>::from_timestamp(unix_secs as i64, 0) {
        Some(time) => time.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "unknown".into(),
    }
}
