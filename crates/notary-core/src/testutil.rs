//! In-memory fakes shared by the core test modules.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use notary_ledger::{
    BlockInfo, LedgerError, LedgerReader, TransferEvent, TxnData, TxnReceipt,
};
use notary_types::DocumentRecord;

use crate::store::RecordStore;

#[derive(Default)]
pub struct MemoryLedger {
    pub txns: HashMap<String, TxnData>,
    pub receipts: HashMap<String, TxnReceipt>,
    pub blocks: HashMap<u64, BlockInfo>,
    pub transfers: Vec<TransferEvent>,
    /// Every read fails, as if the node were unreachable.
    pub fail: bool,
    /// Only the transfer-event read fails.
    pub fail_transfers: bool,
}

impl MemoryLedger {
    fn check(&self) -> Result<(), LedgerError> {
        if self.fail {
            Err(LedgerError::Malformed("ledger offline".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn transaction(&self, txn: &str) -> Result<Option<TxnData>, LedgerError> {
        self.check()?;
        Ok(self.txns.get(txn).cloned())
    }

    async fn receipt(&self, txn: &str) -> Result<Option<TxnReceipt>, LedgerError> {
        self.check()?;
        Ok(self.receipts.get(txn).copied())
    }

    async fn block(&self, number: u64) -> Result<Option<BlockInfo>, LedgerError> {
        self.check()?;
        Ok(self.blocks.get(&number).copied())
    }

    async fn transfer_events(
        &self,
        _contract: &str,
        _token_id: u64,
        _from_block: u64,
    ) -> Result<Vec<TransferEvent>, LedgerError> {
        self.check()?;
        if self.fail_transfers {
            return Err(LedgerError::Malformed("log query rejected".into()));
        }
        Ok(self.transfers.clone())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub records: Vec<DocumentRecord>,
}

impl MemoryStore {
    pub fn with(records: Vec<DocumentRecord>) -> Self {
        Self { records }
    }
}

impl RecordStore for MemoryStore {
    fn by_fingerprint(&self, hash: &str) -> Result<Option<DocumentRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.document_hash == hash)
            .cloned())
    }

    fn by_txn(&self, txn: &str) -> Result<Option<DocumentRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.txn_hash.as_deref() == Some(txn))
            .cloned())
    }

    fn by_token(&self, token_id: i64) -> Result<Option<DocumentRecord>> {
        Ok(self
            .records
            .iter()
            .find(|r| r.token_id == token_id)
            .cloned())
    }

    fn all_ordered(&self) -> Result<Vec<DocumentRecord>> {
        Ok(self.records.clone())
    }
}

pub fn record(id: i64, title: &str, hash: &str, txn: Option<&str>) -> DocumentRecord {
    DocumentRecord {
        id,
        title: title.into(),
        category: "General Document".into(),
        document_hash: hash.into(),
        txn_hash: txn.map(Into::into),
        token_id: 0,
        contract_address: None,
        issuer_address: Some("8883bffa42a7f5b509d0929c6ffa041e46e18e2f".into()),
        content: String::new(),
        timestamp: "2024-03-01 12:00:00".into(),
    }
}
