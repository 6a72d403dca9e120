//! Read-only ledger access.
//!
//! The verification core never constructs, signs, or submits transactions;
//! it consumes already-finalized ledger facts through the [`LedgerReader`]
//! trait. [`RpcLedger`] is the JSON-RPC implementation; tests inject
//! in-memory fakes.
//!
//! Hash and address values cross this boundary as lowercase hex strings
//! without a `0x` prefix. The prefix is added when building RPC params and
//! stripped from every response value, nowhere else.

pub mod encoding;
pub mod rpc;

use async_trait::async_trait;
use thiserror::Error;

pub use rpc::RpcLedger;

/// Raw transaction fields the verification core consumes.
#[derive(Debug, Clone)]
pub struct TxnData {
    /// Call payload as lowercase hex, no prefix. Empty for plain transfers.
    pub input: String,
    /// Sender address, lowercase hex, no prefix.
    pub from: String,
}

#[derive(Debug, Clone, Copy)]
pub struct TxnReceipt {
    /// Execution success. Receipts that predate status reporting count as ok.
    pub ok: bool,
    pub block_number: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct BlockInfo {
    /// Unix seconds.
    pub timestamp: u64,
}

/// One token transfer event, in ledger log order.
#[derive(Debug, Clone)]
pub struct TransferEvent {
    pub from: String,
    pub to: String,
    pub block_number: u64,
    pub txn_hash: String,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Transport failure, including bounded-timeout expiry.
    #[error("ledger request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ledger rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
    #[error("malformed ledger response: {0}")]
    Malformed(String),
}

/// Injected ledger-reader capability.
///
/// Absent objects are `Ok(None)`, never errors; errors mean the read itself
/// failed and are never retried at this layer.
#[async_trait]
pub trait LedgerReader: Send + Sync {
    async fn transaction(&self, txn: &str) -> Result<Option<TxnData>, LedgerError>;

    async fn receipt(&self, txn: &str) -> Result<Option<TxnReceipt>, LedgerError>;

    async fn block(&self, number: u64) -> Result<Option<BlockInfo>, LedgerError>;

    /// Transfer events for one token of `contract`, from `from_block` to the
    /// chain head, ordered by block height then log index.
    async fn transfer_events(
        &self,
        contract: &str,
        token_id: u64,
        from_block: u64,
    ) -> Result<Vec<TransferEvent>, LedgerError>;
}
