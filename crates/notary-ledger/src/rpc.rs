//! JSON-RPC implementation of [`LedgerReader`].
//!
//! Every call is one bounded HTTP round trip; timeouts surface as
//! [`LedgerError::Http`] and are never retried here.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::debug;

use crate::encoding::{
    parse_quantity, quantity, strip_hex_prefix, topic_address, u64_topic, with_hex_prefix,
};
use crate::{BlockInfo, LedgerError, LedgerReader, TransferEvent, TxnData, TxnReceipt};

/// keccak256 of `Transfer(address,address,uint256)`, the ERC-721 transfer
/// event signature topic.
const TRANSFER_TOPIC: &str =
    "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef";

pub struct RpcLedger {
    client: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl RpcLedger {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<Option<T>, LedgerError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({ "jsonrpc": "2.0", "id": id, "method": method, "params": params });
        debug!(method, "ledger rpc call");

        let response: RpcResponse<T> = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(err) = response.error {
            return Err(LedgerError::Rpc {
                code: err.code,
                message: err.message,
            });
        }
        Ok(response.result)
    }
}

#[async_trait]
impl LedgerReader for RpcLedger {
    async fn transaction(&self, txn: &str) -> Result<Option<TxnData>, LedgerError> {
        let raw: Option<RawTxn> = self
            .call("eth_getTransactionByHash", json!([with_hex_prefix(txn)]))
            .await?;
        Ok(raw.map(|t| TxnData {
            input: strip_hex_prefix(&t.input),
            from: strip_hex_prefix(&t.from),
        }))
    }

    async fn receipt(&self, txn: &str) -> Result<Option<TxnReceipt>, LedgerError> {
        let raw: Option<RawReceipt> = self
            .call("eth_getTransactionReceipt", json!([with_hex_prefix(txn)]))
            .await?;
        raw.map(|r| {
            // Receipts from before status reporting have no field at all;
            // only an explicit zero marks a failed execution.
            let ok = match r.status.as_deref() {
                Some(status) => parse_quantity(status)? == 1,
                None => true,
            };
            Ok(TxnReceipt {
                ok,
                block_number: parse_quantity(&r.block_number)?,
            })
        })
        .transpose()
    }

    async fn block(&self, number: u64) -> Result<Option<BlockInfo>, LedgerError> {
        let raw: Option<RawBlock> = self
            .call("eth_getBlockByNumber", json!([quantity(number), false]))
            .await?;
        raw.map(|b| {
            Ok(BlockInfo {
                timestamp: parse_quantity(&b.timestamp)?,
            })
        })
        .transpose()
    }

    async fn transfer_events(
        &self,
        contract: &str,
        token_id: u64,
        from_block: u64,
    ) -> Result<Vec<TransferEvent>, LedgerError> {
        let filter = json!([{
            "address": with_hex_prefix(contract),
            "fromBlock": quantity(from_block),
            "toBlock": "latest",
            "topics": [TRANSFER_TOPIC, Value::Null, Value::Null, u64_topic(token_id)],
        }]);
        let logs: Vec<RawLog> = self.call("eth_getLogs", filter).await?.unwrap_or_default();

        logs.into_iter()
            .map(|log| {
                if log.topics.len() < 4 {
                    return Err(LedgerError::Malformed(format!(
                        "transfer log with {} topics",
                        log.topics.len()
                    )));
                }
                Ok(TransferEvent {
                    from: topic_address(&log.topics[1])?,
                    to: topic_address(&log.topics[2])?,
                    block_number: parse_quantity(&log.block_number)?,
                    txn_hash: strip_hex_prefix(&log.transaction_hash),
                })
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    result: Option<T>,
    error: Option<RpcErrorBody>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawTxn {
    input: String,
    from: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReceipt {
    status: Option<String>,
    block_number: String,
}

#[derive(Debug, Deserialize)]
struct RawBlock {
    timestamp: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLog {
    topics: Vec<String>,
    block_number: String,
    transaction_hash: String,
}
