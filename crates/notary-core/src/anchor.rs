//! Chain anchor verification: is a fingerprint embedded in a transaction's
//! payload?

use std::sync::Arc;

use notary_ledger::encoding::strip_hex_prefix;
use notary_ledger::LedgerReader;
use tracing::debug;

/// Length of a rendered fingerprint: 32 bytes as hex.
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Zero-address sentinel (no prefix form). Used both as the legacy anchor
/// recipient and as the mint source in transfer logs.
pub const ZERO_ADDRESS: &str = "0000000000000000000000000000000000000000";

/// Outcome of one anchor check. Protocol errors are their own variant so a
/// dead node is never mistaken for a missing anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorCheck {
    Confirmed,
    /// No receipt for this transaction id.
    TxnNotFound,
    /// Receipt present but execution failed.
    TxnFailed,
    /// Payload present but the expected hash is not in it.
    HashAbsent,
    /// Ledger read failed or timed out. Carries the error text verbatim;
    /// never retried here.
    ProtocolError(String),
}

impl AnchorCheck {
    pub fn verified(&self) -> bool {
        matches!(self, AnchorCheck::Confirmed)
    }

    pub fn message(&self) -> String {
        match self {
            AnchorCheck::Confirmed => "Identity confirmed on-ledger (verified).".into(),
            AnchorCheck::TxnNotFound => "Transaction not found on-ledger.".into(),
            AnchorCheck::TxnFailed => "Transaction failed on-ledger.".into(),
            AnchorCheck::HashAbsent => "Hash not found in this transaction's payload.".into(),
            AnchorCheck::ProtocolError(err) => format!("Protocol error: {err}"),
        }
    }
}

pub struct ChainAnchorVerifier {
    ledger: Arc<dyn LedgerReader>,
}

impl ChainAnchorVerifier {
    pub fn new(ledger: Arc<dyn LedgerReader>) -> Self {
        Self { ledger }
    }

    /// Confirm that `expected_hash` is embedded in the payload of `txn_id`.
    ///
    /// The check is a plain substring test over the normalized payload hex,
    /// which deliberately matches both anchor schemes: a legacy transaction
    /// whose entire payload *is* the hash, and a contract call whose
    /// ABI-encoded arguments *contain* it zero-padded.
    pub async fn verify(&self, txn_id: &str, expected_hash: &str) -> AnchorCheck {
        let receipt = match self.ledger.receipt(txn_id).await {
            Ok(Some(receipt)) => receipt,
            Ok(None) => return AnchorCheck::TxnNotFound,
            Err(err) => return AnchorCheck::ProtocolError(err.to_string()),
        };
        if !receipt.ok {
            return AnchorCheck::TxnFailed;
        }

        let txn = match self.ledger.transaction(txn_id).await {
            Ok(Some(txn)) => txn,
            Ok(None) => return AnchorCheck::TxnNotFound,
            Err(err) => return AnchorCheck::ProtocolError(err.to_string()),
        };

        let payload = strip_hex_prefix(&txn.input);
        let expected = strip_hex_prefix(expected_hash);
        debug!(payload_len = payload.len(), "checking anchor payload");

        if !expected.is_empty() && payload.contains(&expected) {
            AnchorCheck::Confirmed
        } else {
            AnchorCheck::HashAbsent
        }
    }
}

/// First run of 64 consecutive hex digits in a payload, treated as a
/// candidate embedded fingerprint. Input is expected in normalized
/// (lowercase, prefix-less) form.
pub fn find_embedded_fingerprint(payload_hex: &str) -> Option<String> {
    let bytes = payload_hex.as_bytes();
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if matches!(b, b'0'..=b'9' | b'a'..=b'f') {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            if run_len == FINGERPRINT_HEX_LEN {
                return Some(payload_hex[run_start..run_start + FINGERPRINT_HEX_LEN].to_string());
            }
        } else {
            run_len = 0;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemoryLedger;
    use notary_ledger::{TxnData, TxnReceipt};

    const HASH: &str = "9b506f0318f13ba0f51b6e9ea60150d90415ad3b66b556f9c318c0eec55c0719";
    const TXN: &str = "aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11aa11";

    fn verifier_with(input: &str, ok: bool) -> ChainAnchorVerifier {
        let mut ledger = MemoryLedger::default();
        ledger.receipts.insert(TXN.into(), TxnReceipt { ok, block_number: 7 });
        ledger.txns.insert(
            TXN.into(),
            TxnData {
                input: input.into(),
                from: "8883bffa42a7f5b509d0929c6ffa041e46e18e2f".into(),
            },
        );
        ChainAnchorVerifier::new(Arc::new(ledger))
    }

    #[tokio::test]
    async fn legacy_anchor_payload_is_exactly_the_hash() {
        let verifier = verifier_with(HASH, true);
        assert_eq!(verifier.verify(TXN, HASH).await, AnchorCheck::Confirmed);
    }

    #[tokio::test]
    async fn contract_call_payload_contains_padded_hash() {
        let padded = format!("a9059cbb{}{}", "0".repeat(64), HASH);
        let verifier = verifier_with(&padded, true);
        assert_eq!(verifier.verify(TXN, HASH).await, AnchorCheck::Confirmed);
        // Prefix and case on the expected side do not matter.
        let prefixed = format!("0x{}", HASH.to_uppercase());
        assert_eq!(verifier.verify(TXN, &prefixed).await, AnchorCheck::Confirmed);
    }

    #[tokio::test]
    async fn one_differing_digit_fails() {
        let mut altered = String::from(HASH);
        altered.replace_range(0..1, "a");
        let verifier = verifier_with(&altered, true);
        assert_eq!(verifier.verify(TXN, HASH).await, AnchorCheck::HashAbsent);
    }

    #[tokio::test]
    async fn missing_receipt_is_not_found() {
        let verifier = ChainAnchorVerifier::new(Arc::new(MemoryLedger::default()));
        assert_eq!(verifier.verify(TXN, HASH).await, AnchorCheck::TxnNotFound);
    }

    #[tokio::test]
    async fn failed_execution_is_distinct_from_hash_mismatch() {
        let verifier = verifier_with(HASH, false);
        assert_eq!(verifier.verify(TXN, HASH).await, AnchorCheck::TxnFailed);
    }

    #[tokio::test]
    async fn ledger_failure_is_a_protocol_error_not_not_found() {
        let ledger = MemoryLedger {
            fail: true,
            ..MemoryLedger::default()
        };
        let verifier = ChainAnchorVerifier::new(Arc::new(ledger));
        let check = verifier.verify(TXN, HASH).await;
        assert!(matches!(check, AnchorCheck::ProtocolError(_)));
        assert!(check.message().starts_with("Protocol error:"));
    }

    #[test]
    fn embedded_fingerprint_scan() {
        assert_eq!(find_embedded_fingerprint(HASH).as_deref(), Some(HASH));
        let padded = format!("deadbeef{}{}ffff", "z", HASH);
        assert_eq!(find_embedded_fingerprint(&padded).as_deref(), Some(HASH));
        assert_eq!(find_embedded_fingerprint("abc123"), None);
        // A 63-digit run broken by a non-hex byte never qualifies.
        let broken = format!("{}g{}", &HASH[..63], &HASH[..63]);
        assert_eq!(find_embedded_fingerprint(&broken), None);
    }

    #[test]
    fn embedded_fingerprint_truncates_longer_runs() {
        let long_run = format!("{HASH}0042");
        assert_eq!(find_embedded_fingerprint(&long_run).as_deref(), Some(HASH));
    }
}
