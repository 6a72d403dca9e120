use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticityStatus {
    Authentic,
    Suspicious,
    Counterfeit,
    Unknown,
}

/// One reconstructed lifecycle event: the genesis registration or a
/// later ownership transfer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub event: String,
    pub actor: String,
    pub timestamp: String,
    pub status: String,
    /// Transaction id backing this event, when one exists.
    pub proof: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub title: String,
    pub category: String,
    pub fingerprint: String,
    /// RFC 3339, stamped when the report is built.
    pub generated_at: String,
}

/// Confidence-scored provenance verdict for one resolved record.
///
/// Scores have no floor: stacked deductions can drive them negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvenanceReport {
    pub metadata: Option<ReportMetadata>,
    pub authenticity_status: AuthenticityStatus,
    pub ownership_timeline: Vec<TimelineEvent>,
    pub integrity_score: i64,
    pub risk_flags: Vec<String>,
    pub confidence_score: i64,
}
