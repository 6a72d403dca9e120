pub mod models;
pub mod report;

pub use models::{DocumentRecord, NewDocument, StoreStatistics, VerificationOutcome, VerifyStatus};
pub use report::{AuthenticityStatus, ProvenanceReport, ReportMetadata, TimelineEvent};
