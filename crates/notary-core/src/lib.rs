//! Verification core: fingerprinting, chain-anchor proof, identity
//! resolution, and provenance scoring over an injected ledger reader and a
//! read-only record store.

pub mod anchor;
pub mod fingerprint;
pub mod normalize;
pub mod provenance;
pub mod resolver;
pub mod store;

#[cfg(test)]
pub(crate) mod testutil;

pub use anchor::{AnchorCheck, ChainAnchorVerifier, find_embedded_fingerprint};
pub use fingerprint::{content_fingerprint, document_fingerprint, legacy_fingerprint};
pub use normalize::{fuzzy_match, normalize};
pub use provenance::ProvenanceAgent;
pub use resolver::{IdentityResolver, ResolveError, VerifyRequest};
pub use store::RecordStore;
