//! Notary Attest
//!
//! Encodes a fixed three-field record (subject identifier, attestation
//! count, portfolio holding) per the registered on-chain schema and
//! submits it as a revocable, non-expiring attestation. Field order and
//! widths are the wire contract; range violations are caught strictly
//! before any ledger call.
//!
//! Issuance is at-least-once from the caller's perspective: a crash after
//! broadcast but before confirmation leaves an ambiguous record, and the
//! issuer neither retries nonce conflicts nor persists an idempotency key.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// ABI schema codec
pub mod schema;

/// Attestation records and identifiers
pub mod record;

/// Ledger seam and in-memory ledger
pub mod ledger;

/// The attestation issuer
pub mod issuer;

pub use issuer::AttestationIssuer;
pub use ledger::{AttestationLedger, MemoryLedger};
pub use record::{AttestationRecord, AttestationUid, IssuedAttestation, SchemaUid};
pub use schema::{decode_record, encode_record, RecordFields, SCHEMA_DECLARATION};

/// Attestation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttestError {
    /// A field violated the declared schema range or layout. Raised before
    /// submission, never discovered as a ledger revert.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The ledger rejected or failed the transaction. Nonce conflicts are
    /// surfaced, not retried.
    #[error("Submission failed: {0}")]
    Submission(String),
}

/// Result alias for attestation operations.
pub type Result<T> = std::result::Result<T, AttestError>;
