//! Attestation records and identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Expiration sentinel: the attestation never expires.
pub const NO_EXPIRATION: u64 = 0;

/// Identifier of the registered schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaUid(String);

impl SchemaUid {
    /// Wrap a registered schema identifier.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SchemaUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ledger-assigned identifier of a submitted attestation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttestationUid(String);

impl AttestationUid {
    /// Wrap a ledger-issued identifier.
    pub fn new(uid: impl Into<String>) -> Self {
        Self(uid.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AttestationUid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully encoded attestation ready for submission.
///
/// Immutable after submission; the issuing key is the sole authority able
/// to create or revoke it. Deliberately carries only the numeric summary;
/// no digest or content id field (a noted schema gap, preserved).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttestationRecord {
    /// Registered schema this record conforms to.
    pub schema_uid: SchemaUid,
    /// Subject identifier (schema field `AgentId`).
    pub subject: String,
    /// Attestation count (schema field `NumberOfAttestations`).
    pub count: u8,
    /// Holding value (schema field `TotalPortfolioHolding`).
    pub holding: u64,
    /// Recipient address of the attestation.
    pub recipient: String,
    /// Whether the issuer may later revoke.
    pub revocable: bool,
    /// Expiration policy; [`NO_EXPIRATION`] for never.
    pub expiration: u64,
    /// Schema-encoded payload bytes.
    pub data: Vec<u8>,
}

/// Result of a confirmed submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAttestation {
    /// Ledger-assigned attestation identifier.
    pub uid: AttestationUid,
    /// Transaction hash of the confirmed submission.
    pub tx_hash: String,
}
