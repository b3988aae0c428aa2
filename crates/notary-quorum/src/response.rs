//! Aggregated signatures and job responses.

use crate::{QuorumError, Result};
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use notary_core::Digest;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The quorum's combined signature over one (digest, group key) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedSignature {
    /// Digest the quorum signed.
    pub data_signed: Digest,
    /// Hex-encoded Ed25519 group signature.
    pub signature: String,
    /// Hex-encoded group verifying key.
    pub public_key: String,
}

impl AggregatedSignature {
    /// Verify this signature against a digest.
    ///
    /// Fails for any digest other than the exact one the quorum signed,
    /// and for any key other than the group key it was produced under.
    pub fn verify(&self, digest: &Digest) -> Result<()> {
        if digest != &self.data_signed {
            return Err(QuorumError::Crypto(format!(
                "Digest mismatch: signature covers {}, asked to verify {}",
                self.data_signed, digest
            )));
        }

        let key_bytes: [u8; 32] = hex::decode(&self.public_key)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| QuorumError::Crypto("malformed group key".to_string()))?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| QuorumError::Crypto(format!("Invalid group key: {e}")))?;

        let sig_bytes: [u8; 64] = hex::decode(&self.signature)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| QuorumError::Crypto("malformed signature".to_string()))?;
        let signature = Signature::from_bytes(&sig_bytes);

        verifying_key
            .verify(digest.as_bytes(), &signature)
            .map_err(|e| QuorumError::Crypto(format!("Signature verification failed: {e}")))
    }
}

/// Response from a completed signing job.
///
/// Signatures are keyed by name (the built-in digest logic produces one
/// entry named `sig`); `response` carries the logic's arbitrary JSON
/// output, e.g. a quorum timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    /// Named aggregated signatures produced by the job.
    pub signatures: BTreeMap<String, AggregatedSignature>,
    /// Arbitrary structured output of the job logic.
    pub response: serde_json::Value,
}

impl JobResponse {
    /// The primary signature entry, named `sig` by the built-in logic.
    pub fn primary(&self) -> Result<&AggregatedSignature> {
        self.signatures
            .get("sig")
            .ok_or_else(|| QuorumError::JobExecution("response carries no `sig` entry".to_string()))
    }
}
