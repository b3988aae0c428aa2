//! Signed artifact bundles.
//!
//! A bundle binds the artifact bytes, their source URL, the quorum's
//! aggregated signature, and the quorum response payload into one
//! publishable JSON document.

use crate::{PipelineError, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use notary_core::Digest;
use notary_quorum::AggregatedSignature;
use serde::{Deserialize, Serialize};

/// Artifact plus signature, ready for publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignedBundle {
    /// Source URL the artifact was fetched from (metadata, not identity).
    pub url: String,
    /// Digest of the artifact bytes.
    pub digest: Digest,
    /// Base64-encoded artifact bytes.
    pub artifact: String,
    /// The quorum's aggregated signature over the digest.
    pub signature: AggregatedSignature,
    /// The quorum job's response payload (e.g. its timestamp).
    pub quorum_response: serde_json::Value,
}

impl SignedBundle {
    /// Assemble a bundle from a run's outputs.
    pub fn new(
        url: impl Into<String>,
        digest: Digest,
        artifact_bytes: &[u8],
        signature: AggregatedSignature,
        quorum_response: serde_json::Value,
    ) -> Self {
        Self {
            url: url.into(),
            digest,
            artifact: BASE64.encode(artifact_bytes),
            signature,
            quorum_response,
        }
    }

    /// Decode the embedded artifact bytes.
    pub fn artifact_bytes(&self) -> Result<Vec<u8>> {
        BASE64
            .decode(&self.artifact)
            .map_err(|e| PipelineError::Encoding(format!("bundle artifact is not base64: {e}")))
    }

    /// Serialize for publication.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| PipelineError::Encoding(format!("bundle serialization failed: {e}")))
    }

    /// Parse a published bundle.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| PipelineError::Encoding(format!("bundle parse failed: {e}")))
    }

    /// Check the bundle's internal consistency: the embedded bytes hash
    /// to the embedded digest and the signature verifies against it.
    pub fn verify(&self) -> Result<()> {
        let bytes = self.artifact_bytes()?;
        let digest = Digest::of(&bytes);
        if digest != self.digest {
            return Err(PipelineError::Encoding(format!(
                "bundle digest mismatch: bytes hash to {digest}, bundle claims {}",
                self.digest
            )));
        }
        self.signature.verify(&digest)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn signed_over(bytes: &[u8]) -> (AggregatedSignature, Digest) {
        let key = SigningKey::from_bytes(&[21u8; 32]);
        let digest = Digest::of(bytes);
        let signature = key.sign(digest.as_bytes());
        (
            AggregatedSignature {
                data_signed: digest,
                signature: hex::encode(signature.to_bytes()),
                public_key: hex::encode(key.verifying_key().to_bytes()),
            },
            digest,
        )
    }

    #[test]
    fn bundle_round_trips_and_verifies() {
        let (signature, digest) = signed_over(b"artifact-bytes");
        let bundle = SignedBundle::new(
            "https://example.test/artifact.zip",
            digest,
            b"artifact-bytes",
            signature,
            serde_json::json!({ "timestamp": "1700000000" }),
        );

        let encoded = bundle.to_bytes().unwrap();
        let decoded = SignedBundle::from_bytes(&encoded).unwrap();
        assert_eq!(decoded, bundle);
        decoded.verify().unwrap();
    }

    #[test]
    fn tampered_artifact_fails_verification() {
        let (signature, digest) = signed_over(b"artifact-bytes");
        let mut bundle = SignedBundle::new(
            "https://example.test/artifact.zip",
            digest,
            b"artifact-bytes",
            signature,
            serde_json::Value::Null,
        );
        bundle.artifact = BASE64.encode(b"different-bytes");
        assert!(bundle.verify().is_err());
    }
}
