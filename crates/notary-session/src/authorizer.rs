//! The session authorizer and the authorization it produces.

use crate::capability::{Ability, Capability};
use crate::challenge::SessionChallenge;
use crate::message::canonical_challenge_message;
use crate::{Result, SessionError};
use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use notary_core::time::rfc3339_to_unix;
use serde::{Deserialize, Serialize};

/// A signed, time-bounded, capability-scoped session authorization.
///
/// Everything the quorum needs to verify the authorization travels in the
/// fields below; the canonical message is reconstructed from them at
/// verification time so no field can be substituted independently of the
/// signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionAuthorization {
    /// Hex-encoded Ed25519 verifying key of the requester.
    pub address: String,
    /// Session URI from the challenge.
    pub uri: String,
    /// RFC3339 expiration from the challenge.
    pub expiration: String,
    /// Freshness nonce from the challenge.
    pub nonce: String,
    /// Ordered capability list; exactly equals the requested list.
    pub capabilities: Vec<Capability>,
    /// Hex-encoded Ed25519 signature over the canonical message.
    pub signature: String,
}

impl SessionAuthorization {
    /// Expiration as unix seconds, if parseable.
    pub fn expires_at(&self) -> Option<u64> {
        rfc3339_to_unix(&self.expiration)
    }

    /// Whether the authorization has expired at `now` (unix seconds).
    ///
    /// An unparseable expiration counts as expired; consumers must never
    /// accept a token whose lifetime they cannot establish.
    pub fn is_expired(&self, now: u64) -> bool {
        match self.expires_at() {
            Some(expires_at) => now >= expires_at,
            None => true,
        }
    }

    /// Whether the capability list permits `ability` on `resource`.
    pub fn permits(&self, ability: Ability, resource: &str) -> bool {
        self.capabilities
            .iter()
            .any(|cap| cap.permits(ability, resource))
    }

    /// Verify the credential signature over the reconstructed canonical
    /// message.
    pub fn verify(&self) -> Result<()> {
        let key_bytes: [u8; 32] = hex::decode(&self.address)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| SessionError::InvalidSignature("malformed address".to_string()))?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| SessionError::InvalidSignature(e.to_string()))?;

        let sig_bytes: [u8; 64] = hex::decode(&self.signature)
            .ok()
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or_else(|| SessionError::InvalidSignature("malformed signature".to_string()))?;
        let signature = Signature::from_bytes(&sig_bytes);

        let message = canonical_challenge_message(
            &self.address,
            &self.uri,
            &self.expiration,
            &self.nonce,
            &self.capabilities,
        );
        verifying_key
            .verify(message.as_bytes(), &signature)
            .map_err(|e| SessionError::InvalidSignature(e.to_string()))
    }
}

/// Holds the long-lived credential and answers quorum challenges.
///
/// The signing key is exclusively owned here and never serialized,
/// transmitted, or exposed through the public API.
pub struct SessionAuthorizer {
    signing_key: SigningKey,
    address: String,
}

impl SessionAuthorizer {
    /// Create an authorizer from a raw 32-byte Ed25519 seed.
    pub fn new(credential: [u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(&credential);
        let address = hex::encode(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            address,
        }
    }

    /// The requester address (hex verifying key) derived from the credential.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Answer a quorum challenge with a signed session authorization.
    ///
    /// Refuses under-specified challenges ([`SessionError::MissingChallengeField`])
    /// and challenges whose capability list differs from `required` in
    /// either direction. On success the returned authorization's capability
    /// list exactly equals `required`.
    pub fn obtain_authorization(
        &self,
        challenge: &SessionChallenge,
        required: &[Capability],
    ) -> Result<SessionAuthorization> {
        let uri = challenge
            .uri
            .as_deref()
            .ok_or(SessionError::MissingChallengeField("uri"))?;
        let expiration = challenge
            .expiration
            .as_deref()
            .ok_or(SessionError::MissingChallengeField("expiration"))?;
        let resources = challenge
            .resources
            .as_deref()
            .filter(|list| !list.is_empty())
            .ok_or(SessionError::MissingChallengeField("resources"))?;

        if rfc3339_to_unix(expiration).is_none() {
            return Err(SessionError::InvalidExpiration(expiration.to_string()));
        }

        for capability in resources {
            if !required.contains(capability) {
                return Err(SessionError::ScopeEscalation {
                    requested: capability.to_string(),
                });
            }
        }
        for capability in required {
            if !resources.contains(capability) {
                return Err(SessionError::ScopeNarrowed {
                    missing: capability.to_string(),
                });
            }
        }

        let message = canonical_challenge_message(
            &self.address,
            uri,
            expiration,
            &challenge.nonce,
            required,
        );
        let signature = self.signing_key.sign(message.as_bytes());

        tracing::debug!(
            address = %self.address,
            uri,
            expiration,
            capabilities = required.len(),
            "Issued session authorization"
        );

        Ok(SessionAuthorization {
            address: self.address.clone(),
            uri: uri.to_string(),
            expiration: expiration.to_string(),
            nonce: challenge.nonce.clone(),
            capabilities: required.to_vec(),
            signature: hex::encode(signature.to_bytes()),
        })
    }
}
