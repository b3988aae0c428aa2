//! In-process FROST quorum.
//!
//! Implements the full quorum protocol locally: dealer-generated key
//! shares, per-node authorization checks, two signing rounds, and
//! aggregation into a standard Ed25519 signature. Serves as the reference
//! implementation of [`QuorumClient`] and as the quorum used in tests.

use crate::client::QuorumClient;
use crate::job::{JobLogicId, SigningJob};
use crate::response::{AggregatedSignature, JobResponse};
use crate::{QuorumError, Result};
use async_trait::async_trait;
use frost_ed25519 as frost;
use notary_core::time::{unix_now, unix_to_rfc3339};
use notary_session::{Ability, Capability, SessionChallenge};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

/// One quorum node: a FROST key share plus reachability state.
struct QuorumNode {
    identifier: frost::Identifier,
    key_package: frost::keys::KeyPackage,
    online: AtomicBool,
}

impl QuorumNode {
    /// Node-local admission check before contributing to a signature.
    fn admit(&self, job: &SigningJob) -> Result<()> {
        let authorization = &job.authorization;
        authorization
            .verify()
            .map_err(|e| QuorumError::AuthorizationRejected(e.to_string()))?;

        if authorization.is_expired(unix_now()) {
            return Err(QuorumError::AuthorizationRejected(format!(
                "session expired at {}",
                authorization.expiration
            )));
        }

        if !authorization.permits(Ability::ExecuteJob, job.logic.as_str()) {
            return Err(QuorumError::AuthorizationRejected(format!(
                "capability set does not permit executing {}",
                job.logic
            )));
        }
        if !authorization.permits(Ability::SignDigest, &job.params.public_key) {
            return Err(QuorumError::AuthorizationRejected(format!(
                "capability set does not permit signing with key {}",
                job.params.public_key
            )));
        }

        Ok(())
    }
}

/// In-process signing quorum backed by `frost-ed25519`.
pub struct LocalQuorum {
    nodes: Vec<QuorumNode>,
    pubkey_package: frost::keys::PublicKeyPackage,
    min_signers: u16,
    ledger_height: AtomicU64,
    latency: Duration,
}

impl LocalQuorum {
    /// Create a quorum of `max_signers` nodes with a `min_signers`
    /// threshold, keyed deterministically from `seed`.
    pub fn new(max_signers: u16, min_signers: u16, seed: [u8; 32]) -> Result<Self> {
        let mut rng = StdRng::from_seed(seed);
        let (shares, pubkey_package) = frost::keys::generate_with_dealer(
            max_signers,
            min_signers,
            frost::keys::IdentifierList::Default,
            &mut rng,
        )
        .map_err(|e| QuorumError::Crypto(format!("FROST key generation failed: {e}")))?;

        let mut nodes = Vec::with_capacity(shares.len());
        for (identifier, secret_share) in shares {
            let key_package = frost::keys::KeyPackage::try_from(secret_share)
                .map_err(|e| QuorumError::Crypto(format!("Invalid key package: {e}")))?;
            nodes.push(QuorumNode {
                identifier,
                key_package,
                online: AtomicBool::new(true),
            });
        }

        Ok(Self {
            nodes,
            pubkey_package,
            min_signers,
            ledger_height: AtomicU64::new(1),
            latency: Duration::ZERO,
        })
    }

    /// Inject a fixed response latency (used to exercise deadlines).
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Mark a node reachable or unreachable.
    pub fn set_node_online(&self, index: usize, online: bool) {
        if let Some(node) = self.nodes.get(index) {
            node.online.store(online, Ordering::SeqCst);
        }
    }

    /// Number of nodes in the quorum.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Signing threshold.
    pub fn threshold(&self) -> usize {
        self.min_signers as usize
    }

    fn ledger_head(&self) -> String {
        let height = self.ledger_height.load(Ordering::SeqCst);
        let key = self.group_public_key();
        format!("{}:{height:08x}", &key[..8.min(key.len())])
    }

    fn advance_ledger(&self) {
        self.ledger_height.fetch_add(1, Ordering::SeqCst);
    }

    fn sign_rounds(&self, job: &SigningJob) -> Result<AggregatedSignature> {
        let message = job.params.data_to_sign.as_bytes();
        let signers: Vec<&QuorumNode> = self
            .nodes
            .iter()
            .filter(|node| node.online.load(Ordering::SeqCst))
            .take(self.min_signers as usize)
            .collect();

        // Round 1: each signer commits nonces.
        let mut rng = rand::rngs::OsRng;
        let mut nonces = BTreeMap::new();
        let mut commitments = BTreeMap::new();
        for node in &signers {
            let (signing_nonces, signing_commitments) =
                frost::round1::commit(node.key_package.signing_share(), &mut rng);
            nonces.insert(node.identifier, signing_nonces);
            commitments.insert(node.identifier, signing_commitments);
        }

        // Round 2: each signer produces a share over the same package.
        let signing_package = frost::SigningPackage::new(commitments, message);
        let mut shares = BTreeMap::new();
        for node in &signers {
            let nonce = nonces
                .get(&node.identifier)
                .ok_or_else(|| QuorumError::Crypto("missing signer nonce".to_string()))?;
            let share = frost::round2::sign(&signing_package, nonce, &node.key_package)
                .map_err(|e| QuorumError::Crypto(format!("FROST signing failed: {e}")))?;
            shares.insert(node.identifier, share);
        }

        let group_signature = frost::aggregate(&signing_package, &shares, &self.pubkey_package)
            .map_err(|e| QuorumError::Crypto(format!("FROST aggregation failed: {e}")))?;

        Ok(AggregatedSignature {
            data_signed: job.params.data_to_sign,
            signature: hex::encode(group_signature.serialize()),
            public_key: self.group_public_key(),
        })
    }
}

#[async_trait]
impl QuorumClient for LocalQuorum {
    async fn issue_challenge(
        &self,
        required: &[Capability],
        ttl_secs: u64,
    ) -> Result<SessionChallenge> {
        let challenge = SessionChallenge::new(
            format!("notary:session:{}", uuid::Uuid::new_v4()),
            unix_to_rfc3339(unix_now() + ttl_secs),
            required.to_vec(),
            self.ledger_head(),
        );
        Ok(challenge)
    }

    async fn execute(&self, job: &SigningJob) -> Result<JobResponse> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if job.logic != JobLogicId::sign_digest_v1() {
            return Err(QuorumError::JobExecution(format!(
                "unknown job logic {}",
                job.logic
            )));
        }
        if job.params.public_key != self.group_public_key() {
            return Err(QuorumError::JobExecution(format!(
                "unknown public key handle {}",
                job.params.public_key
            )));
        }

        let reachable: Vec<&QuorumNode> = self
            .nodes
            .iter()
            .filter(|node| node.online.load(Ordering::SeqCst))
            .collect();
        if reachable.len() < self.min_signers as usize {
            return Err(QuorumError::Unavailable {
                reachable: reachable.len(),
                required: self.min_signers as usize,
            });
        }

        // Every contributing node independently admits the session.
        for node in reachable.iter().take(self.min_signers as usize) {
            node.admit(job)?;
        }

        let aggregated = self.sign_rounds(job)?;
        self.advance_ledger();

        tracing::debug!(
            run_id = %job.run_id,
            digest = %job.params.data_to_sign,
            signers = self.min_signers,
            "Quorum produced aggregated signature"
        );

        let mut signatures = BTreeMap::new();
        signatures.insert("sig".to_string(), aggregated);
        Ok(JobResponse {
            signatures,
            response: serde_json::json!({ "timestamp": unix_now().to_string() }),
        })
    }

    fn group_public_key(&self) -> String {
        hex::encode(self.pubkey_package.verifying_key().serialize())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use notary_core::{Digest, RunId};
    use notary_session::SessionAuthorizer;

    fn required() -> Vec<Capability> {
        vec![
            Capability::any(Ability::SignDigest),
            Capability::any(Ability::ExecuteJob),
        ]
    }

    async fn authorized_job(quorum: &LocalQuorum, digest: Digest) -> SigningJob {
        let authorizer = SessionAuthorizer::new([3u8; 32]);
        let challenge = quorum.issue_challenge(&required(), 600).await.unwrap();
        let authorization = authorizer
            .obtain_authorization(&challenge, &required())
            .unwrap();
        SigningJob::sign_digest(
            RunId::random(),
            digest,
            quorum.group_public_key(),
            authorization,
        )
    }

    #[tokio::test]
    async fn quorum_signs_and_signature_verifies() {
        let quorum = LocalQuorum::new(3, 2, [1u8; 32]).unwrap();
        let digest = Digest::of(b"hello-world");
        let job = authorized_job(&quorum, digest).await;

        let response = quorum.execute(&job).await.unwrap();
        let aggregated = response.primary().unwrap();
        aggregated.verify(&digest).unwrap();
        assert!(response.response.get("timestamp").is_some());
    }

    #[tokio::test]
    async fn offline_nodes_below_threshold_are_unavailable() {
        let quorum = LocalQuorum::new(3, 2, [1u8; 32]).unwrap();
        quorum.set_node_online(0, false);
        quorum.set_node_online(1, false);

        let job = authorized_job(&quorum, Digest::of(b"hello-world")).await;
        assert_eq!(
            quorum.execute(&job).await,
            Err(QuorumError::Unavailable {
                reachable: 1,
                required: 2
            })
        );
    }

    #[tokio::test]
    async fn under_scoped_session_is_rejected() {
        let quorum = LocalQuorum::new(3, 2, [1u8; 32]).unwrap();
        let narrow = vec![Capability::any(Ability::SignDigest)];
        let authorizer = SessionAuthorizer::new([3u8; 32]);
        let challenge = quorum.issue_challenge(&narrow, 600).await.unwrap();
        let authorization = authorizer.obtain_authorization(&challenge, &narrow).unwrap();

        let job = SigningJob::sign_digest(
            RunId::random(),
            Digest::of(b"hello-world"),
            quorum.group_public_key(),
            authorization,
        );
        assert!(matches!(
            quorum.execute(&job).await,
            Err(QuorumError::AuthorizationRejected(_))
        ));
    }

    #[tokio::test]
    async fn unknown_logic_fails_execution() {
        let quorum = LocalQuorum::new(3, 2, [1u8; 32]).unwrap();
        let mut job = authorized_job(&quorum, Digest::of(b"hello-world")).await;
        job.logic = JobLogicId::new("transcode-video@v9");
        assert!(matches!(
            quorum.execute(&job).await,
            Err(QuorumError::JobExecution(_))
        ));
    }
}
