//! The pipeline orchestrator.

use crate::bundle::SignedBundle;
use crate::fetch::{ArtifactFetcher, DigestComputer};
use crate::retry::RetryPolicy;
use crate::{PipelineError, Result};
use notary_attest::{AttestationIssuer, IssuedAttestation};
use notary_core::{Digest, RunId};
use notary_quorum::{AggregatedSignature, QuorumSigner, SigningJob};
use notary_session::{Ability, Capability, SessionAuthorizer};
use notary_store::{ArtifactPublisher, DealStatus, StorageReceipt};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tunables for one pipeline instance.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Lifetime requested for each session authorization, in seconds.
    pub session_ttl_secs: u64,
    /// Deadline for a single quorum signing call.
    pub sign_deadline: Duration,
    /// Retry policy for the retryable stages.
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 600,
            sign_deadline: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

/// One artifact to notarize, with the attestation fields to record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Where to fetch the artifact from.
    pub url: String,
    /// Attestation subject (schema field `AgentId`).
    pub subject: String,
    /// Attestation count to record.
    pub attestation_count: u64,
    /// Holding value to record.
    pub holding: u128,
    /// Recipient address of the attestation.
    pub recipient: String,
}

/// Everything a completed run produced, in stage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Identifier of this run.
    pub run_id: RunId,
    /// Source URL of the artifact (metadata, not identity).
    pub url: String,
    /// Content digest of the fetched bytes.
    pub digest: Digest,
    /// The quorum's aggregated signature over the digest.
    pub signature: AggregatedSignature,
    /// The quorum job's structured response.
    pub quorum_response: serde_json::Value,
    /// Publication receipt for the stored bytes.
    pub receipt: StorageReceipt,
    /// Durability status observed after publication (advisory).
    pub storage_status: DealStatus,
    /// The ledger's confirmation of the attestation.
    pub attestation: IssuedAttestation,
}

struct SignedDigest {
    signature: AggregatedSignature,
    quorum_response: serde_json::Value,
}

/// Drives one artifact through fetch, authorization, quorum signing,
/// publication, and attestation.
///
/// Stage order is fixed: signing and raw publication run concurrently
/// once the digest exists, and attestation is submitted only after both
/// have succeeded. Each signing attempt presents a freshly obtained
/// authorization, so a retry never replays an expired or consumed token.
pub struct Pipeline<F> {
    fetcher: DigestComputer<F>,
    authorizer: SessionAuthorizer,
    signer: QuorumSigner,
    publisher: ArtifactPublisher,
    issuer: AttestationIssuer,
    config: PipelineConfig,
}

impl<F: ArtifactFetcher> Pipeline<F> {
    /// Assemble a pipeline from its stage components.
    pub fn new(
        fetcher: F,
        authorizer: SessionAuthorizer,
        signer: QuorumSigner,
        publisher: ArtifactPublisher,
        issuer: AttestationIssuer,
        config: PipelineConfig,
    ) -> Self {
        Self {
            fetcher: DigestComputer::new(fetcher),
            authorizer,
            signer,
            publisher,
            issuer,
            config,
        }
    }

    /// Capabilities every signing session must carry, no more and no less.
    fn required_capabilities() -> Vec<Capability> {
        vec![
            Capability::any(Ability::SignDigest),
            Capability::any(Ability::ExecuteJob),
        ]
    }

    /// Run the full pipeline for one artifact.
    ///
    /// Publishes the raw artifact bytes; signing proceeds concurrently
    /// with publication. The first fatal error, or exhaustion of the
    /// retry budget on a retryable stage, aborts the run with no
    /// attestation submitted.
    pub async fn run(&self, request: &RunRequest) -> Result<RunReport> {
        let run_id = RunId::random();
        tracing::info!(%run_id, url = %request.url, "Pipeline run started");

        let (bytes, digest) = self.fetcher.fetch(&request.url).await?;

        let (signed, receipt) = tokio::try_join!(
            self.sign_with_retries(&run_id, digest),
            self.publish_with_retries(&bytes),
        )?;

        let attestation = self
            .issuer
            .issue(
                &request.subject,
                request.attestation_count,
                request.holding,
                &request.recipient,
            )
            .await?;

        let storage_status = self.observe_status(&receipt).await;

        tracing::info!(
            %run_id,
            %digest,
            cid = %receipt.content_id,
            uid = %attestation.uid,
            "Pipeline run complete"
        );

        Ok(RunReport {
            run_id,
            url: request.url.clone(),
            digest,
            signature: signed.signature,
            quorum_response: signed.quorum_response,
            receipt,
            storage_status,
            attestation,
        })
    }

    /// Run the pipeline publishing a [`SignedBundle`] instead of raw bytes.
    ///
    /// The bundle embeds the signature, so signing must finish before
    /// publication; the stages run sequentially here.
    pub async fn run_bundled(&self, request: &RunRequest) -> Result<(RunReport, SignedBundle)> {
        let run_id = RunId::random();
        tracing::info!(%run_id, url = %request.url, "Bundled pipeline run started");

        let (bytes, digest) = self.fetcher.fetch(&request.url).await?;

        let signed = self.sign_with_retries(&run_id, digest).await?;
        let bundle = SignedBundle::new(
            request.url.clone(),
            digest,
            &bytes,
            signed.signature.clone(),
            signed.quorum_response.clone(),
        );
        let receipt = self.publish_with_retries(&bundle.to_bytes()?).await?;

        let attestation = self
            .issuer
            .issue(
                &request.subject,
                request.attestation_count,
                request.holding,
                &request.recipient,
            )
            .await?;

        let storage_status = self.observe_status(&receipt).await;

        let report = RunReport {
            run_id,
            url: request.url.clone(),
            digest,
            signature: signed.signature,
            quorum_response: signed.quorum_response,
            receipt,
            storage_status,
            attestation,
        };
        Ok((report, bundle))
    }

    /// Obtain a fresh authorization and submit one signing job, retrying
    /// retryable quorum failures under the configured policy.
    async fn sign_with_retries(&self, run_id: &RunId, digest: Digest) -> Result<SignedDigest> {
        let required = Self::required_capabilities();
        let attempts = self.config.retry.attempts();
        let mut last: Option<PipelineError> = None;

        for attempt in 1..=attempts {
            match self.sign_once(run_id, digest, &required).await {
                Ok(signed) => return Ok(signed),
                Err(err) if err.is_retryable() && attempt < attempts => {
                    let backoff = self.config.retry.backoff_for(attempt);
                    tracing::warn!(
                        %run_id,
                        attempt,
                        error = %err,
                        backoff_ms = backoff.as_millis() as u64,
                        "Signing attempt failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    last = Some(err);
                }
                Err(err) if err.is_retryable() => {
                    return Err(PipelineError::RetriesExhausted {
                        attempts,
                        last: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        // Unreachable for attempts >= 1; keep the last error just in case.
        Err(last.unwrap_or(PipelineError::RetriesExhausted {
            attempts,
            last: "no signing attempt was made".to_string(),
        }))
    }

    async fn sign_once(
        &self,
        run_id: &RunId,
        digest: Digest,
        required: &[Capability],
    ) -> Result<SignedDigest> {
        let client = self.signer.client();
        let challenge = client
            .issue_challenge(required, self.config.session_ttl_secs)
            .await?;
        let authorization = self.authorizer.obtain_authorization(&challenge, required)?;

        let job = SigningJob::sign_digest(
            *run_id,
            digest,
            client.group_public_key(),
            authorization,
        );
        let response = self.signer.sign(&job, self.config.sign_deadline).await?;
        let signature = response.primary()?.clone();
        signature.verify(&digest)?;

        Ok(SignedDigest {
            signature,
            quorum_response: response.response,
        })
    }

    /// Publish bytes, retrying upload failures under the configured policy.
    async fn publish_with_retries(&self, bytes: &[u8]) -> Result<StorageReceipt> {
        let attempts = self.config.retry.attempts();

        for attempt in 1..=attempts {
            match self.publisher.publish(bytes).await {
                Ok(receipt) => return Ok(receipt),
                Err(err) if attempt < attempts => {
                    let backoff = self.config.retry.backoff_for(attempt);
                    tracing::warn!(
                        attempt,
                        error = %err,
                        backoff_ms = backoff.as_millis() as u64,
                        "Publication attempt failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(err) => {
                    return Err(PipelineError::RetriesExhausted {
                        attempts,
                        last: err.to_string(),
                    });
                }
            }
        }

        Err(PipelineError::RetriesExhausted {
            attempts,
            last: "no publication attempt was made".to_string(),
        })
    }

    /// Advisory durability check. A failure here never fails the run; the
    /// receipt's status stands in for the unobserved one.
    async fn observe_status(&self, receipt: &StorageReceipt) -> DealStatus {
        match self.publisher.check_status(&receipt.content_id).await {
            Ok(status) => status,
            Err(err) => {
                tracing::warn!(cid = %receipt.content_id, error = %err, "Durability check failed");
                receipt.status
            }
        }
    }

    /// Look up the inclusion proof for a published run output.
    pub async fn fetch_proof(&self, receipt: &StorageReceipt) -> Result<Option<String>> {
        Ok(self.publisher.fetch_proof(&receipt.content_id).await?)
    }
}
