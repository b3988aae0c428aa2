//! Caller-facing signer front.

use crate::client::QuorumClient;
use crate::job::SigningJob;
use crate::response::JobResponse;
use crate::{QuorumError, Result};
use notary_core::time::unix_now;
use std::sync::Arc;
use std::time::Duration;

/// Submits signing jobs to a quorum under a caller-supplied deadline.
///
/// Expiry is checked before submission as well as by every quorum node:
/// an expired authorization is rejected here with
/// [`QuorumError::AuthorizationRejected`], never silently forwarded.
/// Authorizations are run-scoped; after a timeout the caller retries with
/// a freshly obtained one.
#[derive(Clone)]
pub struct QuorumSigner {
    client: Arc<dyn QuorumClient>,
}

impl QuorumSigner {
    /// Wrap a quorum client.
    pub fn new(client: Arc<dyn QuorumClient>) -> Self {
        Self { client }
    }

    /// Access the underlying client handle.
    pub fn client(&self) -> &Arc<dyn QuorumClient> {
        &self.client
    }

    /// Submit `job` and wait up to `deadline` for the aggregated result.
    pub async fn sign(&self, job: &SigningJob, deadline: Duration) -> Result<JobResponse> {
        if job.authorization.is_expired(unix_now()) {
            return Err(QuorumError::AuthorizationRejected(format!(
                "session expired at {}",
                job.authorization.expiration
            )));
        }

        let deadline_ms = deadline.as_millis() as u64;
        match tokio::time::timeout(deadline, self.client.execute(job)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(run_id = %job.run_id, deadline_ms, "Quorum call timed out");
                Err(QuorumError::Timeout { deadline_ms })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::LocalQuorum;
    use notary_core::{Digest, RunId};
    use notary_session::{Ability, Capability, SessionAuthorizer, SessionChallenge};
    use notary_core::time::unix_to_rfc3339;

    fn required() -> Vec<Capability> {
        vec![
            Capability::any(Ability::SignDigest),
            Capability::any(Ability::ExecuteJob),
        ]
    }

    #[tokio::test]
    async fn expired_authorization_never_reaches_the_quorum() {
        let quorum = Arc::new(LocalQuorum::new(3, 2, [1u8; 32]).unwrap());
        let signer = QuorumSigner::new(quorum.clone());

        let authorizer = SessionAuthorizer::new([3u8; 32]);
        let stale = SessionChallenge::new(
            "notary:session:stale",
            unix_to_rfc3339(notary_core::time::unix_now().saturating_sub(30)),
            required(),
            "head-1",
        );
        let authorization = authorizer.obtain_authorization(&stale, &required()).unwrap();
        let job = SigningJob::sign_digest(
            RunId::random(),
            Digest::of(b"hello-world"),
            quorum.group_public_key(),
            authorization,
        );

        assert!(matches!(
            signer.sign(&job, Duration::from_secs(5)).await,
            Err(QuorumError::AuthorizationRejected(_))
        ));
    }

    #[tokio::test]
    async fn deadline_maps_to_timeout() {
        let quorum = Arc::new(
            LocalQuorum::new(3, 2, [1u8; 32])
                .unwrap()
                .with_latency(Duration::from_millis(200)),
        );
        let signer = QuorumSigner::new(quorum.clone());

        let authorizer = SessionAuthorizer::new([3u8; 32]);
        let challenge = quorum.issue_challenge(&required(), 600).await.unwrap();
        let authorization = authorizer
            .obtain_authorization(&challenge, &required())
            .unwrap();
        let job = SigningJob::sign_digest(
            RunId::random(),
            Digest::of(b"hello-world"),
            quorum.group_public_key(),
            authorization,
        );

        assert_eq!(
            signer.sign(&job, Duration::from_millis(20)).await,
            Err(QuorumError::Timeout { deadline_ms: 20 })
        );
    }
}
