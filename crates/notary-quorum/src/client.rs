//! The quorum client seam.

use crate::{JobResponse, Result, SigningJob};
use async_trait::async_trait;
use notary_session::{Capability, SessionChallenge};

/// A handle to a signing quorum.
///
/// The handle is shared read-only across concurrent pipeline runs; the
/// quorum's own consistency is external to this crate. Remote deployments
/// implement this over their transport; [`crate::LocalQuorum`] implements
/// it in-process.
#[async_trait]
pub trait QuorumClient: Send + Sync {
    /// Ask the quorum for a session challenge covering `required`.
    ///
    /// The challenge's nonce is derived from the quorum's current ledger
    /// head and its expiration is `ttl_secs` from now.
    async fn issue_challenge(
        &self,
        required: &[Capability],
        ttl_secs: u64,
    ) -> Result<SessionChallenge>;

    /// Submit a signing job and block until a quorum-sufficient set of
    /// partial results has been aggregated.
    async fn execute(&self, job: &SigningJob) -> Result<JobResponse>;

    /// Hex handle of the group public key jobs should sign under.
    fn group_public_key(&self) -> String;
}
