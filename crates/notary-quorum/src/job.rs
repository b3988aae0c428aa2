//! Signing jobs submitted to the quorum.

use notary_core::{Digest, RunId};
use notary_session::SessionAuthorization;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque, versioned identifier of the job logic the quorum executes.
///
/// The executable body lives on the quorum side; the pipeline only relies
/// on the declared input/output contract of the identified version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobLogicId(String);

impl JobLogicId {
    /// The built-in digest-signing logic.
    pub fn sign_digest_v1() -> Self {
        Self("sign-digest@v1".to_string())
    }

    /// Name an arbitrary logic version.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobLogicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parameters passed by value into the job logic.
///
/// The digest travels inside the job rather than by reference, so no node
/// can substitute a different payload between submission and signing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobParams {
    /// Digest the quorum signs.
    pub data_to_sign: Digest,
    /// Handle of the group public key that must produce the signature.
    pub public_key: String,
    /// Additional logic-specific parameters.
    #[serde(default)]
    pub extra: serde_json::Value,
}

/// A signing job: logic, parameters, and the authorization presented.
///
/// Produced once per pipeline run and never reused across artifacts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SigningJob {
    /// Pipeline run this job belongs to.
    pub run_id: RunId,
    /// Logic the quorum executes.
    pub logic: JobLogicId,
    /// By-value job parameters.
    pub params: JobParams,
    /// Session authorization covering job execution and signing.
    pub authorization: SessionAuthorization,
}

impl SigningJob {
    /// Build a digest-signing job for one pipeline run.
    pub fn sign_digest(
        run_id: RunId,
        digest: Digest,
        public_key: impl Into<String>,
        authorization: SessionAuthorization,
    ) -> Self {
        Self {
            run_id,
            logic: JobLogicId::sign_digest_v1(),
            params: JobParams {
                data_to_sign: digest,
                public_key: public_key.into(),
                extra: serde_json::Value::Null,
            },
            authorization,
        }
    }
}
