//! Unified error taxonomy for pipeline runs.
//!
//! Component crates surface their own typed errors; the orchestrator
//! folds them into the kinds below so programmatic callers can branch on
//! retryability without string matching.

use crate::fetch::FetchError;
use notary_attest::AttestError;
use notary_quorum::QuorumError;
use notary_session::SessionError;
use notary_store::StoreError;

/// A pipeline run failure, classified by kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Network or timeout failure while fetching the artifact. Retryable.
    #[error(transparent)]
    Transport(#[from] FetchError),

    /// Expired or under-scoped session. Fatal for the token in hand;
    /// recovery is re-authorization, not a retry with the same token.
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Quorum could not produce a signature. Retryable with backoff and a
    /// fresh authorization, up to the configured attempt cap.
    #[error(transparent)]
    Quorum(QuorumError),

    /// Storage upload failure. Retryable; durability polls are advisory
    /// and never surface through this variant.
    #[error(transparent)]
    Storage(#[from] StoreError),

    /// Schema or range violation. Fatal; raised before any submission.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Ledger submission failure. Ambiguous on crash-after-broadcast;
    /// retrying may duplicate the attestation.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// The retry budget for a retryable stage was exhausted.
    #[error("Retries exhausted after {attempts} attempts: {last}")]
    RetriesExhausted {
        /// Attempts made before giving up.
        attempts: u32,
        /// The final attempt's error, rendered.
        last: String,
    },
}

impl PipelineError {
    /// Whether re-running the failed stage could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Transport(_)
            | PipelineError::Quorum(_)
            | PipelineError::Storage(_) => true,
            PipelineError::Authorization(_)
            | PipelineError::Encoding(_)
            | PipelineError::Ledger(_)
            | PipelineError::RetriesExhausted { .. } => false,
        }
    }
}

impl From<SessionError> for PipelineError {
    fn from(err: SessionError) -> Self {
        PipelineError::Authorization(err.to_string())
    }
}

impl From<QuorumError> for PipelineError {
    fn from(err: QuorumError) -> Self {
        match err {
            QuorumError::AuthorizationRejected(message) => PipelineError::Authorization(message),
            other => PipelineError::Quorum(other),
        }
    }
}

impl From<AttestError> for PipelineError {
    fn from(err: AttestError) -> Self {
        match err {
            AttestError::Encoding(message) => PipelineError::Encoding(message),
            AttestError::Submission(message) => PipelineError::Ledger(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quorum_authorization_rejection_maps_to_authorization() {
        let err: PipelineError =
            QuorumError::AuthorizationRejected("session expired".to_string()).into();
        assert!(matches!(err, PipelineError::Authorization(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn quorum_unavailability_stays_retryable() {
        let err: PipelineError = QuorumError::Unavailable {
            reachable: 1,
            required: 2,
        }
        .into();
        assert!(matches!(err, PipelineError::Quorum(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn attest_errors_split_into_encoding_and_ledger() {
        let encoding: PipelineError = AttestError::Encoding("count".to_string()).into();
        assert!(matches!(encoding, PipelineError::Encoding(_)));
        assert!(!encoding.is_retryable());

        let ledger: PipelineError = AttestError::Submission("nonce".to_string()).into();
        assert!(matches!(ledger, PipelineError::Ledger(_)));
    }
}
