//! Notary Quorum
//!
//! Submits signing jobs to a distributed node quorum and assembles the
//! partial results into a single aggregated Ed25519 signature over a
//! content digest.
//!
//! The quorum is consumed through the [`QuorumClient`] trait. The
//! in-process [`LocalQuorum`] implements the full protocol with
//! `frost-ed25519` (dealer keygen, per-node authorization checks, two
//! signing rounds, aggregation) and doubles as the reference behavior for
//! remote deployments. [`QuorumSigner`] is the caller-facing front that
//! enforces deadlines and pre-flight authorization checks.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Signing job construction
pub mod job;

/// Aggregated signatures and job responses
pub mod response;

/// Quorum client trait
pub mod client;

/// In-process FROST quorum
pub mod local;

/// Deadline-enforcing signer front
pub mod signer;

pub use client::QuorumClient;
pub use job::{JobLogicId, JobParams, SigningJob};
pub use local::LocalQuorum;
pub use response::{AggregatedSignature, JobResponse};
pub use signer::QuorumSigner;

/// Quorum signing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuorumError {
    /// Too few nodes reachable to meet the signing threshold.
    #[error("Quorum unavailable: {reachable} of {required} required nodes reachable")]
    Unavailable {
        /// Nodes that answered.
        reachable: usize,
        /// Threshold needed to sign.
        required: usize,
    },

    /// The session authorization was expired or under-scoped. Fatal for
    /// this token; the caller must re-authorize rather than retry.
    #[error("Authorization rejected: {0}")]
    AuthorizationRejected(String),

    /// The job logic failed on the quorum nodes.
    #[error("Job execution failed: {0}")]
    JobExecution(String),

    /// The caller-supplied deadline elapsed before the quorum answered.
    #[error("Quorum call timed out after {deadline_ms}ms")]
    Timeout {
        /// Deadline that was exceeded, in milliseconds.
        deadline_ms: u64,
    },

    /// A cryptographic round failed (commitment, share, or aggregation).
    #[error("Crypto error: {0}")]
    Crypto(String),
}

/// Result alias for quorum operations.
pub type Result<T> = std::result::Result<T, QuorumError>;
