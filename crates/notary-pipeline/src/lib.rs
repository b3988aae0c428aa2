//! Notary Pipeline
//!
//! Composes the pipeline stages into one auditable run:
//!
//! ```text
//! fetch -> digest -> authorize -> { quorum sign || publish } -> attest
//! ```
//!
//! A run is strictly sequential except that signing and raw-artifact
//! publication proceed concurrently (neither consumes the other's
//! output). The attestation stage is reachable only after both succeed,
//! so a failure or cancellation earlier never produces a partial
//! attestation. Retry policy lives here and nowhere else: component
//! crates surface typed errors and the orchestrator decides what is safe
//! to re-run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Artifact fetching and digest computation
pub mod fetch;

/// Unified pipeline error taxonomy
pub mod error;

/// Signed artifact bundles
pub mod bundle;

/// Repository snapshot URL derivation
pub mod gitlink;

/// Retry policy
pub mod retry;

/// The orchestrator
pub mod pipeline;

pub use bundle::SignedBundle;
pub use error::PipelineError;
pub use fetch::{ArtifactFetcher, DigestComputer, FetchError, HttpFetcher, StaticFetcher};
pub use gitlink::github_zip_url;
pub use pipeline::{Pipeline, PipelineConfig, RunReport, RunRequest};
pub use retry::RetryPolicy;

/// Result alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
