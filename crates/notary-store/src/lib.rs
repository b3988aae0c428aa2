//! Notary Store
//!
//! Publishes artifact bytes to a content-addressed, replicated storage
//! network and tracks deal durability. Upload returns a
//! [`StorageReceipt`] in the `Pending` state; durability is observed
//! out-of-band through non-blocking status polls, and `Pending` is a valid
//! terminal state for the synchronous pipeline flow.
//!
//! Providers are consumed through the [`StorageProvider`] trait:
//! [`HttpStorageProvider`] speaks a remote gateway's REST API and
//! [`MemoryStorageProvider`] serves tests and local runs.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Replication policy and deal lifecycle types
pub mod deal;

/// Content identifiers and storage receipts
pub mod receipt;

/// Storage provider trait
pub mod provider;

/// HTTP storage provider
pub mod http;

/// In-memory storage provider
pub mod memory;

/// Publisher front
pub mod publisher;

pub use deal::{DealParams, DealStatus};
pub use http::HttpStorageProvider;
pub use memory::MemoryStorageProvider;
pub use provider::StorageProvider;
pub use publisher::ArtifactPublisher;
pub use receipt::{ContentId, StorageReceipt};

/// Storage errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// Upload transport failure. The publisher performs no automatic
    /// retry; the caller decides.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Deal-status poll failure. Advisory; never fatal to the synchronous
    /// publication flow.
    #[error("Status check failed: {0}")]
    StatusCheck(String),

    /// Proof lookup failure. Advisory, like status checks.
    #[error("Proof lookup failed: {0}")]
    Proof(String),
}

/// Result alias for storage operations.
pub type Result<T> = std::result::Result<T, StoreError>;
