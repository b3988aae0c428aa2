//! Content identifiers and storage receipts.

use crate::deal::{DealParams, DealStatus};
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::fmt;

/// Identifier derived from the uploaded bytes.
///
/// Content addressing is the deduplication mechanism: identical bytes
/// always map to the identical identifier, whatever provider produced it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Wrap a provider-issued identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derive the identifier the in-process provider issues for `bytes`.
    pub fn derive(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        Self(hex::encode(hasher.finalize()))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is non-empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Receipt for a publication request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageReceipt {
    /// Content identifier of the uploaded bytes.
    pub content_id: ContentId,
    /// Replication policy that was requested.
    pub params: DealParams,
    /// Durability status at receipt time (always `Pending` from upload).
    pub status: DealStatus,
    /// Proof-of-data-segment-inclusion reference, once available.
    pub proof: Option<String>,
}
