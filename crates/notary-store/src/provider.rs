//! The storage provider seam.

use crate::deal::{DealParams, DealStatus};
use crate::receipt::{ContentId, StorageReceipt};
use crate::Result;
use async_trait::async_trait;

/// A content-addressed storage network.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Upload bytes under the given replication policy.
    ///
    /// Returns a `Pending` receipt. Uploading identical bytes twice yields
    /// the same content identifier but may create separate deal entries;
    /// deduplicating deals is a non-goal.
    async fn upload(&self, bytes: &[u8], params: &DealParams) -> Result<StorageReceipt>;

    /// Observe the current durability status of an upload. Non-blocking
    /// and advisory.
    async fn check_status(&self, content_id: &ContentId) -> Result<DealStatus>;

    /// Fetch the inclusion proof reference for an upload, if the network
    /// has produced one yet.
    async fn fetch_proof(&self, content_id: &ContentId) -> Result<Option<String>>;
}
