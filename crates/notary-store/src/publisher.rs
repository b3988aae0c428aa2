//! Publisher front over a storage provider.

use crate::deal::{DealParams, DealStatus};
use crate::provider::StorageProvider;
use crate::receipt::{ContentId, StorageReceipt};
use crate::Result;
use std::sync::Arc;

/// Publishes artifact bytes and exposes advisory durability checks.
#[derive(Clone)]
pub struct ArtifactPublisher {
    provider: Arc<dyn StorageProvider>,
    params: DealParams,
}

impl ArtifactPublisher {
    /// Create a publisher with a fixed replication policy.
    pub fn new(provider: Arc<dyn StorageProvider>, params: DealParams) -> Self {
        Self { provider, params }
    }

    /// The replication policy attached to every publication.
    pub fn params(&self) -> &DealParams {
        &self.params
    }

    /// Upload `bytes`; the returned receipt is `Pending`. No retry on
    /// failure; re-publishing is the orchestrator's decision.
    pub async fn publish(&self, bytes: &[u8]) -> Result<StorageReceipt> {
        let receipt = self.provider.upload(bytes, &self.params).await?;
        tracing::info!(
            cid = %receipt.content_id,
            copies = self.params.num_copies,
            network = %self.params.network,
            "Artifact published"
        );
        Ok(receipt)
    }

    /// Poll the durability status of an earlier publication.
    pub async fn check_status(&self, content_id: &ContentId) -> Result<DealStatus> {
        self.provider.check_status(content_id).await
    }

    /// Look up the inclusion proof for an earlier publication.
    pub async fn fetch_proof(&self, content_id: &ContentId) -> Result<Option<String>> {
        self.provider.fetch_proof(content_id).await
    }
}
