//! In-memory storage provider.
//!
//! Content ids are SHA-256 derived, so the content-addressing idempotence
//! contract holds exactly: identical bytes, identical id. Deal entries are
//! counted per upload to mirror the real network's duplicate-deal
//! behavior, and tests can script status transitions.

use crate::deal::{DealParams, DealStatus};
use crate::provider::StorageProvider;
use crate::receipt::{ContentId, StorageReceipt};
use crate::{Result, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

struct StoredEntry {
    params: DealParams,
    status: DealStatus,
    deal_entries: u32,
    proof: Option<String>,
}

/// Storage provider holding uploads in process memory.
#[derive(Default)]
pub struct MemoryStorageProvider {
    entries: Mutex<HashMap<ContentId, StoredEntry>>,
    fail_uploads: Mutex<bool>,
}

impl MemoryStorageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent uploads fail with a transport error (test hook).
    pub fn set_fail_uploads(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_uploads.lock() {
            *flag = fail;
        }
    }

    /// Script a durability transition for an upload (test hook standing in
    /// for the network finalizing deals).
    pub fn set_status(&self, content_id: &ContentId, status: DealStatus) {
        if let Ok(mut entries) = self.entries.lock() {
            if let Some(entry) = entries.get_mut(content_id) {
                entry.status = status;
            }
        }
    }

    /// Attach a proof reference to an upload (test hook).
    pub fn set_proof(&self, content_id: &ContentId, proof: impl Into<String>) {
        if let Ok(mut entries) = self.entries.lock() {
            if let Some(entry) = entries.get_mut(content_id) {
                entry.proof = Some(proof.into());
            }
        }
    }

    /// Number of deal entries recorded for a content id.
    pub fn deal_entries(&self, content_id: &ContentId) -> u32 {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(content_id).map(|e| e.deal_entries))
            .unwrap_or(0)
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    async fn upload(&self, bytes: &[u8], params: &DealParams) -> Result<StorageReceipt> {
        if self.fail_uploads.lock().map(|f| *f).unwrap_or(false) {
            return Err(StoreError::Upload("simulated transport failure".to_string()));
        }

        let content_id = ContentId::derive(bytes);
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| StoreError::Upload("provider state poisoned".to_string()))?;

        // Same bytes, same id; each upload still opens its own deal entry.
        let entry = entries.entry(content_id.clone()).or_insert(StoredEntry {
            params: params.clone(),
            status: DealStatus::Pending,
            deal_entries: 0,
            proof: None,
        });
        entry.deal_entries += 1;

        tracing::debug!(cid = %content_id, deals = entry.deal_entries, "Stored artifact in memory");

        Ok(StorageReceipt {
            content_id,
            params: params.clone(),
            status: DealStatus::Pending,
            proof: None,
        })
    }

    async fn check_status(&self, content_id: &ContentId) -> Result<DealStatus> {
        self.entries
            .lock()
            .map_err(|_| StoreError::StatusCheck("provider state poisoned".to_string()))?
            .get(content_id)
            .map(|entry| entry.status)
            .ok_or_else(|| StoreError::StatusCheck(format!("unknown content id {content_id}")))
    }

    async fn fetch_proof(&self, content_id: &ContentId) -> Result<Option<String>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Proof("provider state poisoned".to_string()))?
            .get(content_id)
            .map(|entry| entry.proof.clone())
            .ok_or_else(|| StoreError::Proof(format!("unknown content id {content_id}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_is_pending_with_nonempty_id() {
        let provider = MemoryStorageProvider::new();
        let receipt = provider
            .upload(&[0u8; 1024], &DealParams::default())
            .await
            .unwrap();
        assert_eq!(receipt.status, DealStatus::Pending);
        assert!(!receipt.content_id.is_empty());
    }

    #[tokio::test]
    async fn identical_bytes_same_id_but_separate_deals() {
        let provider = MemoryStorageProvider::new();
        let params = DealParams::default();
        let first = provider.upload(&[0u8; 1024], &params).await.unwrap();
        let second = provider.upload(&[0u8; 1024], &params).await.unwrap();
        assert_eq!(first.content_id, second.content_id);
        assert_eq!(provider.deal_entries(&first.content_id), 2);
    }

    #[tokio::test]
    async fn status_transitions_are_observable() {
        let provider = MemoryStorageProvider::new();
        let receipt = provider
            .upload(b"artifact", &DealParams::default())
            .await
            .unwrap();

        assert_eq!(
            provider.check_status(&receipt.content_id).await.unwrap(),
            DealStatus::Pending
        );
        provider.set_status(&receipt.content_id, DealStatus::Durable);
        assert_eq!(
            provider.check_status(&receipt.content_id).await.unwrap(),
            DealStatus::Durable
        );
    }

    #[tokio::test]
    async fn failed_upload_surfaces_transport_error() {
        let provider = MemoryStorageProvider::new();
        provider.set_fail_uploads(true);
        assert!(matches!(
            provider.upload(b"artifact", &DealParams::default()).await,
            Err(StoreError::Upload(_))
        ));
    }

    #[tokio::test]
    async fn unknown_id_fails_status_check() {
        let provider = MemoryStorageProvider::new();
        assert!(matches!(
            provider.check_status(&ContentId::new("missing")).await,
            Err(StoreError::StatusCheck(_))
        ));
    }
}
