//! HTTP storage provider.
//!
//! Speaks a storage gateway's REST API: an authenticated upload endpoint
//! returning `{"data": {"Hash": ...}}`, a deal-status poll, and a proof
//! lookup keyed by content id.

use crate::deal::{DealParams, DealStatus};
use crate::provider::StorageProvider;
use crate::receipt::{ContentId, StorageReceipt};
use crate::{Result, StoreError};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct UploadEnvelope {
    data: UploadData,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    #[serde(rename = "Hash")]
    hash: String,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(rename = "dealStatus")]
    deal_status: DealStatus,
}

#[derive(Debug, Deserialize)]
struct ProofEnvelope {
    proof: Option<String>,
}

/// Client for a remote content-addressed storage API.
pub struct HttpStorageProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl HttpStorageProvider {
    /// Create a provider client against `base_url` with a request timeout.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreError::Upload(format!("HTTP client construction failed: {e}")))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }
}

#[async_trait]
impl StorageProvider for HttpStorageProvider {
    async fn upload(&self, bytes: &[u8], params: &DealParams) -> Result<StorageReceipt> {
        let deal_params = serde_json::to_string(params)
            .map_err(|e| StoreError::Upload(format!("deal params encoding failed: {e}")))?;

        let response = self
            .client
            .post(format!("{}/v1/upload", self.base_url))
            .bearer_auth(&self.api_key)
            .header("x-deal-params", deal_params)
            .body(bytes.to_vec())
            .send()
            .await
            .map_err(|e| StoreError::Upload(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::Upload(format!(
                "upload returned status {}",
                response.status()
            )));
        }

        let envelope: UploadEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Upload(format!("malformed upload response: {e}")))?;

        tracing::info!(cid = %envelope.data.hash, "Artifact uploaded to storage network");

        Ok(StorageReceipt {
            content_id: ContentId::new(envelope.data.hash),
            params: params.clone(),
            status: DealStatus::Pending,
            proof: None,
        })
    }

    async fn check_status(&self, content_id: &ContentId) -> Result<DealStatus> {
        let response = self
            .client
            .get(format!("{}/v1/deal-status", self.base_url))
            .query(&[("cid", content_id.as_str())])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StoreError::StatusCheck(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StoreError::StatusCheck(format!(
                "status poll returned {}",
                response.status()
            )));
        }

        let envelope: StatusEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::StatusCheck(format!("malformed status response: {e}")))?;
        Ok(envelope.deal_status)
    }

    async fn fetch_proof(&self, content_id: &ContentId) -> Result<Option<String>> {
        let response = self
            .client
            .get(format!("{}/v1/proof", self.base_url))
            .query(&[("cid", content_id.as_str())])
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StoreError::Proof(e.to_string()))?;

        // No proof yet is a normal condition, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(StoreError::Proof(format!(
                "proof lookup returned {}",
                response.status()
            )));
        }

        let envelope: ProofEnvelope = response
            .json()
            .await
            .map_err(|e| StoreError::Proof(format!("malformed proof response: {e}")))?;
        Ok(envelope.proof)
    }
}
