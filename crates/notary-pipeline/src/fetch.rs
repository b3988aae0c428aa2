//! Artifact fetching and digest computation.

use async_trait::async_trait;
use notary_core::Digest;
use std::collections::HashMap;
use std::time::Duration;

/// Fetch errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Network or timeout failure. Retrying is the caller's decision.
    #[error("Fetch failed: {0}")]
    Transport(String),

    /// The source answered with zero bytes.
    #[error("Fetch returned an empty body from {0}")]
    EmptyBody(String),
}

/// Source of artifact bytes.
#[async_trait]
pub trait ArtifactFetcher: Send + Sync {
    /// Fetch the bytes referenced by `url`. One outbound read, no writes,
    /// no internal retry.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// HTTP fetcher with a bounded request timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(format!("HTTP client construction failed: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "fetch returned status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// Fetcher serving fixed byte sequences, for tests and offline runs.
#[derive(Default)]
pub struct StaticFetcher {
    artifacts: HashMap<String, Vec<u8>>,
}

impl StaticFetcher {
    /// Create an empty fetcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a URL.
    pub fn with_artifact(mut self, url: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        self.artifacts.insert(url.into(), bytes.into());
        self
    }
}

#[async_trait]
impl ArtifactFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.artifacts
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Transport(format!("no artifact registered for {url}")))
    }
}

/// Fetches a remote artifact and computes its content digest.
pub struct DigestComputer<F> {
    fetcher: F,
}

impl<F: ArtifactFetcher> DigestComputer<F> {
    /// Wrap a fetcher.
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    /// Fetch `url` and return the bytes with their digest.
    ///
    /// The URL is metadata only; the digest is the artifact's identity
    /// from here on.
    pub async fn fetch(&self, url: &str) -> Result<(Vec<u8>, Digest), FetchError> {
        let bytes = self.fetcher.fetch(url).await?;
        if bytes.is_empty() {
            return Err(FetchError::EmptyBody(url.to_string()));
        }
        let digest = Digest::of(&bytes);
        tracing::debug!(url, size = bytes.len(), %digest, "Fetched artifact");
        Ok((bytes, digest))
    }
}
