use crate::utils::error::{PipelineError, Result};
use async_trait::async_trait;
use reqwest::Client;

/// One idempotent availability check against the external resource.
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// `Ok(Some(payload))` means ready, `Ok(None)` means not ready yet,
    /// `Err` is a transient fault the poller absorbs and retries.
    async fn poke(&self) -> Result<Option<serde_json::Value>>;
}

/// HTTP source shared by the readiness poller and the extraction stage's
/// direct-fetch fallback, so the two cannot drift apart.
#[derive(Debug, Clone)]
pub struct ApiSource {
    client: Client,
    endpoint: String,
}

impl ApiSource {
    pub fn new(endpoint: String) -> Self {
        Self {
            client: Client::new(),
            endpoint,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Single-shot fetch without the polling envelope. Unlike `poke`,
    /// a non-200 status or network fault here is fatal.
    pub async fn fetch_once(&self) -> Result<serde_json::Value> {
        tracing::debug!("📡 Direct fetch from: {}", self.endpoint);
        let response = self.client.get(&self.endpoint).send().await?;

        if !response.status().is_success() {
            return Err(PipelineError::DirectFetchFailed {
                status: response.status().as_u16(),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl ReadinessProbe for ApiSource {
    async fn poke(&self) -> Result<Option<serde_json::Value>> {
        let response = self.client.get(&self.endpoint).send().await?;
        tracing::debug!("📡 Probe response status: {}", response.status());

        if response.status().is_success() {
            let payload = response.json().await?;
            Ok(Some(payload))
        } else {
            Ok(None)
        }
    }
}
