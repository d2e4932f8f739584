use crate::analysis::payload::AnalysisPayload;
use crate::analysis::response::AnalysisResponse;
use crate::net::client::{check_status, HTTP_CLIENT};
use crate::Result;
use async_trait::async_trait;

/// Submits a weighted selection to the suitability analysis service
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait AnalysisClient: Send + Sync {
    async fn submit(&self, payload: &AnalysisPayload) -> Result<AnalysisResponse>;
}

/// POSTs the payload as JSON to the analysis endpoint
#[derive(Debug, Clone)]
pub struct HttpAnalysisClient {
    endpoint: String,
}

impl HttpAnalysisClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl AnalysisClient for HttpAnalysisClient {
    async fn submit(&self, payload: &AnalysisPayload) -> Result<AnalysisResponse> {
        log::debug!(
            "submitting {} criteria to {}",
            payload.data.len(),
            self.endpoint
        );
        let response = HTTP_CLIENT.post(&self.endpoint).json(payload).send().await?;
        let body = check_status(response)?.text().await?;
        AnalysisResponse::from_json(&body)
    }
}
