use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use autoreply_ai::{AiError, GeneratedText, InferenceClient, InferenceResponse};
use autoreply_core::JobRecord;

use super::endpoint;

/// Path of the generation endpoint on the inference service.
pub const INFERENCE_PROMPT_PATH: &str = "/prompt";

/// Inference client speaking JSON over HTTP.
///
/// The job record is sent verbatim as the request body; the service answers
/// with `{"response": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpInferenceClient {
    http: Client,
    endpoint: String,
}

impl HttpInferenceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: Client, base_url: &str) -> Self {
        Self {
            http,
            endpoint: endpoint(base_url, INFERENCE_PROMPT_PATH),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl InferenceClient for HttpInferenceClient {
    async fn prompt(&self, job: &JobRecord) -> Result<GeneratedText, AiError> {
        let start = std::time::Instant::now();

        let response = self
            .http
            .post(&self.endpoint)
            .json(job)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint = %self.endpoint, "inference request failed");
                AiError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AiError::Transport(e.to_string()))?;
        let parsed: InferenceResponse =
            serde_json::from_slice(&bytes).map_err(|e| AiError::MalformedResponse(e.to_string()))?;

        debug!(
            model = %job.model,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = parsed.response.len(),
            "inference completed"
        );

        Ok(GeneratedText::new(parsed.response))
    }
}
