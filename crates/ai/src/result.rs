use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Text produced by the inference service for one job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneratedText(String);

impl GeneratedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GeneratedText {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Response body of the inference service.
///
/// Only `response` is required; anything else the service sends is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceResponse {
    pub response: String,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("inference request failed: {0}")]
    Transport(String),

    #[error("inference service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed inference response: {0}")]
    MalformedResponse(String),
}
