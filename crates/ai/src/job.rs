use async_trait::async_trait;

use autoreply_core::JobRecord;

use crate::result::{AiError, GeneratedText};

/// Language-model inference boundary.
///
/// Implementations turn a reply job into generated reply text. Every failure
/// (transport, status, decoding) is surfaced unmodified as an [`AiError`];
/// callers treat them all alike.
#[async_trait]
pub trait InferenceClient: Send + Sync + 'static {
    async fn prompt(&self, job: &JobRecord) -> Result<GeneratedText, AiError>;
}

