//! Outbound HTTP adapters for the reply worker's two collaborators.

pub mod content;
pub mod inference;

pub use content::{CONTENT_COMMENTS_PATH, ContentClient, ContentError, HttpContentClient};
pub use inference::{HttpInferenceClient, INFERENCE_PROMPT_PATH};

/// Join a base URL and an absolute path without doubling the slash.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}
