use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use thiserror::Error;
use tracing::{debug, warn};

use autoreply_auth::SystemCredential;
use autoreply_core::{CommentId, PostId};

use super::endpoint;

/// Path of the comment-creation endpoint on the content API.
pub const CONTENT_COMMENTS_PATH: &str = "/comments";

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("content api request failed: {0}")]
    Transport(String),
}

/// Posts generated replies back into the content system.
///
/// A completed exchange is always `Ok(status)`, whatever the status; only a
/// failure to complete the exchange is an error.
#[async_trait]
pub trait ContentClient: Send + Sync + 'static {
    async fn post_comment(
        &self,
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
        content: &str,
    ) -> Result<StatusCode, ContentError>;
}

/// Content API client authenticated as the system actor.
#[derive(Debug, Clone)]
pub struct HttpContentClient {
    http: Client,
    endpoint: String,
    credential: SystemCredential,
}

impl HttpContentClient {
    pub fn new(base_url: &str, credential: SystemCredential, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url, credential))
    }

    pub fn with_client(http: Client, base_url: &str, credential: SystemCredential) -> Self {
        Self {
            http,
            endpoint: endpoint(base_url, CONTENT_COMMENTS_PATH),
            credential,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ContentClient for HttpContentClient {
    async fn post_comment(
        &self,
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
        content: &str,
    ) -> Result<StatusCode, ContentError> {
        let parent = parent_comment_id.unwrap_or_default();
        let form = [
            ("content", content.to_string()),
            ("postID", post_id.to_string()),
            ("parentCommentID", parent.to_string()),
        ];

        let response = self
            .http
            .post(&self.endpoint)
            .header(header::AUTHORIZATION, self.credential.bearer())
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, endpoint = %self.endpoint, "content api request failed");
                ContentError::Transport(e.to_string())
            })?;

        let status = response.status();
        debug!(post_id = %post_id, parent_comment_id = %parent, status = %status, "content api responded");
        Ok(status)
    }
}
