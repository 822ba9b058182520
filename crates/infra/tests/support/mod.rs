#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use autoreply_ai::{AiError, GeneratedText, InferenceClient};
use autoreply_core::{Comment, CommentId, JobRecord, Post, PostId};
use autoreply_infra::ReplyQueue;
use autoreply_infra::external::{ContentClient, ContentError};

/// Job tagged by its parent post id; the comment text mirrors the tag.
pub fn job(tag: i64) -> JobRecord {
    JobRecord {
        comment: Comment {
            id: CommentId::new(1000 + tag),
            content: format!("job-{tag}"),
            ..Default::default()
        },
        parent_comment: None,
        parent_post: Post {
            id: PostId::new(tag),
            content: "thread root".to_string(),
            ..Default::default()
        },
        model: "llama3".to_string(),
    }
}

pub fn job_with_model(tag: i64, model: &str) -> JobRecord {
    JobRecord {
        model: model.to_string(),
        ..job(tag)
    }
}

/// Inference stub that records calls and tracks concurrency.
#[derive(Default)]
pub struct StubInference {
    calls: Mutex<Vec<JobRecord>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
    failing_models: Vec<String>,
    hanging_models: Vec<String>,
    transient_failures: AtomicUsize,
}

impl StubInference {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Jobs with this model always fail.
    pub fn failing_for(mut self, model: &str) -> Self {
        self.failing_models.push(model.to_string());
        self
    }

    /// Jobs with this model never complete.
    pub fn hanging_for(mut self, model: &str) -> Self {
        self.hanging_models.push(model.to_string());
        self
    }

    /// The next `n` calls fail regardless of job.
    pub fn failing_first(self, n: usize) -> Self {
        self.transient_failures.store(n, Ordering::SeqCst);
        self
    }

    pub fn reply_for(job: &JobRecord) -> String {
        format!("generated reply to {}", job.comment.content)
    }

    pub fn calls(&self) -> Vec<JobRecord> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InferenceClient for StubInference {
    async fn prompt(&self, job: &JobRecord) -> Result<GeneratedText, AiError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(job.clone());

        if self.hanging_models.contains(&job.model) {
            std::future::pending::<()>().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing_models.contains(&job.model) {
            return Err(AiError::Status {
                status: 500,
                body: "model unavailable".to_string(),
            });
        }
        let transient = self
            .transient_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if transient {
            return Err(AiError::Transport("connection reset".to_string()));
        }

        Ok(GeneratedText::new(Self::reply_for(job)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedReply {
    pub post_id: PostId,
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
}

/// Content API stub that records posts and can reject chosen posts.
#[derive(Default)]
pub struct StubContent {
    posts: Mutex<Vec<PostedReply>>,
    rejected_posts: Vec<PostId>,
}

impl StubContent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer 500 for replies to this post.
    pub fn rejecting(mut self, post_id: i64) -> Self {
        self.rejected_posts.push(PostId::new(post_id));
        self
    }

    pub fn posts(&self) -> Vec<PostedReply> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post_ids(&self) -> Vec<i64> {
        self.posts().iter().map(|p| p.post_id.get()).collect()
    }
}

#[async_trait]
impl ContentClient for StubContent {
    async fn post_comment(
        &self,
        post_id: PostId,
        parent_comment_id: Option<CommentId>,
        content: &str,
    ) -> Result<StatusCode, ContentError> {
        self.posts.lock().unwrap().push(PostedReply {
            post_id,
            parent_comment_id,
            content: content.to_string(),
        });

        if self.rejected_posts.contains(&post_id) {
            Ok(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            Ok(StatusCode::CREATED)
        }
    }
}

/// Poll until the worker has processed `n` jobs.
pub async fn wait_for_processed(queue: &ReplyQueue, n: u64) {
    let waited = tokio::time::timeout(Duration::from_secs(10), async {
        while queue.stats().processed < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    if waited.is_err() {
        panic!("worker processed {:?} within timeout, wanted {n}", queue.stats());
    }
}

/// Stub HTTP server bound to an ephemeral port; aborted on drop.
pub struct TestServer {
    pub base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    pub async fn spawn(router: axum::Router) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
