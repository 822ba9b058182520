use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use reqwest::StatusCode;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Notify, mpsc};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use autoreply_ai::{AiError, GeneratedText, InferenceClient};
use autoreply_auth::{IssueError, SystemActor, SystemIdentityIssuer};
use autoreply_core::JobRecord;

use crate::config::QueueConfig;
use crate::external::{ContentClient, ContentError, HttpContentClient, HttpInferenceClient};
use crate::jobs::{DeadLetter, DeadLetterSink, LogDeadLetterSink, RetryPolicy};

/// Errors that prevent the queue from starting.
#[derive(Debug, Error)]
pub enum QueueError {
    #[error("failed to mint system credential: {0}")]
    Credential(#[from] IssueError),

    #[error("failed to build http client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Why a single reply step failed.
#[derive(Debug, Error)]
pub enum JobFailure {
    #[error("inference failed: {0}")]
    Inference(#[from] AiError),

    #[error("posting reply failed: {0}")]
    Content(#[from] ContentError),

    #[error("content api rejected reply with status {0}")]
    Rejected(StatusCode),

    #[error("{step} call timed out after {after:?}")]
    Timeout { step: &'static str, after: Duration },
}

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Name for logging
    pub name: String,
    /// Deadline for each outbound call
    pub call_timeout: Duration,
    pub retry: RetryPolicy,
    /// Treat a non-2xx from the content API as a failure instead of done.
    pub strict_content_status: bool,
    /// Process queued jobs on shutdown instead of discarding them.
    pub drain_on_shutdown: bool,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            name: "reply-worker".to_string(),
            call_timeout: Duration::from_secs(30),
            retry: RetryPolicy::no_retry(),
            strict_content_status: false,
            drain_on_shutdown: true,
        }
    }
}

impl WorkerConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_strict_content_status(mut self, strict: bool) -> Self {
        self.strict_content_status = strict;
        self
    }

    pub fn with_drain_on_shutdown(mut self, drain: bool) -> Self {
        self.drain_on_shutdown = drain;
        self
    }
}

/// Queue counters snapshot.
///
/// Every processed job lands in exactly one of `succeeded`, `rejected`
/// (non-2xx accepted as done) or `failed`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct QueueStats {
    pub enqueued: u64,
    pub processed: u64,
    pub succeeded: u64,
    pub rejected: u64,
    pub failed: u64,
    pub retried: u64,
    pub dead_lettered: u64,
    pub discarded: u64,
    pub pending: u64,
}

#[derive(Debug, Default)]
struct QueueCounters {
    enqueued: AtomicU64,
    processed: AtomicU64,
    succeeded: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
    retried: AtomicU64,
    dead_lettered: AtomicU64,
    discarded: AtomicU64,
}

impl QueueCounters {
    fn bump(counter: &AtomicU64) -> u64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn snapshot(&self) -> QueueStats {
        let enqueued = self.enqueued.load(Ordering::SeqCst);
        let processed = self.processed.load(Ordering::SeqCst);
        let discarded = self.discarded.load(Ordering::SeqCst);

        QueueStats {
            enqueued,
            processed,
            succeeded: self.succeeded.load(Ordering::SeqCst),
            rejected: self.rejected.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            retried: self.retried.load(Ordering::SeqCst),
            dead_lettered: self.dead_lettered.load(Ordering::SeqCst),
            discarded,
            pending: enqueued.saturating_sub(processed).saturating_sub(discarded),
        }
    }
}

#[derive(Debug)]
struct Envelope {
    seq: u64,
    job: JobRecord,
    enqueued_at: Instant,
}

/// Producer side of the reply queue.
///
/// Cheap to clone; hand one to every request handler. Jobs are processed in
/// enqueue order by a single [`ReplyWorker`].
#[derive(Debug, Clone)]
pub struct ReplyQueue {
    tx: mpsc::UnboundedSender<Envelope>,
    counters: Arc<QueueCounters>,
}

impl ReplyQueue {
    /// Mint the system credential, build the HTTP collaborators from
    /// `config` and spawn the worker. Must be called inside a tokio runtime.
    ///
    /// Fails if the credential cannot be issued; there is no degraded mode.
    pub fn start(
        config: &QueueConfig,
        issuer: &dyn SystemIdentityIssuer,
    ) -> Result<(ReplyQueue, ReplyQueueHandle), QueueError> {
        let credential = issuer.issue(&SystemActor::well_known())?;

        let timeout = config.worker.call_timeout;
        let inference = HttpInferenceClient::new(&config.inference_base_url, timeout)?;
        let content = HttpContentClient::new(&config.content_base_url, credential, timeout)?;

        info!(
            inference = %inference.endpoint(),
            content = %content.endpoint(),
            "reply queue collaborators configured"
        );

        let (queue, worker) = Self::channel(
            Arc::new(inference),
            Arc::new(content),
            Arc::new(LogDeadLetterSink),
            config.worker.clone(),
        );
        Ok((queue, worker.spawn()))
    }

    /// Build a queue and its (not yet running) worker.
    ///
    /// Jobs enqueued before [`ReplyWorker::spawn`] are kept in order.
    pub fn channel(
        inference: Arc<dyn InferenceClient>,
        content: Arc<dyn ContentClient>,
        dead_letters: Arc<dyn DeadLetterSink>,
        config: WorkerConfig,
    ) -> (ReplyQueue, ReplyWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let counters = Arc::new(QueueCounters::default());

        let queue = ReplyQueue {
            tx,
            counters: counters.clone(),
        };
        let worker = ReplyWorker {
            rx,
            inference,
            content,
            dead_letters,
            config,
            counters,
            shutdown: Arc::new(Notify::new()),
        };
        (queue, worker)
    }

    /// Append `job` to the tail of the queue.
    ///
    /// Never blocks and never fails: after shutdown the job is logged and
    /// discarded.
    pub fn enqueue(&self, job: JobRecord) {
        let seq = QueueCounters::bump(&self.counters.enqueued);
        let envelope = Envelope {
            seq,
            job,
            enqueued_at: Instant::now(),
        };

        match self.tx.send(envelope) {
            Ok(()) => debug!(job = seq, "reply job enqueued"),
            Err(mpsc::error::SendError(rejected)) => {
                QueueCounters::bump(&self.counters.discarded);
                warn!(job = rejected.seq, "reply queue is shut down; discarding job");
            }
        }
    }

    pub fn stats(&self) -> QueueStats {
        self.counters.snapshot()
    }
}

/// Handle to stop and join the running worker.
#[derive(Debug)]
pub struct ReplyQueueHandle {
    shutdown: Arc<Notify>,
    join: Option<JoinHandle<()>>,
    counters: Arc<QueueCounters>,
}

impl ReplyQueueHandle {
    /// Stop accepting jobs, finish the in-flight one, then drain or discard
    /// what is still queued (per [`WorkerConfig::drain_on_shutdown`]).
    pub async fn shutdown(mut self) -> QueueStats {
        self.shutdown.notify_one();
        if let Some(join) = self.join.take() {
            if let Err(e) = join.await {
                warn!(error = %e, "reply worker task ended abnormally");
            }
        }
        self.counters.snapshot()
    }

    pub fn stats(&self) -> QueueStats {
        self.counters.snapshot()
    }

    pub fn is_finished(&self) -> bool {
        self.join.as_ref().is_none_or(|j| j.is_finished())
    }
}

/// The single consumer of a [`ReplyQueue`].
pub struct ReplyWorker {
    rx: mpsc::UnboundedReceiver<Envelope>,
    inference: Arc<dyn InferenceClient>,
    content: Arc<dyn ContentClient>,
    dead_letters: Arc<dyn DeadLetterSink>,
    config: WorkerConfig,
    counters: Arc<QueueCounters>,
    shutdown: Arc<Notify>,
}

struct Exhausted {
    failure: JobFailure,
    attempts: u32,
}

impl ReplyWorker {
    /// Spawn the worker task. It runs until shutdown or until every
    /// [`ReplyQueue`] clone has been dropped.
    pub fn spawn(self) -> ReplyQueueHandle {
        let shutdown = self.shutdown.clone();
        let counters = self.counters.clone();
        let join = tokio::spawn(self.run());

        ReplyQueueHandle {
            shutdown,
            join: Some(join),
            counters,
        }
    }

    async fn run(mut self) {
        info!(worker = %self.config.name, "reply worker started");
        let shutdown = self.shutdown.clone();

        loop {
            let next = tokio::select! {
                biased;
                _ = shutdown.notified() => None,
                envelope = self.rx.recv() => envelope,
            };

            match next {
                Some(envelope) => self.process(envelope).await,
                None => break,
            }
        }

        self.rx.close();
        let mut leftover = 0u64;
        while let Some(envelope) = self.rx.recv().await {
            leftover += 1;
            if self.config.drain_on_shutdown {
                self.process(envelope).await;
            } else {
                QueueCounters::bump(&self.counters.discarded);
                warn!(worker = %self.config.name, job = envelope.seq, "discarding queued reply job on shutdown");
            }
        }

        info!(
            worker = %self.config.name,
            leftover,
            drained = self.config.drain_on_shutdown,
            "reply worker stopped"
        );
    }

    async fn process(&self, envelope: Envelope) {
        let Envelope { seq, job, enqueued_at } = envelope;
        let name = &self.config.name;

        debug!(
            worker = %name,
            job = seq,
            post_id = %job.parent_post.id,
            model = %job.model,
            waited_ms = enqueued_at.elapsed().as_millis() as u64,
            "processing reply job"
        );

        match self.deliver(seq, &job).await {
            Ok(status) if status.is_success() => {
                QueueCounters::bump(&self.counters.succeeded);
                info!(worker = %name, job = seq, post_id = %job.parent_post.id, "reply posted");
            }
            Ok(status) => {
                QueueCounters::bump(&self.counters.rejected);
                warn!(
                    worker = %name,
                    job = seq,
                    post_id = %job.parent_post.id,
                    status = %status,
                    "content api rejected reply; job considered done"
                );
            }
            Err(Exhausted { failure, attempts }) => {
                QueueCounters::bump(&self.counters.failed);
                warn!(worker = %name, job = seq, attempts, error = %failure, "reply job failed");
                self.dead_letters
                    .record(DeadLetter::new(seq, job, failure.to_string(), attempts));
                QueueCounters::bump(&self.counters.dead_lettered);
            }
        }

        QueueCounters::bump(&self.counters.processed);
    }

    async fn deliver(&self, seq: u64, job: &JobRecord) -> Result<StatusCode, Exhausted> {
        let text = self.with_retry(seq, "inference", || self.prompt(job)).await?;
        self.with_retry(seq, "content", || self.post(job, &text)).await
    }

    async fn prompt(&self, job: &JobRecord) -> Result<GeneratedText, JobFailure> {
        self.timed("inference", self.inference.prompt(job)).await
    }

    async fn post(&self, job: &JobRecord, text: &GeneratedText) -> Result<StatusCode, JobFailure> {
        let status = self
            .timed(
                "content",
                self.content
                    .post_comment(job.reply_post_id(), job.reply_parent_comment_id(), text.as_str()),
            )
            .await?;

        if self.config.strict_content_status && !status.is_success() {
            return Err(JobFailure::Rejected(status));
        }
        Ok(status)
    }

    async fn timed<T, E>(
        &self,
        step: &'static str,
        call: impl Future<Output = Result<T, E>>,
    ) -> Result<T, JobFailure>
    where
        JobFailure: From<E>,
    {
        let after = self.config.call_timeout;
        match tokio::time::timeout(after, call).await {
            Ok(result) => result.map_err(JobFailure::from),
            Err(_) => Err(JobFailure::Timeout { step, after }),
        }
    }

    async fn with_retry<T, F, Fut>(&self, seq: u64, step: &'static str, mut op: F) -> Result<T, Exhausted>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, JobFailure>>,
    {
        let policy = &self.config.retry;
        let mut retries = 0u32;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(failure) if policy.should_retry(retries) => {
                    retries += 1;
                    let delay = policy.delay_for_attempt(retries);
                    QueueCounters::bump(&self.counters.retried);
                    warn!(
                        worker = %self.config.name,
                        job = seq,
                        step,
                        retry = retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %failure,
                        "reply step failed; retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(failure) => {
                    return Err(Exhausted {
                        failure,
                        attempts: retries + 1,
                    });
                }
            }
        }
    }
}
