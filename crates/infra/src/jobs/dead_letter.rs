//! Dead letters: reply jobs dropped after their final failure.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::error;

use autoreply_core::JobRecord;

/// A reply job that was given up on.
#[derive(Debug, Clone, Serialize)]
pub struct DeadLetter {
    /// Enqueue sequence number of the job.
    pub seq: u64,
    pub job: JobRecord,
    pub reason: String,
    /// Attempts made on the failing step.
    pub attempts: u32,
    pub dead_lettered_at: DateTime<Utc>,
}

impl DeadLetter {
    pub fn new(seq: u64, job: JobRecord, reason: impl Into<String>, attempts: u32) -> Self {
        Self {
            seq,
            job,
            reason: reason.into(),
            attempts,
            dead_lettered_at: Utc::now(),
        }
    }
}

/// Destination for dropped jobs. Never persists across restarts.
pub trait DeadLetterSink: Send + Sync + 'static {
    fn record(&self, letter: DeadLetter);
}

/// Writes dead letters to the log and nowhere else.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDeadLetterSink;

impl DeadLetterSink for LogDeadLetterSink {
    fn record(&self, letter: DeadLetter) {
        let payload = serde_json::to_string(&letter.job).unwrap_or_default();
        error!(
            job = letter.seq,
            attempts = letter.attempts,
            reason = %letter.reason,
            payload = %payload,
            "reply job dropped"
        );
    }
}

/// In-memory sink for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryDeadLetterSink {
    inner: Mutex<Vec<DeadLetter>>,
}

impl InMemoryDeadLetterSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<DeadLetter> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl DeadLetterSink for InMemoryDeadLetterSink {
    fn record(&self, letter: DeadLetter) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(letter);
    }
}
