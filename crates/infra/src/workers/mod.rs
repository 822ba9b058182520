//! Background workers.

pub mod reply_queue;

pub use reply_queue::{
    JobFailure, QueueError, QueueStats, ReplyQueue, ReplyQueueHandle, ReplyWorker, WorkerConfig,
};
