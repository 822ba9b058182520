//! Infrastructure layer: configuration, outbound service clients and the
//! reply queue worker.

pub mod config;
pub mod external;
pub mod jobs;
pub mod workers;

pub use config::{AppConfig, ConfigError, QueueConfig};
pub use workers::{QueueStats, ReplyQueue, ReplyQueueHandle};
