//! Reply job delivery policy.
//!
//! ## Design
//!
//! - Default delivery is at-most-once: a failed job is logged and dropped
//! - `RetryPolicy` opts into bounded retries with backoff per outbound step
//! - `DeadLetterSink` receives every job that is finally given up on
//! - Nothing here persists across restarts

pub mod dead_letter;
pub mod policy;

pub use dead_letter::{DeadLetter, DeadLetterSink, InMemoryDeadLetterSink, LogDeadLetterSink};
pub use policy::{BackoffStrategy, RetryPolicy};
