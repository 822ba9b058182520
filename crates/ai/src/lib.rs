//! `autoreply-ai`
//!
//! **Responsibility:** language-model inference boundary.
//!
//! This crate defines what the reply worker needs from a model service and
//! nothing else:
//! - It never posts content or touches the queue.
//! - Transport implementations live in `autoreply-infra`.

pub mod job;
pub mod result;

pub use job::InferenceClient;
pub use result::{AiError, GeneratedText, InferenceResponse};
