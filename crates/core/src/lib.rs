//! `autoreply-core`: shared domain primitives for the reply pipeline.
//!
//! Pure data only (no IO): identifiers, the job payload and the domain error.

pub mod error;
pub mod id;
pub mod record;

pub use error::{DomainError, DomainResult};
pub use id::{CommentId, PostId, UserId};
pub use record::{Author, Comment, JobRecord, Post};
