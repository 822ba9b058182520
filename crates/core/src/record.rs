//! Reply job payload.
//!
//! A [`JobRecord`] is the immutable description of one reply-generation
//! request. The queue treats it as an opaque payload: it is serialized as-is
//! for the inference service and only its thread addressing (`parent_post`,
//! `parent_comment`) is read when the generated reply is posted back.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::id::{CommentId, PostId, UserId};

/// Author of a post or comment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    #[serde(alias = "ID")]
    pub id: UserId,
    pub username: String,
}

/// A comment in a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    #[serde(alias = "ID")]
    pub id: CommentId,
    pub content: String,
    pub author: Author,
}

/// The post that roots a thread.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    #[serde(alias = "ID")]
    pub id: PostId,
    pub content: String,
    pub author: Author,
}

/// One reply-generation request.
///
/// Every field defaults, so any JSON object decodes into a (possibly
/// zero-valued) record; malformed jobs fail later, during processing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JobRecord {
    /// The newly authored comment that asked for a reply.
    pub comment: Comment,
    /// The comment being replied to; `None` when the parent is the post itself.
    pub parent_comment: Option<Comment>,
    pub parent_post: Post,
    /// Language model identifier.
    pub model: String,
}

impl JobRecord {
    /// Decode a record from a JSON body.
    pub fn from_json(bytes: &[u8]) -> DomainResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| DomainError::validation(format!("job record: {e}")))
    }

    /// Post the generated reply belongs to.
    pub fn reply_post_id(&self) -> PostId {
        self.parent_post.id
    }

    /// Comment the generated reply is attached under, if any.
    pub fn reply_parent_comment_id(&self) -> Option<CommentId> {
        self.parent_comment
            .as_ref()
            .map(|c| c.id)
            .filter(|id| !id.is_unset())
    }
}
