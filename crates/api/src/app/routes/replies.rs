use axum::{
    Json,
    body::Bytes,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, warn};

use autoreply_core::JobRecord;
use autoreply_infra::ReplyQueue;

use crate::app::dto::ReplyAccepted;
use crate::context::PrincipalContext;

/// Accept a reply job and hand it to the queue without waiting on it.
///
/// A body that does not decode still enqueues an empty record; the worker
/// then fails it like any other bad job.
pub async fn enqueue_reply(
    Extension(queue): Extension<ReplyQueue>,
    Extension(principal): Extension<PrincipalContext>,
    body: Bytes,
) -> impl IntoResponse {
    let job = JobRecord::from_json(&body).unwrap_or_else(|e| {
        warn!(error = %e, subject = principal.subject(), "undecodable reply job body");
        JobRecord::default()
    });

    debug!(
        subject = principal.subject(),
        post_id = %job.parent_post.id,
        model = %job.model,
        "reply job accepted"
    );
    queue.enqueue(job);

    (StatusCode::ACCEPTED, Json(ReplyAccepted::queued()))
}

pub async fn stats(Extension(queue): Extension<ReplyQueue>) -> impl IntoResponse {
    Json(queue.stats())
}
