use axum::{
    Router,
    routing::{get, post},
};

pub mod replies;
pub mod system;

/// Router for all authenticated endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/replies", post(replies::enqueue_reply))
        .route("/replies/stats", get(replies::stats))
}
