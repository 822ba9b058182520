//! HTTP API application wiring (Axum router + shared state).
//!
//! - `routes/`: HTTP handlers
//! - `dto.rs`: response bodies
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use autoreply_auth::{Hs256JwtValidator, JwtValidator};
use autoreply_infra::ReplyQueue;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;

/// Build the full HTTP router around a running reply queue.
///
/// Caller tokens are verified with the same HS256 secret the system
/// credential is signed with.
pub fn build_app(queue: ReplyQueue, jwt_secret: &str) -> Router {
    let jwt: Arc<dyn JwtValidator> = Arc::new(Hs256JwtValidator::new(jwt_secret.as_bytes().to_vec()));
    build_app_with_validator(queue, jwt)
}

pub fn build_app_with_validator(queue: ReplyQueue, jwt: Arc<dyn JwtValidator>) -> Router {
    let auth_state = middleware::AuthState { jwt };

    let protected = routes::router().layer(
        ServiceBuilder::new()
            .layer(Extension(queue))
            .layer(axum::middleware::from_fn_with_state(
                auth_state,
                middleware::auth_middleware,
            )),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(protected)
}
