//! HTTP API: ingestion of reply jobs and queue introspection.

pub mod app;
pub mod context;
pub mod middleware;
