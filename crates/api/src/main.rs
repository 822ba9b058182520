use anyhow::Context;
use tracing::{info, warn};

use autoreply_auth::Hs256SystemIssuer;
use autoreply_infra::{AppConfig, ReplyQueue};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    autoreply_observability::init();

    let config = AppConfig::from_env()?;

    let ttl = chrono::Duration::from_std(config.credential_ttl)
        .context("system credential ttl out of range")?;
    let issuer = Hs256SystemIssuer::new(config.jwt_secret.as_bytes()).with_ttl(ttl);
    let (queue, worker) = ReplyQueue::start(&config.queue, &issuer)?;

    let app = autoreply_api::app::build_app(queue, &config.jwt_secret);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let stats = worker.shutdown().await;
    info!(
        processed = stats.processed,
        succeeded = stats.succeeded,
        failed = stats.failed,
        discarded = stats.discarded,
        "reply queue stopped"
    );

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
