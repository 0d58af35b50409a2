//! `mock-arm`: local stand-in for the Azure token endpoint and Resource
//! Manager.
//!
//! Point the console at it with
//! `ARMCONSOLE_AUTHORITY_HOST=http://localhost:4010` and
//! `ARMCONSOLE_RESOURCE_MANAGER_URL=http://localhost:4010/`, and log in with
//! the configured client secret (`mock-secret` by default).

use anyhow::Context;
use mock_arm::MockConfig;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = MockConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.listen_port);
    info!(
        subscriptions = config.subscriptions.len(),
        page_size = config.page_size,
        "mock configuration loaded"
    );

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(address = %addr, "mock resource manager listening");

    axum::serve(listener, mock_arm::router(config))
        .await
        .context("server error")?;
    Ok(())
}
