mod config;
mod conversion;
mod errors;
mod layout;
mod render;
mod routes;
mod state;
mod table;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::conversion::storage::TempStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting sheetpress v{}", env!("CARGO_PKG_VERSION"));

    // Temporary storage for uploads and pending downloads
    std::fs::create_dir_all(&config.upload_dir).with_context(|| {
        format!(
            "failed to create upload directory {}",
            config.upload_dir.display()
        )
    })?;
    let store = TempStore::new(config.upload_dir.clone()).with_output_ttl(config.output_ttl);
    let swept = store
        .sweep_expired()
        .context("failed to sweep upload directory")?;
    info!(
        "Temporary storage at {} (max upload {} bytes, output TTL {}s, swept {swept})",
        store.dir().display(),
        config.max_upload_bytes,
        config.output_ttl.as_secs()
    );

    let state = AppState {
        config: config.clone(),
        store,
    };

    let app = build_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
