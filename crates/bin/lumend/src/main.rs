//! # lumend — lumen daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Parse configuration (env vars, config file)
//! - Install the `tracing` subscriber
//! - Construct the region registry over the bridge driver factory
//! - Start the command processor and the resync ticker
//! - Build the axum router, injecting the processor handle
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (SIGTERM/SIGINT)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use lumen_adapter_http_axum::router;
use lumen_adapter_http_axum::state::AppState;
use lumen_adapter_limitless::BridgeFactory;
use lumen_app::processor::CommandProcessor;
use lumen_app::registry::Registry;
use lumen_app::ticker::spawn_resync_ticker;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Processor
    let regions = Arc::new(config.regions.clone());
    let registry = Registry::new(config.regions.clone(), BridgeFactory);
    let (processor, handle) = CommandProcessor::new(registry);
    let processor_task = processor.spawn();
    let ticker = spawn_resync_ticker(handle.clone(), config.sync.interval());

    // HTTP
    let app = router::build(AppState::new(handle, regions));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(
        %bind_addr,
        regions = config.regions.len(),
        sync_interval_secs = config.sync.interval_secs,
        "lumend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Once the ticker is gone no handle is left, so the processor drains its
    // queue and stops.
    ticker.abort();
    let _ = ticker.await;
    processor_task.await?;
    tracing::info!("lumend stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received, draining connections");
}
