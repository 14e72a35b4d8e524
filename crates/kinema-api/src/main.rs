//! Axum API server binary.
//!
//! Runs the HTTP surface and the worker loops in one process; the job
//! queue is in-memory, so both sides must share it.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kinema_api::{create_router, ApiConfig, AppState};
use kinema_catalog::{CatalogRepository, MemoryCatalog};
use kinema_queue::{JobChannel, StatusRegistry};
use kinema_storage::{ObjectStore, S3Store};
use kinema_worker::{spawn_workers, PipelineContext, WorkerConfig};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Starting kinema-api");

    let api_config = ApiConfig::from_env();
    let worker_config = WorkerConfig::from_env();
    info!("API config: host={}, port={}", api_config.host, api_config.port);

    let storage: Arc<dyn ObjectStore> = match S3Store::from_env().await {
        Ok(store) => Arc::new(store),
        Err(err) => {
            error!("Failed to initialize object store: {}", err);
            std::process::exit(1);
        }
    };
    // The in-memory catalog is the default backend; a durable repository
    // plugs in at the same trait seam.
    let catalog: Arc<dyn CatalogRepository> = Arc::new(MemoryCatalog::new());

    let registry = Arc::new(StatusRegistry::new());
    let transcode_queue = Arc::new(JobChannel::new(Arc::clone(&registry)));
    let subtitle_queue = Arc::new(JobChannel::new(Arc::clone(&registry)));

    let ctx = match PipelineContext::new(
        Arc::clone(&storage),
        catalog,
        Arc::clone(&registry),
        worker_config,
    ) {
        Ok(ctx) => Arc::new(ctx),
        Err(err) => {
            error!("Failed to build pipeline context: {}", err);
            std::process::exit(1);
        }
    };

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let workers = spawn_workers(
        ctx,
        Arc::clone(&transcode_queue),
        Arc::clone(&subtitle_queue),
        shutdown_rx,
    );

    let state = AppState::new(
        api_config.clone(),
        storage,
        registry,
        transcode_queue,
        subtitle_queue,
    );
    let app = create_router(state);

    let addr: SocketAddr = format!("{}:{}", api_config.host, api_config.port)
        .parse()
        .expect("Invalid bind address");
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Stop the worker loops once the HTTP side has drained.
    let _ = shutdown_tx.send(true);
    for handle in workers {
        let _ = handle.await;
    }

    info!("Server shutdown complete");
}

/// Initialize tracing with colored output for dev, JSON for production.
fn init_tracing() {
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env().add_directive("kinema=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(true).with_target(true))
            .with(env_filter)
            .init();
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Received shutdown signal");
}
