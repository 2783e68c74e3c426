use anyhow::Result;
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod config;
mod errors;
mod handlers;
mod models;
mod routes;
mod services;

use config::{AppConfig, BackendKind};
use services::{
    object_store::{MemoryObjectStore, ObjectStore},
    s3_store::S3ObjectStore,
    storage_service::{GatewayConfig, StorageService},
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // --- Parse config ---
    let cfg = AppConfig::from_env_and_args()?;

    tracing::info!("Starting user-file-gateway with config: {:?}", cfg);

    // --- Initialize backend ---
    let store: Arc<dyn ObjectStore> = match cfg.backend {
        BackendKind::S3 => Arc::new(S3ObjectStore::from_config(&cfg).await),
        BackendKind::Memory => {
            tracing::warn!("Using in-memory backend; files are lost on restart");
            Arc::new(MemoryObjectStore::new())
        }
    };
    tracing::info!("Backend {} ready for bucket {}", cfg.backend, cfg.bucket);

    // --- Initialize core service ---
    let storage = StorageService::new(
        store,
        GatewayConfig {
            bucket: cfg.bucket.clone(),
        },
    );

    // --- Build router ---
    let app = routes::routes::app(storage, cfg.max_upload_bytes);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
