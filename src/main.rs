//! Payroll engine HTTP server.

use std::error::Error;
use std::path::{Path, PathBuf};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::service::PayrollService;
use payroll_engine::store::{MemoryStore, Snapshot};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const CONFIG_DIR_ENV: &str = "PAYROLL_CONFIG_DIR";
const DEFAULT_CONFIG_DIR: &str = "./config";
/// Snapshot file loaded on startup and written on shutdown. Unset keeps
/// records in memory only.
const DATA_FILE_ENV: &str = "PAYROLL_DATA_FILE";

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let config_dir =
        std::env::var(CONFIG_DIR_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;
    let bind_address = config.bind_address().to_string();
    info!(
        config_dir = %config_dir,
        organization = %config.organization().name,
        policy = ?config.status_override_policy(),
        "Configuration loaded"
    );

    let data_file = std::env::var(DATA_FILE_ENV).ok().map(PathBuf::from);
    let store = match &data_file {
        Some(path) => open_store(path)?,
        None => MemoryStore::new(),
    };
    let state = AppState::with_service(PayrollService::new(store, config));

    let router = create_router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!(address = %bind_address, "Payroll API listening");
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(path) = &data_file {
        let snapshot = state.service().backup()?;
        snapshot.save(path)?;
        info!(
            path = %path.display(),
            records = snapshot.record_count(),
            "Records written"
        );
    }

    Ok(())
}

fn open_store(path: &Path) -> Result<MemoryStore, Box<dyn Error>> {
    match Snapshot::load(path)? {
        Some(snapshot) => {
            let records = snapshot.record_count();
            let store = MemoryStore::from_snapshot(snapshot)?;
            info!(path = %path.display(), records, "Records loaded");
            Ok(store)
        }
        None => {
            info!(path = %path.display(), "No data file yet, starting empty");
            Ok(MemoryStore::new())
        }
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
