//! phonebook - REST backend for phonebook entries and phone numbers.

use phonebook::api::{self, AppState};
use phonebook::config::{self, Config};
use phonebook::db::Database;
use phonebook::{http, metrics};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), config_path);
    }

    info!(
        name = %config.server.name,
        address = %config.listen.address,
        database = %config.database_path(),
        "Starting phonebook"
    );

    // Initialize database
    let db = Database::new(config.database_path()).await?;
    let state = AppState::new(db, &config.server.name)?;

    // Prometheus metrics are optional.
    // Convention: metrics_port = 0 disables the HTTP endpoint.
    match config.metrics_port() {
        None => info!("Metrics disabled"),
        Some(metrics_port) => {
            metrics::init();
            info!("Metrics initialized");

            tokio::spawn(async move {
                http::run_metrics_server(metrics_port).await;
            });
            info!(port = metrics_port, "Prometheus HTTP server started");
        }
    }

    http::run_api_server(config.listen.address, api::router(state)).await?;

    info!("phonebook stopped");
    Ok(())
}
