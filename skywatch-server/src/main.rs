//! Skywatch Server - weather ingestion, alerting and history
//!
//! Architecture:
//! - The ingest handler fetches current weather from OpenWeatherMap,
//!   persists a reading to ClickHouse and publishes an alert to NATS when
//!   the temperature is above the configured threshold
//! - The query handler scans ClickHouse and returns every reading, newest first
//! - Axum exposes both handlers over HTTP; a background task also runs the
//!   ingest handler on a fixed schedule
//!
//! # Usage
//!
//! ```bash
//! # Requires NATS and ClickHouse running
//! WEATHER_API_KEY=... CITY_NAME=Lisbon ALERT_SUBJECT=skywatch.alerts TEMP_THRESHOLD=30 \
//!     cargo run --bin skywatch-server
//! ```

mod clickhouse;
mod config;
mod error;
mod handlers;
mod models;
mod nats;
mod routes;
mod schedule;
mod services;
mod weather;

#[cfg(test)]
mod testing;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use skywatch_common::DEFAULT_TABLE;

use crate::clickhouse::ClickHouseStore;
use crate::config::Config;
use crate::handlers::{IngestHandler, QueryHandler};
use crate::nats::NatsPublisher;
use crate::routes::{router, AppState};
use crate::schedule::run_ingest_schedule;
use crate::weather::OpenWeatherClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    // Setup logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init();
    }

    info!("Starting Skywatch Server v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    // Service clients, shared by every invocation
    let nats = NatsPublisher::connect(&config.nats_url)
        .await
        .context("Failed to connect to NATS")?;

    let clickhouse_client = ClickHouseStore::client(&config.clickhouse_url, &config.clickhouse_database);
    let ingest_store = ClickHouseStore::new(clickhouse_client.clone(), config.ingest.table.clone());
    let history_store = ClickHouseStore::new(clickhouse_client, DEFAULT_TABLE);

    ingest_store.init_schema().await.context("Failed to initialize ClickHouse schema")?;
    if history_store.table() != ingest_store.table() {
        history_store.init_schema().await.context("Failed to initialize ClickHouse schema")?;
    }

    let weather = OpenWeatherClient::new(&config.weather_api_url)
        .context("Failed to build weather client")?;

    let ingest = IngestHandler::new(
        Arc::new(weather),
        Arc::new(ingest_store),
        Arc::new(nats),
        config.ingest.clone(),
    );
    let query = QueryHandler::new(Arc::new(history_store));

    // Start scheduled ingest in background
    let schedule = config
        .ingest_interval()
        .map(|period| tokio::spawn(run_ingest_schedule(ingest.clone(), period)));
    if schedule.is_none() {
        info!("Scheduled ingest disabled");
    }

    // Create app state
    let state = AppState {
        ingest,
        query,
        started_at: Instant::now(),
    };

    let app = router(state);

    // Start server
    let addr: SocketAddr = config.server_addr().parse().context("Invalid listen address")?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(task) = schedule {
        task.abort();
    }

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
