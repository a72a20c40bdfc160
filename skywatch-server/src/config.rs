//! Configuration for Skywatch server.
//!
//! All configuration is read from environment variables (a `.env` file is
//! honoured). Infrastructure settings have defaults; the ingest settings
//! must be provided.

use std::env;
use std::time::Duration;

use skywatch_common::DEFAULT_TABLE;

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Settings for one ingest run
#[derive(Clone)]
pub struct IngestConfig {
    /// Weather service API key
    pub api_key: String,

    /// Location to poll
    pub city: String,

    /// NATS subject alerts are published to
    pub alert_subject: String,

    /// Alert when the temperature is strictly above this
    pub threshold: f64,

    /// Table readings are written to
    pub table: String,
}

impl std::fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestConfig")
            .field("api_key", &"<redacted>")
            .field("city", &self.city)
            .field("alert_subject", &self.alert_subject)
            .field("threshold", &self.threshold)
            .field("table", &self.table)
            .finish()
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server host
    pub host: String,

    /// HTTP server port
    pub port: u16,

    /// NATS server URL
    pub nats_url: String,

    /// ClickHouse URL
    pub clickhouse_url: String,

    /// ClickHouse database name
    pub clickhouse_database: String,

    /// Weather service base URL
    pub weather_api_url: String,

    /// Ingest handler settings
    pub ingest: IngestConfig,

    /// Seconds between scheduled ingest runs, 0 disables the schedule
    pub ingest_interval_secs: u64,

    /// Log level
    pub log_level: String,

    /// Enable JSON logging
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let threshold_raw = required("TEMP_THRESHOLD")?;
        let threshold = threshold_raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or(ConfigError::Invalid {
                name: "TEMP_THRESHOLD",
                value: threshold_raw.clone(),
            })?;

        let table = or("RECORD_TABLE", DEFAULT_TABLE);
        if !is_identifier(&table) {
            return Err(ConfigError::Invalid {
                name: "RECORD_TABLE",
                value: table,
            });
        }

        let ingest = IngestConfig {
            api_key: required("WEATHER_API_KEY")?,
            city: required("CITY_NAME")?,
            alert_subject: required("ALERT_SUBJECT")?,
            threshold,
            table,
        };

        let port = match lookup("PORT") {
            Some(p) => p.parse().map_err(|_| ConfigError::Invalid { name: "PORT", value: p })?,
            None => 8080,
        };

        let ingest_interval_secs = match lookup("INGEST_INTERVAL_SECS") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid {
                name: "INGEST_INTERVAL_SECS",
                value: s,
            })?,
            None => 3600,
        };

        Ok(Self {
            host: or("HOST", "0.0.0.0"),
            port,
            nats_url: or("NATS_URL", "nats://localhost:4222"),
            clickhouse_url: or("CLICKHOUSE_URL", "http://localhost:8123"),
            clickhouse_database: or("CLICKHOUSE_DATABASE", "skywatch"),
            weather_api_url: or("WEATHER_API_URL", "https://api.openweathermap.org"),
            ingest,
            ingest_interval_secs,
            log_level: or("LOG_LEVEL", "info"),
            log_json: lookup("LOG_JSON")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }

    /// Get the full server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Interval for scheduled ingest runs, if enabled
    pub fn ingest_interval(&self) -> Option<Duration> {
        (self.ingest_interval_secs > 0).then(|| Duration::from_secs(self.ingest_interval_secs))
    }
}

/// Plain SQL identifier: a letter or underscore, then letters, digits, underscores
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
