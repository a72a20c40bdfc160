//! Shared types for the Skywatch weather monitor.
//!
//! This crate contains the record and alert types shared between the
//! ingest handler (which writes readings and raises alerts) and the query
//! handler (which reads readings back for display).
//!
//! Any changes to the record format should be made here.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Table that holds weather readings unless configured otherwise.
pub const DEFAULT_TABLE: &str = "weather_history";

/// Body returned by a successful ingest run.
pub const INGEST_SUCCESS_BODY: &str = "Function executed successfully!";

/// Format a timestamp the way records are keyed.
///
/// Fixed-width RFC 3339 with microseconds, so lexical order matches time order.
pub fn record_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// A decimal column value that could not be read back as a number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid decimal value {0:?}")]
pub struct DecimalError(pub String);

/// Encode a temperature as decimal text for storage
pub fn to_decimal(value: f64) -> String {
    value.to_string()
}

/// Decode stored decimal text into a plain float
pub fn from_decimal(text: &str) -> Result<f64, DecimalError> {
    match text.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(DecimalError(text.to_string())),
    }
}

/// A single weather reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// When the reading was taken (ISO-8601, UTC). Sort key.
    pub timestamp: String,

    /// Location the reading is for
    pub city: String,

    /// Temperature in degrees Celsius
    pub temperature: f64,

    /// Free-text conditions, e.g. "broken clouds"
    pub description: String,
}

impl WeatherRecord {
    /// Create a record stamped with the given time
    pub fn new(
        city: impl Into<String>,
        temperature: f64,
        description: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: record_timestamp(at),
            city: city.into(),
            temperature,
            description: description.into(),
        }
    }
}

/// Order records newest first
pub fn sort_newest_first(records: &mut [WeatherRecord]) {
    records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
}

/// Alert published when a reading is above the configured threshold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertMessage {
    pub subject: String,
    pub message: String,
    pub city: String,
    pub temperature: f64,
    pub threshold: f64,
    pub description: String,
}

impl AlertMessage {
    /// Build the alert for a reading
    pub fn new(record: &WeatherRecord, threshold: f64) -> Self {
        let city = &record.city;
        let message = format!(
            "Weather Alert for {city}!\n\n\
             The current temperature is {}°C, which is above your threshold of {threshold}°C.\n\n\
             Full details: {}.",
            record.temperature, record.description,
        );

        Self {
            subject: format!("High Temperature Alert for {city}"),
            message,
            city: city.clone(),
            temperature: record.temperature,
            threshold,
            description: record.description.clone(),
        }
    }
}

/// Returns an alert if the reading is strictly above the threshold.
///
/// A reading equal to the threshold does not alert.
pub fn check_threshold(record: &WeatherRecord, threshold: f64) -> Option<AlertMessage> {
    if record.temperature > threshold {
        Some(AlertMessage::new(record, threshold))
    } else {
        None
    }
}

/// Result envelope returned by both handlers.
///
/// `body` is always a JSON document encoded as a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    pub body: String,
}

impl HandlerResponse {
    /// 200 with the given value as JSON body, or 500 if it cannot be encoded
    pub fn ok<T: Serialize + ?Sized>(body: &T) -> Self {
        match serde_json::to_string(body) {
            Ok(body) => Self {
                status_code: 200,
                headers: BTreeMap::new(),
                body,
            },
            Err(e) => Self::internal_error(e),
        }
    }

    /// 500 carrying the error's display string
    pub fn internal_error(err: impl fmt::Display) -> Self {
        let message = format!("Error: {err}");
        Self {
            status_code: 500,
            headers: BTreeMap::new(),
            body: serde_json::to_string(&message).unwrap_or_default(),
        }
    }

    /// Add a response header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
