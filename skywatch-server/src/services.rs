//! Seams between the handlers and the outside world.
//!
//! Each external service sits behind a small trait so handlers can run
//! against in-memory fakes in tests.

use async_trait::async_trait;

use skywatch_common::{AlertMessage, WeatherRecord};

use crate::error::HandlerError;

/// Current conditions as reported by the weather service
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub description: String,
}

/// Source of current weather
#[async_trait]
pub trait WeatherSource: Send + Sync {
    /// Fetch current conditions for a location
    async fn current(&self, city: &str, api_key: &str) -> Result<CurrentConditions, HandlerError>;
}

/// Persistent store of weather records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persist a single record
    async fn put(&self, record: &WeatherRecord) -> Result<(), HandlerError>;

    /// Read every record, in no particular order
    async fn scan(&self) -> Result<Vec<WeatherRecord>, HandlerError>;
}

/// Fire-and-forget alert dispatch
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Publish an alert to the given topic
    async fn publish(&self, topic: &str, alert: &AlertMessage) -> Result<(), HandlerError>;
}
