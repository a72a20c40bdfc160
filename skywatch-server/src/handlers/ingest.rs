//! Ingest handler: fetch current weather, persist it, alert above threshold.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use skywatch_common::{check_threshold, HandlerResponse, WeatherRecord, INGEST_SUCCESS_BODY};

use crate::config::IngestConfig;
use crate::error::HandlerError;
use crate::services::{Notifier, RecordStore, WeatherSource};

/// What a successful run did
#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub record: WeatherRecord,
    pub alerted: bool,
}

/// Runs the fetch, store, alert sequence
#[derive(Clone)]
pub struct IngestHandler {
    weather: Arc<dyn WeatherSource>,
    store: Arc<dyn RecordStore>,
    notifier: Arc<dyn Notifier>,
    config: IngestConfig,
}

impl IngestHandler {
    pub fn new(
        weather: Arc<dyn WeatherSource>,
        store: Arc<dyn RecordStore>,
        notifier: Arc<dyn Notifier>,
        config: IngestConfig,
    ) -> Self {
        Self {
            weather,
            store,
            notifier,
            config,
        }
    }

    /// Run once and fold any failure into a 500 response
    pub async fn handle(&self) -> HandlerResponse {
        let span = info_span!("ingest", run_id = %Uuid::new_v4(), city = %self.config.city);

        async {
            match self.run().await {
                Ok(_) => HandlerResponse::ok(INGEST_SUCCESS_BODY),
                Err(e) => {
                    error!("An error occurred: {}", e);
                    HandlerResponse::internal_error(&e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Run once, stopping at the first failing step.
    ///
    /// A record written before a notification failure stays written.
    pub async fn run(&self) -> Result<IngestOutcome, HandlerError> {
        let config = &self.config;

        info!("Fetching weather for {}", config.city);
        let current = self.weather.current(&config.city, &config.api_key).await?;
        info!("Fetched weather, current temperature is {}°C", current.temperature);

        let record = WeatherRecord::new(
            config.city.as_str(),
            current.temperature,
            current.description,
            Utc::now(),
        );
        self.store.put(&record).await?;
        info!("Saved reading {} to {}", record.timestamp, config.table);

        let alerted = match check_threshold(&record, config.threshold) {
            Some(alert) => {
                info!("Temperature is above the threshold of {}°C, sending alert", config.threshold);
                self.notifier.publish(&config.alert_subject, &alert).await?;
                info!("Alert sent to {}", config.alert_subject);
                true
            }
            None => {
                info!("Temperature is not above the threshold, no alert sent");
                false
            }
        };

        Ok(IngestOutcome { record, alerted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_ingest_config, Call, FakeServices};

    fn handler(services: &FakeServices, threshold: f64) -> IngestHandler {
        IngestHandler::new(
            services.weather(),
            services.store(),
            services.notifier(),
            test_ingest_config(threshold),
        )
    }

    #[tokio::test]
    async fn test_above_threshold_sends_alert() {
        let services = FakeServices::with_weather(35.0, "clear sky");
        let response = handler(&services, 30.0).handle().await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, "\"Function executed successfully!\"");

        let alerts = services.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].0, "skywatch.alerts");
        assert_eq!(alerts[0].1.subject, "High Temperature Alert for Lisbon");
        assert_eq!(alerts[0].1.temperature, 35.0);
        assert_eq!(alerts[0].1.description, "clear sky");
    }

    #[tokio::test]
    async fn test_below_threshold_no_alert() {
        let services = FakeServices::with_weather(20.0, "light rain");
        let response = handler(&services, 30.0).handle().await;

        assert_eq!(response.status_code, 200);
        assert!(services.alerts().is_empty());
        assert_eq!(services.records().len(), 1);
    }

    #[tokio::test]
    async fn test_equal_to_threshold_no_alert() {
        let services = FakeServices::with_weather(30.0, "haze");
        let outcome = handler(&services, 30.0).run().await.unwrap();

        assert!(!outcome.alerted);
        assert!(services.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_record_written_before_alert() {
        let services = FakeServices::with_weather(40.0, "hot");
        let outcome = handler(&services, 30.0).run().await.unwrap();

        assert!(outcome.alerted);
        assert_eq!(services.calls(), vec![Call::Fetch, Call::Put, Call::Publish]);

        let records = services.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0], outcome.record);
        assert_eq!(records[0].city, "Lisbon");
    }

    #[tokio::test]
    async fn test_fetch_failure_writes_nothing() {
        let services = FakeServices::with_weather(40.0, "hot");
        services.fail_fetch();
        let response = handler(&services, 30.0).handle().await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.starts_with("\"Error: weather service error"));
        assert!(services.records().is_empty());
        assert!(services.alerts().is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_skips_alert() {
        let services = FakeServices::with_weather(40.0, "hot");
        services.fail_put();
        let response = handler(&services, 30.0).handle().await;

        assert_eq!(response.status_code, 500);
        assert!(services.records().is_empty());
        assert!(services.alerts().is_empty());
        assert_eq!(services.calls(), vec![Call::Fetch, Call::Put]);
    }

    #[tokio::test]
    async fn test_notify_failure_keeps_record() {
        let services = FakeServices::with_weather(40.0, "hot");
        services.fail_publish();
        let response = handler(&services, 30.0).handle().await;

        assert_eq!(response.status_code, 500);
        assert!(response.body.contains("notification error"));
        assert_eq!(services.records().len(), 1);
        assert!(services.alerts().is_empty());
    }
}
