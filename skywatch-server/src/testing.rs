//! In-memory fakes of the external services, for handler and route tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use skywatch_common::{AlertMessage, WeatherRecord};

use crate::config::IngestConfig;
use crate::error::HandlerError;
use crate::services::{CurrentConditions, Notifier, RecordStore, WeatherSource};

/// External call, in the order the fakes saw them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Fetch,
    Put,
    Scan,
    Publish,
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    conditions: Option<CurrentConditions>,
    records: Vec<WeatherRecord>,
    alerts: Vec<(String, AlertMessage)>,
    fail_fetch: bool,
    fail_put: bool,
    fail_scan: bool,
    fail_publish: bool,
}

/// Weather source, record store and notifier sharing one recorded state
#[derive(Clone, Default)]
pub struct FakeServices {
    state: Arc<Mutex<State>>,
}

impl FakeServices {
    pub fn with_weather(temperature: f64, description: &str) -> Self {
        let services = Self::default();
        services.state.lock().unwrap().conditions = Some(CurrentConditions {
            temperature,
            description: description.to_string(),
        });
        services
    }

    pub fn weather(&self) -> Arc<dyn WeatherSource> {
        Arc::new(self.clone())
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        Arc::new(self.clone())
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::new(self.clone())
    }

    pub fn seed(&self, records: Vec<WeatherRecord>) {
        self.state.lock().unwrap().records.extend(records);
    }

    pub fn fail_fetch(&self) {
        self.state.lock().unwrap().fail_fetch = true;
    }

    pub fn fail_put(&self) {
        self.state.lock().unwrap().fail_put = true;
    }

    pub fn fail_scan(&self) {
        self.state.lock().unwrap().fail_scan = true;
    }

    pub fn fail_publish(&self) {
        self.state.lock().unwrap().fail_publish = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn records(&self) -> Vec<WeatherRecord> {
        self.state.lock().unwrap().records.clone()
    }

    pub fn alerts(&self) -> Vec<(String, AlertMessage)> {
        self.state.lock().unwrap().alerts.clone()
    }
}

#[async_trait]
impl WeatherSource for FakeServices {
    async fn current(&self, _city: &str, _api_key: &str) -> Result<CurrentConditions, HandlerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Fetch);
        if state.fail_fetch {
            return Err(HandlerError::ExternalService("503 Service Unavailable".to_string()));
        }
        state
            .conditions
            .clone()
            .ok_or_else(|| HandlerError::ExternalService("no conditions".to_string()))
    }
}

#[async_trait]
impl RecordStore for FakeServices {
    async fn put(&self, record: &WeatherRecord) -> Result<(), HandlerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Put);
        if state.fail_put {
            return Err(HandlerError::Storage("table is read-only".to_string()));
        }
        state.records.push(record.clone());
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<WeatherRecord>, HandlerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Scan);
        if state.fail_scan {
            return Err(HandlerError::Storage("connection refused".to_string()));
        }
        Ok(state.records.clone())
    }
}

#[async_trait]
impl Notifier for FakeServices {
    async fn publish(&self, topic: &str, alert: &AlertMessage) -> Result<(), HandlerError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Publish);
        if state.fail_publish {
            return Err(HandlerError::Notification("no responders".to_string()));
        }
        state.alerts.push((topic.to_string(), alert.clone()));
        Ok(())
    }
}

pub fn test_ingest_config(threshold: f64) -> IngestConfig {
    IngestConfig {
        api_key: "test-key".to_string(),
        city: "Lisbon".to_string(),
        alert_subject: "skywatch.alerts".to_string(),
        threshold,
        table: "weather_history".to_string(),
    }
}

/// Record taken `secs` seconds after a fixed base time
pub fn record_at(secs: i64, temperature: f64) -> WeatherRecord {
    let at = Utc.timestamp_opt(1_714_564_800 + secs, 0).unwrap();
    WeatherRecord::new("Lisbon", temperature, "scattered clouds", at)
}
