//! OpenWeatherMap current-conditions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::HandlerError;
use crate::services::{CurrentConditions, WeatherSource};

/// Subset of the current weather payload we rely on
#[derive(Debug, Deserialize)]
struct CurrentWeatherResponse {
    main: MainBlock,
    weather: Vec<ConditionBlock>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct ConditionBlock {
    description: String,
}

/// HTTP client for the weather service
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
}

impl OpenWeatherClient {
    /// Create a new client against the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherClient {
    async fn current(&self, city: &str, api_key: &str) -> Result<CurrentConditions, HandlerError> {
        let url = format!("{}/data/2.5/weather", self.base_url);
        debug!("Requesting current weather for {}", city);

        let body: CurrentWeatherResponse = self.client
            .get(&url)
            .query(&[("q", city), ("appid", api_key), ("units", "metric")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let description = body
            .weather
            .into_iter()
            .next()
            .map(|c| c.description)
            .ok_or_else(|| {
                HandlerError::ExternalService("response has no weather conditions".to_string())
            })?;

        Ok(CurrentConditions {
            temperature: body.main.temp,
            description,
        })
    }
}
