//! NATS alert publishing.

use async_nats::Client;
use async_trait::async_trait;
use tracing::{debug, info};

use skywatch_common::AlertMessage;

use crate::error::HandlerError;
use crate::services::Notifier;

/// NATS publisher for temperature alerts
#[derive(Clone)]
pub struct NatsPublisher {
    client: Client,
}

impl NatsPublisher {
    /// Connect to NATS and create a publisher
    pub async fn connect(url: &str) -> Result<Self, async_nats::ConnectError> {
        info!("Connecting to NATS at {}", url);
        let client = async_nats::connect(url).await?;
        info!("Connected to NATS");

        Ok(Self { client })
    }
}

#[async_trait]
impl Notifier for NatsPublisher {
    async fn publish(&self, topic: &str, alert: &AlertMessage) -> Result<(), HandlerError> {
        let payload = serde_json::to_vec(alert)
            .map_err(|e| HandlerError::Notification(e.to_string()))?;

        self.client
            .publish(topic.to_string(), payload.into())
            .await
            .map_err(|e| HandlerError::Notification(e.to_string()))?;
        debug!("Published alert {:?} to {}", alert.subject, topic);

        Ok(())
    }
}
