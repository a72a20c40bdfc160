//! Query handler: return every stored reading, newest first.

use std::sync::Arc;

use tracing::{debug, error};

use skywatch_common::{sort_newest_first, HandlerResponse, WeatherRecord};

use crate::error::HandlerError;
use crate::services::RecordStore;

/// Reads the full history back out of the record store
#[derive(Clone)]
pub struct QueryHandler {
    store: Arc<dyn RecordStore>,
}

impl QueryHandler {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Scan, sort and wrap the records as a JSON response
    pub async fn handle(&self) -> HandlerResponse {
        match self.records().await {
            Ok(records) => HandlerResponse::ok(&records)
                .with_header("Access-Control-Allow-Origin", "*"),
            Err(e) => {
                error!("Failed to read weather history: {}", e);
                HandlerResponse::internal_error(&e)
            }
        }
    }

    /// All records, newest first. Full scan, no pagination.
    pub async fn records(&self) -> Result<Vec<WeatherRecord>, HandlerError> {
        let mut records = self.store.scan().await?;
        sort_newest_first(&mut records);
        debug!("Returning {} readings", records.len());
        Ok(records)
    }
}
