//! ClickHouse record store - writes and scans weather readings.

use async_trait::async_trait;
use clickhouse::sql::Identifier;
use clickhouse::Client as ClickHouseClient;
use tracing::{debug, info};

use skywatch_common::WeatherRecord;

use crate::error::HandlerError;
use crate::models::StoredReading;
use crate::services::RecordStore;

/// Record store backed by a single ClickHouse table
#[derive(Clone)]
pub struct ClickHouseStore {
    client: ClickHouseClient,
    table: String,
}

impl ClickHouseStore {
    /// Create a store over the given table
    pub fn new(client: ClickHouseClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    /// Build a ClickHouse client for a server and database
    pub fn client(url: &str, database: &str) -> ClickHouseClient {
        info!("Using ClickHouse at {} (database {})", url, database);
        ClickHouseClient::default()
            .with_url(url)
            .with_database(database)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Initialize the ClickHouse schema
    pub async fn init_schema(&self) -> Result<(), clickhouse::error::Error> {
        info!("Initializing ClickHouse schema for {}", self.table);

        let create_table = r#"
            CREATE TABLE IF NOT EXISTS ? (
                timestamp String,
                city LowCardinality(String),
                temperature String,
                description String
            ) ENGINE = MergeTree()
            ORDER BY timestamp
        "#;

        self.client
            .query(create_table)
            .bind(Identifier(&self.table))
            .execute()
            .await?;
        info!("ClickHouse schema initialized for {}", self.table);

        Ok(())
    }
}

#[async_trait]
impl RecordStore for ClickHouseStore {
    async fn put(&self, record: &WeatherRecord) -> Result<(), HandlerError> {
        let row = StoredReading::from_record(record);

        let mut insert = self.client.insert::<StoredReading>(&self.table)?;
        insert.write(&row).await?;
        insert.end().await?;

        debug!("Inserted reading {} into {}", row.timestamp, self.table);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<WeatherRecord>, HandlerError> {
        let rows = self.client
            .query("SELECT ?fields FROM ?")
            .bind(Identifier(&self.table))
            .fetch_all::<StoredReading>()
            .await?;
        debug!("Scanned {} readings from {}", rows.len(), self.table);

        let records = rows
            .into_iter()
            .map(StoredReading::into_record)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }
}
