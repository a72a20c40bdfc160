//! Storage models for ClickHouse.
//!
//! These types are used for persisting weather readings to ClickHouse.

use clickhouse::Row;
use serde::{Deserialize, Serialize};

use skywatch_common::{from_decimal, to_decimal, DecimalError, WeatherRecord};

/// Weather reading as stored in ClickHouse
#[derive(Debug, Clone, PartialEq, Row, Serialize, Deserialize)]
pub struct StoredReading {
    /// ISO-8601 UTC timestamp
    pub timestamp: String,

    /// Location
    pub city: String,

    /// Temperature as decimal text
    pub temperature: String,

    /// Conditions description
    pub description: String,
}

impl StoredReading {
    /// Convert a WeatherRecord to a StoredReading
    pub fn from_record(record: &WeatherRecord) -> Self {
        StoredReading {
            timestamp: record.timestamp.clone(),
            city: record.city.clone(),
            temperature: to_decimal(record.temperature),
            description: record.description.clone(),
        }
    }

    /// Convert back into a WeatherRecord, parsing the decimal temperature
    pub fn into_record(self) -> Result<WeatherRecord, DecimalError> {
        Ok(WeatherRecord {
            temperature: from_decimal(&self.temperature)?,
            timestamp: self.timestamp,
            city: self.city,
            description: self.description,
        })
    }
}
