//! Handler error types.

/// Failure of one step in a handler run.
///
/// Callers never see the variant, only a 500 carrying the display string.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// Weather service request failed or returned an unusable payload
    #[error("weather service error: {0}")]
    ExternalService(String),

    /// Record store read or write failed
    #[error("record store error: {0}")]
    Storage(String),

    /// Alert could not be published
    #[error("notification error: {0}")]
    Notification(String),
}

impl From<reqwest::Error> for HandlerError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL carries the API key
        HandlerError::ExternalService(err.without_url().to_string())
    }
}

impl From<clickhouse::error::Error> for HandlerError {
    fn from(err: clickhouse::error::Error) -> Self {
        HandlerError::Storage(err.to_string())
    }
}

impl From<skywatch_common::DecimalError> for HandlerError {
    fn from(err: skywatch_common::DecimalError) -> Self {
        HandlerError::Storage(err.to_string())
    }
}
