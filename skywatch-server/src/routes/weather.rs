//! Weather endpoints: trigger an ingest run, read the history back.

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};

use skywatch_common::HandlerResponse;

use crate::routes::AppState;

/// Map a handler envelope onto an HTTP response 1:1
pub fn into_http(response: HandlerResponse) -> Response {
    let status = StatusCode::from_u16(response.status_code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut http = (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        response.body,
    )
        .into_response();

    for (name, value) in &response.headers {
        match (HeaderName::from_bytes(name.as_bytes()), HeaderValue::from_str(value)) {
            (Ok(name), Ok(value)) => {
                http.headers_mut().insert(name, value);
            }
            _ => warn!("Dropping invalid response header {}", name),
        }
    }

    http
}

/// POST /ingest - Run the ingest handler once
pub async fn ingest(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Ingest requested over HTTP");
    into_http(state.ingest.handle().await)
}

/// GET /weather - Stored readings, newest first
pub async fn history(State(state): State<AppState>) -> impl IntoResponse {
    into_http(state.query.handle().await)
}
