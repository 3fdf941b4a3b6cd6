//! REST API module for HTTP endpoints
//!
//! - `GET /api/log` - Paginated events, newest first
//! - `POST /api/log` - Record an event
//! - `PUT /api/log?timestamp=` - Replace the event with that timestamp
//! - `DELETE /api/log` - Delete every event matching a list of timestamps
//! - `DELETE|POST /api/log/last` - Delete the most recently recorded event
//! - `GET /api/stats` - Totals and events for a time window
//! - `GET /api/store` - Storage statistics

pub mod log;
pub mod stats;
pub mod store;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::event_store::EventStoreError;
use crate::types::Event;

const DEFAULT_PAGE: usize = 1;
const DEFAULT_LIMIT: usize = 50;

/// Common pagination parameters
///
/// Kept as raw strings so that a missing, non-numeric, or zero value falls
/// back to the default instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    /// 1-based page number (default: 1)
    #[serde(default)]
    pub page: Option<String>,
    /// Page size (default: 50)
    #[serde(default)]
    pub limit: Option<String>,
}

fn positive_or(value: Option<&str>, default: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}

impl PaginationParams {
    pub fn page(&self) -> usize {
        positive_or(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> usize {
        positive_or(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

/// Take one page of `events` (stored oldest first), newest first
pub fn page_newest_first(events: &[Event], page: usize, limit: usize) -> Vec<Event> {
    events
        .iter()
        .rev()
        .skip(page.saturating_sub(1).saturating_mul(limit))
        .take(limit)
        .cloned()
        .collect()
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub code: String,
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: message.into(),
            code: "NOT_FOUND".to_string(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            code: "BAD_REQUEST".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: message.into(),
            code: "INTERNAL_ERROR".to_string(),
        }
    }
}

impl From<EventStoreError> for ApiError {
    fn from(e: EventStoreError) -> Self {
        match e {
            EventStoreError::NotFound | EventStoreError::Empty => ApiError::not_found(e.to_string()),
            other => {
                error!(error = %other, "Event store failure");
                ApiError::internal(other.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}
