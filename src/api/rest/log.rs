//! Event log endpoints

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::{ApiError, PaginationParams};
use crate::api::state::AppState;
use crate::types::{Event, EventInput};
use crate::utils::{now_local, parse_timestamp};

/// One page of the event log
#[derive(Debug, Serialize)]
pub struct LogPage {
    pub logs: Vec<Event>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

/// Query parameters for updating an event
#[derive(Debug, Deserialize)]
pub struct UpdateParams {
    /// RFC 3339 timestamp of the event to replace
    pub timestamp: Option<String>,
}

/// Parse a timestamp taken from a query string
///
/// An unencoded `+` in the offset arrives as a space, so put it back.
fn parse_key(raw: &str) -> Result<DateTime<FixedOffset>, ApiError> {
    let restored = raw.trim().replace(' ', "+");
    parse_timestamp(&restored)
        .map_err(|e| ApiError::bad_request(format!("Invalid timestamp '{}': {}", raw, e)))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(value)| value)
        .map_err(|e| ApiError::bad_request(format!("Invalid request body: {}", e.body_text())))
}

/// GET /api/log - List events, newest first
pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> Json<LogPage> {
    let page = params.page();
    let limit = params.limit();
    let (logs, total) = state.store.get_page(page, limit);

    Json(LogPage {
        logs,
        total,
        page,
        limit,
    })
}

/// POST /api/log - Record an event
///
/// Events sent without a timestamp are stamped with the server's local time.
pub async fn create_log(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let event = body(payload)?.into_event(now_local());
    let timestamp = event.timestamp;

    state.store.append(event)?;
    debug!(%timestamp, "Saved event");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "status": "saved", "timestamp": timestamp })),
    ))
}

/// PUT /api/log?timestamp= - Replace an event
///
/// A body without a timestamp keeps the key's timestamp.
pub async fn update_log(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UpdateParams>,
    payload: Result<Json<EventInput>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let raw = params
        .timestamp
        .ok_or_else(|| ApiError::bad_request("Missing 'timestamp' query parameter"))?;
    let key = parse_key(&raw)?;
    let event = body(payload)?.into_event(key);

    state.store.update(&key, event)?;

    Ok(Json(json!({ "status": "updated" })))
}

/// DELETE /api/log - Delete events by timestamp
///
/// The body is a JSON array of RFC 3339 timestamps. These come from JSON, not
/// a query string, so a space is taken as written.
pub async fn delete_logs(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<String>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let keys = body(payload)?
        .iter()
        .map(|raw| {
            parse_timestamp(raw)
                .map_err(|e| ApiError::bad_request(format!("Invalid timestamp '{}': {}", raw, e)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let count = state.store.delete_batch(&keys)?;

    Ok(Json(json!({ "status": "deleted", "count": count })))
}

/// DELETE|POST /api/log/last - Delete the most recently recorded event
pub async fn delete_last(State(state): State<Arc<AppState>>) -> Result<Json<Value>, ApiError> {
    state.store.delete_last()?;
    Ok(Json(json!({ "status": "deleted" })))
}
