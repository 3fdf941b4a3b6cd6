//! Storage statistics endpoint

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use super::ApiError;
use crate::api::state::AppState;
use crate::event_store::EventStoreStats;

/// Storage statistics with readable sizes
#[derive(Debug, Serialize)]
pub struct StoreInfo {
    pub path: String,
    #[serde(flatten)]
    pub stats: EventStoreStats,
    pub active_log_size_human: String,
    pub backup_size_human: String,
    pub total_size_human: String,
}

/// GET /api/store - Active log and backup statistics
pub async fn get_store_stats(State(state): State<Arc<AppState>>) -> Result<Json<StoreInfo>, ApiError> {
    let stats = state.store.stats()?;

    Ok(Json(StoreInfo {
        path: state.store.path().display().to_string(),
        active_log_size_human: EventStoreStats::format_size(stats.active_log_size),
        backup_size_human: EventStoreStats::format_size(stats.backup_size),
        total_size_human: EventStoreStats::format_size(stats.total_size()),
        stats,
    }))
}
