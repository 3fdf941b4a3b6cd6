//! Statistics endpoint

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{page_newest_first, PaginationParams};
use crate::api::state::AppState;
use crate::summary::{TimeWindow, Totals};
use crate::types::Event;
use crate::utils::now_local;

/// Query parameters for statistics
#[derive(Debug, Deserialize)]
pub struct StatsParams {
    /// Window selector: `1h`, `24h`, `today` or `all` (default)
    pub duration: Option<String>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

/// Totals for a window plus one page of its events
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub totals: Totals,
    /// Events in the window, newest first
    pub logs: Vec<Event>,
    /// Number of events in the window
    pub total: usize,
    pub page: usize,
    pub limit: usize,
    pub duration: &'static str,
}

/// GET /api/stats - Totals over a time window
///
/// Totals cover every event in the window; `logs` is only the requested page.
pub async fn get_stats(
    State(state): State<Arc<AppState>>,
    Query(params): Query<StatsParams>,
) -> Json<StatsResponse> {
    let window = TimeWindow::from_selector(params.duration.as_deref());
    let page = params.pagination.page();
    let limit = params.pagination.limit();

    let matching = window.filter(state.store.get_all(), &now_local());
    let totals = Totals::from_events(&matching);

    Json(StatsResponse {
        totals,
        logs: page_newest_first(&matching, page, limit),
        total: matching.len(),
        page,
        limit,
        duration: window.as_str(),
    })
}
