//! HTTP server setup with Axum

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::rest::{log, stats, store};
use super::state::AppState;

/// Methods served under `/api/`
const API_METHODS: [Method; 4] = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

/// Create the Axum router with all endpoints
///
/// Paths outside the API are served from `static_dir`. Methods a route does
/// not list get `405 Method Not Allowed`, and so do HEAD and plain OPTIONS
/// requests under `/api/`.
pub fn create_router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(API_METHODS)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // REST API endpoints
        .route(
            "/api/log",
            get(log::list_logs)
                .post(log::create_log)
                .put(log::update_log)
                .delete(log::delete_logs),
        )
        .route("/api/log/last", delete(log::delete_last).post(log::delete_last))
        .route("/api/stats", get(stats::get_stats))
        .route("/api/store", get(store::get_store_stats))
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(middleware::from_fn(api_methods_only))
        .with_state(state)
}

/// Answer 405 for API requests using a method outside [`API_METHODS`]
///
/// Runs outside the CORS layer. A CORS preflight still passes through.
async fn api_methods_only(req: Request, next: Next) -> Response {
    let is_api = req.uri().path().starts_with("/api/");
    let is_preflight = *req.method() == Method::OPTIONS
        && req.headers().contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    if is_api && !is_preflight && !API_METHODS.contains(req.method()) {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    next.run(req).await
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
