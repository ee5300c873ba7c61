//! Route configuration and setup

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Json, Router,
};
use nice_embed_core::AppConfig;
use nice_embed_infra::request_id_middleware;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;

/// Build the application router with its middleware stack.
pub fn setup_routes(config: &AppConfig, state: Arc<AppState>) -> Router {
    tracing::info!(
        max_upload_size_mb = config.max_upload_size_bytes / 1024 / 1024,
        http_concurrency_limit = config.http_concurrency_limit,
        "HTTP limits configured"
    );

    Router::new()
        .route("/", get(handlers::index::index))
        .route("/uploadfiles/", post(handlers::upload::upload_file))
        .route("/uploadfiles", post(handlers::upload::upload_file))
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        // Multipart's own 2 MB default would undercut the limit above.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
}
