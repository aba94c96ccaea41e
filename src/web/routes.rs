//! Web API router construction and shared response utilities.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use http::HeaderValue;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer,
};

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{buildings, classrooms, overview, status, upload, used_classrooms};

/// Largest spreadsheet the upload relay accepts.
const UPLOAD_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// Cache-Control presets for public endpoints.
///
/// Edge caches respect `s-maxage` and `stale-while-revalidate` for serving
/// stale content while re-fetching in the background.
pub mod cache {
    /// Building directory -- changes only on spreadsheet upload.
    pub const REFERENCE: &str = "public, max-age=300, s-maxage=3600, stale-while-revalidate=300";
    /// Rendered heatmap snapshots.
    pub const SNAPSHOT: &str = "public, max-age=60, s-maxage=300, stale-while-revalidate=120";
}

/// Wraps a JSON response with a `Cache-Control` header.
pub fn with_cache_control<T: serde::Serialize>(value: T, header: &'static str) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(header),
    );
    response
}

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/overview", get(overview::overview))
        .route("/buildings", get(buildings::buildings))
        .route("/classrooms/{name}", get(classrooms::classroom_detail))
        .route("/used-classrooms", get(used_classrooms::used_classrooms))
        .route(
            "/upload",
            post(upload::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .with_state(app_state);

    let router = Router::new().nest("/api", api_router);

    router.layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        // The dashboard frontend is served from a different origin.
        CorsLayer::permissive(),
        CompressionLayer::new()
            .zstd(true)
            .br(true)
            .gzip(true)
            .quality(tower_http::CompressionLevel::Fastest),
        TimeoutLayer::new(Duration::from_secs(60)),
    ))
}
