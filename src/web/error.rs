//! Structured API error responses.
//!
//! Every handler failure becomes a JSON body with a stable machine-readable
//! code; upstream failures are logged once here, at the boundary, and never
//! bubble a panic into the response path.

use crate::heatmap::clock::ClockError;
use crate::upstream::UpstreamError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;
use tracing::{error, warn};
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ApiErrorCode {
    BadRequest,
    InvalidDay,
    InvalidTime,
    NotFound,
    /// Upstream could not be reached; the client should show its no-data state.
    UpstreamUnavailable,
    /// Upstream answered with an error status.
    UpstreamRejected,
    Internal,
}

#[derive(Debug)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::BadRequest, message)
    }

    pub fn invalid_day(raw: &str) -> Self {
        Self::new(
            ApiErrorCode::InvalidDay,
            format!("Unknown day {raw:?}. Valid: M, T, W, th, F"),
        )
    }

    pub fn invalid_time(raw: &str, source: &ClockError) -> Self {
        Self::new(
            ApiErrorCode::InvalidTime,
            format!("Bad time {raw:?}: {source}"),
        )
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::Internal, message)
    }

    fn status(&self) -> StatusCode {
        match self.code {
            ApiErrorCode::BadRequest | ApiErrorCode::InvalidDay | ApiErrorCode::InvalidTime => {
                StatusCode::BAD_REQUEST
            }
            ApiErrorCode::NotFound => StatusCode::NOT_FOUND,
            ApiErrorCode::UpstreamUnavailable | ApiErrorCode::UpstreamRejected => {
                StatusCode::BAD_GATEWAY
            }
            ApiErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": {
                "code": self.code,
                "message": self.message,
            }
        });
        (self.status(), Json(body)).into_response()
    }
}

/// Map an upstream failure to a response, logging it once.
///
/// Network-level failures read as "no data available" so the client renders
/// its empty state; an error status from upstream is reported as such.
pub fn upstream_error(context: &str, e: UpstreamError) -> ApiError {
    warn!(error = ?e, "{context} failed");
    if e.is_network() {
        ApiError::new(ApiErrorCode::UpstreamUnavailable, "No data available")
    } else {
        ApiError::new(
            ApiErrorCode::UpstreamRejected,
            format!("{context} failed upstream"),
        )
    }
}

/// Map a rendering failure on data that already parsed. This means upstream
/// shipped a time block the clock arithmetic rejects, which is worth an
/// error-level log.
pub fn render_error(context: &str, e: ClockError) -> ApiError {
    error!(error = %e, "{context} produced unrenderable schedule data");
    ApiError::internal_error("Schedule data could not be rendered")
}
