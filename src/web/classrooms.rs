//! Single-classroom detail handler.

use axum::extract::{Path, State};
use axum::response::Response;

use crate::state::AppState;
use crate::view::classroom::ClassroomDetail;
use crate::web::error::{ApiError, render_error, upstream_error};
use crate::web::routes::{cache, with_cache_control};

/// `GET /api/classrooms/{name}`
///
/// An unknown classroom is not an error upstream; it comes back as an empty
/// week and renders as "no course data", matching the dashboard's behavior.
pub(super) async fn classroom_detail(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ApiError::bad_request("classroom name is required"));
    }

    let week = state
        .upstream
        .classroom_data(name)
        .await
        .map_err(|e| upstream_error("Classroom lookup", e))?;

    let detail = ClassroomDetail::from_snapshot(name, &week)
        .map_err(|e| render_error("Classroom detail", e))?;

    Ok(with_cache_control(detail, cache::SNAPSHOT))
}
