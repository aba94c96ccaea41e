//! Building directory handler, feeding the filter dropdown.

use axum::extract::State;
use axum::response::Response;
use indexmap::IndexMap;
use serde::Serialize;
use ts_rs::TS;

use crate::filter::BuildingFilter;
use crate::state::AppState;
use crate::web::error::{ApiError, upstream_error};
use crate::web::routes::{cache, with_cache_control};

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BuildingsResponse {
    /// code → display name, in upstream directory order (includes the
    /// select-all sentinel row for the dropdown header).
    #[ts(type = "Record<string, string>")]
    pub buildings: IndexMap<String, String>,
    /// Codes the filter may actually select: sentinel and the excluded
    /// off-campus code removed.
    pub selectable: Vec<String>,
}

/// `GET /api/buildings`
pub(super) async fn buildings(State(state): State<AppState>) -> Result<Response, ApiError> {
    let names = match state.directory.get().await {
        Some(names) => names,
        None => {
            // Startup load failed or hasn't happened; fetch read-through.
            state
                .directory
                .load(&state.upstream)
                .await
                .map_err(|e| upstream_error("Building directory fetch", e))?;
            state
                .directory
                .get()
                .await
                .ok_or_else(|| ApiError::internal_error("building directory empty after load"))?
        }
    };

    let filter =
        BuildingFilter::from_codes(names.keys().cloned(), state.excluded_building.as_deref());
    let selectable = filter.codes().map(str::to_owned).collect();

    Ok(with_cache_control(
        BuildingsResponse {
            buildings: (*names).clone(),
            selectable,
        },
        cache::REFERENCE,
    ))
}
