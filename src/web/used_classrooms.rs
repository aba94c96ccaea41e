//! Drill-down handler: rooms in use during one time block.

use axum::extract::State;
use axum::response::Response;
use futures::future::OptionFuture;
use serde::{Deserialize, Serialize};
use tracing::warn;
use ts_rs::TS;

use crate::data::{TimeBlock, Weekday};
use crate::heatmap::clock::BlockTime;
use crate::state::AppState;
use crate::upstream::UpstreamError;
use crate::view::used::UsedClassrooms;
use crate::web::error::{ApiError, upstream_error};
use crate::web::routes::{cache, with_cache_control};

#[derive(Debug, Deserialize, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UsedClassroomsParams {
    pub day: String,
    #[serde(default)]
    pub buildings: Vec<String>,
    pub start_time: String,
    pub end_time: String,
}

/// `GET /api/used-classrooms?day=M&buildings=CENG&startTime=09:00&endTime=09:50`
pub(super) async fn used_classrooms(
    State(state): State<AppState>,
    axum_extra::extract::Query(params): axum_extra::extract::Query<UsedClassroomsParams>,
) -> Result<Response, ApiError> {
    let day = Weekday::from_code(&params.day).ok_or_else(|| ApiError::invalid_day(&params.day))?;
    let start: BlockTime = params
        .start_time
        .parse()
        .map_err(|e| ApiError::invalid_time(&params.start_time, &e))?;
    let end: BlockTime = params
        .end_time
        .parse()
        .map_err(|e| ApiError::invalid_time(&params.end_time, &e))?;
    let block = TimeBlock::new(start, end);

    // The listing and both paging boundaries are independent lookups; no
    // boundary call is made at the edges of the schedule day.
    let past_fut: OptionFuture<_> = UsedClassrooms::wants_previous(block)
        .then(|| state.upstream.past_time(day, start, &params.buildings))
        .into();
    let next_fut: OptionFuture<_> = UsedClassrooms::wants_next(block)
        .then(|| state.upstream.next_time(day, end, &params.buildings))
        .into();
    let (rooms, past, next) = futures::join!(
        state
            .upstream
            .used_classrooms(day, start, end, &params.buildings),
        past_fut,
        next_fut,
    );

    let rooms = rooms.map_err(|e| upstream_error("Used-classrooms fetch", e))?;
    // Paging targets are best-effort: a failed boundary lookup costs the
    // link, not the listing.
    let past_start = past.and_then(log_boundary_failure("previous"));
    let next_end = next.and_then(log_boundary_failure("next"));

    let view = UsedClassrooms::build(day, block, params.buildings, rooms, past_start, next_end);
    Ok(with_cache_control(view, cache::SNAPSHOT))
}

fn log_boundary_failure(
    which: &'static str,
) -> impl Fn(Result<BlockTime, UpstreamError>) -> Option<BlockTime> {
    move |result| {
        result
            .map_err(|e| warn!(error = ?e, "{which}-block lookup failed"))
            .ok()
    }
}
