//! Week-overview handler.

use axum::extract::State;
use axum::response::Response;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use ts_rs::TS;

use crate::state::{AppState, OverviewCache};
use crate::utils::log_if_slow;
use crate::view::week::WeekView;
use crate::web::error::{ApiError, render_error, upstream_error};
use crate::web::routes::{cache, with_cache_control};

const SLOW_FETCH_THRESHOLD: Duration = Duration::from_secs(5);

/// How long a request that lost the singleflight race waits for the winner
/// before fetching on its own.
const SINGLEFLIGHT_WAIT: Duration = Duration::from_millis(50);
const SINGLEFLIGHT_ROUNDS: u32 = 20;

#[derive(Debug, Deserialize, Serialize, TS)]
#[ts(export)]
pub struct OverviewParams {
    /// Selected building codes; empty means campus-wide.
    #[serde(default)]
    pub buildings: Vec<String>,
}

/// `GET /api/overview?buildings=CENG&buildings=SIMP`
pub(super) async fn overview(
    State(state): State<AppState>,
    axum_extra::extract::Query(params): axum_extra::extract::Query<OverviewParams>,
) -> Result<Response, ApiError> {
    let key = OverviewCache::key(&params.buildings);

    if let Some(view) = state.overview_cache.get(&key) {
        return Ok(respond(&view));
    }

    let claimed = state.overview_cache.try_claim(&key);
    if !claimed {
        // Another request is already building this snapshot; give it a
        // moment before falling back to our own fetch.
        for _ in 0..SINGLEFLIGHT_ROUNDS {
            sleep(SINGLEFLIGHT_WAIT).await;
            if let Some(view) = state.overview_cache.get(&key) {
                return Ok(respond(&view));
            }
        }
    }

    let ticket = state.overview_cache.issue(&key);
    let start = Instant::now();
    let result = state.upstream.number_classes(&params.buildings).await;
    log_if_slow(start, SLOW_FETCH_THRESHOLD, "overview upstream fetch");

    let outcome = result
        .map_err(|e| upstream_error("Overview fetch", e))
        .and_then(|week| {
            WeekView::from_snapshot(&week).map_err(|e| render_error("Overview", e))
        });
    if claimed {
        state.overview_cache.release(&key);
    }

    let view = Arc::new(outcome?);
    // A refresh started after ours may already have landed; ours is then
    // simply not cached.
    state.overview_cache.complete(&key, ticket, view.clone());

    Ok(respond(&view))
}

fn respond(view: &WeekView) -> Response {
    with_cache_control(view, cache::SNAPSHOT)
}
