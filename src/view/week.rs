//! Week overview: five day columns of count heatmaps plus the legend.

use crate::data::Weekday;
use crate::filter::BuildingFilter;
use crate::heatmap::aggregate::{self, RenderedBlock};
use crate::heatmap::clock::ClockError;
use crate::heatmap::color;
use crate::upstream::{AnalyticsApi, WeekOccupancy};
use crate::view::sequence::{Latest, Ticket};
use crate::view::{ViewError, ViewState};
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use ts_rs::TS;

/// Rendered week overview for one filter snapshot.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct WeekView {
    /// Day columns in schedule order; days the snapshot has no blocks for
    /// are omitted.
    #[ts(type = "Record<string, Array<RenderedBlock>>")]
    pub days: IndexMap<Weekday, Vec<RenderedBlock>>,
    /// Scale ceiling shared by every column and the legend.
    pub max_occupancy: u32,
    pub legend: Legend,
}

/// Color-scale key shown beside the heatmaps.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Legend {
    pub title: String,
    pub stops: Vec<LegendStop>,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LegendStop {
    /// Gradient offset in percent.
    pub offset: f64,
    /// CSS hex color.
    pub color: String,
}

impl WeekView {
    /// Render a full week snapshot. The color domain maximum is recomputed
    /// from this snapshot's counts, so it always tracks the current filter.
    pub fn from_snapshot(week: &WeekOccupancy) -> Result<Self, ClockError> {
        let max = aggregate::max_occupancy(week.counts.values());

        let mut days = IndexMap::new();
        for day in Weekday::ALL {
            let Some(blocks) = week.blocks.get(&day) else {
                continue;
            };
            let empty = aggregate::OccupancyCounts::new();
            let counts = week.counts.get(&day).unwrap_or(&empty);
            days.insert(day, aggregate::render_counts(day, blocks, counts, max)?);
        }

        Ok(Self {
            days,
            max_occupancy: max,
            legend: Legend {
                title: "Number of Classrooms Used".to_owned(),
                stops: color::legend_stops()
                    .into_iter()
                    .map(|(offset, color)| LegendStop {
                        offset,
                        color: color.to_string(),
                    })
                    .collect(),
                max,
            },
        })
    }
}

/// One dashboard client's overview lifecycle.
///
/// Owns the building filter, the latest-wins slot for fetch completions, and
/// a cancellation token tripped when the client navigates away. All state is
/// session-local; nothing here is shared across sessions.
pub struct WeekSession {
    api: Arc<AnalyticsApi>,
    excluded_building: Option<String>,
    filter: Mutex<ViewState<BuildingFilter>>,
    latest: Latest<Arc<WeekView>>,
    cancel: CancellationToken,
}

impl WeekSession {
    pub fn new(api: Arc<AnalyticsApi>, excluded_building: Option<String>) -> Self {
        Self {
            api,
            excluded_building,
            filter: Mutex::new(ViewState::Uninitialized),
            latest: Latest::new(),
            cancel: CancellationToken::new(),
        }
    }

    /// First load: fetch the building directory and seed an all-off filter.
    pub async fn initialize(&self) -> Result<(), ViewError> {
        {
            let mut filter = self.lock_filter();
            if filter.is_ready() {
                return Ok(());
            }
            *filter = ViewState::Loading;
        }

        let names = match self.api.building_names().await {
            Ok(names) => names,
            Err(e) => {
                // Back to square one so a retry runs the full first load.
                *self.lock_filter() = ViewState::Uninitialized;
                return Err(e.into());
            }
        };
        let seeded =
            BuildingFilter::from_codes(names.keys().cloned(), self.excluded_building.as_deref());
        *self.lock_filter() = ViewState::Ready(seeded);
        Ok(())
    }

    /// Seed the filter from an already-fetched building directory (the web
    /// layer keeps one cached), skipping the network round trip of
    /// [`WeekSession::initialize`]. No-op once the session is ready.
    pub fn seed_filter<I, S>(&self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut filter = self.lock_filter();
        if !filter.is_ready() {
            *filter = ViewState::Ready(BuildingFilter::from_codes(
                codes,
                self.excluded_building.as_deref(),
            ));
        }
    }

    /// Flip one building checkbox. Call [`WeekSession::refresh`] afterwards;
    /// toggling alone never mutates the rendered view.
    pub fn toggle(&self, code: &str) {
        if let Some(filter) = self.lock_filter().ready_mut() {
            filter.toggle(code);
        }
    }

    pub fn toggle_select_all(&self) {
        if let Some(filter) = self.lock_filter().ready_mut() {
            filter.toggle_select_all();
        }
    }

    /// Fetch and render the overview for the current filter snapshot.
    ///
    /// Returns `Ok(true)` if the result was applied, `Ok(false)` if it was
    /// superseded by a newer refresh or the session was cancelled first.
    pub async fn refresh(&self) -> Result<bool, ViewError> {
        let Some((ticket, active)) = self.begin_refresh() else {
            return Ok(false);
        };

        let fetched = tokio::select! {
            _ = self.cancel.cancelled() => {
                debug!("overview refresh cancelled before completion");
                return Ok(false);
            }
            result = self.api.number_classes(&active) => result?,
        };

        self.complete_refresh(ticket, &fetched)
    }

    /// Snapshot the filter and take a sequencing ticket. `None` before the
    /// first successful [`WeekSession::initialize`].
    pub fn begin_refresh(&self) -> Option<(Ticket, Vec<String>)> {
        let active = self.lock_filter().ready()?.active_list();
        Some((self.latest.issue(), active))
    }

    /// Apply a completed fetch if its ticket is still the newest.
    pub fn complete_refresh(
        &self,
        ticket: Ticket,
        week: &WeekOccupancy,
    ) -> Result<bool, ViewError> {
        if !self.latest.is_current(ticket) {
            debug!("dropping superseded overview response");
            return Ok(false);
        }
        let view = WeekView::from_snapshot(week)?;
        Ok(self.latest.complete(ticket, Arc::new(view)))
    }

    /// The newest applied rendering, if any fetch has landed yet.
    pub fn current(&self) -> Option<Arc<WeekView>> {
        self.latest.current()
    }

    /// Tear down on navigation: in-flight refreshes stop without touching
    /// state.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    fn lock_filter(&self) -> std::sync::MutexGuard<'_, ViewState<BuildingFilter>> {
        self.filter.lock().unwrap_or_else(|e| e.into_inner())
    }
}
