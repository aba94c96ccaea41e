//! Application state shared across components (web, refresher).

use crate::upstream::{AnalyticsApi, UpstreamError};
use crate::view::ViewState;
use crate::view::sequence::{Latest, Ticket};
use crate::view::week::WeekView;
use dashmap::DashMap;
use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use ts_rs::TS;

/// Health status of a service.
#[derive(Debug, Clone, Serialize, PartialEq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum ServiceStatus {
    Starting,
    Active,
    Disabled,
    Error,
}

/// A timestamped status entry for a service.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub status: ServiceStatus,
    #[allow(dead_code)]
    pub updated_at: Instant,
}

/// Thread-safe registry for services to self-report their health status.
#[derive(Debug, Clone, Default)]
pub struct ServiceStatusRegistry {
    inner: Arc<DashMap<String, StatusEntry>>,
}

impl ServiceStatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates the status for a named service.
    pub fn set(&self, name: &str, status: ServiceStatus) {
        self.inner.insert(
            name.to_owned(),
            StatusEntry {
                status,
                updated_at: Instant::now(),
            },
        );
    }

    /// Returns a snapshot of all service statuses.
    pub fn all(&self) -> Vec<(String, ServiceStatus)> {
        self.inner
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().status.clone()))
            .collect()
    }
}

/// Cached building directory (code → display name).
///
/// Follows the filter lifecycle: `Uninitialized` until the first successful
/// fetch, then `Ready` for the life of the process, with periodic background
/// refreshes replacing the map in place.
#[derive(Default)]
pub struct BuildingDirectory {
    state: RwLock<ViewState<Arc<IndexMap<String, String>>>>,
}

impl BuildingDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the directory and store it. Returns the number of entries.
    pub async fn load(&self, api: &AnalyticsApi) -> Result<usize, UpstreamError> {
        {
            let mut state = self.state.write().await;
            if !state.is_ready() {
                *state = ViewState::Loading;
            }
        }

        match api.building_names().await {
            Ok(names) => {
                let count = names.len();
                *self.state.write().await = ViewState::Ready(Arc::new(names));
                Ok(count)
            }
            Err(e) => {
                let mut state = self.state.write().await;
                // Keep a previously loaded directory through refresh failures.
                if !state.is_ready() {
                    *state = ViewState::Uninitialized;
                }
                Err(e)
            }
        }
    }

    pub async fn get(&self) -> Option<Arc<IndexMap<String, String>>> {
        self.state.read().await.ready().cloned()
    }
}

type CachedOverview = (Instant, Arc<WeekView>);

/// TTL cache of rendered overview snapshots, one slot per filter key.
///
/// Each slot is a latest-wins sequencer, so when rapid filter changes put
/// several upstream fetches in flight the slowest response cannot overwrite
/// a fresher snapshot. Singleflight claims keep concurrent cache misses for
/// the same key from stampeding upstream.
#[derive(Clone, Default)]
pub struct OverviewCache {
    ttl: Duration,
    entries: Arc<DashMap<String, Arc<Latest<CachedOverview>>>>,
    /// filter key → in-flight flag (singleflight guard)
    inflight: Arc<DashMap<String, Arc<AtomicBool>>>,
}

impl OverviewCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Arc::new(DashMap::new()),
            inflight: Arc::new(DashMap::new()),
        }
    }

    /// Canonical cache key for a building list (order-insensitive).
    pub fn key(buildings: &[String]) -> String {
        let mut codes = buildings.to_vec();
        codes.sort();
        codes.join("+")
    }

    /// Return a cached snapshot if it exists and is fresh.
    pub fn get(&self, key: &str) -> Option<Arc<WeekView>> {
        let (cached_at, view) = self.entries.get(key)?.current()?;
        if cached_at.elapsed() < self.ttl {
            Some(view)
        } else {
            None
        }
    }

    /// Take a sequencing ticket for a fetch that is about to start.
    pub fn issue(&self, key: &str) -> Ticket {
        self.slot(key).issue()
    }

    /// Apply a completed fetch; returns false if it was superseded.
    pub fn complete(&self, key: &str, ticket: Ticket, view: Arc<WeekView>) -> bool {
        self.slot(key).complete(ticket, (Instant::now(), view))
    }

    /// Try to claim the singleflight slot for a key.
    /// Returns `true` if this caller should fetch; `false` if another
    /// request is already fetching it.
    pub fn try_claim(&self, key: &str) -> bool {
        let flag = self
            .inflight
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone();
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the singleflight slot (call after complete or on error).
    pub fn release(&self, key: &str) {
        if let Some(flag) = self.inflight.get(key) {
            flag.store(false, Ordering::Release);
        }
    }

    fn slot(&self, key: &str) -> Arc<Latest<CachedOverview>> {
        self.entries
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(Latest::new()))
            .clone()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<AnalyticsApi>,
    pub directory: Arc<BuildingDirectory>,
    pub overview_cache: OverviewCache,
    pub service_statuses: ServiceStatusRegistry,
    /// Building code kept out of the selectable filter set (the off-campus
    /// placeholder), from configuration.
    pub excluded_building: Option<String>,
}

impl AppState {
    pub fn new(
        upstream: Arc<AnalyticsApi>,
        overview_ttl: Duration,
        excluded_building: Option<String>,
    ) -> Self {
        Self {
            upstream,
            directory: Arc::new(BuildingDirectory::new()),
            overview_cache: OverviewCache::new(overview_ttl),
            service_statuses: ServiceStatusRegistry::new(),
            excluded_building,
        }
    }
}
