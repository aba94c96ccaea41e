//! View models for the dashboard surfaces.
//!
//! Each view composes the pure heatmap core with one upstream snapshot.
//! View data is fetch-scoped: built fresh per request or filter change,
//! never persisted.

pub mod classroom;
pub mod sequence;
pub mod upload;
pub mod used;
pub mod week;

pub use classroom::ClassroomDetail;
pub use upload::UploadReport;
pub use used::UsedClassrooms;
pub use week::{WeekSession, WeekView};

use crate::heatmap::clock::ClockError;
use crate::upstream::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("schedule payload contained an invalid time block: {0}")]
    Clock(#[from] ClockError),
}

/// Load lifecycle for filter-driven views.
///
/// `Uninitialized` has no filter map yet; the first successful
/// building-names fetch moves to `Ready` with an all-off filter. Later
/// filter changes re-fetch data but stay `Ready`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ViewState<T> {
    #[default]
    Uninitialized,
    Loading,
    Ready(T),
}

impl<T> ViewState<T> {
    pub fn is_ready(&self) -> bool {
        matches!(self, ViewState::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }
}
