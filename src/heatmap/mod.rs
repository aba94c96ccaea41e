//! Heatmap rendering core: time-block sizing, occupancy color scaling, and
//! per-day aggregation into renderable blocks.
//!
//! Everything in here is pure and state-free; the view layer composes these
//! pieces per fetch snapshot.

pub mod aggregate;
pub mod clock;
pub mod color;

pub use aggregate::{RenderedBlock, render_counts, render_courses};
pub use clock::{BlockTime, ClockError, duration_units};
pub use color::{Rgb, color_for};
