//! Domain types shared by the aggregation, view, and web layers.
//!
//! These are the typed forms of what the upstream analytics API ships as
//! loosely-shaped JSON arrays; the wire decoding itself lives in
//! `upstream::types`.

use crate::heatmap::clock::BlockTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Weekday keys exactly as the upstream schedule API spells them
/// (`M`, `T`, `W`, `th`, `F`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Weekday {
    #[serde(rename = "M")]
    Monday,
    #[serde(rename = "T")]
    Tuesday,
    #[serde(rename = "W")]
    Wednesday,
    #[serde(rename = "th")]
    Thursday,
    #[serde(rename = "F")]
    Friday,
}

impl Weekday {
    /// Monday through Friday, in schedule order.
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// The upstream wire key for this day.
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Monday => "M",
            Weekday::Tuesday => "T",
            Weekday::Wednesday => "W",
            Weekday::Thursday => "th",
            Weekday::Friday => "F",
        }
    }

    pub fn full_name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|day| day.code() == code)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A contiguous schedule interval within one day, `start < end`.
///
/// Serialized as the two-element `[start, end]` array the upstream emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(BlockTime, BlockTime)", into = "(BlockTime, BlockTime)")]
pub struct TimeBlock {
    pub start: BlockTime,
    pub end: BlockTime,
}

impl TimeBlock {
    pub fn new(start: BlockTime, end: BlockTime) -> Self {
        Self { start, end }
    }
}

impl From<(BlockTime, BlockTime)> for TimeBlock {
    fn from((start, end): (BlockTime, BlockTime)) -> Self {
        Self { start, end }
    }
}

impl From<TimeBlock> for (BlockTime, BlockTime) {
    fn from(block: TimeBlock) -> Self {
        (block.start, block.end)
    }
}

/// One course occupying a classroom during a time block.
///
/// A zero `capacity` means the room's seat count is unknown upstream, not
/// that the room seats nobody; seat math must go through [`SeatUtilization`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseOccupancy {
    pub course: String,
    pub instructor: String,
    pub enrolled: u32,
    pub capacity: u32,
}

impl CourseOccupancy {
    pub fn seats(&self) -> SeatUtilization {
        SeatUtilization::new(self.enrolled, self.capacity)
    }
}

/// Seat usage for one course, short-circuiting the unknown-capacity case so
/// nothing downstream divides by zero or renders a negative seat count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatUtilization {
    Known { enrolled: u32, capacity: u32 },
    Unknown,
}

impl SeatUtilization {
    pub fn new(enrolled: u32, capacity: u32) -> Self {
        if capacity == 0 {
            SeatUtilization::Unknown
        } else {
            SeatUtilization::Known { enrolled, capacity }
        }
    }

    /// Long form shown on single-column listings: `30 Students / 45 Seats`.
    pub fn label(&self) -> String {
        match self {
            SeatUtilization::Known { enrolled, capacity } => {
                format!("{enrolled} Students / {capacity} Seats")
            }
            SeatUtilization::Unknown => "N/A".to_owned(),
        }
    }

    /// Compact empty-seat form: `15/45`.
    pub fn empty_seats_label(&self) -> String {
        match self {
            SeatUtilization::Known { enrolled, capacity } => {
                format!("{}/{capacity}", capacity.saturating_sub(*enrolled))
            }
            SeatUtilization::Unknown => "N/A".to_owned(),
        }
    }
}
