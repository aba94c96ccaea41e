//! Drill-down listing of the rooms in use during one time block, with
//! paging to the adjacent blocks.

use crate::data::{CourseOccupancy, TimeBlock, Weekday};
use crate::heatmap::clock::BlockTime;
use crate::upstream::RoomsInUse;
use serde::Serialize;
use ts_rs::TS;

/// Earliest block start the schedule day can have; no previous page below.
pub const FIRST_BLOCK_START: BlockTime = BlockTime::at(6, 0);
/// Latest block end of the schedule day; no next page beyond.
pub const LAST_BLOCK_END: BlockTime = BlockTime::at(23, 59);

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct UsedClassrooms {
    pub day: Weekday,
    /// Uppercased day name for the report heading.
    pub heading: String,
    #[ts(type = "[string, string]")]
    pub block: TimeBlock,
    pub buildings: Vec<String>,
    pub rooms: Vec<RoomUsage>,
    pub paging: Paging,
}

/// One room and the course(s) it hosts during the block. Dropdowns start
/// collapsed; expansion is per room.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RoomUsage {
    pub classroom: String,
    pub courses: Vec<CourseListing>,
    pub expanded: bool,
}

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CourseListing {
    pub course: String,
    pub instructor: String,
    pub enrolled: u32,
    pub capacity: u32,
    /// `30 Students / 45 Seats`, or `N/A` when capacity is unknown.
    pub seats: String,
    /// `15/45` empty-seat form, or `N/A`.
    pub empty_seats: String,
}

impl From<CourseOccupancy> for CourseListing {
    fn from(record: CourseOccupancy) -> Self {
        let seats = record.seats();
        Self {
            seats: seats.label(),
            empty_seats: seats.empty_seats_label(),
            course: record.course,
            instructor: record.instructor,
            enrolled: record.enrolled,
            capacity: record.capacity,
        }
    }
}

/// Links to the adjacent blocks, absent at the day boundaries.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Paging {
    #[ts(type = "[string, string] | null")]
    pub previous: Option<TimeBlock>,
    #[ts(type = "[string, string] | null")]
    pub next: Option<TimeBlock>,
}

impl UsedClassrooms {
    /// Assemble the listing. `past_start`/`next_end` are the adjacent block
    /// boundaries (already fetched by the caller, and only when the current
    /// block is not pinned to a day boundary).
    pub fn build(
        day: Weekday,
        block: TimeBlock,
        buildings: Vec<String>,
        rooms: RoomsInUse,
        past_start: Option<BlockTime>,
        next_end: Option<BlockTime>,
    ) -> Self {
        let rooms = rooms
            .into_iter()
            .map(|(classroom, records)| RoomUsage {
                classroom,
                courses: records.into_iter().map(CourseListing::from).collect(),
                expanded: false,
            })
            .collect();

        let previous = (block.start != FIRST_BLOCK_START)
            .then(|| past_start.map(|start| TimeBlock::new(start, block.start)))
            .flatten();
        let next = (block.end != LAST_BLOCK_END)
            .then(|| next_end.map(|end| TimeBlock::new(block.end, end)))
            .flatten();

        Self {
            day,
            heading: day.full_name().to_uppercase(),
            block,
            buildings,
            rooms,
            paging: Paging { previous, next },
        }
    }

    /// Whether paging calls for the previous block are worth making.
    pub fn wants_previous(block: TimeBlock) -> bool {
        block.start != FIRST_BLOCK_START
    }

    /// Whether paging calls for the next block are worth making.
    pub fn wants_next(block: TimeBlock) -> bool {
        block.end != LAST_BLOCK_END
    }

    /// Flip one room's dropdown. Unknown rooms are ignored.
    pub fn toggle_room(&mut self, classroom: &str) {
        if let Some(room) = self
            .rooms
            .iter_mut()
            .find(|room| room.classroom == classroom)
        {
            room.expanded = !room.expanded;
        }
    }
}
