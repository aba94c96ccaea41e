//! Turns a day's ordered time blocks plus a sparse occupancy map into the
//! block sequence the frontend draws.
//!
//! Order in, order out: every input block produces exactly one rendered
//! block, in chronological position. A block with no occupancy entry renders
//! as zero (count view) or vacant (course view) rather than being dropped,
//! so gaps in the data stay visible as idle time instead of missing rows.

use crate::data::{CourseOccupancy, TimeBlock, Weekday};
use crate::heatmap::clock::{BlockTime, ClockError, duration_units};
use crate::heatmap::color;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Per-day occupancy counts keyed by block start time.
pub type OccupancyCounts = IndexMap<BlockTime, u32>;

/// Per-day course listings keyed by block start time.
pub type CourseSlots = IndexMap<BlockTime, Vec<CourseOccupancy>>;

/// One drawable heatmap cell with its hover payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RenderedBlock {
    pub day: Weekday,
    #[ts(type = "string")]
    pub start: BlockTime,
    #[ts(type = "string")]
    pub end: BlockTime,
    /// Display height in scale units, proportional to the block's duration.
    pub size: f64,
    /// CSS hex fill.
    pub fill: String,
    pub info: BlockInfo,
}

/// Tooltip payload attached to a rendered block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", tag = "kind")]
#[ts(export)]
pub enum BlockInfo {
    /// Week overview: number of classrooms in use.
    #[serde(rename_all = "camelCase")]
    Count { in_use: u32 },
    /// Classroom detail: the course in session, if any.
    Course { course: Option<CourseOccupancy> },
}

/// Render the week-overview count heatmap for one day.
///
/// `max` is the maximum count across the whole filtered week and fixes the
/// color domain so the five day columns share one scale.
pub fn render_counts(
    day: Weekday,
    blocks: &[TimeBlock],
    counts: &OccupancyCounts,
    max: u32,
) -> Result<Vec<RenderedBlock>, ClockError> {
    blocks
        .iter()
        .map(|block| {
            let in_use = counts.get(&block.start).copied().unwrap_or(0);
            Ok(RenderedBlock {
                day,
                start: block.start,
                end: block.end,
                size: duration_units(block.start, block.end)?,
                fill: color::color_for(in_use, max).to_string(),
                info: BlockInfo::Count { in_use },
            })
        })
        .collect()
}

/// Render the single-classroom course heatmap for one day.
///
/// Occupied blocks get a fixed fill; a color scale would be meaningless for
/// a present/absent signal. Only the first course in a slot is surfaced,
/// matching what the detail view displays.
pub fn render_courses(
    day: Weekday,
    blocks: &[TimeBlock],
    slots: &CourseSlots,
) -> Result<Vec<RenderedBlock>, ClockError> {
    blocks
        .iter()
        .map(|block| {
            let course = slots
                .get(&block.start)
                .and_then(|records| records.first())
                .cloned();
            let fill = if course.is_some() {
                color::OCCUPIED
            } else {
                color::VACANT
            };
            Ok(RenderedBlock {
                day,
                start: block.start,
                end: block.end,
                size: duration_units(block.start, block.end)?,
                fill: fill.to_string(),
                info: BlockInfo::Course { course },
            })
        })
        .collect()
}

/// Maximum occupancy across every day of a filtered week snapshot.
///
/// Recomputed per snapshot; the color domain follows the current filter
/// rather than any historical high-water mark.
pub fn max_occupancy<'a, I>(days: I) -> u32
where
    I: IntoIterator<Item = &'a OccupancyCounts>,
{
    days.into_iter()
        .flat_map(|counts| counts.values().copied())
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> BlockTime {
        s.parse().expect("valid time")
    }

    fn block(start: &str, end: &str) -> TimeBlock {
        TimeBlock::new(t(start), t(end))
    }

    fn course(name: &str) -> CourseOccupancy {
        CourseOccupancy {
            course: name.to_owned(),
            instructor: "Staff".to_owned(),
            enrolled: 18,
            capacity: 0,
        }
    }

    #[test]
    fn missing_entries_render_as_zero_not_omitted() {
        let blocks = [block("09:00", "09:50"), block("09:50", "10:00")];
        let counts: OccupancyCounts = [(t("09:00"), 5)].into_iter().collect();

        let rendered = render_counts(Weekday::Monday, &blocks, &counts, 10).unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0].info, BlockInfo::Count { in_use: 5 });
        assert_ne!(rendered[0].fill, "#ffffff");
        assert_eq!(rendered[1].info, BlockInfo::Count { in_use: 0 });
        assert_eq!(rendered[1].fill, "#ffffff");
    }

    #[test]
    fn output_matches_input_length_and_order() {
        let blocks = [
            block("08:00", "08:50"),
            block("08:50", "09:00"),
            block("09:00", "09:50"),
        ];
        let rendered =
            render_counts(Weekday::Wednesday, &blocks, &OccupancyCounts::new(), 0).unwrap();
        assert_eq!(rendered.len(), blocks.len());
        let starts: Vec<String> = rendered.iter().map(|b| b.start.to_string()).collect();
        assert_eq!(starts, ["08:00", "08:50", "09:00"]);
    }

    #[test]
    fn course_blocks_use_fixed_fills() {
        let blocks = [block("10:00", "10:50"), block("10:50", "11:00")];
        let slots: CourseSlots = [(t("10:00"), vec![course("CS 310"), course("CS 311")])]
            .into_iter()
            .collect();

        let rendered = render_courses(Weekday::Friday, &blocks, &slots).unwrap();
        assert_eq!(rendered[0].fill, "#cfb988");
        match &rendered[0].info {
            BlockInfo::Course {
                course: Some(first),
            } => assert_eq!(first.course, "CS 310"),
            other => panic!("expected occupied block, got {other:?}"),
        }
        assert_eq!(rendered[1].fill, "#ffffff");
        assert_eq!(rendered[1].info, BlockInfo::Course { course: None });
    }

    #[test]
    fn malformed_block_surfaces_a_clock_error() {
        let blocks = [block("10:00", "09:00")];
        assert!(render_counts(Weekday::Monday, &blocks, &OccupancyCounts::new(), 3).is_err());
    }

    #[test]
    fn max_spans_all_days() {
        let monday: OccupancyCounts = [(t("09:00"), 3), (t("10:00"), 7)].into_iter().collect();
        let tuesday: OccupancyCounts = [(t("09:00"), 11)].into_iter().collect();
        assert_eq!(max_occupancy([&monday, &tuesday]), 11);
        assert_eq!(max_occupancy([] as [&OccupancyCounts; 0]), 0);
    }
}
