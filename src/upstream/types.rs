//! Wire shapes for the analytics API.
//!
//! The API was built for a spreadsheet-driven frontend and ships most things
//! as positional arrays: week payloads are two-element `[blocks, data]`
//! pairs, and used-classroom listings concatenate flat four-field course
//! records per room. Everything is normalized into the typed domain models
//! here, at the boundary.

use crate::data::{CourseOccupancy, TimeBlock, Weekday};
use crate::heatmap::aggregate::{CourseSlots, OccupancyCounts};
use crate::heatmap::clock::BlockTime;
use anyhow::{Context, bail};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Time blocks per weekday, in chronological order.
pub type ScheduleByDay = IndexMap<Weekday, Vec<TimeBlock>>;

/// Occupancy counts per weekday, keyed by block start.
pub type CountsByDay = IndexMap<Weekday, OccupancyCounts>;

/// Course listings per weekday, keyed by block start.
pub type CoursesByDay = IndexMap<Weekday, CourseSlots>;

/// Rooms in use during one block, with the courses held in each.
pub type RoomsInUse = IndexMap<String, Vec<CourseOccupancy>>;

/// `GET get_number_classes` payload: `[timeBlocksByDay, countsByDay]`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawWeekOccupancy")]
pub struct WeekOccupancy {
    pub blocks: ScheduleByDay,
    pub counts: CountsByDay,
}

#[derive(Debug, Deserialize)]
struct RawWeekOccupancy(ScheduleByDay, CountsByDay);

impl From<RawWeekOccupancy> for WeekOccupancy {
    fn from(raw: RawWeekOccupancy) -> Self {
        Self {
            blocks: raw.0,
            counts: raw.1,
        }
    }
}

/// `GET get_classroom_data` payload: `[timeBlocksByDay, courseDataByDay]`.
///
/// Course rows arrive as loose `[name, instructor, enrolled]` arrays; rows
/// with no course (empty or null-led) mark the block as vacant and are
/// dropped here rather than surfacing as phantom courses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawClassroomWeek")]
pub struct ClassroomWeek {
    pub blocks: ScheduleByDay,
    pub courses: CoursesByDay,
}

#[derive(Debug, Deserialize)]
struct RawClassroomWeek(
    ScheduleByDay,
    IndexMap<Weekday, IndexMap<BlockTime, Vec<Vec<Value>>>>,
);

impl From<RawClassroomWeek> for ClassroomWeek {
    fn from(raw: RawClassroomWeek) -> Self {
        let courses = raw
            .1
            .into_iter()
            .map(|(day, slots)| {
                let slots = slots
                    .into_iter()
                    .map(|(start, rows)| {
                        let records = rows.iter().filter_map(|row| course_row(row)).collect();
                        (start, records)
                    })
                    .collect();
                (day, slots)
            })
            .collect();
        Self {
            blocks: raw.0,
            courses,
        }
    }
}

/// Decode one `[name, instructor, enrolled]` detail row. The detail endpoint
/// carries no capacity, so it stays 0 (unknown).
fn course_row(row: &[Value]) -> Option<CourseOccupancy> {
    let course = row.first()?.as_str()?.to_owned();
    Some(CourseOccupancy {
        course,
        instructor: row
            .get(1)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned(),
        enrolled: row.get(2).and_then(as_count).unwrap_or(0),
        capacity: 0,
    })
}

/// Decode a `GET get_used_classrooms` payload.
///
/// Each room maps to a flat array of concatenated
/// `name, instructor, capacity, enrolled` records (a room hosting two
/// courses in the block has eight elements), so decode in strides of four.
pub fn rooms_from_wire(raw: IndexMap<String, Vec<Value>>) -> anyhow::Result<RoomsInUse> {
    raw.into_iter()
        .map(|(room, fields)| {
            if fields.len() % 4 != 0 {
                bail!(
                    "room {room:?}: expected records of 4 fields, got {} fields",
                    fields.len()
                );
            }
            let records = fields
                .chunks_exact(4)
                .map(|chunk| used_record(chunk).with_context(|| format!("room {room:?}")))
                .collect::<anyhow::Result<Vec<_>>>()?;
            Ok((room, records))
        })
        .collect()
}

fn used_record(chunk: &[Value]) -> anyhow::Result<CourseOccupancy> {
    let course = chunk[0]
        .as_str()
        .context("course name is not a string")?
        .to_owned();
    let instructor = chunk[1]
        .as_str()
        .context("instructor name is not a string")?
        .to_owned();
    // Room capacity is a float upstream (spreadsheet heritage).
    let capacity = as_count(&chunk[2]).context("capacity is not a number")?;
    let enrolled = as_count(&chunk[3]).context("enrollment is not a number")?;
    Ok(CourseOccupancy {
        course,
        instructor,
        enrolled,
        capacity,
    })
}

fn as_count(value: &Value) -> Option<u32> {
    if let Some(n) = value.as_u64() {
        return u32::try_from(n).ok();
    }
    value
        .as_f64()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n as u32)
}

/// Which spreadsheet a file upload feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    Schedule,
    Classroom,
}

impl UploadKind {
    pub fn as_str(self) -> &'static str {
        match self {
            UploadKind::Schedule => "schedule",
            UploadKind::Classroom => "classroom",
        }
    }
}

/// `POST upload_file` result. `missing_columns` is populated when the
/// spreadsheet failed validation upstream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub success: bool,
    #[serde(default)]
    pub missing_columns: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn week_occupancy_decodes_the_two_dict_pair() {
        let body = json!([
            {"M": [["09:00:00", "09:50:00"], ["09:50:00", "10:00:00"]]},
            {"M": {"09:00:00": 5}}
        ]);
        let week: WeekOccupancy = serde_json::from_value(body).unwrap();
        assert_eq!(week.blocks[&Weekday::Monday].len(), 2);
        let start: BlockTime = "09:00".parse().unwrap();
        assert_eq!(week.counts[&Weekday::Monday][&start], 5);
    }

    #[test]
    fn classroom_week_drops_vacant_rows() {
        let body = json!([
            {"T": [["10:00:00", "10:50:00"]]},
            {"T": {"10:00:00": [["Intro Biology", "R. Lane", 24], []]}}
        ]);
        let week: ClassroomWeek = serde_json::from_value(body).unwrap();
        let start: BlockTime = "10:00".parse().unwrap();
        let slot = &week.courses[&Weekday::Tuesday][&start];
        assert_eq!(slot.len(), 1);
        assert_eq!(slot[0].course, "Intro Biology");
        assert_eq!(slot[0].enrolled, 24);
        assert_eq!(slot[0].capacity, 0);
    }

    #[test]
    fn rooms_decode_in_strides_of_four() {
        let raw: IndexMap<String, Vec<Value>> = serde_json::from_value(json!({
            "SIMP 101": [
                "General Chemistry", "T. Okafor", 40.0, 31,
                "Organic Chemistry", "T. Okafor", 40.0, 18
            ],
            "OCON 12": ["Choir", "M. Reyes", 0.0, 55]
        }))
        .unwrap();

        let rooms = rooms_from_wire(raw).unwrap();
        assert_eq!(rooms["SIMP 101"].len(), 2);
        assert_eq!(rooms["SIMP 101"][1].course, "Organic Chemistry");
        assert_eq!(rooms["SIMP 101"][0].capacity, 40);
        // Capacity 0 survives decoding; rendering turns it into N/A.
        assert_eq!(rooms["OCON 12"][0].seats().label(), "N/A");
    }

    #[test]
    fn ragged_room_record_is_an_error() {
        let raw: IndexMap<String, Vec<Value>> =
            serde_json::from_value(json!({"HAC 2": ["Yoga", "K. Hall", 20.0]})).unwrap();
        assert!(rooms_from_wire(raw).is_err());
    }

    #[test]
    fn upload_outcome_with_missing_columns() {
        let outcome: UploadOutcome = serde_json::from_str(
            r#"{"success": false, "missingColumns": ["Start Time", "Room"]}"#,
        )
        .unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.missing_columns.unwrap().len(), 2);

        let outcome: UploadOutcome =
            serde_json::from_str(r#"{"success": true, "missingColumns": null}"#).unwrap();
        assert!(outcome.success);
        assert!(outcome.missing_columns.is_none());
    }
}
