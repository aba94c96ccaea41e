//! Single-classroom detail: the week's schedule for one room, with the
//! course in session per block instead of campus-wide counts.

use crate::data::Weekday;
use crate::heatmap::aggregate::{self, RenderedBlock};
use crate::heatmap::clock::ClockError;
use crate::upstream::ClassroomWeek;
use indexmap::IndexMap;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ClassroomDetail {
    pub classroom: String,
    #[ts(type = "Record<string, Array<RenderedBlock>>")]
    pub days: IndexMap<Weekday, Vec<RenderedBlock>>,
}

impl ClassroomDetail {
    pub fn from_snapshot(classroom: &str, week: &ClassroomWeek) -> Result<Self, ClockError> {
        let mut days = IndexMap::new();
        for day in Weekday::ALL {
            let Some(blocks) = week.blocks.get(&day) else {
                continue;
            };
            let empty = aggregate::CourseSlots::new();
            let slots = week.courses.get(&day).unwrap_or(&empty);
            days.insert(day, aggregate::render_courses(day, blocks, slots)?);
        }
        Ok(Self {
            classroom: classroom.to_owned(),
            days,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heatmap::aggregate::BlockInfo;
    use serde_json::json;

    #[test]
    fn occupied_and_vacant_blocks_both_render() {
        let week: ClassroomWeek = serde_json::from_value(json!([
            {"W": [["13:00:00", "13:50:00"], ["13:50:00", "14:00:00"]]},
            {"W": {"13:00:00": [["Linear Algebra", "P. Novak", 27]]}}
        ]))
        .unwrap();

        let detail = ClassroomDetail::from_snapshot("SIMP 120", &week).unwrap();
        let wednesday = &detail.days[&Weekday::Wednesday];
        assert_eq!(wednesday.len(), 2);
        assert_eq!(wednesday[0].fill, "#cfb988");
        match &wednesday[0].info {
            BlockInfo::Course {
                course: Some(course),
            } => {
                assert_eq!(course.course, "Linear Algebra");
                assert_eq!(course.instructor, "P. Novak");
            }
            other => panic!("expected a course block, got {other:?}"),
        }
        assert_eq!(wednesday[1].fill, "#ffffff");
    }

    #[test]
    fn day_without_schedule_is_omitted() {
        let week: ClassroomWeek =
            serde_json::from_value(json!([{"M": []}, {}])).unwrap();
        let detail = ClassroomDetail::from_snapshot("OCON 3", &week).unwrap();
        assert!(detail.days.contains_key(&Weekday::Monday));
        assert!(!detail.days.contains_key(&Weekday::Friday));
        assert!(detail.days[&Weekday::Monday].is_empty());
    }
}
