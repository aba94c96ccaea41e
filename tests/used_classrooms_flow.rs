//! Drill-down flow: wire payload for one time block through record decoding,
//! seat-utilization labels, and paging links.

use atrium::data::{TimeBlock, Weekday};
use atrium::heatmap::clock::BlockTime;
use atrium::upstream::types::rooms_from_wire;
use atrium::view::used::{FIRST_BLOCK_START, LAST_BLOCK_END, UsedClassrooms};
use indexmap::IndexMap;
use serde_json::Value;

fn t(s: &str) -> BlockTime {
    s.parse().expect("valid time")
}

fn wire_rooms() -> IndexMap<String, Vec<Value>> {
    serde_json::from_str(
        r#"{
            "SIMP 101": [
                "General Chemistry", "T. Okafor", 40.0, 31,
                "Chemistry Lab", "T. Okafor", 40.0, 12
            ],
            "STCH 210": ["Ethics", "B. Doyle", 0.0, 12],
            "HAC GYM": ["Team Practice", "K. Hall", 120.0, 55]
        }"#,
    )
    .expect("wire decodes")
}

#[test]
fn one_room_many_courses_stays_grouped() {
    let rooms = rooms_from_wire(wire_rooms()).unwrap();
    let view = UsedClassrooms::build(
        Weekday::Wednesday,
        TimeBlock::new(t("09:00"), t("09:50")),
        vec!["SIMP".into(), "STCH".into(), "HAC".into()],
        rooms,
        Some(t("08:00")),
        Some(t("10:00")),
    );

    assert_eq!(view.rooms.len(), 3);
    let simp = &view.rooms[0];
    assert_eq!(simp.classroom, "SIMP 101");
    assert_eq!(simp.courses.len(), 2);
    assert_eq!(simp.courses[0].seats, "31 Students / 40 Seats");
    assert_eq!(simp.courses[1].empty_seats, "28/40");

    // Unknown capacity short-circuits to N/A, no division by zero.
    assert_eq!(view.rooms[1].courses[0].seats, "N/A");
    assert_eq!(view.rooms[1].courses[0].empty_seats, "N/A");
}

#[test]
fn paging_links_wrap_the_adjacent_blocks() {
    let view = UsedClassrooms::build(
        Weekday::Monday,
        TimeBlock::new(t("09:00"), t("09:50")),
        Vec::new(),
        rooms_from_wire(wire_rooms()).unwrap(),
        Some(t("08:00")),
        Some(t("10:00")),
    );

    assert_eq!(
        view.paging.previous,
        Some(TimeBlock::new(t("08:00"), t("09:00")))
    );
    assert_eq!(view.paging.next, Some(TimeBlock::new(t("09:50"), t("10:00"))));
    assert_eq!(view.heading, "MONDAY");
}

#[test]
fn day_edges_have_no_paging() {
    let first = UsedClassrooms::build(
        Weekday::Friday,
        TimeBlock::new(FIRST_BLOCK_START, t("07:00")),
        Vec::new(),
        rooms_from_wire(wire_rooms()).unwrap(),
        // Even if a boundary time slips through, the edge rule wins.
        Some(t("05:00")),
        Some(t("08:00")),
    );
    assert!(first.paging.previous.is_none());
    assert!(first.paging.next.is_some());

    let last = UsedClassrooms::build(
        Weekday::Friday,
        TimeBlock::new(t("22:00"), LAST_BLOCK_END),
        Vec::new(),
        rooms_from_wire(wire_rooms()).unwrap(),
        Some(t("21:00")),
        Some(t("23:59")),
    );
    assert!(last.paging.previous.is_some());
    assert!(last.paging.next.is_none());
}
