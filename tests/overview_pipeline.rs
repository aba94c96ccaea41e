//! End-to-end rendering pipeline: upstream wire JSON through decoding,
//! aggregation, and color scaling to the view model the frontend consumes.

use atrium::data::Weekday;
use atrium::heatmap::aggregate::BlockInfo;
use atrium::upstream::WeekOccupancy;
use atrium::view::week::WeekView;

/// Wire-shaped payload: every weekday present, uneven block coverage, and a
/// sparse count map that leaves some blocks at zero.
fn campus_week_json() -> &'static str {
    r#"[
        {
            "M": [["06:00:00", "09:00:00"], ["09:00:00", "09:50:00"], ["09:50:00", "10:00:00"]],
            "T": [["08:00:00", "09:15:00"]],
            "W": [["06:00:00", "09:00:00"], ["09:00:00", "09:50:00"]],
            "th": [["08:00:00", "09:15:00"]],
            "F": [["12:50:00", "1:05:00"]]
        },
        {
            "M": {"09:00:00": 5},
            "T": {"08:00:00": 2},
            "W": {"06:00:00": 1, "09:00:00": 8},
            "th": {},
            "F": {"12:50:00": 4}
        }
    ]"#
}

#[test]
fn full_week_renders_with_a_shared_scale() {
    let week: WeekOccupancy = serde_json::from_str(campus_week_json()).expect("decodes");
    let view = WeekView::from_snapshot(&week).expect("renders");

    // Max is the campus-wide high-water mark of this snapshot.
    assert_eq!(view.max_occupancy, 8);
    assert_eq!(view.legend.max, 8);

    // All five days render, in schedule order.
    let days: Vec<Weekday> = view.days.keys().copied().collect();
    assert_eq!(days, Weekday::ALL);

    // Output lengths track the input block lists exactly.
    assert_eq!(view.days[&Weekday::Monday].len(), 3);
    assert_eq!(view.days[&Weekday::Thursday].len(), 1);
}

#[test]
fn sparse_counts_render_as_zero_blocks() {
    let week: WeekOccupancy = serde_json::from_str(campus_week_json()).unwrap();
    let view = WeekView::from_snapshot(&week).unwrap();

    let monday = &view.days[&Weekday::Monday];
    // 09:00 has five classrooms in use: colored, value carried in the tooltip.
    assert_eq!(monday[1].info, BlockInfo::Count { in_use: 5 });
    assert_ne!(monday[1].fill, "#ffffff");
    // 09:50 has no entry: rendered, zero, white.
    assert_eq!(monday[2].info, BlockInfo::Count { in_use: 0 });
    assert_eq!(monday[2].fill, "#ffffff");

    // Thursday's count map is empty but its block still renders.
    assert_eq!(view.days[&Weekday::Thursday][0].info, BlockInfo::Count { in_use: 0 });
}

#[test]
fn block_sizes_are_duration_proportional() {
    let week: WeekOccupancy = serde_json::from_str(campus_week_json()).unwrap();
    let view = WeekView::from_snapshot(&week).unwrap();

    let monday = &view.days[&Weekday::Monday];
    // 180 / 50 / 10 minutes at five minutes per unit.
    assert_eq!(monday[0].size, 36.0);
    assert_eq!(monday[1].size, 10.0);
    assert_eq!(monday[2].size, 2.0);

    // Friday's block crosses the noon hour-label rollover: 15 real minutes.
    assert_eq!(view.days[&Weekday::Friday][0].size, 3.0);
}

#[test]
fn legend_gradient_matches_the_palette() {
    let week: WeekOccupancy = serde_json::from_str(campus_week_json()).unwrap();
    let view = WeekView::from_snapshot(&week).unwrap();

    let stops = &view.legend.stops;
    assert_eq!(stops.len(), 4);
    assert_eq!(stops[0].color, "#ffffff");
    assert_eq!(stops[1].color, "#fcf881");
    assert_eq!(stops[2].color, "#eb0000");
    assert_eq!(stops[3].color, "#800080");
    assert_eq!(stops[3].offset, 100.0);
}

#[test]
fn malformed_time_fails_decoding_loudly() {
    let body = r#"[{"M": [["late morning", "10:00:00"]]}, {"M": {}}]"#;
    let result: Result<WeekOccupancy, _> = serde_json::from_str(body);
    assert!(result.is_err());
}
