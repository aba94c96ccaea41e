//! Filter-driven refresh ordering: a slower, earlier-issued fetch must never
//! overwrite the result of a later one, no matter the arrival order.

use atrium::upstream::{AnalyticsApi, WeekOccupancy};
use atrium::view::week::WeekSession;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

fn session() -> WeekSession {
    let api = Arc::new(
        AnalyticsApi::new(Url::parse("http://localhost:8000").expect("url"))
            .expect("client builds"),
    );
    WeekSession::new(api, Some("OFCP".to_owned()))
}

fn snapshot(count: u32) -> WeekOccupancy {
    serde_json::from_str(&format!(
        r#"[{{"M": [["09:00:00", "09:50:00"]]}}, {{"M": {{"09:00:00": {count}}}}}]"#
    ))
    .expect("snapshot decodes")
}

#[tokio::test]
async fn rapid_toggles_keep_the_newest_filter_result() {
    let session = Arc::new(session());
    session.seed_filter(["CENG", "FSCT", "SIMP"]);

    // Toggle A, start its fetch; toggle B, start its fetch. B's response
    // arrives first, A's trickles in late.
    session.toggle("CENG");
    let (ticket_a, active_a) = session.begin_refresh().expect("ready");
    session.toggle("FSCT");
    let (ticket_b, active_b) = session.begin_refresh().expect("ready");
    assert_eq!(active_a, ["CENG"]);
    assert_eq!(active_b, ["CENG", "FSCT"]);

    let late = tokio::spawn({
        let session = session.clone();
        async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            session.complete_refresh(ticket_a, &snapshot(3)).unwrap()
        }
    });
    let early = tokio::spawn({
        let session = session.clone();
        async move { session.complete_refresh(ticket_b, &snapshot(9)).unwrap() }
    });

    assert!(early.await.unwrap(), "newest fetch must apply");
    assert!(!late.await.unwrap(), "stale fetch must be dropped");

    let view = session.current().expect("a view landed");
    assert_eq!(view.max_occupancy, 9, "view must reflect filter B");
}

#[tokio::test]
async fn closed_session_stops_refreshing() {
    let session = session();
    session.seed_filter(["CENG"]);
    session.close();

    // The in-flight fetch path observes the cancellation and applies nothing.
    let applied = session.refresh().await.expect("no error on cancel");
    assert!(!applied);
    assert!(session.current().is_none());
}

#[test]
fn select_all_round_trips_through_the_session() {
    let session = session();
    session.seed_filter(["", "CENG", "OFCP", "SIMP"]);

    session.toggle_select_all();
    let (_, active) = session.begin_refresh().expect("ready");
    assert_eq!(active, ["CENG", "SIMP"], "sentinel and OFCP stay out");

    session.toggle_select_all();
    let (_, active) = session.begin_refresh().expect("ready");
    assert!(active.is_empty());
}
