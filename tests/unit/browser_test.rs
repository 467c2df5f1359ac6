//! Unit tests for the route browser state machine and the map trace.

use routeshare::api::{ApiError, Coordinates, RouteDetail, RouteMetrics, RouteSummary, TrackPoint};
use routeshare::browser::{
    BrowserMessage, ComparisonState, ComparisonView, FilterPatch, LoadState, MapBounds,
    RangeFilter, RouteBrowser, RouteTrace, SortColumn,
};

const THRESHOLD: f64 = 8.0;

fn route(id: &str, difficulty: f64, start: (f64, f64)) -> RouteSummary {
    RouteSummary {
        id: id.to_string(),
        name: Some(id.to_string()),
        difficulty_score: Some(difficulty),
        start_coordinates: Some(Coordinates::new(start.0, start.1)),
        metrics: RouteMetrics {
            distance_km: Some(difficulty),
            ..RouteMetrics::default()
        },
        ..RouteSummary::default()
    }
}

/// Test helper: a browser that has finished loading `routes`.
fn loaded(routes: Vec<RouteSummary>) -> RouteBrowser {
    let mut browser = RouteBrowser::new();
    let seq = browser.begin_load();
    browser.update(BrowserMessage::Loaded {
        seq,
        result: Ok(routes),
    });
    browser
}

fn three_routes() -> RouteBrowser {
    loaded(vec![
        route("a", 30.0, (53.8, -1.5)),
        route("b", 10.0, (54.0, -2.0)),
        route("c", 20.0, (51.5, -0.1)),
    ])
}

fn visible_ids(browser: &RouteBrowser) -> Vec<String> {
    browser.visible().map(|r| r.id.clone()).collect()
}

#[test]
fn test_compare_enabled_only_from_two_selected() {
    let ids = ["a", "b", "c"];

    for count in 0..=3 {
        let mut browser = three_routes();
        for id in &ids[..count] {
            browser.update(BrowserMessage::ToggleSelection(id.to_string()));
        }

        assert_eq!(browser.selection().len(), count);
        assert_eq!(browser.selection().can_compare(), count >= 2);
        assert_eq!(browser.begin_compare().is_some(), count >= 2);
    }
}

#[test]
fn test_filtering_prunes_hidden_selections() {
    let mut browser = three_routes();
    browser.update(BrowserMessage::SelectAllVisible);
    assert_eq!(browser.selection().len(), 3);

    browser.update(BrowserMessage::SetFilter(FilterPatch {
        difficulty: Some(RangeFilter::between(15.0, 35.0)),
        ..FilterPatch::default()
    }));

    assert_eq!(visible_ids(&browser), vec!["a", "c"]);
    assert!(!browser.selection().contains("b"));
    assert_eq!(browser.selection().len(), 2);

    // Widening the filter again does not bring the selection back
    browser.update(BrowserMessage::ResetFilters);
    assert_eq!(browser.visible_count(), 3);
    assert_eq!(browser.selection().len(), 2);
}

#[test]
fn test_stale_listing_is_discarded() {
    let mut browser = RouteBrowser::new();
    let first = browser.begin_load();
    let second = browser.begin_load();

    browser.update(BrowserMessage::Loaded {
        seq: first,
        result: Ok(vec![route("old", 1.0, (50.0, 0.0))]),
    });
    assert_eq!(browser.load_state(), &LoadState::Loading);
    assert!(browser.all_routes().is_empty());

    browser.update(BrowserMessage::Loaded {
        seq: second,
        result: Ok(vec![route("new", 1.0, (50.0, 0.0))]),
    });
    assert_eq!(browser.load_state(), &LoadState::Loaded);
    assert_eq!(visible_ids(&browser), vec!["new"]);
}

#[test]
fn test_failed_reload_keeps_previous_routes() {
    let mut browser = three_routes();
    let seq = browser.begin_load();
    browser.update(BrowserMessage::Loaded {
        seq,
        result: Err(ApiError::Transport("connection refused".to_string())),
    });

    assert!(matches!(browser.load_state(), LoadState::LoadFailed(msg) if msg.contains("connection refused")));
    assert_eq!(browser.all_routes().len(), 3);
}

#[test]
fn test_interactions_ignored_until_loaded() {
    let mut browser = RouteBrowser::new();
    browser.update(BrowserMessage::SetSort(SortColumn::Name));
    browser.update(BrowserMessage::ToggleSelection("a".to_string()));

    assert_eq!(browser.sort().column, None);
    assert!(browser.selection().is_empty());
    assert!(browser.begin_compare().is_none());
}

#[test]
fn test_reload_resets_filter_and_sort() {
    let mut browser = three_routes();
    browser.update(BrowserMessage::SetSort(SortColumn::Difficulty));
    browser.update(BrowserMessage::SetFilter(FilterPatch {
        name: Some("a".to_string()),
        ..FilterPatch::default()
    }));
    assert_eq!(visible_ids(&browser), vec!["a"]);

    let seq = browser.begin_load();
    browser.update(BrowserMessage::Loaded {
        seq,
        result: Ok(vec![route("a", 30.0, (53.8, -1.5)), route("b", 10.0, (54.0, -2.0))]),
    });

    assert!(!browser.filter().is_active());
    assert_eq!(browser.sort().column, None);
    assert_eq!(visible_ids(&browser), vec!["a", "b"]);
}

#[test]
fn test_map_filter_follows_viewport() {
    let mut browser = three_routes();
    browser.update(BrowserMessage::SetFilter(FilterPatch {
        within_map: Some(true),
        ..FilterPatch::default()
    }));
    // No viewport reported yet
    assert_eq!(browser.visible_count(), 3);

    // Around London only
    browser.update(BrowserMessage::MapMoved(MapBounds::new(51.0, -1.0, 52.0, 1.0)));
    assert_eq!(visible_ids(&browser), vec!["c"]);

    browser.update(BrowserMessage::MapMoved(MapBounds::new(40.0, -40.0, 45.0, -30.0)));
    assert_eq!(browser.visible_count(), 0);
}

#[test]
fn test_comparison_ids_follow_display_order() {
    let mut browser = three_routes();
    browser.update(BrowserMessage::SetSort(SortColumn::Difficulty));
    browser.update(BrowserMessage::ToggleSelection("a".to_string()));
    browser.update(BrowserMessage::ToggleSelection("b".to_string()));

    let (_, ids) = browser.begin_compare().unwrap();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(browser.comparison(), &ComparisonState::Loading);
}

#[test]
fn test_closed_comparison_ignores_late_result() {
    let mut browser = three_routes();
    browser.update(BrowserMessage::ToggleSelection("a".to_string()));
    browser.update(BrowserMessage::ToggleSelection("b".to_string()));
    let (seq, _) = browser.begin_compare().unwrap();

    browser.update(BrowserMessage::CloseComparison);
    browser.update(BrowserMessage::ComparisonLoaded {
        seq,
        result: Ok(ComparisonView::build(Vec::new())),
    });

    assert_eq!(browser.comparison(), &ComparisonState::Closed);
}

#[test]
fn test_comparison_failure_is_reported() {
    let mut browser = three_routes();
    browser.update(BrowserMessage::ToggleSelection("a".to_string()));
    browser.update(BrowserMessage::ToggleSelection("c".to_string()));
    let (seq, _) = browser.begin_compare().unwrap();

    browser.update(BrowserMessage::ComparisonLoaded {
        seq,
        result: Err(ApiError::NotFound("c".to_string())),
    });

    assert_eq!(
        browser.comparison(),
        &ComparisonState::Failed("Route not found: c".to_string())
    );
}

fn detail_with_track(id: &str) -> RouteDetail {
    RouteDetail {
        summary: RouteSummary {
            id: id.to_string(),
            ..RouteSummary::default()
        },
        track_points: vec![
            TrackPoint {
                lat: Some(53.0),
                lon: Some(-1.0),
                dist: Some(0.0),
                ele: Some(100.0),
            },
            TrackPoint {
                lat: Some(53.1),
                lon: Some(-1.1),
                dist: Some(12.0),
                ele: Some(180.0),
            },
        ],
        top_review: None,
    }
}

#[test]
fn test_trace_only_fetched_when_zoomed_in() {
    let mut trace = RouteTrace::new();

    assert!(trace.select("a", 6.0, THRESHOLD).is_none());
    assert_eq!(trace.selected(), Some("a"));

    let (seq, id) = trace.on_zoom(9.0, THRESHOLD).unwrap();
    assert_eq!(id, "a");

    trace.on_loaded(seq, Ok(detail_with_track("a")));
    assert_eq!(trace.points().len(), 2);

    // Zooming out hides the track but keeps the selection
    assert!(trace.on_zoom(5.0, THRESHOLD).is_none());
    assert!(trace.points().is_empty());
    assert_eq!(trace.selected(), Some("a"));
}

#[test]
fn test_trace_for_previous_marker_is_dropped() {
    let mut trace = RouteTrace::new();
    let (first, _) = trace.select("a", 10.0, THRESHOLD).unwrap();
    let (second, _) = trace.select("b", 10.0, THRESHOLD).unwrap();

    trace.on_loaded(first, Ok(detail_with_track("a")));
    assert!(trace.points().is_empty());

    trace.on_loaded(second, Ok(detail_with_track("b")));
    assert_eq!(trace.points()[0], (53.0, -1.0));
}

#[test]
fn test_trace_cleared_when_route_filtered_out() {
    let mut trace = RouteTrace::new();
    let (seq, _) = trace.select("a", 10.0, THRESHOLD).unwrap();
    trace.on_loaded(seq, Ok(detail_with_track("a")));

    trace.retain_visible(["b", "c"].into_iter());
    assert_eq!(trace.selected(), None);
    assert!(trace.points().is_empty());
}
