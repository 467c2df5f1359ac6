//! Integration tests for the HTTP client against a mock site.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use routeshare::api::{ReviewSort, VoteDirection};
use routeshare::browser::{BrowserMessage, LoadState, RouteBrowser};
use routeshare::{ApiError, RouteApi};

use crate::site_mock::{client, spawn_site, SiteState};

#[tokio::test]
async fn test_list_routes_decodes_documents() {
    let base = spawn_site(Arc::new(SiteState::default())).await;
    let api = client(&base, None);

    let routes = api.list_routes().await.unwrap();
    assert_eq!(routes.len(), 2);
    assert_eq!(routes[0].id, "r1");
    assert_eq!(routes[0].display_name(), "Route r1");
    assert_eq!(routes[0].metrics.elevation_gain_m, Some(1320.0));
    assert!(routes[0].published().is_some());
    assert_eq!(routes[1].display_name(), "Unnamed");
}

#[tokio::test]
async fn test_error_body_becomes_message() {
    let base = spawn_site(Arc::new(SiteState::default())).await;
    let api = client(&base, None);

    let err = api.route_detail("missing").await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Status {
            status: 404,
            message: "Route not found".to_string()
        }
    );

    let detail = api.route_detail("r7").await.unwrap();
    assert_eq!(detail.lat_lons().len(), 2);
}

#[tokio::test]
async fn test_compare_and_top_reviews_send_ids() {
    let base = spawn_site(Arc::new(SiteState::default())).await;
    let api = client(&base, None);
    let ids = vec!["a".to_string(), "b".to_string()];

    let details = api.compare_data(&ids).await.unwrap();
    let got: Vec<&str> = details.iter().map(|d| d.summary.id.as_str()).collect();
    assert_eq!(got, vec!["a", "b"]);

    let top = api.top_reviews(&ids).await.unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top["a"].vote_score(), 7);
}

#[tokio::test]
async fn test_reviews_pass_sort_order() {
    let base = spawn_site(Arc::new(SiteState::default())).await;
    let api = client(&base, None);

    let latest = api.reviews("r1", ReviewSort::Latest).await.unwrap();
    assert_eq!(latest[0].id, "r1-latest");
    assert_eq!(latest[0].vote_score(), 2);

    let top = api.reviews("r1", ReviewSort::Top).await.unwrap();
    assert_eq!(top[0].id, "r1-top");
}

#[tokio::test]
async fn test_vote_requires_session() {
    let base = spawn_site(Arc::new(SiteState::default())).await;

    let anonymous = client(&base, None);
    let err = anonymous.vote("rev1", VoteDirection::Up).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.to_string(), "You must be logged in on the website to vote.");

    let logged_in = client(&base, Some("session=abc123"));
    let result = logged_in.vote("rev1", VoteDirection::Up).await.unwrap();
    assert!(result.success);
    assert_eq!(result.new_score, 3);

    let refused = logged_in.vote("locked", VoteDirection::Down).await;
    assert_eq!(
        refused,
        Err(ApiError::Rejected("Failed to register vote.".to_string()))
    );
}

#[tokio::test]
async fn test_submissions_return_task_ids() {
    let base = spawn_site(Arc::new(SiteState::default())).await;
    let api = client(&base, None);

    let task = api
        .submit_url("https://ridewithgps.com/routes/123")
        .await
        .unwrap();
    assert_eq!(task, "task-42");

    let err = api
        .submit_url("https://example.com/route")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Unsupported route provider");

    let task = api
        .submit_file("loop.gpx", b"<gpx></gpx>".to_vec())
        .await
        .unwrap();
    assert_eq!(task, "task-file");
}

#[tokio::test]
async fn test_unreachable_site_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = client(&format!("http://{}", addr), None);
    let err = api.list_routes().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_malformed_body_is_parse_error_and_keeps_routes() {
    let state = Arc::new(SiteState::default());
    let base = spawn_site(state.clone()).await;
    let api = client(&base, None);

    let mut browser = RouteBrowser::new();
    let seq = browser.begin_load();
    let result = api.list_routes().await;
    browser.update(BrowserMessage::Loaded { seq, result });
    assert_eq!(browser.load_state(), &LoadState::Loaded);
    assert_eq!(browser.visible_count(), 2);

    state.broken_listing.store(true, Ordering::SeqCst);
    let result = api.list_routes().await;
    assert!(matches!(result, Err(ApiError::Parse(_))));

    let seq = browser.begin_load();
    browser.update(BrowserMessage::Loaded { seq, result });
    assert!(matches!(
        browser.load_state(),
        LoadState::LoadFailed(msg) if msg.starts_with("Unexpected response")
    ));
    assert_eq!(browser.all_routes().len(), 2);
    assert_eq!(browser.visible_count(), 2);
}
