//! Mock route sharing site served on a loopback port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use routeshare::storage::config::ApiSettings;
use routeshare::ApiClient;

/// Shared state of the mock site.
#[derive(Default)]
pub struct SiteState {
    /// Number of task status requests served
    pub status_calls: AtomicUsize,
    /// Status checks answered with PROGRESS before SUCCESS
    pub pending_checks: usize,
    /// Serve the listing as a 200 HTML page instead of JSON
    pub broken_listing: AtomicBool,
}

/// Start the mock site and return its root URL.
pub async fn spawn_site(state: Arc<SiteState>) -> String {
    let router = Router::new()
        .route("/api/list_saved_routes", get(list_routes))
        .route("/api/routes/{id}", get(route_detail))
        .route("/api/routes/{id}/reviews", get(reviews))
        .route("/api/compare_data", get(compare_data))
        .route("/api/get_top_reviews", get(top_reviews))
        .route("/api/reviews/{id}/vote", post(vote))
        .route("/process_route_url", post(process_url))
        .route("/process_route_file", post(process_file))
        .route("/task_status/{task_id}", get(task_status))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{}", addr)
}

/// Client pointed at the mock site.
pub fn client(base_url: &str, session_cookie: Option<&str>) -> ApiClient {
    ApiClient::new(&ApiSettings {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        session_cookie: session_cookie.map(str::to_string),
    })
    .unwrap()
}

fn route_document(id: &str) -> Value {
    json!({
        "_id": { "$oid": id },
        "route_name": format!("Route {}", id),
        "start_location_name": "Hebden Bridge",
        "start_coordinates": { "lat": 53.74, "lon": -2.01 },
        "metrics_summary": { "distance_km": 64.2, "TEGa": 1320, "ACg": 4.8, "MCg": 19.5, "ADg": -5.1 },
        "difficulty_score": 118.4,
        "surface_type": "Road",
        "tags": ["hilly"],
        "published_at": "2025-04-12T09:15:00",
        "creator_username": "calder",
        "track_points": [
            { "lat": 53.74, "lon": -2.01, "dist": 0.0, "ele": 100.0 },
            { "lat": 53.75, "lon": -2.02, "dist": 1.0, "ele": 160.0 }
        ]
    })
}

async fn list_routes(State(state): State<Arc<SiteState>>) -> Response {
    if state.broken_listing.load(Ordering::SeqCst) {
        return (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/html")],
            "<html><body>Down for maintenance</body></html>",
        )
            .into_response();
    }
    Json(json!([
        route_document("r1"),
        { "_id": "r2", "route_name": null, "metrics_summary": null }
    ]))
    .into_response()
}

async fn route_detail(Path(id): Path<String>) -> (StatusCode, Json<Value>) {
    if id == "missing" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "Route not found" })),
        );
    }
    (StatusCode::OK, Json(route_document(&id)))
}

async fn reviews(
    Path(id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    let sort = params.get("sort").cloned().unwrap_or_default();
    Json(json!([{
        "_id": format!("{}-{}", id, sort),
        "creator_username": "calder",
        "ride_report": "Steep but worth it.",
        "ratings": { "scenery": 5, "traffic": 2 },
        "upvotes": ["u1", "u2"],
        "downvotes": []
    }]))
}

fn requested_ids(params: &HashMap<String, String>) -> Vec<String> {
    params
        .get("ids")
        .map(|ids| ids.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

async fn compare_data(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let docs: Vec<Value> = requested_ids(&params)
        .iter()
        .map(|id| route_document(id))
        .collect();
    Json(Value::Array(docs))
}

async fn top_reviews(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let mut map = serde_json::Map::new();
    if let Some(first) = requested_ids(&params).first() {
        map.insert(
            first.clone(),
            json!({ "_id": "top1", "ride_report": "Best climb around.", "score": 7 }),
        );
    }
    Json(Value::Object(map))
}

async fn vote(
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    let logged_in = headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("session="));
    if !logged_in {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "Authentication required" })),
        );
    }
    if id == "locked" {
        return (StatusCode::OK, Json(json!({ "success": false })));
    }

    let up = body["direction"] == "up";
    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "new_score": if up { 3 } else { 1 },
            "upvotes": if up { 3 } else { 2 },
            "downvotes": if up { 0 } else { 1 }
        })),
    )
}

async fn process_url(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    match body["route_url"].as_str() {
        Some(url) if url.contains("ridewithgps") => {
            (StatusCode::ACCEPTED, Json(json!({ "task_id": "task-42" })))
        }
        Some(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Unsupported route provider" })),
        ),
        None => (StatusCode::OK, Json(json!({}))),
    }
}

async fn process_file() -> (StatusCode, Json<Value>) {
    (StatusCode::ACCEPTED, Json(json!({ "task_id": "task-file" })))
}

async fn task_status(
    State(state): State<Arc<SiteState>>,
    Path(task_id): Path<String>,
) -> Json<Value> {
    let call = state.status_calls.fetch_add(1, Ordering::SeqCst);
    if call < state.pending_checks {
        return Json(json!({ "state": "PROGRESS", "status": format!("Processing {}...", task_id) }));
    }
    Json(json!({ "state": "SUCCESS", "result": { "draft_id": { "$oid": "draft-9" } } }))
}
