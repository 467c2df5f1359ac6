//! In-memory `RouteApi` for exercising comparison and polling without HTTP.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use routeshare::api::{
    Review, ReviewSort, RouteDetail, RouteSummary, TaskState, TaskStatus, VoteDirection,
    VoteResult,
};
use routeshare::{ApiError, RouteApi};

#[derive(Default)]
pub struct FakeApi {
    /// Routes served by `compare_data`
    pub routes: Vec<RouteDetail>,
    /// Top review per route id
    pub top_reviews: HashMap<String, Review>,
    /// Error returned by `top_reviews` instead of the map
    pub top_reviews_error: Option<ApiError>,
    /// Status responses, consumed in order; the last one repeats
    pub statuses: Mutex<VecDeque<Result<TaskStatus, ApiError>>>,
    pub status_calls: AtomicUsize,
}

impl FakeApi {
    pub fn with_statuses(statuses: Vec<Result<TaskStatus, ApiError>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        }
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }
}

pub fn status(state: TaskState, message: Option<&str>) -> TaskStatus {
    TaskStatus {
        state,
        status: message.map(str::to_string),
        result: None,
    }
}

pub fn success(draft_id: &str) -> TaskStatus {
    TaskStatus {
        state: TaskState::Success,
        status: None,
        result: Some(serde_json::json!({ "draft_id": draft_id })),
    }
}

pub fn route(id: &str, distance_km: f64) -> RouteDetail {
    let mut detail = RouteDetail {
        summary: RouteSummary {
            id: id.to_string(),
            name: Some(format!("Route {}", id)),
            ..RouteSummary::default()
        },
        ..RouteDetail::default()
    };
    detail.summary.metrics.distance_km = Some(distance_km);
    detail
}

pub fn review(id: &str, score: i64) -> Review {
    Review {
        id: id.to_string(),
        creator_username: Some("tester".to_string()),
        ride_report: Some("Quiet lanes and a good cafe stop.".to_string()),
        score: Some(score),
        ..Review::default()
    }
}

impl RouteApi for FakeApi {
    async fn list_routes(&self) -> Result<Vec<RouteSummary>, ApiError> {
        Ok(self.routes.iter().map(|r| r.summary.clone()).collect())
    }

    async fn route_detail(&self, id: &str) -> Result<RouteDetail, ApiError> {
        self.routes
            .iter()
            .find(|r| r.summary.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    async fn compare_data(&self, ids: &[String]) -> Result<Vec<RouteDetail>, ApiError> {
        Ok(self
            .routes
            .iter()
            .filter(|r| ids.contains(&r.summary.id))
            .cloned()
            .collect())
    }

    async fn top_reviews(&self, ids: &[String]) -> Result<HashMap<String, Review>, ApiError> {
        if let Some(err) = &self.top_reviews_error {
            return Err(err.clone());
        }
        Ok(self
            .top_reviews
            .iter()
            .filter(|(id, _)| ids.contains(id))
            .map(|(id, r)| (id.clone(), r.clone()))
            .collect())
    }

    async fn reviews(&self, _route_id: &str, _sort: ReviewSort) -> Result<Vec<Review>, ApiError> {
        Ok(Vec::new())
    }

    async fn vote(&self, _review_id: &str, _direction: VoteDirection) -> Result<VoteResult, ApiError> {
        Err(ApiError::Rejected("not supported".to_string()))
    }

    async fn submit_file(&self, _file_name: &str, _contents: Vec<u8>) -> Result<String, ApiError> {
        Ok("task-file".to_string())
    }

    async fn submit_url(&self, _route_url: &str) -> Result<String, ApiError> {
        Ok("task-url".to_string())
    }

    async fn task_status(&self, _task_id: &str) -> Result<TaskStatus, ApiError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses
                .front()
                .cloned()
                .unwrap_or_else(|| Err(ApiError::Rejected("no status queued".to_string())))
        }
    }
}
