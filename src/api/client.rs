//! HTTP client for the route sharing site.
//!
//! `RouteApi` is the seam the browser, comparison and polling code depend on;
//! `ApiClient` is the reqwest-backed implementation used by the application.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use reqwest::header::COOKIE;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use super::types::{
    ErrorBody, Review, ReviewSort, RouteDetail, RouteSummary, TaskStatus, TaskSubmitted,
    VoteDirection, VoteResult,
};
use super::ApiError;
use crate::storage::config::ApiSettings;

/// Operations the client consumes from the site.
pub trait RouteApi: Send + Sync {
    /// `GET /api/list_saved_routes`
    fn list_routes(&self) -> impl Future<Output = Result<Vec<RouteSummary>, ApiError>> + Send;

    /// `GET /api/routes/{id}`
    fn route_detail(&self, id: &str)
        -> impl Future<Output = Result<RouteDetail, ApiError>> + Send;

    /// `GET /api/compare_data?ids=a,b,c`
    fn compare_data(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<Vec<RouteDetail>, ApiError>> + Send;

    /// `GET /api/get_top_reviews?ids=a,b,c`
    fn top_reviews(
        &self,
        ids: &[String],
    ) -> impl Future<Output = Result<HashMap<String, Review>, ApiError>> + Send;

    /// `GET /api/routes/{id}/reviews?sort=...`
    fn reviews(
        &self,
        route_id: &str,
        sort: ReviewSort,
    ) -> impl Future<Output = Result<Vec<Review>, ApiError>> + Send;

    /// `POST /api/reviews/{id}/vote`
    fn vote(
        &self,
        review_id: &str,
        direction: VoteDirection,
    ) -> impl Future<Output = Result<VoteResult, ApiError>> + Send;

    /// `POST /process_route_file` (multipart `gpx_file`). Returns the task id.
    fn submit_file(
        &self,
        file_name: &str,
        contents: Vec<u8>,
    ) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `POST /process_route_url`. Returns the task id.
    fn submit_url(&self, route_url: &str) -> impl Future<Output = Result<String, ApiError>> + Send;

    /// `GET /task_status/{task_id}`
    fn task_status(&self, task_id: &str)
        -> impl Future<Output = Result<TaskStatus, ApiError>> + Send;
}

/// reqwest-backed API client.
#[derive(Clone)]
pub struct ApiClient {
    /// HTTP client
    http: reqwest::Client,
    /// Site root, without trailing slash
    base_url: String,
    /// Optional pre-issued session cookie for endpoints that need a login
    session_cookie: Option<String>,
}

impl ApiClient {
    /// Create a client from API settings.
    pub fn new(settings: &ApiSettings) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .user_agent(concat!("routeshare/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            session_cookie: settings
                .session_cookie
                .clone()
                .filter(|c| !c.trim().is_empty()),
        })
    }

    /// Site root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_session(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => request.header(COOKIE, cookie.as_str()),
            None => request,
        }
    }

    /// Send a request and decode a JSON body, mapping failures onto `ApiError`.
    async fn send<R: DeserializeOwned>(&self, request: RequestBuilder) -> Result<R, ApiError> {
        let response = self
            .with_session(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    async fn get<R: DeserializeOwned>(&self, path: &str) -> Result<R, ApiError> {
        tracing::debug!("GET {}", path);
        self.send(self.http.get(self.url(path))).await
    }

    fn task_id(submitted: TaskSubmitted) -> Result<String, ApiError> {
        match submitted.task_id {
            Some(id) if !id.is_empty() => Ok(id),
            _ => Err(ApiError::Rejected(
                submitted
                    .error
                    .unwrap_or_else(|| "Failed to start task.".to_string()),
            )),
        }
    }
}

/// Build a status error, preferring the body's `error` field.
fn status_error(status: StatusCode, body: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("HTTP error! Status: {}", status.as_u16()));

    ApiError::Status {
        status: status.as_u16(),
        message,
    }
}

impl RouteApi for ApiClient {
    async fn list_routes(&self) -> Result<Vec<RouteSummary>, ApiError> {
        self.get("/api/list_saved_routes").await
    }

    async fn route_detail(&self, id: &str) -> Result<RouteDetail, ApiError> {
        self.get(&format!("/api/routes/{}", id)).await
    }

    async fn compare_data(&self, ids: &[String]) -> Result<Vec<RouteDetail>, ApiError> {
        tracing::debug!("GET /api/compare_data for {} routes", ids.len());
        let request = self
            .http
            .get(self.url("/api/compare_data"))
            .query(&[("ids", ids.join(","))]);
        self.send(request).await
    }

    async fn top_reviews(&self, ids: &[String]) -> Result<HashMap<String, Review>, ApiError> {
        let request = self
            .http
            .get(self.url("/api/get_top_reviews"))
            .query(&[("ids", ids.join(","))]);
        self.send(request).await
    }

    async fn reviews(&self, route_id: &str, sort: ReviewSort) -> Result<Vec<Review>, ApiError> {
        let request = self
            .http
            .get(self.url(&format!("/api/routes/{}/reviews", route_id)))
            .query(&[("sort", sort.as_str())]);
        self.send(request).await
    }

    async fn vote(&self, review_id: &str, direction: VoteDirection) -> Result<VoteResult, ApiError> {
        let request = self
            .http
            .post(self.url(&format!("/api/reviews/{}/vote", review_id)))
            .json(&serde_json::json!({ "direction": direction }));

        match self.send::<VoteResult>(request).await {
            Err(ApiError::Status { status: 401, .. }) => Err(ApiError::Status {
                status: 401,
                message: "You must be logged in on the website to vote.".to_string(),
            }),
            Ok(result) if !result.success => {
                Err(ApiError::Rejected("Failed to register vote.".to_string()))
            }
            other => other,
        }
    }

    async fn submit_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String, ApiError> {
        tracing::info!("Submitting route file {} ({} bytes)", file_name, contents.len());
        let part = reqwest::multipart::Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("application/gpx+xml")
            .map_err(|e| ApiError::Rejected(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("gpx_file", part);

        let request = self.http.post(self.url("/process_route_file")).multipart(form);
        Self::task_id(self.send(request).await?)
    }

    async fn submit_url(&self, route_url: &str) -> Result<String, ApiError> {
        tracing::info!("Submitting route URL {}", route_url);
        let request = self
            .http
            .post(self.url("/process_route_url"))
            .json(&serde_json::json!({ "route_url": route_url }));
        Self::task_id(self.send(request).await?)
    }

    async fn task_status(&self, task_id: &str) -> Result<TaskStatus, ApiError> {
        self.get(&format!("/task_status/{}", task_id)).await
    }
}
