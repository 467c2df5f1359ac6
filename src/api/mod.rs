//! Client for the route sharing site's REST API.

pub mod client;
pub mod types;

pub use client::{ApiClient, RouteApi};
pub use types::{
    Coordinates, Review, ReviewRatings, ReviewSort, RouteDetail, RouteMetrics, RouteSummary,
    TaskState, TaskStatus, TaskSubmitted, TrackPoint, VoteDirection, VoteResult,
};

use thiserror::Error;

/// Errors surfaced by API calls.
///
/// Every variant is handled the same way by callers: logged and shown inline
/// by the widget that issued the request. Nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Network, DNS or timeout failure
    #[error("Network error: {0}")]
    Transport(String),

    /// Non-2xx response; message comes from the body's `error` field if any
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Malformed response body
    #[error("Unexpected response: {0}")]
    Parse(String),

    /// A requested route was absent from the response
    #[error("Route not found: {0}")]
    NotFound(String),

    /// Request refused before or after reaching the server
    #[error("{0}")]
    Rejected(String),
}

impl ApiError {
    /// HTTP status code, if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
