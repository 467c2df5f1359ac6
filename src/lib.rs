//! RouteShare - desktop client for a cycling route sharing site
//!
//! Browses published routes with client-side filtering, sorting and a start
//! marker map, compares routes side by side, shows and votes on reviews, and
//! submits new routes for server-side processing.

pub mod api;
pub mod browser;
pub mod jobs;
pub mod storage;
pub mod ui;

// Re-export commonly used types
pub use api::{ApiClient, ApiError, RouteApi};
pub use browser::RouteBrowser;
pub use storage::config::AppConfig;
