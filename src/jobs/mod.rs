//! Route submission and processing-job polling.

pub mod poller;
pub mod submit;

pub use poller::{poll_task, CancelHandle, PollConfig, PollError};
pub use submit::{load_gpx, preview_gpx, validate_route_url, GpxPreview, GpxUpload, SubmitError};
