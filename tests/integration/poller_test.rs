//! Integration tests for job status polling.

use std::sync::Arc;
use std::time::Duration;

use routeshare::api::TaskState;
use routeshare::jobs::{poll_task, CancelHandle, PollConfig, PollError};
use routeshare::{ApiError, RouteApi};

use crate::fake_api::{status, success, FakeApi};
use crate::site_mock::{client, spawn_site, SiteState};

fn fast(max_attempts: u32) -> PollConfig {
    PollConfig {
        interval: Duration::from_millis(5),
        max_attempts,
    }
}

#[tokio::test]
async fn test_success_after_progress() {
    let api = FakeApi::with_statuses(vec![
        Ok(status(TaskState::Pending, None)),
        Ok(status(TaskState::Progress, Some("Fetching elevation..."))),
        Ok(success("d-77")),
    ]);
    let (_handle, cancel) = CancelHandle::new();

    let mut seen = Vec::new();
    let done = poll_task(&api, "t1", fast(10), cancel, |s| seen.push(s.state))
        .await
        .unwrap();

    assert_eq!(done.draft_id(), Some("d-77".to_string()));
    assert_eq!(seen, vec![TaskState::Pending, TaskState::Progress]);
    assert_eq!(api.status_calls(), 3);
}

#[tokio::test]
async fn test_failure_reports_server_message() {
    let api = FakeApi::with_statuses(vec![Ok(status(
        TaskState::Failure,
        Some("No track points found"),
    ))]);
    let (_handle, cancel) = CancelHandle::new();

    let err = poll_task(&api, "t1", fast(10), cancel, |_| {})
        .await
        .unwrap_err();

    assert_eq!(err, PollError::Failed("No track points found".to_string()));
    assert_eq!(
        err.to_string(),
        "Error during processing: No track points found"
    );
}

#[tokio::test]
async fn test_revoked_task_is_a_failure() {
    let api = FakeApi::with_statuses(vec![Ok(status(TaskState::Revoked, None))]);
    let (_handle, cancel) = CancelHandle::new();

    let err = poll_task(&api, "t1", fast(10), cancel, |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, PollError::Failed(_)));
}

#[tokio::test]
async fn test_gives_up_after_max_attempts() {
    let api = FakeApi::with_statuses(vec![Ok(status(TaskState::Started, None))]);
    let (_handle, cancel) = CancelHandle::new();

    let mut progress_calls = 0;
    let err = poll_task(&api, "t1", fast(3), cancel, |_| progress_calls += 1)
        .await
        .unwrap_err();

    assert_eq!(err, PollError::Exhausted { attempts: 3 });
    assert_eq!(progress_calls, 3);
    assert_eq!(api.status_calls(), 3);
}

#[tokio::test]
async fn test_request_error_stops_polling() {
    let api = FakeApi::with_statuses(vec![Err(ApiError::Transport(
        "connection reset".to_string(),
    ))]);
    let (_handle, cancel) = CancelHandle::new();

    let err = poll_task(&api, "t1", fast(10), cancel, |_| {})
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "Error checking status: Network error: connection reset"
    );
    assert_eq!(api.status_calls(), 1);
}

#[tokio::test]
async fn test_cancel_before_first_check() {
    let api = FakeApi::with_statuses(vec![Ok(status(TaskState::Pending, None))]);
    let (handle, cancel) = CancelHandle::new();
    handle.cancel();

    let config = PollConfig {
        interval: Duration::from_secs(30),
        max_attempts: 5,
    };
    let err = poll_task(&api, "t1", config, cancel, |_| {})
        .await
        .unwrap_err();

    assert_eq!(err, PollError::Cancelled);
    assert_eq!(api.status_calls(), 0);
}

#[tokio::test]
async fn test_cancel_between_checks() {
    let api = FakeApi::with_statuses(vec![Ok(status(TaskState::Pending, None))]);
    let (handle, cancel) = CancelHandle::new();

    let config = PollConfig {
        interval: Duration::from_millis(50),
        max_attempts: 100,
    };
    let err = poll_task(&api, "t1", config, cancel, move |_| handle.cancel())
        .await
        .unwrap_err();

    assert_eq!(err, PollError::Cancelled);
    assert_eq!(api.status_calls(), 1);
}

#[tokio::test]
async fn test_submit_and_poll_over_http() {
    let state = Arc::new(SiteState {
        pending_checks: 2,
        ..SiteState::default()
    });
    let base = spawn_site(state.clone()).await;
    let api = client(&base, None);

    let task_id = api
        .submit_url("https://ridewithgps.com/routes/99")
        .await
        .unwrap();
    let (_handle, cancel) = CancelHandle::new();

    let mut messages = Vec::new();
    let done = poll_task(&api, &task_id, fast(10), cancel, |s| {
        messages.extend(s.status.clone())
    })
    .await
    .unwrap();

    assert_eq!(done.draft_id(), Some("draft-9".to_string()));
    assert_eq!(messages, vec!["Processing task-42...", "Processing task-42..."]);
    assert_eq!(
        state
            .status_calls
            .load(std::sync::atomic::Ordering::SeqCst),
        3
    );
}
