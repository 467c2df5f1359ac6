//! Integration test modules.

mod api_client_test;
mod fake_api;
mod poller_test;
mod site_mock;
