//! Unit test modules.

mod browser_test;
mod config_test;
