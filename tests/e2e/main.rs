//! E2E test suite entry point.

mod bandit_scenarios;
#[path = "../common/mod.rs"]
mod common;
mod response_scenarios;
mod run_workflow;
