//! irtsim - simulate students learning concepts under a 3PL IRT model while
//! bandit agents pick what to teach next.

pub mod agents;
pub mod app;
pub mod cli;
pub mod concepts;
pub mod config;
pub mod env;
pub mod error;
pub mod forgetting;
pub mod generate;
pub mod irt;
pub mod persist;
pub mod student;

pub use error::{Result, SimError};
