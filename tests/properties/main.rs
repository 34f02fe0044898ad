//! Property test suite entry point.

mod determinism_tests;
mod model_properties;
