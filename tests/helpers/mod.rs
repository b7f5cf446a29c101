//! Shared test infrastructure
//!
//! Helpers for building test settings, seeding data and mocking the
//! external weather provider. Individual test binaries use different
//! subsets of these helpers.
#![allow(dead_code)]

pub mod test_data;
pub mod weather_mock;

pub use test_data::*;
pub use weather_mock::*;

use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the test environment
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}
