//! Shared helpers for integration tests.

#![allow(dead_code)]

pub use term_stats::test_fixtures::mtcars;

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() < tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}
