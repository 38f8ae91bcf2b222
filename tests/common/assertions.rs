//! Logged assertion helpers for egal tests.
//!
//! These functions wrap standard assertions with tracing logs,
//! providing detailed context when assertions fail.

#![allow(dead_code)]

use std::fmt::Debug;

/// Assert equality with detailed logging.
///
/// # Example
///
/// ```rust,ignore
/// assert_eq_logged("rendered color", color, "oklch(50% 0.08501 0)");
/// ```
#[track_caller]
pub fn assert_eq_logged<T: PartialEq + Debug>(context: &str, actual: T, expected: T) {
    tracing::debug!(
        context = context,
        expected = ?expected,
        actual = ?actual,
        "asserting equality"
    );

    if actual != expected {
        tracing::error!(
            context = context,
            expected = ?expected,
            actual = ?actual,
            "assertion failed: values not equal"
        );
    }

    assert_eq!(
        actual, expected,
        "{context}: expected {expected:?}, got {actual:?}"
    );

    tracing::trace!(context = context, "assertion passed");
}

/// Assert that two floats differ by at most `tolerance`.
#[track_caller]
pub fn assert_close_logged(context: &str, actual: f64, expected: f64, tolerance: f64) {
    tracing::debug!(
        context = context,
        expected = expected,
        actual = actual,
        tolerance = tolerance,
        "asserting closeness"
    );

    let close = (actual - expected).abs() <= tolerance;
    if !close {
        tracing::error!(
            context = context,
            expected = expected,
            actual = actual,
            "assertion failed: values too far apart"
        );
    }

    assert!(
        close,
        "{context}: expected {expected} +/- {tolerance}, got {actual}"
    );
}

/// Assert that a value is true with logging.
#[track_caller]
pub fn assert_true_logged(context: &str, value: bool) {
    tracing::debug!(context = context, value = value, "asserting true");

    if !value {
        tracing::error!(
            context = context,
            value = value,
            "assertion failed: expected true"
        );
    }

    assert!(value, "{context}: expected true, got false");
}

/// Assert that a Result is Ok with logging.
///
/// Returns the Ok value for further assertions.
#[track_caller]
pub fn assert_ok_logged<T: Debug, E: Debug>(context: &str, result: Result<T, E>) -> T {
    tracing::debug!(context = context, result = ?result, "asserting Ok");

    match result {
        Ok(value) => value,
        Err(ref e) => {
            tracing::error!(context = context, error = ?e, "assertion failed: expected Ok, got Err");
            panic!("{context}: expected Ok, got Err({e:?})");
        }
    }
}

/// Assert that a string contains a substring.
#[track_caller]
pub fn assert_contains_logged(context: &str, haystack: &str, needle: &str) {
    tracing::debug!(
        context = context,
        haystack = haystack,
        needle = needle,
        "asserting contains"
    );

    let found = haystack.contains(needle);
    if !found {
        tracing::error!(
            context = context,
            haystack = haystack,
            needle = needle,
            "assertion failed: substring not found"
        );
    }

    assert!(found, "{context}: expected {haystack:?} to contain {needle:?}");
}
