//! Common test utilities and logging infrastructure
//!
//! Two kinds of logging meet in the tests:
//!
//! - `tracing` output from the tests themselves (and from egal when the
//!   `tracing` feature is on), set up by [`init_test_logging`].
//! - `log` records that egal emits for sanitized input and ignored JSON.
//!   [`capture_warnings`] collects them per thread so tests can assert on
//!   them.
//!
//! # Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::{capture_warnings, init_test_logging};
//!
//! #[test]
//! fn my_test() {
//!     init_test_logging();
//!     let (color, warnings) = capture_warnings(|| egal(2.0, 1.0, 0.0, &OptionsLayer::new()));
//!     assert_eq!(warnings.len(), 1);
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG=debug` - Enable debug logging in tests
//! - `RUST_LOG=egal=trace` - Trace floor searches (with `--features tracing`)
//! - `TEST_LOG_JSON=1` - Output JSON format for CI parsing
//!
//! Note: Not all test utilities are used in every test module, but they're available
//! for consistent test infrastructure across the suite.

#![allow(dead_code)]

pub mod assertions;

use std::cell::RefCell;
use std::sync::Once;

use log::{Level, LevelFilter, Log, Metadata, Record};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static INIT: Once = Once::new();
static CAPTURE_INIT: Once = Once::new();

/// Initialize test logging infrastructure.
///
/// Sets up tracing with the test writer, file and line information, thread
/// IDs and targets. Idempotent.
pub fn init_test_logging() {
    // the capture logger must own the `log` facade before tracing bridges it
    install_capture_logger();
    INIT.call_once(|| {
        // Check if JSON output is requested for CI
        let use_json = std::env::var("TEST_LOG_JSON").is_ok();

        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("egal=debug,test=info"));

        if use_json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_test_writer())
                .try_init()
                .ok();
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    fmt::layer()
                        .with_test_writer()
                        .with_ansi(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_thread_ids(true)
                        .with_target(true)
                        .compact(),
                )
                .try_init()
                .ok();
        }
    });
}

/// A test span guard that logs entry and exit.
pub fn test_phase(name: &str) -> tracing::span::EnteredSpan {
    let span = tracing::info_span!("test_phase", phase = name);
    tracing::info!(phase = name, "entering test phase");
    span.entered()
}

/// Log test context information.
pub fn log_test_context(test_name: &str, description: &str) {
    tracing::info!(
        test_name = test_name,
        description = description,
        "test context"
    );
}

/// A `log` record seen by [`capture_warnings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captured {
    pub level: Level,
    pub target: String,
    pub message: String,
}

thread_local! {
    static CAPTURED: RefCell<Option<Vec<Captured>>> = const { RefCell::new(None) };
}

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        CAPTURED.with(|captured| {
            if let Some(records) = captured.borrow_mut().as_mut() {
                records.push(Captured {
                    level: record.level(),
                    target: record.target().to_string(),
                    message: record.args().to_string(),
                });
            }
        });
    }

    fn flush(&self) {}
}

/// Run `f` and return its result with the `log` records it emitted on this
/// thread.
///
/// Installs a capturing logger for the whole test binary on first use.
pub fn capture_warnings<R>(f: impl FnOnce() -> R) -> (R, Vec<Captured>) {
    install_capture_logger();
    CAPTURED.with(|captured| *captured.borrow_mut() = Some(Vec::new()));
    let result = f();
    let records = CAPTURED
        .with(|captured| captured.borrow_mut().take())
        .unwrap_or_default();
    (result, records)
}

fn install_capture_logger() {
    CAPTURE_INIT.call_once(|| {
        static LOGGER: CaptureLogger = CaptureLogger;
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(LevelFilter::Trace);
        }
    });
}

/// Messages of the captured records at `Warn` level.
pub fn warning_messages(records: &[Captured]) -> Vec<&str> {
    records
        .iter()
        .filter(|r| r.level == Level::Warn)
        .map(|r| r.message.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_is_idempotent() {
        init_test_logging();
        init_test_logging();
    }

    #[test]
    fn test_capture_is_per_call() {
        let ((), first) = capture_warnings(|| log::warn!(target: "egal::test", "one"));
        let ((), second) = capture_warnings(|| ());
        assert_eq!(warning_messages(&first), vec!["one"]);
        assert!(second.is_empty());
    }
}
