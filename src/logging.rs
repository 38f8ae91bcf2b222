//! A plain-text logger for the `log` facade.
//!
//! egal reports every recoverable problem (sanitized input, ignored inline
//! JSON) as a `log::warn!` record with target `egal::sanitize` or
//! `egal::css`. Any `log` backend can pick those up;
//! [`EgalLogger`] is a small ready-made one for binaries and build scripts
//! that have no logger of their own.
//!
//! ```no_run
//! use egal::logging::EgalLogger;
//! use log::LevelFilter;
//!
//! EgalLogger::new()
//!     .level(LevelFilter::Warn)
//!     .show_time(false)
//!     .init()
//!     .expect("no other logger installed");
//! ```

use std::io::{self, Write};
use std::sync::Mutex;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use time::{OffsetDateTime, format_description::OwnedFormatItem};

use crate::sync::lock_recover;

/// Line-oriented logger writing `time level target message`.
///
/// # Thread Safety
///
/// The sink is guarded by a mutex with poison recovery, so records from
/// concurrent threads are written whole, one line each.
pub struct EgalLogger {
    level: LevelFilter,
    show_time: bool,
    show_level: bool,
    show_target: bool,
    time_format: OwnedFormatItem,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl EgalLogger {
    /// Create a logger writing to stderr at `Warn` level.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Create a logger writing to any sink.
    #[must_use]
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        let time_format = time::format_description::parse_owned::<2>("[hour]:[minute]:[second]")
            .unwrap_or_else(|_| OwnedFormatItem::Literal(Vec::<u8>::new().into_boxed_slice()));
        Self {
            level: LevelFilter::Warn,
            show_time: true,
            show_level: true,
            show_target: true,
            time_format,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Enable or disable timestamps.
    #[must_use]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Enable or disable the level column.
    #[must_use]
    pub fn show_level(mut self, show: bool) -> Self {
        self.show_level = show;
        self
    }

    /// Enable or disable the target column.
    #[must_use]
    pub fn show_target(mut self, show: bool) -> Self {
        self.show_target = show;
        self
    }

    /// Override the time format. Invalid descriptions keep the current one.
    #[must_use]
    pub fn time_format(mut self, format: &str) -> Self {
        if let Ok(parsed) = time::format_description::parse_owned::<2>(format) {
            self.time_format = parsed;
        }
        self
    }

    /// Install as the global logger.
    pub fn init(self) -> Result<(), SetLoggerError> {
        log::set_max_level(self.level);
        log::set_boxed_logger(Box::new(self))
    }

    fn format_time(&self) -> String {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        now.format(&self.time_format)
            .unwrap_or_else(|_| now.to_string())
    }

    fn format_record(&self, record: &Record<'_>) -> String {
        let mut line = String::new();

        if self.show_time {
            line.push_str(&self.format_time());
            line.push(' ');
        }

        if self.show_level {
            line.push_str(&format!("{:<6}", record.level()));
        }

        if self.show_target {
            line.push_str(record.target());
            line.push_str(": ");
        }

        line.push_str(&record.args().to_string());
        line
    }
}

impl Default for EgalLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for EgalLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = self.format_record(record);
        let mut writer = lock_recover(&self.writer);
        // a failing sink must not take the caller down with it
        let _ = writeln!(writer, "{line}");
    }

    fn flush(&self) {
        let _ = lock_recover(&self.writer).flush();
    }
}
