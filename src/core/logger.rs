//! Main logger implementation

use super::{
    appender::Appender,
    config::{Destination, LoggerConfig},
    encoder::EncoderConfig,
    error::{LoggerError, Result},
    facade::StructuredLogger,
    field::Field,
    log_entry::{Caller, LogEntry},
    log_level::LogLevel,
    metrics::LoggerMetrics,
};
use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
use parking_lot::RwLock;
use std::backtrace::Backtrace;
use std::fs;
use std::io::Write;
use std::panic::Location;
use std::path::PathBuf;
use std::sync::Arc;

type SharedAppenders = Arc<RwLock<Vec<Box<dyn Appender>>>>;

/// Logger handle
///
/// Cloning, [`Logger::with`] and [`Logger::named`] produce handles that share
/// the appenders and metrics but own their name and field list.
///
/// # Example
///
/// ```
/// use rust_log_facade::prelude::*;
///
/// let logger = Logger::new(false);
/// let request_log = logger.with(&[Field::string("request_id", "abc-123")]);
/// request_log.info("request accepted", &[Field::int("items", 3)]);
/// ```
#[derive(Clone)]
pub struct Logger {
    appenders: SharedAppenders,
    metrics: Arc<LoggerMetrics>,
    min_level: LogLevel,
    stacktrace_level: Option<LogLevel>,
    name: Option<String>,
    fields: Vec<Field>,
}

impl Logger {
    /// Build the standard logger
    ///
    /// With `persist_to_file` false, records go to standard output. With it
    /// true, `logs/` is created and records go to both `logs/all.log` and
    /// standard output.
    ///
    /// # Panics
    ///
    /// Panics if the log directory or file cannot be created; running without
    /// the requested log destination is not allowed. Use
    /// [`LoggerBuilder::build`] to handle the error instead.
    #[must_use]
    pub fn new(persist_to_file: bool) -> Self {
        Self::builder()
            .persist_to_file(persist_to_file)
            .build()
            .unwrap_or_else(|e| panic!("failed to initialize logger: {}", e))
    }

    /// Build a logger from a deserialized configuration
    pub fn from_config(config: LoggerConfig) -> Result<Self> {
        Self::builder().config(config).build()
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Derive a logger that adds `fields` to every record
    #[must_use]
    pub fn with(&self, fields: &[Field]) -> Logger {
        let mut child = self.clone();
        child.fields.extend_from_slice(fields);
        child
    }

    /// Derive a logger whose name gets `name` appended, dot separated
    ///
    /// Line breaks and tabs in `name` are escaped like those in messages.
    #[must_use]
    pub fn named(&self, name: &str) -> Logger {
        let mut child = self.clone();
        if name.is_empty() {
            return child;
        }
        let name = LogEntry::sanitize_message(name);
        child.name = match &self.name {
            Some(parent) => Some(format!("{}.{}", parent, name)),
            None => Some(name),
        };
        child
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Fields added to every record by this handle
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    #[inline]
    #[must_use]
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, msg: &str, fields: &[Field]) {
        let caller = Caller::from_location(Location::caller());
        self.write_entry(level, msg, fields, caller);
        self.terminate_if_needed(level, msg);
    }

    /// Entry point for the logging macros, which know the calling module
    #[doc(hidden)]
    #[track_caller]
    pub fn log_from_macro(
        &self,
        level: LogLevel,
        msg: &str,
        fields: &[Field],
        module_path: &'static str,
    ) {
        let caller = Caller::from_location(Location::caller()).with_function(module_path);
        self.write_entry(level, msg, fields, caller);
        self.terminate_if_needed(level, msg);
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, msg: &str, fields: &[Field]) {
        self.log(LogLevel::Debug, msg, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, msg: &str, fields: &[Field]) {
        self.log(LogLevel::Info, msg, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, msg: &str, fields: &[Field]) {
        self.log(LogLevel::Warn, msg, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, msg: &str, fields: &[Field]) {
        self.log(LogLevel::Error, msg, fields);
    }

    /// Write the record, flush, then exit the process with status 1
    #[track_caller]
    pub fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        let caller = Caller::from_location(Location::caller());
        self.write_entry(LogLevel::Fatal, msg, fields, caller);
        self.exit()
    }

    /// Write the record, flush, then panic with `msg`
    #[track_caller]
    pub fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        let caller = Caller::from_location(Location::caller());
        self.write_entry(LogLevel::Panic, msg, fields, caller);
        self.unwind(msg)
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    fn flush_quietly(&self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush: {}", e);
        }
    }

    fn exit(&self) -> ! {
        self.flush_quietly();
        std::process::exit(1)
    }

    fn unwind(&self, msg: &str) -> ! {
        self.flush_quietly();
        panic!("{}", msg)
    }

    fn terminate_if_needed(&self, level: LogLevel, msg: &str) {
        match level {
            LogLevel::Panic => self.unwind(msg),
            LogLevel::Fatal => self.exit(),
            _ => {}
        }
    }

    fn write_entry(&self, level: LogLevel, msg: &str, fields: &[Field], caller: Caller) {
        if !self.enabled(level) {
            return;
        }

        let mut all_fields = Vec::with_capacity(self.fields.len() + fields.len());
        all_fields.extend_from_slice(&self.fields);
        all_fields.extend_from_slice(fields);

        let mut entry = LogEntry::new(level, msg)
            .with_caller(caller)
            .with_logger_name(self.name.clone())
            .with_fields(all_fields);

        if self.stacktrace_level.is_some_and(|min| level >= min) {
            entry = entry.with_stacktrace(Backtrace::force_capture().to_string());
        }

        let mut appenders = self.appenders.write();
        Self::process_sync(&mut appenders, &entry, &self.metrics);
    }

    /// Deliver one entry to every appender with per-appender panic isolation
    ///
    /// A failing or panicking appender is reported on stderr and counted;
    /// the remaining appenders still receive the entry.
    fn process_sync(
        appenders: &mut [Box<dyn Appender>],
        entry: &LogEntry,
        metrics: &LoggerMetrics,
    ) {
        let mut has_error = false;

        for appender in appenders.iter_mut() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", appender.name(), e);
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER ERROR] Appender '{}' panicked: {}. \
                         Other appenders continue to function.",
                        appender.name(),
                        panic_msg
                    );
                    metrics.record_appender_panic();
                    has_error = true;
                }
            }
        }

        if has_error {
            metrics.record_failed_write();
        } else {
            metrics.record_logged();
        }
    }
}

impl StructuredLogger for Logger {
    #[track_caller]
    fn log(&self, level: LogLevel, msg: &str, fields: &[Field]) {
        Logger::log(self, level, msg, fields);
    }

    #[track_caller]
    fn debug(&self, msg: &str, fields: &[Field]) {
        Logger::debug(self, msg, fields);
    }

    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]) {
        Logger::info(self, msg, fields);
    }

    #[track_caller]
    fn warn(&self, msg: &str, fields: &[Field]) {
        Logger::warn(self, msg, fields);
    }

    #[track_caller]
    fn error(&self, msg: &str, fields: &[Field]) {
        Logger::error(self, msg, fields);
    }

    #[track_caller]
    fn fatal(&self, msg: &str, fields: &[Field]) -> ! {
        Logger::fatal(self, msg, fields)
    }

    #[track_caller]
    fn panic(&self, msg: &str, fields: &[Field]) -> ! {
        Logger::panic(self, msg, fields)
    }

    fn with(&self, fields: &[Field]) -> Box<dyn StructuredLogger> {
        Box::new(Logger::with(self, fields))
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Every setting defaults to the value [`Logger::new`] uses.
///
/// # Example
/// ```no_run
/// use rust_log_facade::prelude::*;
///
/// let logger = Logger::builder()
///     .persist_to_file(true)
///     .log_dir("/var/log/billing")
///     .min_level(LogLevel::Info)
///     .rotation(RotationPolicy::new().with_max_size_mb(100).with_max_backups(5))
///     .add_stacktrace(LogLevel::Error)
///     .build()
///     .expect("log directory must be writable");
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    console_writer: Option<Box<dyn Write + Send + Sync>>,
    appenders: Vec<Box<dyn Appender>>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            console_writer: None,
            appenders: Vec::new(),
        }
    }

    /// Replace every configurable value at once
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn persist_to_file(mut self, enabled: bool) -> Self {
        self.config.persist_to_file = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.log_dir = dir.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.config.file_name = name.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.config.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.config.name = Some(name.into());
        self
    }

    /// Attach a stacktrace to records at or above `level`
    #[must_use = "builder methods return a new value"]
    pub fn add_stacktrace(mut self, level: LogLevel) -> Self {
        self.config.stacktrace_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn encoder(mut self, encoder: EncoderConfig) -> Self {
        self.config.encoder = encoder;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn rotation(mut self, policy: RotationPolicy) -> Self {
        self.config.rotation = policy;
        self
    }

    /// Send console output somewhere other than standard output
    #[must_use = "builder methods return a new value"]
    pub fn console_writer<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + Sync + 'static,
    {
        self.console_writer = Some(Box::new(writer));
        self
    }

    /// Add an appender next to the built-in ones
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    /// Build the Logger
    ///
    /// # Errors
    ///
    /// In file mode, fails if the log directory or file cannot be created
    /// or the rotation policy is invalid.
    pub fn build(self) -> Result<Logger> {
        let config = self.config;
        let mut appenders: Vec<Box<dyn Appender>> = Vec::with_capacity(2 + self.appenders.len());

        if config.destination() == Destination::FileAndConsole {
            fs::create_dir_all(&config.log_dir).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", config.log_dir.display()),
                    e,
                )
            })?;

            let file = RotatingFileAppender::with_policy(
                config.file_path(),
                config.rotation.clone(),
                config.encoder.clone(),
            )?;
            appenders.push(Box::new(file));
        }

        let mut console = ConsoleAppender::with_encoder(config.encoder.clone());
        if let Some(writer) = self.console_writer {
            console = console.with_writer(writer);
        }
        appenders.push(Box::new(console));
        appenders.extend(self.appenders);

        Ok(Logger {
            appenders: Arc::new(RwLock::new(appenders)),
            metrics: Arc::new(LoggerMetrics::new()),
            min_level: config.min_level,
            stacktrace_level: config.stacktrace_level,
            name: config.name.map(|name| LogEntry::sanitize_message(&name)),
            fields: Vec::new(),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
