//! # Rust Log Facade
//!
//! A small structured logging facade. Application code logs a message plus
//! typed key/value fields at a level; the logger writes one record per call
//! to standard output and, optionally, to a size-rotated file.
//!
//! ## Features
//!
//! - **Leveled records**: debug, info, warn, error, plus panic and fatal that
//!   terminate after writing
//! - **Typed fields**: strings, integers, floats, errors, stacktraces and any
//!   `Serialize` value
//! - **Context loggers**: [`Logger::with`] derives a logger that carries fields
//!   on every record
//! - **File persistence**: `logs/all.log`, rotated at 50 MB with one gzip backup
//!
//! ## Example
//!
//! ```
//! use rust_log_facade::prelude::*;
//!
//! let logger = Logger::new(false);
//! logger.info("service started", &[Field::int("port", 8080)]);
//!
//! let user_log = logger.with(&[Field::string("user", "alice")]);
//! user_log.warn("quota almost used", &[Field::float64("ratio", 0.93)]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        Appender, CallerEncoding, Destination, DurationEncoding, EncoderConfig, Encoding, Field,
        FieldValue, LevelEncoding, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, LoggerMetrics, Result, StructuredLogger, TimeEncoding,
    };
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    Appender, Caller, CallerEncoding, Destination, DurationEncoding, EncoderConfig, Encoding, Field,
    FieldValue, LevelEncoding, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, LoggerMetrics, Result, StructuredLogger, TimeEncoding, DEFAULT_LOG_DIR,
    DEFAULT_LOG_FILE,
};
