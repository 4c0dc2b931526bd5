//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod encoder;
pub mod error;
pub mod facade;
pub mod field;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod timestamp;

pub use appender::Appender;
pub use config::{Destination, LoggerConfig, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
pub use encoder::{CallerEncoding, EncoderConfig, Encoding, LevelEncoding};
pub use error::{LoggerError, Result};
pub use facade::StructuredLogger;
pub use field::{Field, FieldValue, FieldsJson};
pub use log_entry::{Caller, LogEntry};
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use timestamp::{DurationEncoding, TimeEncoding};
