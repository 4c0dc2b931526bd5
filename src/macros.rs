//! Logging macros for ergonomic log message formatting.
//!
//! These macros format the message like `format!`, accept an optional
//! leading `[fields]` list, and record the calling module path under the
//! `function` key.
//!
//! # Examples
//!
//! ```
//! use rust_log_facade::prelude::*;
//! use rust_log_facade::{info, warn};
//!
//! let logger = Logger::new(false);
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! warn!(logger, [Field::string("peer", "10.0.0.7"), Field::int("retries", 3)], "Peer slow");
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::new(false);
/// use rust_log_facade::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, [Field::int("code", 500)], "Request failed: {}", "/health");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, [$($field:expr),* $(,)?], $($arg:tt)+) => {
        $logger.log_from_macro(
            $level,
            &format!($($arg)+),
            &[$($field),*],
            module_path!(),
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log_from_macro($level, &format!($($arg)+), &[], module_path!())
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::new(false);
/// use rust_log_facade::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::new(false);
/// use rust_log_facade::info;
/// info!(logger, "Application started");
/// info!(logger, [Field::string("version", "1.2.0")], "Loaded {} plugins", 4);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::new(false);
/// use rust_log_facade::error;
/// let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
/// error!(logger, [Field::error(&err)], "Failed to save snapshot");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal message, flush, and exit the process with status 1.
///
/// ```no_run
/// # use rust_log_facade::prelude::*;
/// # let logger = Logger::new(false);
/// use rust_log_facade::fatal;
/// fatal!(logger, "Cannot bind {}", "0.0.0.0:80");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
