//! Log entry structure

use super::field::Field;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use std::panic::Location;

/// Source location of the call that produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
    /// Module path of the call site, when known
    pub function: Option<&'static str>,
}

impl Caller {
    #[must_use]
    pub fn from_location(location: &'static Location<'static>) -> Self {
        Self {
            file: location.file(),
            line: location.line(),
            function: None,
        }
    }

    #[must_use]
    pub fn with_function(mut self, function: &'static str) -> Self {
        self.function = Some(function);
        self
    }

    /// `file:line` with the full path as compiled
    #[must_use]
    pub fn full(&self) -> String {
        format!("{}:{}", self.file, self.line)
    }

    /// `dir/file:line` keeping only the last directory component
    #[must_use]
    pub fn short(&self) -> String {
        let path = self.file.replace('\\', "/");
        let trimmed = match path.rfind('/') {
            Some(last) => match path[..last].rfind('/') {
                Some(prev) => &path[prev + 1..],
                None => path.as_str(),
            },
            None => path.as_str(),
        };
        format!("{}:{}", trimmed, self.line)
    }
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub time: DateTime<Local>,
    pub logger_name: Option<String>,
    pub caller: Option<Caller>,
    pub stacktrace: Option<String>,
    pub fields: Vec<Field>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// so a record never spans more than one line.
    pub(crate) fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, message: impl AsRef<str>) -> Self {
        Self {
            level,
            message: Self::sanitize_message(message.as_ref()),
            time: Local::now(),
            logger_name: None,
            caller: None,
            stacktrace: None,
            fields: Vec::new(),
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = Some(caller);
        self
    }

    pub fn with_logger_name(mut self, name: Option<String>) -> Self {
        self.logger_name = name;
        self
    }

    pub fn with_stacktrace(mut self, stacktrace: String) -> Self {
        self.stacktrace = Some(stacktrace);
        self
    }

    pub fn with_fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_sanitized() {
        let entry = LogEntry::new(LogLevel::Info, "line one\nline two\tend");
        assert_eq!(entry.message, "line one\\nline two\\tend");
    }

    #[test]
    fn test_short_caller() {
        let caller = Caller { file: "src/core/logger.rs", line: 42, function: None };
        assert_eq!(caller.short(), "core/logger.rs:42");
        assert_eq!(caller.full(), "src/core/logger.rs:42");

        let caller = Caller { file: "main.rs", line: 7, function: None };
        assert_eq!(caller.short(), "main.rs:7");

        let caller = Caller { file: "src\\bin\\tool.rs", line: 3, function: None };
        assert_eq!(caller.short(), "bin/tool.rs:3");
    }

    #[test]
    fn test_caller_from_location() {
        let caller = Caller::from_location(Location::caller());
        assert!(caller.file.ends_with("log_entry.rs"));
        assert!(caller.line > 0);
        assert_eq!(caller.with_function("app::handler").function, Some("app::handler"));
    }
}
