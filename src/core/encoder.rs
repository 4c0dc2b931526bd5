//! Encoder configuration and record encoding
//!
//! Two layouts are supported:
//! - Console: tab-separated values followed by the fields as a JSON object
//! - Json: one JSON object per line
//!
//! The key names decide which elements appear: an empty key omits the element
//! in both layouts.

use super::error::Result;
use super::field::FieldsJson;
use super::log_entry::LogEntry;
use super::log_level::LogLevel;
use super::timestamp::{DurationEncoding, TimeEncoding};
use colored::Colorize;
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// Record layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Example: `2025-01-08T10:30:45.123+0100	info	core/app.rs:12	started	{"port":8080}`
    #[default]
    Console,

    /// Example: `{"level":"info","time":"...","caller":"core/app.rs:12","message":"started","port":8080}`
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelEncoding {
    Lowercase,
    /// Lowercase wrapped in ANSI color codes
    #[default]
    LowercaseColor,
    Capital,
    CapitalColor,
}

impl LevelEncoding {
    #[must_use]
    pub fn encode(&self, level: LogLevel) -> String {
        match self {
            LevelEncoding::Lowercase => level.to_str().to_string(),
            LevelEncoding::LowercaseColor => {
                level.to_str().color(level.color_code()).to_string()
            }
            LevelEncoding::Capital => level.to_capital_str().to_string(),
            LevelEncoding::CapitalColor => {
                level.to_capital_str().color(level.color_code()).to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallerEncoding {
    /// `dir/file.rs:line`
    #[default]
    Short,
    /// Full path as compiled
    Full,
}

/// Key names and value encodings shared by every appender of a logger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub encoding: Encoding,
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub function_key: String,
    pub stacktrace_key: String,
    pub line_ending: String,
    /// Separator between console elements
    pub console_separator: String,
    pub level_encoding: LevelEncoding,
    pub time_encoding: TimeEncoding,
    pub duration_encoding: DurationEncoding,
    pub caller_encoding: CallerEncoding,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            encoding: Encoding::Console,
            message_key: "message".to_string(),
            level_key: "level".to_string(),
            time_key: "time".to_string(),
            name_key: "logger".to_string(),
            caller_key: "caller".to_string(),
            function_key: "function".to_string(),
            stacktrace_key: "stacktrace".to_string(),
            line_ending: "\n".to_string(),
            console_separator: "\t".to_string(),
            level_encoding: LevelEncoding::LowercaseColor,
            time_encoding: TimeEncoding::Iso8601,
            duration_encoding: DurationEncoding::Seconds,
            caller_encoding: CallerEncoding::Short,
        }
    }
}

impl EncoderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_level_encoding(mut self, encoding: LevelEncoding) -> Self {
        self.level_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_time_encoding(mut self, encoding: TimeEncoding) -> Self {
        self.time_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_duration_encoding(mut self, encoding: DurationEncoding) -> Self {
        self.duration_encoding = encoding;
        self
    }

    #[must_use]
    pub fn with_caller_encoding(mut self, encoding: CallerEncoding) -> Self {
        self.caller_encoding = encoding;
        self
    }

    /// Encode one record, including the trailing line ending
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::JsonError`](super::error::LoggerError::JsonError)
    /// if the record cannot be serialized.
    pub fn encode(&self, entry: &LogEntry) -> Result<String> {
        match self.encoding {
            Encoding::Console => self.encode_console(entry),
            Encoding::Json => self.encode_json(entry),
        }
    }

    fn encode_caller(&self, entry: &LogEntry) -> Option<String> {
        entry.caller.map(|caller| match self.caller_encoding {
            CallerEncoding::Short => caller.short(),
            CallerEncoding::Full => caller.full(),
        })
    }

    fn encode_console(&self, entry: &LogEntry) -> Result<String> {
        let mut parts: Vec<String> = Vec::with_capacity(6);

        if !self.time_key.is_empty() {
            parts.push(self.time_encoding.format(&entry.time));
        }
        if !self.level_key.is_empty() {
            parts.push(self.level_encoding.encode(entry.level));
        }
        if let Some(ref name) = entry.logger_name {
            if !self.name_key.is_empty() {
                parts.push(name.clone());
            }
        }
        if let Some(caller) = entry.caller {
            if !self.caller_key.is_empty() {
                if let Some(encoded) = self.encode_caller(entry) {
                    parts.push(encoded);
                }
            }
            if let Some(function) = caller.function {
                if !self.function_key.is_empty() {
                    parts.push(function.to_string());
                }
            }
        }
        if !self.message_key.is_empty() {
            parts.push(entry.message.clone());
        }

        let mut line = parts.join(&self.console_separator);

        if !entry.fields.is_empty() {
            if !line.is_empty() {
                line.push_str(&self.console_separator);
            }
            let fields = FieldsJson::new(&entry.fields, &self.duration_encoding);
            line.push_str(&serde_json::to_string(&fields)?);
        }

        if let Some(ref stack) = entry.stacktrace {
            if !self.stacktrace_key.is_empty() {
                line.push('\n');
                line.push_str(stack.trim_end());
            }
        }

        line.push_str(&self.line_ending);
        Ok(line)
    }

    fn encode_json(&self, entry: &LogEntry) -> Result<String> {
        let mut line = serde_json::to_string(&JsonRecord { config: self, entry })?;
        line.push_str(&self.line_ending);
        Ok(line)
    }
}

/// One record in the JSON layout
///
/// Fixed keys are written first; fields follow in order, so a field named
/// like a fixed key never replaces it.
struct JsonRecord<'a> {
    config: &'a EncoderConfig,
    entry: &'a LogEntry,
}

impl Serialize for JsonRecord<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let config = self.config;
        let entry = self.entry;
        let mut map = serializer.serialize_map(None)?;

        if !config.level_key.is_empty() {
            map.serialize_entry(&config.level_key, &config.level_encoding.encode(entry.level))?;
        }
        if !config.time_key.is_empty() {
            map.serialize_entry(&config.time_key, &config.time_encoding.to_json_value(&entry.time))?;
        }
        if let Some(ref name) = entry.logger_name {
            if !config.name_key.is_empty() {
                map.serialize_entry(&config.name_key, name)?;
            }
        }
        if let Some(caller) = entry.caller {
            if !config.caller_key.is_empty() {
                if let Some(encoded) = config.encode_caller(entry) {
                    map.serialize_entry(&config.caller_key, &encoded)?;
                }
            }
            if let Some(function) = caller.function {
                if !config.function_key.is_empty() {
                    map.serialize_entry(&config.function_key, function)?;
                }
            }
        }
        if !config.message_key.is_empty() {
            map.serialize_entry(&config.message_key, &entry.message)?;
        }

        FieldsJson::new(&entry.fields, &config.duration_encoding).serialize_entries(&mut map)?;

        if let Some(ref stack) = entry.stacktrace {
            if !config.stacktrace_key.is_empty() {
                map.serialize_entry(&config.stacktrace_key, stack)?;
            }
        }

        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::field::Field;
    use crate::core::log_entry::Caller;
    use std::time::Duration;

    fn plain() -> EncoderConfig {
        EncoderConfig::new().with_level_encoding(LevelEncoding::Lowercase)
    }

    fn entry() -> LogEntry {
        LogEntry::new(LogLevel::Info, "request served")
            .with_caller(Caller { file: "src/http/server.rs", line: 88, function: None })
            .with_fields(vec![
                Field::string("path", "/health"),
                Field::int("status", 200),
                Field::duration("latency", Duration::from_millis(250)),
            ])
    }

    #[test]
    fn test_console_layout() {
        let line = plain().encode(&entry()).unwrap();
        assert!(line.ends_with('\n'));

        let parts: Vec<&str> = line.trim_end().split('\t').collect();
        assert_eq!(parts.len(), 5);
        assert_eq!(parts[1], "info");
        assert_eq!(parts[2], "http/server.rs:88");
        assert_eq!(parts[3], "request served");
        assert_eq!(parts[4], r#"{"path":"/health","status":200,"latency":0.25}"#);
    }

    #[test]
    fn test_console_with_name_function_and_stack() {
        let e = entry()
            .with_logger_name(Some("api.http".to_string()))
            .with_caller(Caller {
                file: "src/http/server.rs",
                line: 88,
                function: Some("app::http"),
            })
            .with_stacktrace("   0: app::main\n".to_string());

        let line = plain().encode(&e).unwrap();
        let (first, rest) = line.split_once('\n').expect("stacktrace line");
        let parts: Vec<&str> = first.split('\t').collect();
        assert_eq!(parts[2], "api.http");
        assert_eq!(parts[4], "app::http");
        assert_eq!(rest, "   0: app::main\n");
    }

    #[test]
    fn test_empty_key_omits_element() {
        let mut config = plain();
        config.time_key.clear();
        config.caller_key.clear();
        let e = LogEntry::new(LogLevel::Warn, "disk almost full");
        assert_eq!(config.encode(&e).unwrap(), "warn\tdisk almost full\n");
    }

    #[test]
    fn test_colored_level_contains_name() {
        colored::control::set_override(true);
        let encoded = LevelEncoding::LowercaseColor.encode(LogLevel::Error);
        assert!(encoded.contains("error"));
        assert!(encoded.starts_with("\u{1b}["));
        colored::control::unset_override();
    }

    #[test]
    fn test_json_layout() {
        let config = plain().with_encoding(Encoding::Json);
        let line = config.encode(&entry().with_logger_name(Some("api".to_string()))).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed["level"], "info");
        assert_eq!(parsed["logger"], "api");
        assert_eq!(parsed["caller"], "http/server.rs:88");
        assert_eq!(parsed["message"], "request served");
        assert_eq!(parsed["status"], 200);
        assert_eq!(parsed["latency"], 0.25);
        assert!(parsed["time"].is_string());
        assert!(parsed.get("stacktrace").is_none());

        // Fixed keys come first, in order
        let keys: Vec<&str> = parsed.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(&keys[..5], &["level", "time", "logger", "caller", "message"]);
    }

    #[test]
    fn test_json_field_named_like_fixed_key() {
        let config = plain().with_encoding(Encoding::Json);
        let e = LogEntry::new(LogLevel::Info, "the real message").with_fields(vec![
            Field::string("message", "user data"),
            Field::string("level", "x"),
        ]);
        let line = config.encode(&e).unwrap();

        assert!(line.starts_with(r#"{"level":"info","time":"#), "line: {}", line);
        let real = line.find(r#""message":"the real message""#).expect("record message kept");
        let field = line.find(r#""message":"user data""#).expect("field kept");
        assert!(real < field);
        assert!(line.trim_end().ends_with(r#""message":"user data","level":"x"}"#));
    }

    #[test]
    fn test_repeated_field_keys_all_written() {
        let e = LogEntry::new(LogLevel::Info, "console").with_fields(vec![
            Field::string("user", "f1"),
            Field::string("user", "f2"),
        ]);

        let console = plain().encode(&e).unwrap();
        assert!(console.ends_with("console\t{\"user\":\"f1\",\"user\":\"f2\"}\n"));

        let json = plain().with_encoding(Encoding::Json).encode(&e).unwrap();
        assert!(json.trim_end().ends_with(r#""user":"f1","user":"f2"}"#));
    }

    #[test]
    fn test_full_caller() {
        let config = plain()
            .with_encoding(Encoding::Json)
            .with_caller_encoding(CallerEncoding::Full);
        let parsed: serde_json::Value =
            serde_json::from_str(config.encode(&entry()).unwrap().trim_end()).unwrap();
        assert_eq!(parsed["caller"], "src/http/server.rs:88");
    }

    #[test]
    fn test_default_keys() {
        let config = EncoderConfig::default();
        assert_eq!(config.message_key, "message");
        assert_eq!(config.level_key, "level");
        assert_eq!(config.time_key, "time");
        assert_eq!(config.name_key, "logger");
        assert_eq!(config.caller_key, "caller");
        assert_eq!(config.function_key, "function");
        assert_eq!(config.stacktrace_key, "stacktrace");
        assert_eq!(config.level_encoding, LevelEncoding::LowercaseColor);
        assert_eq!(config.duration_encoding, DurationEncoding::Seconds);
    }

    #[test]
    fn test_partial_deserialization() {
        let config: EncoderConfig =
            serde_json::from_str(r#"{"encoding":"json","message_key":"msg"}"#).unwrap();
        assert_eq!(config.encoding, Encoding::Json);
        assert_eq!(config.message_key, "msg");
        assert_eq!(config.level_key, "level");
    }
}
