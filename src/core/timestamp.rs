//! Time and duration encodings
//!
//! Records carry local timestamps. ISO 8601 output keeps the local offset,
//! e.g. `2025-01-08T10:30:45.123+0100`.

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use rust_log_facade::core::TimeEncoding;
/// use chrono::Local;
///
/// let time = TimeEncoding::Iso8601.format(&Local::now());
/// assert!(time.contains('T'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeEncoding {
    /// ISO 8601 with milliseconds and numeric offset: `2025-01-08T10:30:45.123+0100`
    #[default]
    Iso8601,

    /// RFC 3339 with seconds precision: `2025-01-08T10:30:45+01:00`
    Rfc3339,

    /// RFC 3339 with nanoseconds: `2025-01-08T10:30:45.123456789+01:00`
    Rfc3339Nano,

    /// Floating-point seconds since the Unix epoch: `1736332245.123`
    EpochSeconds,

    /// Floating-point milliseconds since the Unix epoch
    EpochMillis,

    /// Integer nanoseconds since the Unix epoch
    EpochNanos,

    /// Custom strftime format
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_log_facade::core::TimeEncoding;
    ///
    /// let format = TimeEncoding::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimeEncoding {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimeEncoding::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%z").to_string(),
            TimeEncoding::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, false),
            TimeEncoding::Rfc3339Nano => datetime.to_rfc3339_opts(SecondsFormat::Nanos, false),
            TimeEncoding::EpochSeconds => {
                format!("{}", datetime.timestamp_micros() as f64 / 1_000_000.0)
            }
            TimeEncoding::EpochMillis => {
                format!("{}", datetime.timestamp_micros() as f64 / 1_000.0)
            }
            TimeEncoding::EpochNanos => datetime
                .timestamp_nanos_opt()
                .unwrap_or_else(|| datetime.timestamp_micros().saturating_mul(1_000))
                .to_string(),
            TimeEncoding::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// JSON form: numbers for the epoch encodings, strings otherwise
    #[must_use]
    pub fn to_json_value(&self, datetime: &DateTime<Local>) -> serde_json::Value {
        match self {
            TimeEncoding::EpochSeconds => {
                super::field::float_to_json(datetime.timestamp_micros() as f64 / 1_000_000.0)
            }
            TimeEncoding::EpochMillis => {
                super::field::float_to_json(datetime.timestamp_micros() as f64 / 1_000.0)
            }
            TimeEncoding::EpochNanos => match datetime.timestamp_nanos_opt() {
                Some(n) => serde_json::Value::Number(n.into()),
                None => serde_json::Value::String(self.format(datetime)),
            },
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimeEncoding::EpochSeconds | TimeEncoding::EpochMillis | TimeEncoding::EpochNanos
        )
    }
}

/// How `Duration` field values are written
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationEncoding {
    /// Floating-point seconds: `1.5`
    #[default]
    Seconds,
    /// Integer milliseconds: `1500`
    Millis,
    /// Integer nanoseconds: `1500000000`
    Nanos,
    /// Human readable: `"1.5s"`
    String,
}

impl DurationEncoding {
    #[must_use]
    pub fn encode(&self, duration: &Duration) -> serde_json::Value {
        match self {
            DurationEncoding::Seconds => super::field::float_to_json(duration.as_secs_f64()),
            DurationEncoding::Millis => {
                serde_json::Value::Number(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX).into())
            }
            DurationEncoding::Nanos => {
                serde_json::Value::Number(u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX).into())
            }
            DurationEncoding::String => serde_json::Value::String(format!("{:?}", duration)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn fixed_datetime() -> DateTime<Local> {
        // 2025-01-08 10:30:45.123456 UTC
        let utc = chrono::Utc
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(123456);
        utc.with_timezone(&Local)
    }

    #[test]
    fn test_iso8601_format() {
        let dt = fixed_datetime();
        let result = TimeEncoding::Iso8601.format(&dt);
        let expected_prefix = dt.format("%Y-%m-%dT%H:%M:%S").to_string();
        assert!(result.starts_with(&expected_prefix));
        assert!(result.contains(".123"));
        // Offset like +0000 or -0500
        let offset = &result[result.len() - 5..];
        assert!(offset.starts_with('+') || offset.starts_with('-'));
    }

    #[test]
    fn test_iso8601_keeps_instant_and_local_offset() {
        let tz = FixedOffset::east_opt(3600).expect("valid offset");
        let original = tz
            .with_ymd_and_hms(2025, 1, 8, 11, 30, 45)
            .single()
            .expect("valid datetime");
        let local = original.with_timezone(&Local);

        let formatted = TimeEncoding::Iso8601.format(&local);
        let parsed = DateTime::parse_from_str(&formatted, "%Y-%m-%dT%H:%M:%S%.3f%z")
            .expect("ISO-8601 output parses back");

        assert_eq!(parsed, original);
        assert_eq!(parsed.offset(), local.offset());
        assert!(formatted.contains(":45.000"));
    }

    #[test]
    fn test_epoch_encodings_are_numeric() {
        let dt = fixed_datetime();
        assert!(TimeEncoding::EpochSeconds.to_json_value(&dt).is_number());
        assert!(TimeEncoding::EpochNanos.to_json_value(&dt).is_number());
        assert!(TimeEncoding::Iso8601.to_json_value(&dt).is_string());
        assert!(TimeEncoding::EpochMillis.is_numeric());
        assert!(!TimeEncoding::Rfc3339.is_numeric());

        let secs: f64 = TimeEncoding::EpochSeconds.format(&dt).parse().unwrap();
        assert!((secs - 1_736_332_245.123_456).abs() < 1e-3);
    }

    #[test]
    fn test_custom_format() {
        let dt = fixed_datetime();
        let result = TimeEncoding::Custom("%Y".to_string()).format(&dt);
        assert_eq!(result, "2025");
    }

    #[test]
    fn test_duration_encodings() {
        let d = Duration::from_millis(1500);
        assert_eq!(DurationEncoding::Seconds.encode(&d), serde_json::json!(1.5));
        assert_eq!(DurationEncoding::Millis.encode(&d), serde_json::json!(1500));
        assert_eq!(DurationEncoding::Nanos.encode(&d), serde_json::json!(1_500_000_000u64));
        assert_eq!(DurationEncoding::String.encode(&d), serde_json::json!("1.5s"));
    }

    #[test]
    fn test_deserialization() {
        let format: TimeEncoding = serde_json::from_str("\"iso8601\"").expect("deserialize");
        assert_eq!(format, TimeEncoding::Iso8601);

        let format: TimeEncoding =
            serde_json::from_str(r#"{"custom":"%Y-%m-%d"}"#).expect("deserialize custom");
        assert_eq!(format, TimeEncoding::Custom("%Y-%m-%d".to_string()));
    }
}
