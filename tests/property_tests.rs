//! Property-based tests for rust_log_facade using proptest

use parking_lot::Mutex;
use proptest::prelude::*;
use rust_log_facade::prelude::*;
use std::io::{self, Write};
use std::sync::Arc;

fn any_level() -> impl Strategy<Value = LogLevel> {
    prop_oneof![
        Just(LogLevel::Debug),
        Just(LogLevel::Info),
        Just(LogLevel::Warn),
        Just(LogLevel::Error),
        Just(LogLevel::Panic),
        Just(LogLevel::Fatal),
    ]
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn json_logger() -> (Logger, Captured) {
    let captured = Captured::default();
    let logger = Logger::builder()
        .encoder(EncoderConfig::new().with_encoding(Encoding::Json))
        .console_writer(captured.clone())
        .build()
        .expect("Failed to build logger");
    (logger, captured)
}

// ============================================================================
// LogLevel Tests
// ============================================================================

proptest! {
    /// Test that LogLevel string conversions roundtrip correctly
    #[test]
    fn test_log_level_str_roundtrip(level in any_level()) {
        let parsed: LogLevel = level.to_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
        let parsed: LogLevel = level.to_capital_str().parse().unwrap();
        prop_assert_eq!(level, parsed);
    }

    /// Test that ordering agrees with the numeric severity
    #[test]
    fn test_log_level_ordering(a in any_level(), b in any_level()) {
        prop_assert_eq!(a < b, (a as u8) < (b as u8));
    }

    #[test]
    fn test_log_level_invalid_parse(invalid_str in "[^DIWEPFdiwepf]+") {
        prop_assert!(invalid_str.parse::<LogLevel>().is_err());
    }
}

// ============================================================================
// Field Constructor Tests
// ============================================================================

proptest! {
    #[test]
    fn test_string_field_preserves_key_and_value(key in "[a-z_]{1,12}", value in ".*") {
        let field = Field::string(key.clone(), value.clone());
        prop_assert_eq!(field.key, key);
        prop_assert_eq!(field.value, FieldValue::String(value));
    }

    #[test]
    fn test_numeric_fields_preserve_values(
        key in "[a-z_]{1,12}",
        big in any::<i64>(),
        small in any::<isize>(),
        ratio in any::<f64>(),
    ) {
        prop_assert_eq!(Field::int64(key.clone(), big).value, FieldValue::Int64(big));
        prop_assert_eq!(Field::int(key.clone(), small).value, FieldValue::Int(small));
        match Field::float64(key.clone(), ratio).value {
            FieldValue::Float64(v) => prop_assert!(v == ratio || (v.is_nan() && ratio.is_nan())),
            other => prop_assert!(false, "unexpected value {:?}", other),
        }
    }

    #[test]
    fn test_error_field_uses_error_key(message in ".*") {
        let err = io::Error::new(io::ErrorKind::Other, message.clone());
        let field = Field::error(&err);
        prop_assert_eq!(field.key.as_str(), "error");
        prop_assert_eq!(field.value, FieldValue::Error(message));
    }

    #[test]
    fn test_any_field_matches_serde_json(values in proptest::collection::vec(any::<i32>(), 0..8)) {
        let field = Field::any("values", &values);
        prop_assert_eq!(field.value, FieldValue::Any(serde_json::json!(values)));
    }
}

// ============================================================================
// Record Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Whatever the message, a record is exactly one line of valid JSON
    #[test]
    fn test_record_is_single_json_line(message in ".*", value in ".*") {
        let (logger, captured) = json_logger();
        logger.info(&message, &[Field::string("value", value.clone())]);

        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        prop_assert_eq!(output.matches('\n').count(), 1);
        let record: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        prop_assert_eq!(record["value"].as_str(), Some(value.as_str()));
    }

    /// `with` keeps every earlier field and never alters the parent
    #[test]
    fn test_with_accumulates_in_order(values in proptest::collection::vec(any::<i64>(), 1..6)) {
        let (root, captured) = json_logger();
        let mut logger = root.clone();
        for (i, v) in values.iter().enumerate() {
            logger = logger.with(&[Field::int64(format!("k{}", i), *v)]);
        }

        prop_assert!(root.fields().is_empty());
        prop_assert_eq!(logger.fields().len(), values.len());

        logger.debug("accumulated", &[]);
        let output = String::from_utf8(captured.0.lock().clone()).unwrap();
        let record: serde_json::Value = serde_json::from_str(output.trim_end()).unwrap();
        for (i, v) in values.iter().enumerate() {
            prop_assert_eq!(record[format!("k{}", i)].as_i64(), Some(*v));
        }
    }

    /// Records below the minimum level are never written
    #[test]
    fn test_min_level_filter(min in any_level(), level in any_level()) {
        prop_assume!(!level.is_terminal());
        let captured = Captured::default();
        let logger = Logger::builder()
            .min_level(min)
            .console_writer(captured.clone())
            .build()
            .unwrap();

        logger.log(level, "filtered?", &[]);
        let written = !captured.0.lock().is_empty();
        prop_assert_eq!(written, level >= min);
        prop_assert_eq!(logger.enabled(level), level >= min);
    }
}
