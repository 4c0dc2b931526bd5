//! Typed key/value fields attached to log records
//!
//! A [`Field`] is a plain value: building one has no side effects except for
//! [`Field::stack`], which captures the backtrace of the calling thread.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::backtrace::Backtrace;
use std::fmt;
use std::time::Duration;

use super::timestamp::DurationEncoding;

/// Value type for structured logging fields
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    /// Rendered message of an error
    Error(String),
    /// Rendered backtrace
    Stack(String),
    /// Any serializable value, kept in its JSON form
    Any(serde_json::Value),
    Int64(i64),
    Float64(f64),
    Int(isize),
    Bool(bool),
    Duration(Duration),
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) | FieldValue::Stack(s) => {
                write!(f, "{}", s)
            }
            FieldValue::Any(v) => write!(f, "{}", v),
            FieldValue::Int64(i) => write!(f, "{}", i),
            FieldValue::Float64(fl) => write!(f, "{}", fl),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Duration(d) => write!(f, "{:?}", d),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for the encoders
    #[must_use]
    pub fn to_json_value(&self, durations: &DurationEncoding) -> serde_json::Value {
        match self {
            FieldValue::String(s) | FieldValue::Error(s) | FieldValue::Stack(s) => {
                serde_json::Value::String(s.clone())
            }
            FieldValue::Any(v) => v.clone(),
            FieldValue::Int64(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float64(f) => float_to_json(*f),
            FieldValue::Int(i) => serde_json::Value::Number((*i as i64).into()),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Duration(d) => durations.encode(d),
        }
    }
}

/// NaN and infinities have no JSON number form; they are written as strings.
pub(crate) fn float_to_json(f: f64) -> serde_json::Value {
    serde_json::Number::from_f64(f)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(f.to_string()))
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int64(i)
    }
}

impl From<isize> for FieldValue {
    fn from(i: isize) -> Self {
        FieldValue::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float64(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

/// A key tagged with a typed value
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub const ERROR_KEY: &'static str = "error";

    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FieldValue::String(value.into()))
    }

    /// Capture the current call stack under `key`
    ///
    /// Capture is forced, so it does not depend on `RUST_BACKTRACE`.
    pub fn stack(key: impl Into<String>) -> Self {
        let trace = Backtrace::force_capture().to_string();
        Self::new(key, FieldValue::Stack(trace))
    }

    /// Error message under the conventional `error` key
    pub fn error<E>(err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::named_error(Self::ERROR_KEY, err)
    }

    pub fn named_error<E>(key: impl Into<String>, err: &E) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        Self::new(key, FieldValue::Error(err.to_string()))
    }

    /// Any serializable value
    ///
    /// A value that fails to serialize becomes an error field keyed
    /// `<key>Error` carrying the serializer's message.
    pub fn any<T>(key: impl Into<String>, value: &T) -> Self
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        match serde_json::to_value(value) {
            Ok(v) => Self::new(key, FieldValue::Any(v)),
            Err(e) => Self::new(format!("{}Error", key), FieldValue::Error(e.to_string())),
        }
    }

    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self::new(key, FieldValue::Int64(value))
    }

    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, FieldValue::Float64(value))
    }

    pub fn int(key: impl Into<String>, value: isize) -> Self {
        Self::new(key, FieldValue::Int(value))
    }

    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self::new(key, FieldValue::Bool(value))
    }

    pub fn duration(key: impl Into<String>, value: Duration) -> Self {
        Self::new(key, FieldValue::Duration(value))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Fields serialized as one JSON object
///
/// Every field is written in order. A key that repeats is written again
/// rather than replacing the earlier entry.
pub struct FieldsJson<'a> {
    fields: &'a [Field],
    durations: &'a DurationEncoding,
}

impl<'a> FieldsJson<'a> {
    pub fn new(fields: &'a [Field], durations: &'a DurationEncoding) -> Self {
        Self { fields, durations }
    }

    /// Write every field as a map entry into an already open map
    pub(crate) fn serialize_entries<M: SerializeMap>(
        &self,
        map: &mut M,
    ) -> std::result::Result<(), M::Error> {
        for field in self.fields {
            map.serialize_entry(&field.key, &field.value.to_json_value(self.durations))?;
        }
        Ok(())
    }
}

impl Serialize for FieldsJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        self.serialize_entries(&mut map)?;
        map.end()
    }
}
