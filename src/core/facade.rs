//! The logging capability callers program against
//!
//! Code that only needs to log can take `&dyn StructuredLogger` and stay
//! independent of how the logger was built.

use super::field::Field;
use super::log_level::LogLevel;
use serde::Serialize;

pub trait StructuredLogger: Send + Sync {
    /// Write one record at `level`
    ///
    /// `Panic` and `Fatal` behave like [`StructuredLogger::panic`] and
    /// [`StructuredLogger::fatal`] and do not return.
    #[track_caller]
    fn log(&self, level: LogLevel, msg: &str, fields: &[Field]);

    #[track_caller]
    fn debug(&self, msg: &str, fields: &[Field]);

    #[track_caller]
    fn info(&self, msg: &str, fields: &[Field]);

    #[track_caller]
    fn warn(&self, msg: &str, fields: &[Field]);

    #[track_caller]
    fn error(&self, msg: &str, fields: &[Field]);

    /// Write the record, flush every sink, then exit the process with status 1
    #[track_caller]
    fn fatal(&self, msg: &str, fields: &[Field]) -> !;

    /// Write the record, flush every sink, then panic with `msg`
    #[track_caller]
    fn panic(&self, msg: &str, fields: &[Field]) -> !;

    /// A logger that adds `fields` to every record; `self` is unchanged
    fn with(&self, fields: &[Field]) -> Box<dyn StructuredLogger>;

    fn string_c(&self, key: &str, val: &str) -> Field {
        Field::string(key, val)
    }

    fn stack_c(&self, key: &str) -> Field {
        Field::stack(key)
    }

    fn error_c(&self, err: &dyn std::error::Error) -> Field {
        Field::error(err)
    }

    fn any_c<T>(&self, key: &str, value: &T) -> Field
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        Field::any(key, value)
    }

    fn int64_c(&self, key: &str, val: i64) -> Field {
        Field::int64(key, val)
    }

    fn float64_c(&self, key: &str, val: f64) -> Field {
        Field::float64(key, val)
    }

    fn int_c(&self, key: &str, val: isize) -> Field {
        Field::int(key, val)
    }
}
