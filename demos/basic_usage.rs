//! Basic logger usage example
//!
//! Demonstrates console logging with fields, context loggers and the macros.
//!
//! Run with: cargo run --example basic_usage

use rust_log_facade::prelude::*;
use rust_log_facade::{info, warn};
use std::time::Duration;

#[derive(serde::Serialize)]
struct Endpoint {
    host: &'static str,
    port: u16,
}

fn serve(log: &dyn StructuredLogger) {
    let conn = log.with(&[log.string_c("peer", "10.0.0.7"), log.int_c("conn", 17)]);
    conn.debug("connection accepted", &[]);
    conn.info("request served", &[log.int64_c("bytes", 5120), log.float64_c("ms", 3.8)]);
}

fn main() -> Result<()> {
    println!("=== Log Facade - Basic Usage Example ===\n");

    let logger = Logger::new(false);

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message", &[]);
    logger.info("This is an info message", &[]);
    logger.warn("This is a warning message", &[]);
    logger.error("This is an error message", &[]);

    println!("\n2. Typed fields:");
    logger.info(
        "listening",
        &[
            Field::any("endpoint", &Endpoint { host: "0.0.0.0", port: 8080 }),
            Field::duration("startup", Duration::from_millis(42)),
            Field::bool("tls", false),
        ],
    );
    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
    logger.warn("using defaults", &[Field::error(&err)]);

    println!("\n3. Context loggers:");
    serve(&logger);
    logger.named("scheduler").info("next run planned", &[]);

    println!("\n4. Macros:");
    let jobs = 3;
    info!(logger, "{} jobs queued", jobs);
    warn!(logger, [Field::int("lag_s", 12)], "replica behind primary");

    println!("\n5. Stacktraces on errors:");
    let traced = Logger::builder().add_stacktrace(LogLevel::Error).build()?;
    traced.error("unexpected state", &[]);

    logger.flush()?;
    println!("\n=== Example completed successfully ===");
    Ok(())
}
