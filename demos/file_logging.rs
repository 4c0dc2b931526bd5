//! File logging example
//!
//! Every record goes to both standard output and a rotating file.
//!
//! Run with: cargo run --example file_logging

use rust_log_facade::prelude::*;

fn main() -> Result<()> {
    println!("=== Log Facade - File Logging Example ===\n");

    println!("1. Standard persistence (logs/all.log):");
    let logger = Logger::new(true);
    logger.info("Application started", &[Field::string("version", env!("CARGO_PKG_VERSION"))]);

    for i in 1..=5 {
        logger.info("Processing item", &[Field::int("item", i), Field::int("of", 5)]);
        if i == 3 {
            logger.warn("Item took longer than expected", &[Field::int("item", i)]);
        }
    }
    logger.flush()?;

    println!("\n2. Custom directory, small files, compressed backups:");
    let demo_dir = std::env::temp_dir().join("log_facade_demo");
    let rotating = Logger::builder()
        .persist_to_file(true)
        .log_dir(&demo_dir)
        .file_name("demo.log")
        .rotation(RotationPolicy::new().with_max_size(4 * 1024).with_max_backups(3))
        .encoder(EncoderConfig::new().with_encoding(Encoding::Json))
        .console_writer(std::io::sink())
        .build()?;

    for i in 0..200 {
        rotating.info("filling rotation demo", &[Field::int("i", i)]);
    }
    rotating.flush()?;

    for entry in std::fs::read_dir(&demo_dir)? {
        let entry = entry?;
        println!("  {} ({} bytes)", entry.file_name().to_string_lossy(), entry.metadata()?.len());
    }

    println!("\n=== Example completed successfully ===");
    println!("Check 'logs/all.log' and '{}'", demo_dir.display());
    Ok(())
}
