//! Console appender implementation

use crate::core::{Appender, EncoderConfig, LogEntry, Result};
use std::io::{self, Write};

/// Writes every record, whatever its level, to standard output
pub struct ConsoleAppender {
    encoder: EncoderConfig,
    writer: Box<dyn Write + Send + Sync>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_encoder(EncoderConfig::default())
    }

    pub fn with_encoder(encoder: EncoderConfig) -> Self {
        Self {
            encoder,
            writer: Box::new(io::stdout()),
        }
    }

    /// Replace standard output with another destination
    ///
    /// # Example
    ///
    /// ```
    /// use rust_log_facade::appenders::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::new().with_writer(std::io::stderr());
    /// ```
    #[must_use]
    pub fn with_writer<W>(mut self, writer: W) -> Self
    where
        W: Write + Send + Sync + 'static,
    {
        self.writer = Box::new(writer);
        self
    }

    #[must_use]
    pub fn encoder(&self) -> &EncoderConfig {
        &self.encoder
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.encoder.encode(entry)?;
        self.writer.write_all(output.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
