//! Rotating file appender with size-based rotation
//!
//! When a write would push the file past `max_bytes`, the current file is
//! renamed to `<stem>-<timestamp><ext>` (for example
//! `all-2025-01-08T10-30-45.123.log`) and a fresh file is opened. Backups are
//! then pruned by count and age and, when enabled, gzip compressed.
//!
//! Rotation, pruning and compression run inside the `append` call that
//! triggered them, while the logger holds the lock on its appender set.
//! Every other thread's log call waits until they finish; compressing a
//! 50 MiB backup can take on the order of a second.

use crate::core::appender::Appender;
use crate::core::encoder::EncoderConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use chrono::{Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";
const COMPRESS_SUFFIX: &str = ".gz";
const MEGABYTE: u64 = 1024 * 1024;

/// Configuration for rotating file appender
///
/// # Examples
///
/// ```
/// use rust_log_facade::appenders::RotationPolicy;
///
/// let policy = RotationPolicy::new()
///     .with_max_size_mb(100)
///     .with_max_backups(7)
///     .with_max_age_days(30)
///     .with_compression(true);
/// assert_eq!(policy.max_bytes, 100 * 1024 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationPolicy {
    /// Size in bytes at which the file is rotated
    pub max_bytes: u64,
    /// Maximum number of rotated files to keep, 0 keeps all
    pub max_backups: usize,
    /// Rotated files older than this many days are removed
    pub max_age_days: Option<u32>,
    /// Whether to gzip rotated files
    pub compress: bool,
    /// Whether backup timestamps use local time instead of UTC
    pub local_time: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self {
            max_bytes: 50 * MEGABYTE,
            max_backups: 1,
            max_age_days: None,
            compress: true,
            local_time: true,
        }
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size_mb(mut self, megabytes: u64) -> Self {
        self.max_bytes = megabytes.saturating_mul(MEGABYTE);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age_days(mut self, days: u32) -> Self {
        self.max_age_days = Some(days);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_local_time(mut self, enabled: bool) -> Self {
        self.local_time = enabled;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(LoggerError::config(
                "RotationPolicy",
                "max_bytes must be greater than zero",
            ));
        }
        Ok(())
    }

    fn now(&self) -> NaiveDateTime {
        if self.local_time {
            Local::now().naive_local()
        } else {
            Utc::now().naive_utc()
        }
    }
}

/// A rotated file found next to the active log file
#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    time: NaiveDateTime,
    compressed: bool,
}

/// Rotating file appender
///
/// # Examples
///
/// ```no_run
/// use rust_log_facade::appenders::{RotatingFileAppender, RotationPolicy};
/// use rust_log_facade::EncoderConfig;
///
/// let policy = RotationPolicy::new().with_max_size_mb(10).with_max_backups(3);
/// let appender =
///     RotatingFileAppender::with_policy("logs/app.log", policy, EncoderConfig::default()).unwrap();
/// ```
pub struct RotatingFileAppender {
    path: PathBuf,
    policy: RotationPolicy,
    encoder: EncoderConfig,
    file: Option<File>,
    current_size: u64,
}

impl RotatingFileAppender {
    /// Create a rotating file appender with the default policy and encoder
    ///
    /// # Errors
    ///
    /// Returns error if the directory or file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default(), EncoderConfig::default())
    }

    /// Create a rotating file appender with custom policy and encoder
    ///
    /// # Errors
    ///
    /// Returns error if the policy is invalid or the file cannot be opened
    pub fn with_policy<P: AsRef<Path>>(
        path: P,
        policy: RotationPolicy,
        encoder: EncoderConfig,
    ) -> Result<Self> {
        policy.validate()?;
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let (file, current_size) = Self::open_append(&path)?;

        Ok(Self {
            path,
            policy,
            encoder,
            file: Some(file),
            current_size,
        })
    }

    fn open_append(path: &Path) -> Result<(File, u64)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::file_appender(path.display().to_string(), format!("Failed to open: {}", e))
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::file_appender(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn directory(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }

    /// File name split into stem and extension (`all`, `.log`)
    fn name_parts(&self) -> (String, String) {
        let stem = self
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("app")
            .to_string();
        let ext = self
            .path
            .extension()
            .and_then(|s| s.to_str())
            .map(|e| format!(".{}", e))
            .unwrap_or_default();
        (stem, ext)
    }

    fn backup_path(&self, time: &NaiveDateTime) -> PathBuf {
        let (stem, ext) = self.name_parts();
        self.directory()
            .join(format!("{}-{}{}", stem, time.format(BACKUP_TIME_FORMAT), ext))
    }

    /// Parse a backup timestamp out of a file name, if it is one of ours
    fn parse_backup_name(&self, file_name: &str) -> Option<(NaiveDateTime, bool)> {
        let (stem, ext) = self.name_parts();
        let prefix = format!("{}-", stem);
        let rest = file_name.strip_prefix(&prefix)?;

        let (rest, compressed) = match rest.strip_suffix(COMPRESS_SUFFIX) {
            Some(inner) => (inner, true),
            None => (rest, false),
        };
        let stamp = rest.strip_suffix(ext.as_str())?;

        NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT)
            .ok()
            .map(|time| (time, compressed))
    }

    /// Backups sorted newest first
    fn list_backups(&self) -> Result<Vec<Backup>> {
        let dir = self.directory();
        let entries = fs::read_dir(&dir).map_err(|e| {
            LoggerError::io_operation(
                "list log backups",
                format!("Failed to read directory '{}'", dir.display()),
                e,
            )
        })?;

        let mut backups: Vec<Backup> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| {
                let name = entry.file_name();
                let (time, compressed) = self.parse_backup_name(name.to_str()?)?;
                Some(Backup {
                    path: entry.path(),
                    time,
                    compressed,
                })
            })
            .collect();

        backups.sort_by(|a, b| b.time.cmp(&a.time));
        Ok(backups)
    }

    /// Perform log rotation
    fn rotate(&mut self) -> Result<()> {
        // Close the current handle before renaming
        if let Some(mut file) = self.file.take() {
            file.flush().map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.path.exists() {
            let backup = self.backup_path(&self.policy.now());
            fs::rename(&self.path, &backup).map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to rotate current log file: {}", e),
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                LoggerError::file_rotation(
                    self.path.display().to_string(),
                    format!("Failed to create new log file: {}", e),
                )
            })?;

        self.file = Some(file);
        self.current_size = 0;

        // The new file is already in place; cleanup problems only warn.
        if let Err(e) = self.mill() {
            eprintln!("[LOGGER WARNING] Log backup cleanup failed: {}", e);
        }

        Ok(())
    }

    /// Remove backups beyond the count and age limits, then compress the rest
    fn mill(&self) -> Result<()> {
        let backups = self.list_backups()?;
        let mut keep: Vec<&Backup> = Vec::new();
        let mut remove: Vec<&Backup> = Vec::new();

        if self.policy.max_backups > 0 {
            // A backup and its compressed twin count once
            let mut seen: Vec<PathBuf> = Vec::new();
            for backup in &backups {
                let base = uncompressed_path(backup);
                if seen.contains(&base) {
                    keep.push(backup);
                    continue;
                }
                if seen.len() < self.policy.max_backups {
                    seen.push(base);
                    keep.push(backup);
                } else {
                    remove.push(backup);
                }
            }
        } else {
            keep.extend(backups.iter());
        }

        if let Some(days) = self.policy.max_age_days {
            let cutoff = self.policy.now() - chrono::Duration::days(i64::from(days));
            let (expired, fresh): (Vec<&Backup>, Vec<&Backup>) =
                keep.into_iter().partition(|b| b.time < cutoff);
            remove.extend(expired);
            keep = fresh;
        }

        for backup in &remove {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[LOGGER WARNING] Failed to remove old backup {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in keep.iter().filter(|b| !b.compressed) {
                compress_file(&backup.path)?;
            }
        }

        Ok(())
    }

    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

fn uncompressed_path(backup: &Backup) -> PathBuf {
    if !backup.compressed {
        return backup.path.clone();
    }
    let name = backup.path.to_string_lossy();
    PathBuf::from(name.trim_end_matches(COMPRESS_SUFFIX))
}

fn compressed_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

/// Gzip `path` into `path.gz`, removing the original only on success
///
/// The compressed data goes to a temporary file first and is renamed into
/// place, so an interrupted compression never leaves a truncated `.gz`.
fn compress_file(path: &Path) -> Result<()> {
    use std::io::{BufReader, BufWriter};

    let gz_path = compressed_path(path, COMPRESS_SUFFIX);
    let temp_gz_path = compressed_path(path, ".gz.tmp");

    let input = File::open(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to open file for compression: {}", path.display()),
            e,
        )
    })?;
    let mut reader = BufReader::with_capacity(64 * 1024, input);

    let output = File::create(&temp_gz_path).map_err(|e| {
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to create temporary compressed file: {}", temp_gz_path.display()),
            e,
        )
    })?;
    let buffered_output = BufWriter::with_capacity(64 * 1024, output);
    let mut encoder = flate2::write::GzEncoder::new(buffered_output, flate2::Compression::default());

    let streamed = std::io::copy(&mut reader, &mut encoder)
        .and_then(|_| encoder.finish())
        .and_then(|mut out| out.flush());
    if let Err(e) = streamed {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log file",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::rename(&temp_gz_path, &gz_path).map_err(|e| {
        let _ = fs::remove_file(&temp_gz_path);
        LoggerError::io_operation(
            "compress log file",
            format!("Failed to rename compressed file to: {}", gz_path.display()),
            e,
        )
    })?;

    if let Err(e) = fs::remove_file(path) {
        eprintln!(
            "[LOGGER WARNING] Compression succeeded but failed to remove original file {}: {}",
            path.display(),
            e
        );
    }

    Ok(())
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let formatted = self.encoder.encode(entry)?;
        let bytes_written = formatted.len() as u64;

        if bytes_written > self.policy.max_bytes {
            return Err(LoggerError::file_appender(
                self.path.display().to_string(),
                format!(
                    "write length {} exceeds maximum file size {}",
                    bytes_written, self.policy.max_bytes
                ),
            ));
        }

        if self.current_size + bytes_written > self.policy.max_bytes {
            if let Err(e) = self.rotate() {
                // Keep logging into the current file rather than losing records
                eprintln!(
                    "[LOGGER WARNING] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.file.is_none() {
                    match Self::open_append(&self.path) {
                        Ok((file, _)) => self.file = Some(file),
                        Err(reopen_err) => {
                            eprintln!(
                                "[LOGGER ERROR] Failed to reopen log file after rotation failure: {}",
                                reopen_err
                            );
                            return Err(e);
                        }
                    }
                }

                // Prevents a rotation attempt on every following write
                self.current_size = 0;
            }
        }

        let file = self
            .file
            .as_mut()
            .ok_or_else(|| LoggerError::writer("Writer not initialized"))?;

        file.write_all(formatted.as_bytes()).map_err(|e| {
            LoggerError::file_appender(
                self.path.display().to_string(),
                format!("Failed to write log entry: {}", e),
            )
        })?;
        self.current_size += bytes_written;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut file) = self.file {
            file.flush().map_err(|e| {
                LoggerError::file_appender(
                    self.path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut file) = self.file.take() {
            let _ = file.flush();
        }
    }
}
