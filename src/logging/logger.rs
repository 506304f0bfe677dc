//! The public logger
//!
//! `Logger::log` formats on the calling thread only when a sink needs it,
//! prints to stdout for the console sink, and hands file output to the
//! logger's serial queue. Nothing on this path returns an error to the caller.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::warn;

use crate::config::LoggerConfig;

use super::file::LogFileInfo;
use super::format::{format_line, Clock, LogTimestamp, SystemClock};
use super::queue::SerialQueue;
use super::retention::{collect_log_files, CollectedLog};
use super::writer::{RotatingWriter, RotationLimits};

/// Name of the serial worker thread
const QUEUE_NAME: &str = "sglog-writer";

/// Rotating file + console logger
///
/// One instance owns one serial queue and at most one open log file. Create
/// it once at startup and share it behind an `Arc`.
pub struct Logger {
    root_path: PathBuf,
    base_path: PathBuf,
    max_short_file_bytes: u64,
    log_to_file: AtomicBool,
    log_to_console: AtomicBool,
    redact_sensitive_data: AtomicBool,
    dropped_lines: Arc<AtomicU64>,
    clock: Box<dyn Clock>,
    queue: SerialQueue<RotatingWriter>,
}

impl Logger {
    /// Create a logger from configuration using the system clock
    pub fn new(config: &LoggerConfig) -> std::io::Result<Self> {
        Self::with_clock(config, Box::new(SystemClock))
    }

    /// Create a logger with an explicit time source
    pub fn with_clock(config: &LoggerConfig, clock: Box<dyn Clock>) -> std::io::Result<Self> {
        let writer = RotatingWriter::new(
            config.base_path.clone(),
            RotationLimits {
                max_file_bytes: config.max_file_bytes,
                max_file_count: config.max_file_count,
            },
        );
        let queue = SerialQueue::spawn(QUEUE_NAME, writer)?;

        Ok(Self {
            root_path: config.root_path.clone(),
            base_path: config.base_path.clone(),
            max_short_file_bytes: config.max_short_file_bytes,
            log_to_file: AtomicBool::new(config.log_to_file),
            log_to_console: AtomicBool::new(config.log_to_console),
            redact_sensitive_data: AtomicBool::new(config.redact_sensitive_data),
            dropped_lines: Arc::new(AtomicU64::new(0)),
            clock,
            queue,
        })
    }

    /// Log a message under `tag`
    ///
    /// `message` is only evaluated if at least one sink is enabled.
    pub fn log<F>(&self, tag: &str, message: F)
    where
        F: FnOnce() -> String,
    {
        let to_file = self.log_to_file();
        let to_console = self.log_to_console();
        if !to_file && !to_console {
            return;
        }

        let message = message();
        let timestamp = self.clock.now();

        let console_line = if to_console {
            let line = format_line(tag, &timestamp, &message);
            println!("{}", line);
            Some(line)
        } else {
            None
        };

        if to_file {
            let tag = tag.to_string();
            let dropped_lines = Arc::clone(&self.dropped_lines);
            let submitted = self.queue.submit(move |writer| {
                let line =
                    console_line.unwrap_or_else(|| format_line(&tag, &timestamp, &message));
                write_line(writer, &line, &timestamp, &dropped_lines);
            });
            if !submitted {
                self.dropped_lines.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Collect log files from `root_path + prefix`, or from the base path
    /// when no prefix is given
    pub fn collect_logs(&self, prefix: Option<&str>) -> oneshot::Receiver<Vec<CollectedLog>> {
        self.collect_logs_in(self.logs_path_for(prefix))
    }

    /// Collect log files from an explicit directory
    pub fn collect_logs_in(&self, dir: impl Into<PathBuf>) -> oneshot::Receiver<Vec<CollectedLog>> {
        let dir = dir.into();
        self.queue.run(move |_| collect_log_files(&dir))
    }

    /// Resolves once every previously submitted line has been handled and
    /// the current file has been synced
    pub fn flush(&self) -> oneshot::Receiver<()> {
        self.queue.run(|writer| {
            if let Err(err) = writer.sync() {
                warn!("{}", err);
            }
        })
    }

    /// Path and tracked length of the file currently open for append
    pub fn current_file(&self) -> oneshot::Receiver<Option<LogFileInfo>> {
        self.queue.run(|writer| writer.current_file())
    }

    /// Directory the read path uses for `prefix`
    pub fn logs_path_for(&self, prefix: Option<&str>) -> PathBuf {
        match prefix {
            // Prefixes are written as "/logs/..." relative to the root
            Some(prefix) => self.root_path.join(prefix.trim_start_matches('/')),
            None => self.base_path.clone(),
        }
    }

    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Secondary size cap, kept for configuration compatibility
    pub fn max_short_file_bytes(&self) -> u64 {
        self.max_short_file_bytes
    }

    /// Number of lines that never reached a log file
    pub fn dropped_lines(&self) -> u64 {
        self.dropped_lines.load(Ordering::Relaxed)
    }

    pub fn log_to_file(&self) -> bool {
        self.log_to_file.load(Ordering::Relaxed)
    }

    pub fn set_log_to_file(&self, enabled: bool) {
        self.log_to_file.store(enabled, Ordering::Relaxed);
    }

    pub fn log_to_console(&self) -> bool {
        self.log_to_console.load(Ordering::Relaxed)
    }

    pub fn set_log_to_console(&self, enabled: bool) {
        self.log_to_console.store(enabled, Ordering::Relaxed);
    }

    pub fn redact_sensitive_data(&self) -> bool {
        self.redact_sensitive_data.load(Ordering::Relaxed)
    }

    pub fn set_redact_sensitive_data(&self, enabled: bool) {
        self.redact_sensitive_data.store(enabled, Ordering::Relaxed);
    }

    /// Hand out a logging capability bound to one tag
    pub fn tagged(self: &Arc<Self>, tag: impl Into<String>) -> TaggedLogger {
        let tag: String = tag.into();
        TaggedLogger {
            logger: Arc::clone(self),
            tag: Arc::from(tag),
        }
    }
}

/// Runs on the serial queue
fn write_line(
    writer: &mut RotatingWriter,
    line: &str,
    timestamp: &LogTimestamp,
    dropped_lines: &AtomicU64,
) {
    if let Err(err) = writer.append(line, timestamp) {
        dropped_lines.fetch_add(1, Ordering::Relaxed);
        warn!("Dropped log line: {}", err);
    }
}

/// A `Logger` handle that always logs under the same tag
#[derive(Clone)]
pub struct TaggedLogger {
    logger: Arc<Logger>,
    tag: Arc<str>,
}

impl TaggedLogger {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn log<F>(&self, message: F)
    where
        F: FnOnce() -> String,
    {
        self.logger.log(&self.tag, message);
    }
}

impl std::fmt::Debug for TaggedLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaggedLogger").field("tag", &self.tag).finish()
    }
}

/// Log a `format!`-style message; the arguments are only formatted when a
/// sink is enabled
///
/// ```no_run
/// # use sglog::{config::LoggerConfig, logging::Logger, sg_log};
/// # let logger = Logger::new(&LoggerConfig::default()).unwrap();
/// sg_log!(logger, "SGIAP", "Buying {}...", "pro.monthly");
/// ```
#[macro_export]
macro_rules! sg_log {
    ($logger:expr, $tag:expr, $($arg:tt)+) => {
        $logger.log($tag, || format!($($arg)+))
    };
}
