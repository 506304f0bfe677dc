//! Logging system for sglog
//!
//! Provides a rotating append-only file logger with size-based rollover,
//! count-based retention and a read path for collecting log files.

mod error;
mod file;
mod format;
mod logger;
mod queue;
mod retention;
mod writer;

pub use error::LogWriteError;
pub use file::LogFileInfo;
pub use format::{format_line, log_file_name, Clock, LogTimestamp, SystemClock};
pub use logger::{Logger, TaggedLogger};
pub use queue::SerialQueue;
pub use retention::{collect_log_files, CollectedLog, DEFAULT_MAX_FILE_COUNT};
pub use writer::{RotatingWriter, RotationLimits};
