//! Error types for the rotating log writer
//!
//! None of these ever reach a caller of `Logger::log`; the writer reports them
//! to the logger, which counts dropped lines and traces the cause

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single file-system step on the serial write path
#[derive(Debug, Error)]
pub enum LogWriteError {
    /// The base directory could not be created
    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory { path: PathBuf, source: io::Error },

    /// The base directory could not be listed
    #[error("failed to list log directory {path}: {source}")]
    ListDirectory { path: PathBuf, source: io::Error },

    /// A log file could not be opened for append
    #[error("failed to open log file {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    /// A log file's size could not be read
    #[error("failed to stat log file {path}: {source}")]
    Stat { path: PathBuf, source: io::Error },

    /// The oldest log file could not be removed during retention
    #[error("failed to delete log file {path}: {source}")]
    Delete { path: PathBuf, source: io::Error },

    /// Appending a line to the current file failed
    #[error("failed to write to log file {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl LogWriteError {
    /// Path of the file or directory the failed step touched
    pub fn path(&self) -> &PathBuf {
        match self {
            LogWriteError::CreateDirectory { path, .. }
            | LogWriteError::ListDirectory { path, .. }
            | LogWriteError::Open { path, .. }
            | LogWriteError::Stat { path, .. }
            | LogWriteError::Delete { path, .. }
            | LogWriteError::Write { path, .. } => path,
        }
    }
}

/// Result type alias for writer steps
pub type Result<T> = std::result::Result<T, LogWriteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = LogWriteError::Open {
            path: PathBuf::from("/tmp/logs/log-2024-1-5_03-04-05.006.txt"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "failed to open log file /tmp/logs/log-2024-1-5_03-04-05.006.txt: denied"
        );

        let err = LogWriteError::ListDirectory {
            path: PathBuf::from("/tmp/logs"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(
            err.to_string(),
            "failed to list log directory /tmp/logs: missing"
        );
    }

    #[test]
    fn test_error_path() {
        let err = LogWriteError::Delete {
            path: PathBuf::from("/tmp/logs/log-old.txt"),
            source: io::Error::new(io::ErrorKind::Other, "busy"),
        };
        assert_eq!(err.path(), &PathBuf::from("/tmp/logs/log-old.txt"));
    }
}
