//! Rotating writer state
//!
//! Lives on the logger's serial queue and owns at most one open log file.
//! Rotation happens when the tracked length of the current file reaches the
//! size cap; retention runs every time a file has to be (re)opened.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::{LogWriteError, Result};
use super::file::{LogFile, LogFileInfo};
use super::format::{log_file_name, LogTimestamp};
use super::retention::{enforce_retention, scan_log_directory};

/// Size and count limits for a log directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationLimits {
    /// Tracked length at which the current file is rotated
    pub max_file_bytes: u64,
    /// Number of files at which the oldest is deleted before opening
    pub max_file_count: usize,
}

/// The single-writer file state of one logger
#[derive(Debug)]
pub struct RotatingWriter {
    base_path: PathBuf,
    limits: RotationLimits,
    current: Option<LogFile>,
}

impl RotatingWriter {
    pub fn new(base_path: PathBuf, limits: RotationLimits) -> Self {
        Self {
            base_path,
            limits,
            current: None,
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Current file path and tracked length, if a file is open
    pub fn current_file(&self) -> Option<LogFileInfo> {
        self.current.as_ref().map(LogFile::info)
    }

    /// Append one formatted line, rotating first if needed
    ///
    /// `timestamp` names the file if a brand-new one has to be created.
    pub fn append(&mut self, line: &str, timestamp: &LogTimestamp) -> Result<()> {
        let file = self.current_or_open(timestamp)?;
        file.append_line(line)
    }

    /// Sync the current file, if any
    pub fn sync(&mut self) -> Result<()> {
        match self.current.as_mut() {
            Some(file) => file.sync(),
            None => Ok(()),
        }
    }

    fn current_or_open(&mut self, timestamp: &LogTimestamp) -> Result<&mut LogFile> {
        let file = match self.current.take() {
            Some(file) if file.len() < self.limits.max_file_bytes => file,
            _ => self.open_next(timestamp)?,
        };
        Ok(self.current.insert(file))
    }

    /// Slow path: enforce retention, then reuse the newest file if it is
    /// still below the cap, otherwise create a new one
    fn open_next(&self, timestamp: &LogTimestamp) -> Result<LogFile> {
        if let Err(source) = fs::create_dir_all(&self.base_path) {
            let err = LogWriteError::CreateDirectory {
                path: self.base_path.clone(),
                source,
            };
            debug!("{}", err);
        }

        let scan = scan_log_directory(&self.base_path)?;

        match enforce_retention(&scan, self.limits.max_file_count) {
            Ok(Some(deleted)) => debug!("Removed old log file {}", deleted.display()),
            Ok(None) => {}
            Err(err) => debug!("{}", err),
        }

        if let Some(newest) = &scan.newest {
            match fs::metadata(&newest.path) {
                Ok(metadata) if metadata.len() < self.limits.max_file_bytes => {
                    return LogFile::open_append(&newest.path, metadata.len());
                }
                Ok(_) => {}
                Err(source) => {
                    let err = LogWriteError::Stat {
                        path: newest.path.clone(),
                        source,
                    };
                    debug!("{}", err);
                }
            }
        }

        let path = self.base_path.join(log_file_name(timestamp));
        LogFile::open_append(&path, 0)
    }
}
