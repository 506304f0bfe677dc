//! Append-mode log file handle
//!
//! A `LogFile` owns the open file together with the number of bytes the
//! writer believes it holds. The pair is created and dropped as one value.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::error::{LogWriteError, Result};

/// Information about the current log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileInfo {
    /// Full path to the log file
    pub path: PathBuf,
    /// Bytes the writer has accounted for in this file
    pub tracked_len: u64,
}

/// An open, append-only log file and its tracked length
#[derive(Debug)]
pub struct LogFile {
    file: File,
    path: PathBuf,
    len: u64,
}

impl LogFile {
    /// Open (or create) `path` for append, starting the tracker at `len`
    pub fn open_append(path: &Path, len: u64) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| LogWriteError::Open {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            file,
            path: path.to_path_buf(),
            len,
        })
    }

    /// Tracked length in bytes
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn info(&self) -> LogFileInfo {
        LogFileInfo {
            path: self.path.clone(),
            tracked_len: self.len,
        }
    }

    /// Append `line` and a trailing newline
    ///
    /// The line and newline go out in one write so a record is never split.
    /// On failure the tracker is re-read from the file's metadata; if that
    /// fails too the previous value is kept.
    pub fn append_line(&mut self, line: &str) -> Result<()> {
        let mut record = Vec::with_capacity(line.len() + 1);
        record.extend_from_slice(line.as_bytes());
        record.push(b'\n');

        match self.file.write_all(&record) {
            Ok(()) => {
                self.len += record.len() as u64;
                Ok(())
            }
            Err(source) => {
                if let Ok(metadata) = self.file.metadata() {
                    self.len = metadata.len();
                }
                Err(LogWriteError::Write {
                    path: self.path.clone(),
                    source,
                })
            }
        }
    }

    /// Push written data down to the storage device
    pub fn sync(&mut self) -> Result<()> {
        self.file
            .flush()
            .and_then(|_| self.file.sync_data())
            .map_err(|source| LogWriteError::Write {
                path: self.path.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_creates_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log-test.txt");

        let file = LogFile::open_append(&path, 0).unwrap();
        assert!(path.exists());
        assert_eq!(
            file.info(),
            LogFileInfo {
                path: path.clone(),
                tracked_len: 0
            }
        );
    }

    #[test]
    fn test_append_line_tracks_bytes() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log-test.txt");

        let mut file = LogFile::open_append(&path, 0).unwrap();
        file.append_line("first").unwrap();
        file.append_line("второй").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "first\nвторой\n");
        assert_eq!(file.len(), content.len() as u64);
        assert_eq!(file.len(), std::fs::metadata(&path).unwrap().len());
    }

    #[test]
    fn test_open_existing_appends() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log-test.txt");
        std::fs::write(&path, "existing\n").unwrap();

        let mut file = LogFile::open_append(&path, 9).unwrap();
        file.append_line("more").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "existing\nmore\n");
        assert_eq!(file.len(), 14);
        assert_eq!(
            file.info(),
            LogFileInfo {
                path: path.clone(),
                tracked_len: 14
            }
        );
    }

    #[test]
    fn test_open_in_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("log-test.txt");

        let err = LogFile::open_append(&path, 0).unwrap_err();
        assert!(matches!(err, LogWriteError::Open { .. }));
        assert_eq!(err.path(), &path);
    }
}
