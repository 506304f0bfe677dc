//! Log directory scanning and count-based retention
//!
//! Files are ordered by their filesystem creation time. Entries whose
//! creation time cannot be read are left out of every decision: they are not
//! counted, never deleted and never collected.

use std::fs::{self, Metadata};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use super::error::{LogWriteError, Result};
use super::format::is_log_file_name;

/// Default number of log files kept in a directory
pub const DEFAULT_MAX_FILE_COUNT: usize = 20;

/// A log file found in a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileEntry {
    pub name: String,
    pub path: PathBuf,
    pub created: SystemTime,
}

/// A log file returned by the read path, in creation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectedLog {
    /// File name without directory
    pub name: String,
    /// Full path to the file
    pub path: PathBuf,
}

/// Summary of the log files in a directory
#[derive(Debug, Default)]
pub struct LogDirectoryScan {
    pub oldest: Option<LogFileEntry>,
    pub newest: Option<LogFileEntry>,
    pub count: usize,
}

/// Creation time of a file
///
/// Filesystems that do not record a birth time report `Unsupported`; the
/// modification time stands in for them.
pub fn creation_time(metadata: &Metadata) -> Option<SystemTime> {
    match metadata.created() {
        Ok(created) => Some(created),
        Err(e) if e.kind() == io::ErrorKind::Unsupported => metadata.modified().ok(),
        Err(_) => None,
    }
}

/// List every `log-` file in `dir` that has a readable creation time
pub fn list_log_files(dir: &Path) -> Result<Vec<LogFileEntry>> {
    let read_dir = fs::read_dir(dir).map_err(|source| LogWriteError::ListDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in read_dir.flatten() {
        let name = match entry.file_name().into_string() {
            Ok(name) if is_log_file_name(&name) => name,
            _ => continue,
        };

        let created = match entry.metadata().ok().as_ref().and_then(creation_time) {
            Some(created) => created,
            None => continue,
        };

        files.push(LogFileEntry {
            name,
            path: entry.path(),
            created,
        });
    }

    Ok(files)
}

/// Find the oldest and newest log files in `dir` and count them
pub fn scan_log_directory(dir: &Path) -> Result<LogDirectoryScan> {
    let files = list_log_files(dir)?;
    let mut scan = LogDirectoryScan {
        count: files.len(),
        ..Default::default()
    };

    for file in files {
        if scan.oldest.as_ref().map_or(true, |o| o.created > file.created) {
            scan.oldest = Some(file.clone());
        }
        if scan.newest.as_ref().map_or(true, |n| n.created < file.created) {
            scan.newest = Some(file);
        }
    }

    Ok(scan)
}

/// Delete the oldest file when the directory already holds `max_file_count`
///
/// Returns the deleted path, if any.
pub fn enforce_retention(scan: &LogDirectoryScan, max_file_count: usize) -> Result<Option<PathBuf>> {
    if scan.count < max_file_count {
        return Ok(None);
    }

    match &scan.oldest {
        Some(oldest) => {
            fs::remove_file(&oldest.path).map_err(|source| LogWriteError::Delete {
                path: oldest.path.clone(),
                source,
            })?;
            Ok(Some(oldest.path.clone()))
        }
        None => Ok(None),
    }
}

/// Collect the log files of `dir` sorted by ascending creation time
///
/// A directory that cannot be listed yields an empty list.
pub fn collect_log_files(dir: &Path) -> Vec<CollectedLog> {
    let mut files = list_log_files(dir).unwrap_or_default();
    files.sort_by_key(|f| f.created);
    files
        .into_iter()
        .map(|f| CollectedLog {
            name: f.name,
            path: f.path,
        })
        .collect()
}
