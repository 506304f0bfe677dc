//! Timestamps, clocks and the on-disk text formats
//!
//! Both the log line and the log file name are literal formats shared with
//! external log-collection tooling: year, month and day are not padded while
//! the time of day is.

use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};

/// Prefix shared by every log file name
pub const LOG_FILE_PREFIX: &str = "log-";

/// Extension of every log file name
pub const LOG_FILE_EXTENSION: &str = "txt";

/// Local calendar time of a log call, captured once per entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogTimestamp {
    pub year: i32,
    /// 1-based month
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// Millisecond of the second (0..=999)
    pub millisecond: u32,
}

impl LogTimestamp {
    /// Decompose a zoned date-time into the fields used by the log formats
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        // Leap seconds are reported as nanosecond >= 1_000_000_000
        let micros = (dt.nanosecond() % 1_000_000_000) / 1_000;
        Self {
            year: dt.year(),
            month: dt.month(),
            day: dt.day(),
            hour: dt.hour(),
            minute: dt.minute(),
            second: dt.second(),
            millisecond: micros / 1_000,
        }
    }

    /// Capture the current local time
    pub fn now() -> Self {
        Self::from_datetime(&Local::now())
    }
}

/// Source of wall-clock time for log entries
pub trait Clock: Send + Sync {
    /// Current local time
    fn now(&self) -> LogTimestamp;
}

/// Clock backed by the system's local time zone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> LogTimestamp {
        LogTimestamp::now()
    }
}

/// Format a single log line (without the trailing newline)
pub fn format_line(tag: &str, ts: &LogTimestamp, message: &str) -> String {
    format!(
        "[SG.{}] {}-{}-{} {:02}:{:02}:{:02}.{:03} {}",
        tag, ts.year, ts.month, ts.day, ts.hour, ts.minute, ts.second, ts.millisecond, message
    )
}

/// Name of a freshly created log file for the given time
pub fn log_file_name(ts: &LogTimestamp) -> String {
    format!(
        "{}{}-{}-{}_{:02}-{:02}-{:02}.{:03}.{}",
        LOG_FILE_PREFIX,
        ts.year,
        ts.month,
        ts.day,
        ts.hour,
        ts.minute,
        ts.second,
        ts.millisecond,
        LOG_FILE_EXTENSION
    )
}

/// Check whether a directory entry name belongs to the log file set
pub fn is_log_file_name(name: &str) -> bool {
    name.starts_with(LOG_FILE_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn sample() -> LogTimestamp {
        LogTimestamp {
            year: 2024,
            month: 1,
            day: 5,
            hour: 3,
            minute: 4,
            second: 5,
            millisecond: 6,
        }
    }

    #[test]
    fn test_format_line_exact() {
        assert_eq!(
            format_line("X", &sample(), "hello"),
            "[SG.X] 2024-1-5 03:04:05.006 hello"
        );
    }

    #[test]
    fn test_format_line_two_digit_fields() {
        let ts = LogTimestamp {
            year: 2023,
            month: 12,
            day: 31,
            hour: 23,
            minute: 59,
            second: 58,
            millisecond: 999,
        };
        assert_eq!(
            format_line("SessionBackup", &ts, "Imported record 7"),
            "[SG.SessionBackup] 2023-12-31 23:59:58.999 Imported record 7"
        );
    }

    #[test]
    fn test_log_file_name_exact() {
        assert_eq!(log_file_name(&sample()), "log-2024-1-5_03-04-05.006.txt");
    }

    #[test]
    fn test_from_datetime_truncates_to_milliseconds() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 5, 3, 4, 5).unwrap()
            + Duration::microseconds(6_999);
        assert_eq!(LogTimestamp::from_datetime(&dt), sample());
    }

    #[test]
    fn test_from_datetime_local() {
        let dt = Local.with_ymd_and_hms(2024, 1, 5, 3, 4, 5).unwrap()
            + Duration::milliseconds(6);
        let ts = LogTimestamp::from_datetime(&dt);
        assert_eq!(
            format_line("X", &ts, "hello"),
            "[SG.X] 2024-1-5 03:04:05.006 hello"
        );
    }

    #[test]
    fn test_is_log_file_name() {
        assert!(is_log_file_name("log-2024-1-5_03-04-05.006.txt"));
        assert!(is_log_file_name("log-anything"));
        assert!(!is_log_file_name("app-2026-01-21_14-30-45.log"));
        assert!(!is_log_file_name("other.txt"));
    }
}
