//! Daily time windows
//!
//! An export range is split into windows that each become one search job and
//! one CSV file. Windows break at calendar midnight so every file covers at
//! most one day.

use crate::domain::{ExportError, Result, SearchJobRequest};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use std::fmt;
use std::path::{Path, PathBuf};

/// Timestamp format used for configuration, requests and filenames
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parses a `YYYY-MM-DDTHH:MM:SS` timestamp
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|e| {
        ExportError::Validation(format!(
            "'{value}' is not a timestamp of the form YYYY-MM-DDTHH:MM:SS ({e})"
        ))
    })
}

/// Half-open `[from, to)` interval covered by one search job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeWindow {
    pub from: NaiveDateTime,
    pub to: NaiveDateTime,
}

impl TimeWindow {
    pub fn new(from: NaiveDateTime, to: NaiveDateTime) -> Self {
        Self { from, to }
    }

    pub fn start_str(&self) -> String {
        self.from.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn end_str(&self) -> String {
        self.to.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Builds the search job request for this window
    pub fn request(&self, query: &str, time_zone: &str) -> SearchJobRequest {
        SearchJobRequest::new(
            query,
            self.start_str(),
            self.end_str(),
            time_zone,
        )
    }

    /// `<output_dir>/<filename>_<from>.csv`
    pub fn output_path(&self, output_dir: impl AsRef<Path>, filename: &str) -> PathBuf {
        output_dir
            .as_ref()
            .join(format!("{}_{}.csv", filename, self.start_str()))
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start_str(), self.end_str())
    }
}

/// Splits `[start, end)` into windows that break at calendar midnight
///
/// A range shorter than 24 hours is returned as a single window even if it
/// crosses midnight. Windows are adjacent and cover the range exactly.
///
/// # Errors
///
/// Returns [`ExportError::Validation`] if `end` is not after `start`.
pub fn split_by_day(start: NaiveDateTime, end: NaiveDateTime) -> Result<Vec<TimeWindow>> {
    if end <= start {
        return Err(ExportError::Validation(format!(
            "End date {} must be after start date {}",
            end.format(TIMESTAMP_FORMAT),
            start.format(TIMESTAMP_FORMAT)
        )));
    }

    if end - start < Duration::hours(24) {
        return Ok(vec![TimeWindow::new(start, end)]);
    }

    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let next_midnight = cursor
            .date()
            .succ_opt()
            .map(|day| day.and_time(NaiveTime::MIN))
            .ok_or_else(|| {
                ExportError::Validation(format!("Date out of range after {}", cursor.date()))
            })?;
        let to = next_midnight.min(end);
        windows.push(TimeWindow::new(cursor, to));
        cursor = to;
    }

    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(value: &str) -> NaiveDateTime {
        parse_timestamp(value).unwrap()
    }

    fn assert_contiguous(windows: &[TimeWindow], start: NaiveDateTime, end: NaiveDateTime) {
        assert_eq!(windows.first().unwrap().from, start);
        assert_eq!(windows.last().unwrap().to, end);
        for pair in windows.windows(2) {
            assert_eq!(pair[0].to, pair[1].from);
        }
    }

    #[test]
    fn test_half_day_is_one_window() {
        let start = ts("2021-01-01T00:00:00");
        let end = ts("2021-01-01T12:00:00");

        let windows = split_by_day(start, end).unwrap();

        assert_eq!(windows, vec![TimeWindow::new(start, end)]);
    }

    #[test]
    fn test_two_days_split_at_midnight() {
        let start = ts("2021-01-01T00:00:00");
        let end = ts("2021-01-03T00:00:00");

        let windows = split_by_day(start, end).unwrap();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].to, ts("2021-01-02T00:00:00"));
        assert_contiguous(&windows, start, end);
    }

    #[test]
    fn test_partial_first_and_last_day() {
        let start = ts("2021-01-01T18:00:00");
        let end = ts("2021-01-03T06:00:00");

        let windows = split_by_day(start, end).unwrap();

        assert_eq!(windows.len(), 3);
        assert_eq!(windows[0], TimeWindow::new(start, ts("2021-01-02T00:00:00")));
        assert_eq!(
            windows[2],
            TimeWindow::new(ts("2021-01-03T00:00:00"), end)
        );
        assert_contiguous(&windows, start, end);
    }

    #[test]
    fn test_short_range_across_midnight_stays_whole() {
        let start = ts("2021-01-01T20:00:00");
        let end = ts("2021-01-02T04:00:00");

        assert_eq!(split_by_day(start, end).unwrap().len(), 1);
    }

    #[test]
    fn test_end_not_after_start_is_rejected() {
        let start = ts("2021-01-02T00:00:00");
        assert!(split_by_day(start, start).is_err());
        assert!(split_by_day(start, ts("2021-01-01T00:00:00")).is_err());
    }

    #[test]
    fn test_output_path_uses_window_start() {
        let window = TimeWindow::new(ts("2021-01-01T00:00:00"), ts("2021-01-02T00:00:00"));
        assert_eq!(
            window.output_path("/tmp/out", "export"),
            PathBuf::from("/tmp/out/export_2021-01-01T00:00:00.csv")
        );
    }

    #[test]
    fn test_request_carries_window_bounds() {
        let window = TimeWindow::new(ts("2021-01-01T00:00:00"), ts("2021-01-02T00:00:00"));
        let request = window.request("error", "UTC");

        assert_eq!(request.from, "2021-01-01T00:00:00");
        assert_eq!(request.to, "2021-01-02T00:00:00");
        assert_eq!(window.to_string(), "2021-01-01T00:00:00..2021-01-02T00:00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_date_only() {
        assert!(parse_timestamp("2021-01-01").is_err());
    }
}
