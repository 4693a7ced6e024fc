//! Core domain types for mailstat
//!
//! This module contains the fundamental types used throughout the mailstat
//! library. These types provide strong typing for common concepts like
//! presence-status labels, case identifiers, half-open time intervals, and
//! reporting windows.
//!
//! Timestamps are `chrono::NaiveDateTime` throughout: exported contact-center
//! reports carry zone-less wall-clock timestamps, so naive types are the
//! record of truth and no timezone conversion happens inside the engine.

use crate::error::{MailstatError, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strongly-typed presence-status label wrapper
///
/// Availability feeds label each interval with a status ("Available",
/// "Busy", "Offline", ...). Which labels count as available-to-work is
/// caller-supplied configuration, so the label itself stays opaque.
///
/// # Examples
/// ```
/// use mailstat::types::StatusLabel;
///
/// let status = StatusLabel::new("Available");
/// assert_eq!(status.as_str(), "Available");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusLabel(String);

impl StatusLabel {
    /// Create a new StatusLabel from any string-like type
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly-typed case identifier
///
/// Identifies a case thread across multiple reply rows. Uniqueness is a
/// property of the export, not of this type; see
/// [`crate::response::IdentityResolution`] for how non-unique or absent ids
/// are handled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(String);

impl CaseId {
    /// Create a new CaseId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CaseId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Half-open time span `[start, end)`
///
/// Invariant: `end > start`. Zero-length and inverted spans are
/// unrepresentable; [`TimeInterval::new`] returns `None` for them, which is
/// what makes the clipping primitive in [`crate::capacity`] total.
///
/// # Examples
/// ```
/// use mailstat::types::TimeInterval;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let interval = TimeInterval::new(
///     day.and_hms_opt(8, 0, 0).unwrap(),
///     day.and_hms_opt(18, 0, 0).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(interval.duration_seconds(), 36000.0);
///
/// // Inverted spans cannot be constructed
/// assert!(
///     TimeInterval::new(
///         day.and_hms_opt(18, 0, 0).unwrap(),
///         day.and_hms_opt(8, 0, 0).unwrap(),
///     )
///     .is_none()
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct TimeInterval {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeInterval {
    /// Create a new interval, or `None` if the span is empty or inverted
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        if end > start {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Inclusive start of the span
    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Exclusive end of the span
    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Duration of the span in seconds
    pub fn duration_seconds(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }

    /// Intersection with another interval, or `None` when the overlap is
    /// empty or zero-length
    pub fn intersect(&self, other: &TimeInterval) -> Option<TimeInterval> {
        TimeInterval::new(self.start.max(other.start), self.end.min(other.end))
    }
}

/// One raw presence-status entry from an availability feed
///
/// Endpoints may be absent when the export carried an unparseable or empty
/// timestamp cell; such records are silently excluded from every capacity
/// sum rather than raising.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    /// Presence status label as exported
    pub status: StatusLabel,
    /// Interval start, if present and parseable
    pub start: Option<NaiveDateTime>,
    /// Interval end, if present and parseable
    pub end: Option<NaiveDateTime>,
}

impl AvailabilityRecord {
    /// Create a new record
    pub fn new(
        status: impl Into<String>,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            status: StatusLabel::new(status),
            start,
            end,
        }
    }

    /// The record's span as a validated interval
    ///
    /// `None` when either endpoint is absent or the span is empty/inverted.
    pub fn interval(&self) -> Option<TimeInterval> {
        TimeInterval::new(self.start?, self.end?)
    }
}

/// One unit of countable work: a handled item, a received/opened case, or a
/// closed/responded case
///
/// Different feeds populate different subsets of the timestamp fields, and
/// each metric picks its own date-of-record via [`DateField`] (e.g. handle
/// time buckets by assign date, response time by open date). `handle_seconds`
/// is an independently supplied duration, not derived from the timestamps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkEvent {
    /// Case thread identifier, when the export carries one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub case_id: Option<CaseId>,
    /// When the item was assigned to an agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<NaiveDateTime>,
    /// When the case was opened/received
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opened_at: Option<NaiveDateTime>,
    /// When the case was closed/resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<NaiveDateTime>,
    /// When a reply went out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replied_at: Option<NaiveDateTime>,
    /// Handle duration in seconds, when supplied by the feed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle_seconds: Option<f64>,
}

impl WorkEvent {
    /// The event's timestamp under the given date-of-record field
    pub fn timestamp(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::Assigned => self.assigned_at,
            DateField::Opened => self.opened_at,
            DateField::Closed => self.closed_at,
            DateField::Replied => self.replied_at,
        }
    }

    /// The event's calendar date under the given date-of-record field
    pub fn date(&self, field: DateField) -> Option<NaiveDate> {
        self.timestamp(field).map(|ts| ts.date())
    }
}

/// Which timestamp field a feed uses as its date of record
///
/// # Examples
/// ```
/// use mailstat::types::DateField;
///
/// assert_eq!("assigned".parse::<DateField>().unwrap(), DateField::Assigned);
/// assert_eq!(DateField::Opened.to_string(), "opened");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateField {
    /// Bucket by assign time (handle-time feeds)
    Assigned,
    /// Bucket by open/received time (response-time and demand feeds)
    Opened,
    /// Bucket by close/resolve time (supply feeds)
    Closed,
    /// Bucket by reply time
    Replied,
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Assigned => write!(f, "assigned"),
            Self::Opened => write!(f, "opened"),
            Self::Closed => write!(f, "closed"),
            Self::Replied => write!(f, "replied"),
        }
    }
}

impl std::str::FromStr for DateField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "assigned" => Ok(Self::Assigned),
            "opened" => Ok(Self::Opened),
            "closed" => Ok(Self::Closed),
            "replied" => Ok(Self::Replied),
            _ => Err(format!("Invalid date field: {s}")),
        }
    }
}

/// Inclusive calendar date range chosen by the caller
///
/// Converted to a half-open timestamp interval `[start, end_date + 1 day)`
/// for capacity clipping: an event stamped at midnight on the day *after*
/// `end_date` is excluded, one at `end_date 23:59:59` is included.
///
/// # Examples
/// ```
/// use mailstat::types::ReportingWindow;
/// use chrono::NaiveDate;
///
/// let window = ReportingWindow::new(
///     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(window.num_days(), 7);
/// assert!(window.contains_date(NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()));
/// assert!(!window.contains_date(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingWindow {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl ReportingWindow {
    /// Create a new window
    ///
    /// # Errors
    ///
    /// Returns [`MailstatError::InvalidWindow`] when `end_date < start_date`.
    /// This is a caller contract violation, not a data condition.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if end_date < start_date {
            return Err(MailstatError::InvalidWindow {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// A single-day window
    pub fn single_day(date: NaiveDate) -> Self {
        Self {
            start_date: date,
            end_date: date,
        }
    }

    /// First day of the range (inclusive)
    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Last day of the range (inclusive)
    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Number of calendar days in the range
    pub fn num_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Whether a calendar date falls inside the range
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Iterate every calendar date in the range, ascending
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }

    /// The range as a half-open timestamp interval `[start, end + 1 day)`
    pub fn to_interval(&self) -> TimeInterval {
        let start = self
            .start_date
            .and_hms_opt(0, 0, 0)
            .expect("start of day is always a valid time");
        let end = self
            .end_date
            .succ_opt()
            .expect("day after end date is representable")
            .and_hms_opt(0, 0, 0)
            .expect("start of day is always a valid time");
        TimeInterval::new(start, end).expect("window spans at least one day")
    }

    /// Half-open interval covering a single day: `[date, date + 1 day)`
    pub fn day_interval(date: NaiveDate) -> TimeInterval {
        Self::single_day(date).to_interval()
    }

    /// Half-open interval covering one hour of a day
    pub fn hour_interval(date: NaiveDate, hour: u32) -> TimeInterval {
        let start = date
            .and_hms_opt(hour, 0, 0)
            .expect("hour of day is always a valid time");
        let end = start + Duration::hours(1);
        TimeInterval::new(start, end).expect("hour bucket spans one hour")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn test_status_label() {
        let status = StatusLabel::new("Available");
        assert_eq!(status.as_str(), "Available");
        assert_eq!(status.to_string(), "Available");
    }

    #[test]
    fn test_case_id() {
        let case = CaseId::new("case-001");
        assert_eq!(case.as_str(), "case-001");
    }

    #[test]
    fn test_interval_rejects_empty_and_inverted() {
        let t = dt(2024, 1, 1, 12, 0, 0);
        assert!(TimeInterval::new(t, t).is_none());
        assert!(TimeInterval::new(t, t - Duration::seconds(1)).is_none());
        assert!(TimeInterval::new(t, t + Duration::seconds(1)).is_some());
    }

    #[test]
    fn test_interval_intersect() {
        let a = TimeInterval::new(dt(2024, 1, 1, 8, 0, 0), dt(2024, 1, 1, 12, 0, 0)).unwrap();
        let b = TimeInterval::new(dt(2024, 1, 1, 10, 0, 0), dt(2024, 1, 1, 14, 0, 0)).unwrap();
        let overlap = a.intersect(&b).unwrap();
        assert_eq!(overlap.start(), dt(2024, 1, 1, 10, 0, 0));
        assert_eq!(overlap.end(), dt(2024, 1, 1, 12, 0, 0));
        assert_eq!(overlap.duration_seconds(), 7200.0);

        let c = TimeInterval::new(dt(2024, 1, 1, 12, 0, 0), dt(2024, 1, 1, 13, 0, 0)).unwrap();
        // [8,12) and [12,13) touch at the boundary but do not overlap
        assert!(a.intersect(&c).is_none());
    }

    #[test]
    fn test_availability_record_interval() {
        let record = AvailabilityRecord::new(
            "Available",
            Some(dt(2024, 1, 1, 9, 0, 0)),
            Some(dt(2024, 1, 1, 17, 0, 0)),
        );
        assert_eq!(record.interval().unwrap().duration_seconds(), 28800.0);

        let missing_end = AvailabilityRecord::new("Available", Some(dt(2024, 1, 1, 9, 0, 0)), None);
        assert!(missing_end.interval().is_none());

        let inverted = AvailabilityRecord::new(
            "Available",
            Some(dt(2024, 1, 1, 17, 0, 0)),
            Some(dt(2024, 1, 1, 9, 0, 0)),
        );
        assert!(inverted.interval().is_none());
    }

    #[test]
    fn test_work_event_date_field() {
        let event = WorkEvent {
            assigned_at: Some(dt(2024, 1, 1, 9, 0, 0)),
            closed_at: Some(dt(2024, 1, 2, 10, 0, 0)),
            ..WorkEvent::default()
        };
        assert_eq!(event.timestamp(DateField::Assigned), Some(dt(2024, 1, 1, 9, 0, 0)));
        assert_eq!(event.timestamp(DateField::Opened), None);
        assert_eq!(
            event.date(DateField::Closed),
            Some(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
    }

    #[test]
    fn test_date_field_parsing() {
        assert_eq!("assigned".parse::<DateField>().unwrap(), DateField::Assigned);
        assert_eq!("Opened".parse::<DateField>().unwrap(), DateField::Opened);
        assert!("invalid".parse::<DateField>().is_err());
    }

    #[test]
    fn test_window_rejects_inverted_range() {
        let result = ReportingWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        );
        assert!(matches!(result, Err(MailstatError::InvalidWindow { .. })));
    }

    #[test]
    fn test_window_interval_is_exclusive_of_next_day() {
        let window = ReportingWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
        )
        .unwrap();
        let interval = window.to_interval();
        assert_eq!(interval.start(), dt(2024, 1, 1, 0, 0, 0));
        assert_eq!(interval.end(), dt(2024, 1, 4, 0, 0, 0));
        assert_eq!(interval.duration_seconds(), 3.0 * 86400.0);
    }

    #[test]
    fn test_window_dates() {
        let window = ReportingWindow::new(
            NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
        )
        .unwrap();
        let dates: Vec<_> = window.dates().collect();
        assert_eq!(dates.len(), 4);
        assert_eq!(dates[0], NaiveDate::from_ymd_opt(2024, 1, 30).unwrap());
        assert_eq!(dates[3], NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
    }

    #[test]
    fn test_hour_interval() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bucket = ReportingWindow::hour_interval(date, 23);
        assert_eq!(bucket.start(), dt(2024, 1, 1, 23, 0, 0));
        assert_eq!(bucket.end(), dt(2024, 1, 2, 0, 0, 0));
        assert_eq!(bucket.duration_seconds(), 3600.0);
    }
}
