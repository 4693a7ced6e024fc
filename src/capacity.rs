//! Interval-based capacity engine
//!
//! This module turns raw presence-status intervals into "available seconds"
//! figures clipped to arbitrary reporting windows, at whole-range, per-day,
//! or per-hour granularity.
//!
//! The single correctness-critical primitive is [`clip`]: a pure function
//! that intersects a possibly-malformed interval with a window. Everything
//! else is a sum over clipped intervals. Overlapping intervals are summed
//! additively, never merged; two concurrent "Available" entries for the same
//! span count twice. That matches how the source reports have always been
//! read and changing it would silently shift reported utilisation.
//!
//! # Examples
//!
//! ```
//! use mailstat::capacity::CapacityEngine;
//! use mailstat::filters::StatusFilter;
//! use mailstat::types::{AvailabilityRecord, ReportingWindow};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let records = vec![AvailabilityRecord::new(
//!     "Available",
//!     day.and_hms_opt(9, 0, 0),
//!     day.and_hms_opt(17, 0, 0),
//! )];
//!
//! let engine = CapacityEngine::new(StatusFilter::from_labels(["Available"]));
//! let window = ReportingWindow::single_day(day);
//! assert_eq!(
//!     engine.total_available_seconds(&records, &window.to_interval()),
//!     8.0 * 3600.0
//! );
//! ```

use crate::filters::StatusFilter;
use crate::types::{AvailabilityRecord, ReportingWindow, TimeInterval};
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;
use tracing::debug;

/// Clip a raw interval to a window
///
/// Returns `None` when either endpoint is absent, or when the intersection
/// of `[start, end)` with the window is empty or zero-length. Otherwise the
/// result is `[max(start, window.start), min(end, window.end))`.
///
/// Pure function, no side effects; every capacity figure in this crate is a
/// sum over its results.
///
/// # Examples
///
/// ```
/// use mailstat::capacity::clip;
/// use mailstat::types::TimeInterval;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let window = TimeInterval::new(
///     day.and_hms_opt(0, 0, 0).unwrap(),
///     day.succ_opt().unwrap().and_hms_opt(0, 0, 0).unwrap(),
/// )
/// .unwrap();
///
/// // Spills past midnight: only the in-window hour survives
/// let clipped = clip(
///     day.and_hms_opt(23, 0, 0),
///     day.succ_opt().unwrap().and_hms_opt(2, 0, 0),
///     &window,
/// )
/// .unwrap();
/// assert_eq!(clipped.duration_seconds(), 3600.0);
///
/// // Absent endpoint: excluded, never an error
/// assert!(clip(None, day.and_hms_opt(12, 0, 0), &window).is_none());
/// ```
pub fn clip(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
    window: &TimeInterval,
) -> Option<TimeInterval> {
    TimeInterval::new(start?, end?)?.intersect(window)
}

/// Capacity engine over a fixed set of "available to work" status labels
///
/// Holds only immutable configuration; every computation takes a read-only
/// snapshot of records and recomputes from scratch. Per-bucket results carry
/// no state between buckets, so a bucket sum can always be checked against
/// the whole-window figure.
#[derive(Debug, Clone)]
pub struct CapacityEngine {
    status_filter: StatusFilter,
}

impl CapacityEngine {
    /// Create a new engine counting the statuses matched by `status_filter`
    pub fn new(status_filter: StatusFilter) -> Self {
        Self { status_filter }
    }

    /// The configured status filter
    pub fn status_filter(&self) -> &StatusFilter {
        &self.status_filter
    }

    /// Total available seconds inside `window`
    ///
    /// Filters records by status, clips each surviving interval to the
    /// window, and sums the clipped durations. Records with absent or
    /// malformed endpoints contribute nothing. Empty input yields `0.0`.
    pub fn total_available_seconds(
        &self,
        records: &[AvailabilityRecord],
        window: &TimeInterval,
    ) -> f64 {
        records
            .iter()
            .filter(|record| self.status_filter.matches(record))
            .filter_map(|record| clip(record.start, record.end, window))
            .map(|interval| interval.duration_seconds())
            .sum()
    }

    /// Available seconds for each calendar day of `window`
    ///
    /// Every date in the range is present in the result, zero-filled when no
    /// interval touches it. Each day's figure is computed independently
    /// against the half-open `[day, day + 1 day)` bucket, so bucket sums add
    /// up to the whole-window total exactly.
    pub fn available_seconds_per_day(
        &self,
        records: &[AvailabilityRecord],
        window: &ReportingWindow,
    ) -> BTreeMap<NaiveDate, f64> {
        let per_day: BTreeMap<NaiveDate, f64> = window
            .dates()
            .map(|date| {
                let bucket = ReportingWindow::day_interval(date);
                (date, self.total_available_seconds(records, &bucket))
            })
            .collect();

        debug!(
            days = per_day.len(),
            total_seconds = per_day.values().sum::<f64>(),
            "computed daily capacity"
        );
        per_day
    }

    /// Available seconds for each hour of `day`
    ///
    /// All 24 hour buckets are present, zero-filled when empty. Each bucket
    /// is the half-open `[hour, hour + 1)` span of that day.
    pub fn available_seconds_per_hour(
        &self,
        records: &[AvailabilityRecord],
        day: NaiveDate,
    ) -> BTreeMap<u32, f64> {
        (0..24)
            .map(|hour| {
                let bucket = ReportingWindow::hour_interval(day, hour);
                (hour, self.total_available_seconds(records, &bucket))
            })
            .collect()
    }
}
