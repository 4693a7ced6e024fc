//! Business-hours-weighted durations
//!
//! An alternate duration measure that counts only the portion of a span
//! falling within a configured daily clock window, e.g. 07:00-22:00.
//! Weekends are counted identically to weekdays; the queue is staffed seven
//! days a week and excluding them is explicitly not wanted.
//!
//! # Examples
//!
//! ```
//! use mailstat::business_hours::BusinessHours;
//! use chrono::NaiveDate;
//!
//! let hours = BusinessHours::new(7, 22).unwrap();
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//!
//! // 06:00-23:00 overlaps the clock window for 15 hours
//! let seconds = hours
//!     .seconds_between(
//!         day.and_hms_opt(6, 0, 0).unwrap(),
//!         day.and_hms_opt(23, 0, 0).unwrap(),
//!     )
//!     .unwrap();
//! assert_eq!(seconds, 15.0 * 3600.0);
//! ```

use crate::error::{MailstatError, Result};
use crate::types::TimeInterval;
use chrono::{NaiveDate, NaiveDateTime};

/// A daily clock window `[start_hour, end_hour)` in whole hours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    start_hour: u32,
    end_hour: u32,
}

impl BusinessHours {
    /// Create a clock window
    ///
    /// # Errors
    ///
    /// Returns [`MailstatError::InvalidBusinessHours`] unless
    /// `start_hour < end_hour <= 24`.
    pub fn new(start_hour: u32, end_hour: u32) -> Result<Self> {
        if start_hour >= end_hour || end_hour > 24 {
            return Err(MailstatError::InvalidBusinessHours(format!(
                "window {start_hour}:00-{end_hour}:00 spans no time"
            )));
        }
        Ok(Self {
            start_hour,
            end_hour,
        })
    }

    /// Start hour of the daily window
    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    /// End hour of the daily window (exclusive, may be 24)
    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    /// The clock window on one calendar day
    fn window_for(&self, day: NaiveDate) -> Option<TimeInterval> {
        let start = day.and_hms_opt(self.start_hour, 0, 0)?;
        let end = if self.end_hour == 24 {
            day.succ_opt()?.and_hms_opt(0, 0, 0)?
        } else {
            day.and_hms_opt(self.end_hour, 0, 0)?
        };
        TimeInterval::new(start, end)
    }

    /// Seconds of `[start, end)` that fall within the daily clock window
    ///
    /// Iterates each calendar day the span touches, intersects the span with
    /// that day's window, and sums the surviving durations. A span entirely
    /// outside the window yields `Some(0.0)`; `None` is reserved for
    /// `end <= start`, where the duration is undefined.
    pub fn seconds_between(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<f64> {
        let span = TimeInterval::new(start, end)?;

        let mut total = 0.0;
        let mut day = start.date();
        while day <= end.date() {
            if let Some(window) = self.window_for(day)
                && let Some(overlap) = span.intersect(&window)
            {
                total += overlap.duration_seconds();
            }
            day = match day.succ_opt() {
                Some(next) => next,
                None => break,
            };
        }
        Some(total)
    }

    /// [`Self::seconds_between`] over possibly-absent endpoints
    ///
    /// Absent endpoints degrade to `None`, matching the exclusion rule used
    /// everywhere else for malformed timestamps.
    pub fn seconds_between_opt(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Option<f64> {
        self.seconds_between(start?, end?)
    }
}
