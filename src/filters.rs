//! Filtering module for availability records and work events
//!
//! This module provides the two filter configurations the engines consume:
//! [`StatusFilter`] selects which presence-status labels count as "available
//! to work", and [`EventFilter`] keeps work events whose date-of-record falls
//! inside a calendar range.
//!
//! Event filtering is a calendar-date comparison (inclusive on both ends),
//! not a timestamp comparison; capacity clipping is the timestamp-interval
//! side and lives in [`crate::capacity`]. Keeping the two conventions apart
//! is what prevents cross-window leakage between volume metrics and
//! capacity figures.
//!
//! # Examples
//!
//! ```
//! use mailstat::filters::EventFilter;
//! use mailstat::types::DateField;
//! use chrono::NaiveDate;
//!
//! // Handle-time events for January 2024, bucketed by assign date
//! let filter = EventFilter::new(DateField::Assigned)
//!     .with_since(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
//!     .with_until(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
//! ```

use crate::types::{AvailabilityRecord, DateField, ReportingWindow, StatusLabel, WorkEvent};
use chrono::NaiveDate;
use std::collections::HashSet;

/// Which presence-status labels count as available-to-work
///
/// Externally supplied configuration (e.g. from a UI multi-select); the
/// engine treats the labels as opaque. An empty filter matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFilter {
    allowed: HashSet<StatusLabel>,
}

impl StatusFilter {
    /// Create a filter from a set of allowed labels
    pub fn new(allowed: HashSet<StatusLabel>) -> Self {
        Self { allowed }
    }

    /// Create a filter from anything yielding string-like labels
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: labels.into_iter().map(StatusLabel::new).collect(),
        }
    }

    /// Whether the filter allows no labels at all
    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }

    /// The allowed labels
    pub fn labels(&self) -> &HashSet<StatusLabel> {
        &self.allowed
    }

    /// Check whether a record's status is allowed
    pub fn matches(&self, record: &AvailabilityRecord) -> bool {
        self.allowed.contains(&record.status)
    }
}

/// Filter configuration for work events
///
/// Keeps events whose [`DateField`] value falls within `[since, until]`
/// inclusive, compared as calendar dates. Events with no value under the
/// configured field never match; an absent date of record means the event
/// cannot be placed in any window.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Start date filter (inclusive)
    pub since_date: Option<NaiveDate>,
    /// End date filter (inclusive)
    pub until_date: Option<NaiveDate>,
    /// Which timestamp field is the date of record
    pub date_field: DateField,
}

impl EventFilter {
    /// Create a new filter with no date restrictions
    pub fn new(date_field: DateField) -> Self {
        Self {
            since_date: None,
            until_date: None,
            date_field,
        }
    }

    /// Set the start date filter
    pub fn with_since(mut self, date: NaiveDate) -> Self {
        self.since_date = Some(date);
        self
    }

    /// Set the end date filter
    pub fn with_until(mut self, date: NaiveDate) -> Self {
        self.until_date = Some(date);
        self
    }

    /// Restrict to a reporting window (both bounds, inclusive)
    pub fn with_window(mut self, window: &ReportingWindow) -> Self {
        self.since_date = Some(window.start_date());
        self.until_date = Some(window.end_date());
        self
    }

    /// Check if an event passes the filter
    pub fn matches(&self, event: &WorkEvent) -> bool {
        let Some(event_date) = event.date(self.date_field) else {
            return false;
        };

        if let Some(since) = self.since_date {
            if event_date < since {
                return false;
            }
        }

        if let Some(until) = self.until_date {
            if event_date > until {
                return false;
            }
        }

        true
    }
}
