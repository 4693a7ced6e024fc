//! Aggregation module for the reporting dataset
//!
//! This module combines work-event feeds with the capacity series from
//! [`crate::capacity`] into the figures a dashboard displays: headline
//! scalars (volume, mean handle time, utilisation, throughput) and
//! daily/hourly time series.
//!
//! Two conventions are load-bearing here:
//!
//! - Every metric is computed only from events whose date-of-record falls
//!   inside the aggregator's reporting window. Filtering happens inside each
//!   operation, so a caller cannot accidentally leak events across windows.
//! - Series enumerate the full date (or hour) axis and zero-fill empty
//!   buckets. Days with no events must appear as zero-volume points so chart
//!   axes and averages are not silently sparse.
//!
//! # Examples
//!
//! ```
//! use mailstat::aggregation::MetricsAggregator;
//! use mailstat::types::{DateField, ReportingWindow, WorkEvent};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let events = vec![WorkEvent {
//!     assigned_at: day.and_hms_opt(9, 30, 0),
//!     handle_seconds: Some(300.0),
//!     ..WorkEvent::default()
//! }];
//!
//! let aggregator = MetricsAggregator::new(ReportingWindow::single_day(day));
//! let metrics = aggregator.scalar_metrics(&events, DateField::Assigned, 7200.0);
//! assert_eq!(metrics.count, 1);
//! assert_eq!(metrics.mean_duration, Some(300.0));
//! ```

use crate::filters::EventFilter;
use crate::types::{DateField, ReportingWindow, WorkEvent};
use chrono::{NaiveDate, Timelike};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Headline scalar metrics for one feed over one window
///
/// All denominators are zero-guarded: absent capacity yields `0` ratios, and
/// a feed with no usable durations yields `mean_duration: None` rather than
/// a misleading zero.
///
/// # Examples
/// ```
/// use mailstat::aggregation::ScalarMetrics;
///
/// let metrics = ScalarMetrics {
///     count: 120,
///     mean_duration: Some(420.0),
///     total_duration: 50400.0,
///     utilisation: 0.7,
///     throughput_per_hour: 6.0,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalarMetrics {
    /// Number of events inside the window
    pub count: u64,
    /// Mean handle duration in seconds; `None` when no event carried one
    pub mean_duration: Option<f64>,
    /// Total handle duration in seconds over events that carried one
    pub total_duration: f64,
    /// `total_duration / capacity_seconds`, `0` when capacity is absent
    pub utilisation: f64,
    /// Events per available hour, `0` when capacity is absent
    pub throughput_per_hour: f64,
}

/// One day of the reporting series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// Calendar date
    pub date: NaiveDate,
    /// Number of events dated to this day
    pub volume: u64,
    /// Mean handle duration for the day; `None` when no duration was usable
    pub mean_duration: Option<f64>,
    /// Available seconds for the day from the capacity engine
    pub available_seconds: f64,
}

/// One hour-of-day bucket for a single day's profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyBucket {
    /// Hour of day, `0..=23`
    pub hour: u32,
    /// Number of events stamped inside this hour
    pub volume: u64,
    /// Mean handle duration for the hour; `None` when no duration was usable
    pub mean_duration: Option<f64>,
    /// Available seconds for the hour from the capacity engine
    pub available_seconds: f64,
}

/// One date of the demand/supply correlation
///
/// Produced by an outer join over the date axis: a date present in only one
/// feed keeps the other feed's count as `0` and is never dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandSupplyPoint {
    /// Calendar date
    pub date: NaiveDate,
    /// Events from the demand feed (e.g. received, by open date)
    pub received: u64,
    /// Events from the supply feed (e.g. handled, by close date)
    pub handled: u64,
}

/// Accumulator for duration statistics
///
/// Events with a missing or non-finite duration are excluded from both the
/// numerator and the denominator. Coercing them to zero would silently
/// deflate the mean.
#[derive(Debug, Default, Clone, Copy)]
struct DurationAccumulator {
    total: f64,
    counted: u64,
}

impl DurationAccumulator {
    fn add(&mut self, duration: Option<f64>) {
        if let Some(seconds) = duration
            && seconds.is_finite()
        {
            self.total += seconds;
            self.counted += 1;
        }
    }

    fn total(&self) -> f64 {
        self.total
    }

    fn mean(&self) -> Option<f64> {
        if self.counted > 0 {
            Some(self.total / self.counted as f64)
        } else {
            None
        }
    }
}

/// Accumulator for one series bucket
#[derive(Debug, Default, Clone, Copy)]
struct BucketAccumulator {
    volume: u64,
    durations: DurationAccumulator,
}

impl BucketAccumulator {
    fn add_event(&mut self, event: &WorkEvent) {
        self.volume += 1;
        self.durations.add(event.handle_seconds);
    }
}

/// Divide with a defined `0` sentinel instead of an error
///
/// Absence of presence data is common and must not halt reporting.
fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Main aggregation engine over one reporting window
///
/// Holds only the window; every operation takes read-only event slices plus
/// the per-feed date-of-record field, and recomputes from scratch.
#[derive(Debug, Clone, Copy)]
pub struct MetricsAggregator {
    window: ReportingWindow,
}

impl MetricsAggregator {
    /// Create a new aggregator for `window`
    pub fn new(window: ReportingWindow) -> Self {
        Self { window }
    }

    /// The active reporting window
    pub fn window(&self) -> &ReportingWindow {
        &self.window
    }

    /// Events whose date-of-record falls inside the window
    ///
    /// Calendar-date comparison, inclusive on both ends. Events without a
    /// value under `date_field` are excluded.
    pub fn filter_to_window<'a>(
        &self,
        events: &'a [WorkEvent],
        date_field: DateField,
    ) -> Vec<&'a WorkEvent> {
        let filter = EventFilter::new(date_field).with_window(&self.window);
        events.iter().filter(|event| filter.matches(event)).collect()
    }

    /// Headline scalars for one feed against a capacity figure
    pub fn scalar_metrics(
        &self,
        events: &[WorkEvent],
        date_field: DateField,
        capacity_seconds: f64,
    ) -> ScalarMetrics {
        let mut durations = DurationAccumulator::default();
        let mut count = 0u64;
        for event in self.filter_to_window(events, date_field) {
            count += 1;
            durations.add(event.handle_seconds);
        }

        debug!(count, date_field = %date_field, "computed scalar metrics");

        ScalarMetrics {
            count,
            mean_duration: durations.mean(),
            total_duration: durations.total(),
            utilisation: ratio_or_zero(durations.total(), capacity_seconds),
            throughput_per_hour: ratio_or_zero(count as f64, capacity_seconds / 3600.0),
        }
    }

    /// Event counts per calendar date of `date_field`, window-filtered
    pub fn daily_counts(&self, events: &[WorkEvent], date_field: DateField) -> BTreeMap<NaiveDate, u64> {
        let mut counts = BTreeMap::new();
        for event in self.filter_to_window(events, date_field) {
            if let Some(date) = event.date(date_field) {
                *counts.entry(date).or_insert(0u64) += 1;
            }
        }
        counts
    }

    /// Daily series over the full window, ascending by date
    ///
    /// Every date of the window appears exactly once; dates with no events
    /// are zero-volume points with `mean_duration: None`. Capacity figures
    /// are taken from `capacity_per_day`, defaulting to `0.0` for dates the
    /// map does not cover.
    pub fn daily_series(
        &self,
        events: &[WorkEvent],
        date_field: DateField,
        capacity_per_day: &BTreeMap<NaiveDate, f64>,
    ) -> Vec<DailyBucket> {
        let mut buckets: BTreeMap<NaiveDate, BucketAccumulator> = self
            .window
            .dates()
            .map(|date| (date, BucketAccumulator::default()))
            .collect();

        for event in self.filter_to_window(events, date_field) {
            if let Some(date) = event.date(date_field)
                && let Some(acc) = buckets.get_mut(&date)
            {
                acc.add_event(event);
            }
        }

        buckets
            .into_iter()
            .map(|(date, acc)| DailyBucket {
                date,
                volume: acc.volume,
                mean_duration: acc.durations.mean(),
                available_seconds: capacity_per_day.get(&date).copied().unwrap_or(0.0),
            })
            .collect()
    }

    /// Hour-of-day series for a single day of the window
    ///
    /// All 24 hours appear, zero-filled. Events are taken from the given
    /// day only; the hour is read from the event's `date_field` timestamp.
    pub fn hourly_series(
        &self,
        events: &[WorkEvent],
        date_field: DateField,
        day: NaiveDate,
        capacity_per_hour: &BTreeMap<u32, f64>,
    ) -> Vec<HourlyBucket> {
        let mut buckets: BTreeMap<u32, BucketAccumulator> =
            (0..24).map(|hour| (hour, BucketAccumulator::default())).collect();

        for event in self.filter_to_window(events, date_field) {
            if let Some(ts) = event.timestamp(date_field)
                && ts.date() == day
                && let Some(acc) = buckets.get_mut(&ts.hour())
            {
                acc.add_event(event);
            }
        }

        buckets
            .into_iter()
            .map(|(hour, acc)| HourlyBucket {
                hour,
                volume: acc.volume,
                mean_duration: acc.durations.mean(),
                available_seconds: capacity_per_hour.get(&hour).copied().unwrap_or(0.0),
            })
            .collect()
    }

    /// Correlate a demand feed with a supply feed on the date axis
    ///
    /// Outer join with zero fill: the result covers every date of the
    /// window, and a date with events in only one feed keeps `0` for the
    /// other. Inner-joining here would silently hide demand with no matching
    /// supply.
    pub fn correlate_daily(
        &self,
        received: &[WorkEvent],
        received_field: DateField,
        handled: &[WorkEvent],
        handled_field: DateField,
    ) -> Vec<DemandSupplyPoint> {
        let received_counts = self.daily_counts(received, received_field);
        let handled_counts = self.daily_counts(handled, handled_field);

        self.window
            .dates()
            .map(|date| DemandSupplyPoint {
                date,
                received: received_counts.get(&date).copied().unwrap_or(0),
                handled: handled_counts.get(&date).copied().unwrap_or(0),
            })
            .collect()
    }
}
