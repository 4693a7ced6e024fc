//! Report facade: one computation pass over all feeds
//!
//! Ties the capacity engine, metrics aggregator, and response analyzer
//! together into the dataset a dashboard renders: headline scalars, the
//! daily series, the demand/supply correlation, response metrics, and an
//! optional hour-of-day profile. One call runs to completion per refresh;
//! inputs are read-only snapshots and nothing is retained between calls.
//!
//! # Examples
//!
//! ```
//! use mailstat::filters::StatusFilter;
//! use mailstat::report::{EmailReport, ReportConfig, ReportInputs};
//! use mailstat::types::{ReportingWindow, WorkEvent};
//! use chrono::NaiveDate;
//!
//! let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let handled = vec![WorkEvent {
//!     assigned_at: day.and_hms_opt(9, 0, 0),
//!     handle_seconds: Some(300.0),
//!     ..WorkEvent::default()
//! }];
//!
//! let config = ReportConfig::new(ReportingWindow::single_day(day))
//!     .with_status_filter(StatusFilter::from_labels(["Available"]));
//! let report = EmailReport::build(
//!     &ReportInputs {
//!         handled: &handled,
//!         ..ReportInputs::default()
//!     },
//!     &config,
//! );
//! assert_eq!(report.scalars.count, 1);
//! ```

use crate::aggregation::{
    DailyBucket, DemandSupplyPoint, HourlyBucket, MetricsAggregator, ScalarMetrics,
};
use crate::business_hours::BusinessHours;
use crate::capacity::CapacityEngine;
use crate::error::Result;
use crate::filters::StatusFilter;
use crate::response::{ResponseAnalyzer, ResponseMetrics, ResponsePolicy, ResponseReport};
use crate::types::{AvailabilityRecord, DateField, ReportingWindow, WorkEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for one report computation
///
/// Everything here is externally supplied (UI controls): the window, the
/// set of available statuses, per-feed date-of-record fields, the response
/// display policy, and the optional business-hours clock window.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// Reporting window
    pub window: ReportingWindow,
    /// Which presence statuses count as available
    pub status_filter: StatusFilter,
    /// Date of record for the handled feed (volume, handle time)
    pub handled_date_field: DateField,
    /// Date of record for the demand side of the correlation
    pub demand_date_field: DateField,
    /// Date of record for the supply side of the correlation
    pub supply_date_field: DateField,
    /// Which response metric the caller displays
    pub response_policy: ResponsePolicy,
    /// Weight response lags to this clock window when set
    pub business_hours: Option<BusinessHours>,
    /// Compute an hour-of-day profile for this day when set
    pub hourly_profile_day: Option<NaiveDate>,
}

impl ReportConfig {
    /// Create a configuration with the conventional date axes: handle time
    /// by assign date, demand by open date, supply by close date
    pub fn new(window: ReportingWindow) -> Self {
        Self {
            window,
            status_filter: StatusFilter::default(),
            handled_date_field: DateField::Assigned,
            demand_date_field: DateField::Opened,
            supply_date_field: DateField::Closed,
            response_policy: ResponsePolicy::default(),
            business_hours: None,
            hourly_profile_day: None,
        }
    }

    /// Set the availability status filter
    pub fn with_status_filter(mut self, status_filter: StatusFilter) -> Self {
        self.status_filter = status_filter;
        self
    }

    /// Override the handled feed's date of record
    pub fn with_handled_date_field(mut self, field: DateField) -> Self {
        self.handled_date_field = field;
        self
    }

    /// Set the response display policy
    pub fn with_response_policy(mut self, policy: ResponsePolicy) -> Self {
        self.response_policy = policy;
        self
    }

    /// Weight response lags to a business-hours clock window
    pub fn with_business_hours(mut self, business_hours: BusinessHours) -> Self {
        self.business_hours = Some(business_hours);
        self
    }

    /// Request an hour-of-day profile for one day
    pub fn with_hourly_profile_day(mut self, day: NaiveDate) -> Self {
        self.hourly_profile_day = Some(day);
        self
    }
}

/// Read-only feed snapshots for one report computation
///
/// Feeds a caller does not have default to empty slices; the corresponding
/// report sections come out zero-valued rather than failing.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportInputs<'a> {
    /// Presence-status intervals
    pub availability: &'a [AvailabilityRecord],
    /// Handled items (volume and handle time)
    pub handled: &'a [WorkEvent],
    /// Received/opened cases (demand side)
    pub received: &'a [WorkEvent],
    /// Case threads with open and reply timestamps
    pub responses: &'a [WorkEvent],
}

/// The full reporting dataset for one window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReport {
    /// The window the report covers
    pub window: ReportingWindow,
    /// Headline scalars for the handled feed
    pub scalars: ScalarMetrics,
    /// Total available seconds over the window
    pub capacity_seconds: f64,
    /// Mean daily volume over the window's days
    pub average_daily_volume: f64,
    /// Highest single-day volume
    pub peak_day_volume: u64,
    /// Daily series over the full window
    pub daily: Vec<DailyBucket>,
    /// Demand/supply correlation over the full window
    pub demand_supply: Vec<DemandSupplyPoint>,
    /// Response metrics (both policies, distinct outputs)
    pub response: ResponseReport,
    /// Which response metric the caller chose to display
    pub response_policy: ResponsePolicy,
    /// Hour-of-day profile, when a day was requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hourly: Option<Vec<HourlyBucket>>,
}

impl EmailReport {
    /// Compute the full reporting dataset
    pub fn build(inputs: &ReportInputs<'_>, config: &ReportConfig) -> Self {
        let capacity_engine = CapacityEngine::new(config.status_filter.clone());
        let aggregator = MetricsAggregator::new(config.window);

        let capacity_seconds = capacity_engine
            .total_available_seconds(inputs.availability, &config.window.to_interval());
        let capacity_per_day =
            capacity_engine.available_seconds_per_day(inputs.availability, &config.window);

        let scalars =
            aggregator.scalar_metrics(inputs.handled, config.handled_date_field, capacity_seconds);
        let daily =
            aggregator.daily_series(inputs.handled, config.handled_date_field, &capacity_per_day);

        let total_volume: u64 = daily.iter().map(|bucket| bucket.volume).sum();
        let average_daily_volume = total_volume as f64 / daily.len() as f64;
        let peak_day_volume = daily.iter().map(|bucket| bucket.volume).max().unwrap_or(0);

        let demand_supply = aggregator.correlate_daily(
            inputs.received,
            config.demand_date_field,
            inputs.handled,
            config.supply_date_field,
        );

        let mut analyzer = ResponseAnalyzer::new(config.window);
        if let Some(hours) = config.business_hours {
            analyzer = analyzer.with_business_hours(hours);
        }
        let response = analyzer.analyze(inputs.responses);

        let hourly = config.hourly_profile_day.map(|day| {
            let capacity_per_hour =
                capacity_engine.available_seconds_per_hour(inputs.availability, day);
            aggregator.hourly_series(
                inputs.handled,
                config.handled_date_field,
                day,
                &capacity_per_hour,
            )
        });

        debug!(
            days = daily.len(),
            volume = scalars.count,
            capacity_seconds,
            "built report"
        );

        Self {
            window: config.window,
            scalars,
            capacity_seconds,
            average_daily_volume,
            peak_day_volume,
            daily,
            demand_supply,
            response,
            response_policy: config.response_policy,
            hourly,
        }
    }

    /// The response metric selected by the configured policy
    pub fn selected_response(&self) -> &ResponseMetrics {
        self.response.selected(self.response_policy)
    }

    /// Serialize the whole dataset to JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Format seconds as `MM:SS` for metric tiles
///
/// Missing values render as a placeholder dash, matching how the dashboard
/// has always shown empty metrics.
pub fn format_mmss(seconds: Option<f64>) -> String {
    match seconds {
        Some(value) if value.is_finite() && value >= 0.0 => {
            let whole = value as u64;
            format!("{:02}:{:02}", whole / 60, whole % 60)
        }
        _ => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CaseId;

    fn date(y: i32, mo: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, mo, d).unwrap()
    }

    fn sample_inputs() -> (Vec<AvailabilityRecord>, Vec<WorkEvent>, Vec<WorkEvent>) {
        let d1 = date(2024, 1, 1);
        let d2 = date(2024, 1, 2);

        let availability = vec![
            AvailabilityRecord::new("Available", d1.and_hms_opt(9, 0, 0), d1.and_hms_opt(17, 0, 0)),
            AvailabilityRecord::new("Available", d2.and_hms_opt(9, 0, 0), d2.and_hms_opt(13, 0, 0)),
            AvailabilityRecord::new("Busy", d2.and_hms_opt(13, 0, 0), d2.and_hms_opt(17, 0, 0)),
        ];

        let handled = vec![
            WorkEvent {
                assigned_at: d1.and_hms_opt(9, 30, 0),
                closed_at: d1.and_hms_opt(10, 0, 0),
                handle_seconds: Some(600.0),
                ..WorkEvent::default()
            },
            WorkEvent {
                assigned_at: d1.and_hms_opt(11, 0, 0),
                closed_at: d2.and_hms_opt(9, 30, 0),
                handle_seconds: Some(1200.0),
                ..WorkEvent::default()
            },
            WorkEvent {
                assigned_at: d2.and_hms_opt(10, 0, 0),
                closed_at: d2.and_hms_opt(11, 0, 0),
                handle_seconds: None,
                ..WorkEvent::default()
            },
        ];

        let responses = vec![
            WorkEvent {
                case_id: Some(CaseId::new("c1")),
                opened_at: d1.and_hms_opt(9, 0, 0),
                replied_at: d1.and_hms_opt(10, 0, 0),
                ..WorkEvent::default()
            },
            WorkEvent {
                case_id: Some(CaseId::new("c1")),
                opened_at: d1.and_hms_opt(9, 0, 0),
                replied_at: d1.and_hms_opt(15, 0, 0),
                ..WorkEvent::default()
            },
        ];

        (availability, handled, responses)
    }

    #[test]
    fn test_build_report_end_to_end() {
        let (availability, handled, responses) = sample_inputs();
        let window = ReportingWindow::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let config = ReportConfig::new(window)
            .with_status_filter(StatusFilter::from_labels(["Available"]));

        let report = EmailReport::build(
            &ReportInputs {
                availability: &availability,
                handled: &handled,
                received: &handled,
                responses: &responses,
            },
            &config,
        );

        assert_eq!(report.capacity_seconds, 12.0 * 3600.0);
        assert_eq!(report.scalars.count, 3);
        assert_eq!(report.scalars.mean_duration, Some(900.0));
        assert_eq!(report.scalars.total_duration, 1800.0);
        assert_eq!(report.scalars.utilisation, 1800.0 / (12.0 * 3600.0));

        assert_eq!(report.daily.len(), 2);
        assert_eq!(report.daily[0].volume, 2);
        assert_eq!(report.daily[0].available_seconds, 8.0 * 3600.0);
        assert_eq!(report.daily[1].volume, 1);
        assert_eq!(report.daily[1].available_seconds, 4.0 * 3600.0);

        assert_eq!(report.average_daily_volume, 1.5);
        assert_eq!(report.peak_day_volume, 2);

        // Demand by open date is empty here (handled feed has no open
        // timestamps), supply by close date still fills in
        assert_eq!(report.demand_supply.len(), 2);
        assert_eq!(report.demand_supply[0].handled, 1);
        assert_eq!(report.demand_supply[1].handled, 2);

        assert_eq!(report.response.first_response.count, 1);
        assert_eq!(report.response.first_response.mean_seconds, Some(3600.0));
        assert_eq!(report.selected_response().count, 1);
    }

    #[test]
    fn test_empty_inputs_degrade_to_zero_report() {
        let window = ReportingWindow::new(date(2024, 1, 1), date(2024, 1, 3)).unwrap();
        let config = ReportConfig::new(window);
        let report = EmailReport::build(&ReportInputs::default(), &config);

        assert_eq!(report.capacity_seconds, 0.0);
        assert_eq!(report.scalars.count, 0);
        assert_eq!(report.scalars.mean_duration, None);
        assert_eq!(report.scalars.utilisation, 0.0);
        assert_eq!(report.daily.len(), 3);
        assert!(report.daily.iter().all(|b| b.volume == 0));
        assert_eq!(report.average_daily_volume, 0.0);
        assert_eq!(report.peak_day_volume, 0);
    }

    #[test]
    fn test_hourly_profile() {
        let (availability, handled, _) = sample_inputs();
        let window = ReportingWindow::new(date(2024, 1, 1), date(2024, 1, 2)).unwrap();
        let config = ReportConfig::new(window)
            .with_status_filter(StatusFilter::from_labels(["Available"]))
            .with_hourly_profile_day(date(2024, 1, 1));

        let report = EmailReport::build(
            &ReportInputs {
                availability: &availability,
                handled: &handled,
                ..ReportInputs::default()
            },
            &config,
        );

        let hourly = report.hourly.unwrap();
        assert_eq!(hourly.len(), 24);
        assert_eq!(hourly[9].volume, 1);
        assert_eq!(hourly[9].available_seconds, 3600.0);
        assert_eq!(hourly[8].volume, 0);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let window = ReportingWindow::new(date(2024, 1, 1), date(2024, 1, 1)).unwrap();
        let report = EmailReport::build(&ReportInputs::default(), &ReportConfig::new(window));
        let json = report.to_json().unwrap();
        assert!(json.contains("\"scalars\""));
        assert!(json.contains("\"daily\""));
        assert!(json.contains("\"demand_supply\""));
    }

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(Some(0.0)), "00:00");
        assert_eq!(format_mmss(Some(125.0)), "02:05");
        assert_eq!(format_mmss(Some(3725.9)), "62:05");
        assert_eq!(format_mmss(None), "—");
        assert_eq!(format_mmss(Some(f64::NAN)), "—");
    }
}
