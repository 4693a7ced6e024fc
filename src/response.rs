//! Response-time metrics for multi-touch case threads
//!
//! A case is opened once but may be replied to multiple times. Collapsing to
//! the earliest reply per case gives *first response time*; keeping every
//! reply gives *reply lag*. These are different metrics and both are always
//! computed, as distinct named outputs; [`ResponsePolicy`] only selects which
//! one a caller displays.
//!
//! Case identity comes from the export's case-id column. When no row carries
//! one, identity-based dedup is unavailable: the engine falls back to
//! treating every row as an independent event and reports the fallback via
//! [`IdentityResolution`] instead of silently guessing.

use crate::business_hours::BusinessHours;
use crate::filters::EventFilter;
use crate::types::{CaseId, DateField, ReportingWindow, WorkEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Which response metric a caller wants to display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponsePolicy {
    /// One row per case, earliest reply: first response time
    FirstTouch,
    /// Every reply independently: average reply lag
    AllTouches,
}

impl Default for ResponsePolicy {
    fn default() -> Self {
        Self::FirstTouch
    }
}

impl fmt::Display for ResponsePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FirstTouch => write!(f, "first-touch"),
            Self::AllTouches => write!(f, "all-touches"),
        }
    }
}

impl std::str::FromStr for ResponsePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first-touch" | "first_touch" => Ok(Self::FirstTouch),
            "all-touches" | "all_touches" => Ok(Self::AllTouches),
            _ => Err(format!("Invalid response policy: {s}")),
        }
    }
}

/// How case identity was resolved during analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityResolution {
    /// Rows were grouped by their case id
    ByCase,
    /// No case ids were present; every row was treated as its own case
    RowFallback,
}

/// Count and mean of one response metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseMetrics {
    /// Number of lags that entered the mean
    pub count: u64,
    /// Mean lag in seconds; `None` when no lag was computable
    pub mean_seconds: Option<f64>,
}

/// Both response metrics for one feed over one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseReport {
    /// First response time: earliest reply per case minus open time
    pub first_response: ResponseMetrics,
    /// Reply lag: every reply minus its case's open time
    pub reply_lag: ResponseMetrics,
    /// How case identity was resolved
    pub identity: IdentityResolution,
}

impl ResponseReport {
    /// The metric selected by a display policy
    pub fn selected(&self, policy: ResponsePolicy) -> &ResponseMetrics {
        match policy {
            ResponsePolicy::FirstTouch => &self.first_response,
            ResponsePolicy::AllTouches => &self.reply_lag,
        }
    }
}

/// Response-time analyzer over one reporting window
///
/// Events are window-filtered on the configured date-of-record field
/// (open/received date by default, which is the correct axis for response
/// time). Lags may optionally be weighted to a business-hours clock window.
#[derive(Debug, Clone)]
pub struct ResponseAnalyzer {
    window: ReportingWindow,
    date_field: DateField,
    business_hours: Option<BusinessHours>,
}

impl ResponseAnalyzer {
    /// Create a new analyzer bucketing by open date
    pub fn new(window: ReportingWindow) -> Self {
        Self {
            window,
            date_field: DateField::Opened,
            business_hours: None,
        }
    }

    /// Override the date-of-record field
    pub fn with_date_field(mut self, date_field: DateField) -> Self {
        self.date_field = date_field;
        self
    }

    /// Weight lags to a business-hours clock window
    pub fn with_business_hours(mut self, business_hours: BusinessHours) -> Self {
        self.business_hours = Some(business_hours);
        self
    }

    /// Lag between open and reply for one row
    ///
    /// `None` when either timestamp is absent or the reply precedes the
    /// open (malformed row, excluded rather than clamped).
    fn lag_seconds(&self, event: &WorkEvent) -> Option<f64> {
        let opened = event.opened_at?;
        let replied = event.replied_at?;
        if replied < opened {
            return None;
        }
        match &self.business_hours {
            Some(hours) => hours
                .seconds_between(opened, replied)
                .or(Some(0.0)),
            None => Some((replied - opened).num_milliseconds() as f64 / 1000.0),
        }
    }

    /// Compute both response metrics for a feed
    pub fn analyze(&self, events: &[WorkEvent]) -> ResponseReport {
        let filter = EventFilter::new(self.date_field).with_window(&self.window);
        let in_window: Vec<&WorkEvent> =
            events.iter().filter(|event| filter.matches(event)).collect();

        let reply_lag = Self::summarize(
            in_window
                .iter()
                .copied()
                .filter_map(|event| self.lag_seconds(event)),
        );

        let has_case_ids = in_window.iter().any(|event| event.case_id.is_some());
        let (first_response, identity) = if has_case_ids {
            let mut earliest: BTreeMap<&CaseId, &WorkEvent> = BTreeMap::new();
            let mut independent: Vec<&WorkEvent> = Vec::new();
            for &event in &in_window {
                match &event.case_id {
                    Some(id) => {
                        // Keep the row with the earliest reply per case
                        if event.replied_at.is_some() {
                            earliest
                                .entry(id)
                                .and_modify(|held| {
                                    if event.replied_at < held.replied_at {
                                        *held = event;
                                    }
                                })
                                .or_insert(event);
                        }
                    }
                    None => independent.push(event),
                }
            }
            let lags = earliest
                .values()
                .copied()
                .chain(independent.iter().copied())
                .filter_map(|event| self.lag_seconds(event));
            (Self::summarize(lags), IdentityResolution::ByCase)
        } else {
            // No case ids anywhere: dedup is unavailable, every row stands
            // alone and first response degenerates to reply lag.
            (reply_lag.clone(), IdentityResolution::RowFallback)
        };

        debug!(
            cases = first_response.count,
            replies = reply_lag.count,
            identity = ?identity,
            "computed response metrics"
        );

        ResponseReport {
            first_response,
            reply_lag,
            identity,
        }
    }

    fn summarize(lags: impl Iterator<Item = f64>) -> ResponseMetrics {
        let mut total = 0.0;
        let mut count = 0u64;
        for lag in lags {
            if lag.is_finite() {
                total += lag;
                count += 1;
            }
        }
        ResponseMetrics {
            count,
            mean_seconds: if count > 0 {
                Some(total / count as f64)
            } else {
                None
            },
        }
    }
}
