//! mailstat - Compute contact-center email performance metrics from exported CSV reports
//!
//! This library provides functionality to:
//! - Turn raw presence-status intervals into available-seconds capacity
//!   figures, clipped to arbitrary reporting windows
//! - Aggregate work-event feeds into volume, handle-time, response-time,
//!   utilisation, and throughput metrics
//! - Produce daily and hourly series with zero-filled axes, ready to chart
//! - Load feeds from CSV snapshots through explicit schema mappings, with a
//!   content-hash snapshot cache for unchanged files
//!
//! The engines are synchronous and stateless: load a snapshot, compute one
//! report, discard. Malformed data degrades to exclusions and zero-valued
//! sentinels; errors are reserved for I/O failures and caller contract
//! violations.
//!
//! # Examples
//!
//! ```
//! use mailstat::{
//!     filters::StatusFilter,
//!     report::{EmailReport, ReportConfig, ReportInputs},
//!     types::{AvailabilityRecord, ReportingWindow, WorkEvent},
//! };
//! use chrono::NaiveDate;
//!
//! fn main() -> mailstat::Result<()> {
//!     let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//!
//!     let availability = vec![AvailabilityRecord::new(
//!         "Available",
//!         day.and_hms_opt(9, 0, 0),
//!         day.and_hms_opt(17, 0, 0),
//!     )];
//!     let handled = vec![WorkEvent {
//!         assigned_at: day.and_hms_opt(10, 0, 0),
//!         handle_seconds: Some(480.0),
//!         ..WorkEvent::default()
//!     }];
//!
//!     let config = ReportConfig::new(ReportingWindow::single_day(day))
//!         .with_status_filter(StatusFilter::from_labels(["Available"]));
//!     let report = EmailReport::build(
//!         &ReportInputs {
//!             availability: &availability,
//!             handled: &handled,
//!             ..ReportInputs::default()
//!         },
//!         &config,
//!     );
//!
//!     assert_eq!(report.scalars.count, 1);
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod business_hours;
pub mod cache;
pub mod capacity;
pub mod data_loader;
pub mod error;
pub mod filters;
pub mod report;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use error::{MailstatError, Result};
pub use types::{
    AvailabilityRecord, CaseId, DateField, ReportingWindow, StatusLabel, TimeInterval, WorkEvent,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
