//! Data loader module for parsing exported CSV report feeds
//!
//! Exports arrive as CSV snapshots with inconsistent column sets across
//! report types. Each feed is loaded through an explicit schema mapping
//! ([`AvailabilitySchema`], [`WorkEventSchema`]) resolved once against the
//! file's header row; the engines never see raw strings or perform
//! column-name matching themselves.
//!
//! Degradation rules:
//!
//! - A configured column absent from the header loads as all-absent values
//!   and is reported in [`LoadedFeed::missing_columns`] so a caller can
//!   surface "no data" instead of a silently empty chart.
//! - An unparseable timestamp or duration cell becomes `None` in the record
//!   and is excluded downstream; rows are never dropped wholesale and
//!   nothing raises.
//!
//! Timestamps are parsed against an ordered list of formats, day-first
//! first, matching the export convention.
//!
//! # Examples
//!
//! ```no_run
//! use mailstat::data_loader::{AvailabilitySchema, DataLoader};
//! use std::path::Path;
//!
//! # fn example() -> mailstat::Result<()> {
//! let feed = DataLoader::load_availability(
//!     Path::new("report.csv"),
//!     &AvailabilitySchema::default(),
//! )?;
//! println!("{} records", feed.records.len());
//! # Ok(())
//! # }
//! ```

use crate::error::Result;
use crate::types::{AvailabilityRecord, CaseId, StatusLabel, WorkEvent};
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Timestamp formats tried in order; day-first forms come first because
/// that is how the reporting system exports
const TIMESTAMP_FORMATS: &[&str] = &[
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// Parse a timestamp cell against the ordered format list
///
/// Empty and unparseable cells yield `None`.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

/// Parse a duration-in-seconds cell
fn parse_seconds(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Column mapping for an availability/presence feed
#[derive(Debug, Clone)]
pub struct AvailabilitySchema {
    /// Presence status label column
    pub status: String,
    /// Interval start column
    pub start: String,
    /// Interval end column
    pub end: String,
}

impl Default for AvailabilitySchema {
    fn default() -> Self {
        Self {
            status: "Service Presence Status".to_string(),
            start: "Start DT".to_string(),
            end: "End DT".to_string(),
        }
    }
}

/// Column mapping for a work-event feed
///
/// Feeds populate different subsets of the fields; leave a column
/// unconfigured when the export does not carry it.
#[derive(Debug, Clone, Default)]
pub struct WorkEventSchema {
    /// Case thread identifier column
    pub case_id: Option<String>,
    /// Assign-time column
    pub assigned_at: Option<String>,
    /// Open/received-time column
    pub opened_at: Option<String>,
    /// Close/resolve-time column
    pub closed_at: Option<String>,
    /// Reply-time column
    pub replied_at: Option<String>,
    /// Handle-duration-in-seconds column
    pub handle_seconds: Option<String>,
}

impl WorkEventSchema {
    /// Create an empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the case id column
    pub fn with_case_id(mut self, column: impl Into<String>) -> Self {
        self.case_id = Some(column.into());
        self
    }

    /// Set the assign-time column
    pub fn with_assigned_at(mut self, column: impl Into<String>) -> Self {
        self.assigned_at = Some(column.into());
        self
    }

    /// Set the open-time column
    pub fn with_opened_at(mut self, column: impl Into<String>) -> Self {
        self.opened_at = Some(column.into());
        self
    }

    /// Set the close-time column
    pub fn with_closed_at(mut self, column: impl Into<String>) -> Self {
        self.closed_at = Some(column.into());
        self
    }

    /// Set the reply-time column
    pub fn with_replied_at(mut self, column: impl Into<String>) -> Self {
        self.replied_at = Some(column.into());
        self
    }

    /// Set the handle-duration column
    pub fn with_handle_seconds(mut self, column: impl Into<String>) -> Self {
        self.handle_seconds = Some(column.into());
        self
    }
}

/// A parsed feed plus its data-completeness signal
#[derive(Debug, Clone)]
pub struct LoadedFeed<T> {
    /// Parsed records, in file order
    pub records: Vec<T>,
    /// Configured columns that were absent from the header row
    pub missing_columns: Vec<String>,
}

impl<T> LoadedFeed<T> {
    /// Whether every configured column was present
    pub fn is_complete(&self) -> bool {
        self.missing_columns.is_empty()
    }

    /// Whether the feed produced any records at all
    pub fn has_data(&self) -> bool {
        !self.records.is_empty()
    }
}

/// Resolved position of one configured column
#[derive(Debug, Clone, Copy)]
enum Column {
    At(usize),
    Missing,
    Unconfigured,
}

impl Column {
    fn resolve(headers: &StringRecord, name: Option<&str>, missing: &mut Vec<String>) -> Self {
        match name {
            None => Self::Unconfigured,
            Some(name) => match headers.iter().position(|header| header == name) {
                Some(index) => Self::At(index),
                None => {
                    missing.push(name.to_string());
                    Self::Missing
                }
            },
        }
    }

    fn get<'a>(&self, row: &'a StringRecord) -> Option<&'a str> {
        match self {
            Self::At(index) => row.get(*index),
            Self::Missing | Self::Unconfigured => None,
        }
    }
}

/// Loader for CSV report feeds
///
/// Stateless; each call reads one snapshot wholly before any computation
/// begins. Pair with [`crate::cache::SnapshotCache`] to memoize repeated
/// loads of unchanged files.
pub struct DataLoader;

impl DataLoader {
    /// Load an availability feed from a CSV file
    pub fn load_availability(
        path: &Path,
        schema: &AvailabilitySchema,
    ) -> Result<LoadedFeed<AvailabilityRecord>> {
        let file = std::fs::File::open(path)?;
        let feed = Self::availability_from_reader(file, schema)?;
        debug!(
            path = %path.display(),
            records = feed.records.len(),
            "loaded availability feed"
        );
        Ok(feed)
    }

    /// Parse an availability feed from any reader
    pub fn availability_from_reader<R: Read>(
        reader: R,
        schema: &AvailabilitySchema,
    ) -> Result<LoadedFeed<AvailabilityRecord>> {
        let mut csv_reader = Self::csv_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut missing = Vec::new();
        let status = Column::resolve(&headers, Some(schema.status.as_str()), &mut missing);
        let start = Column::resolve(&headers, Some(schema.start.as_str()), &mut missing);
        let end = Column::resolve(&headers, Some(schema.end.as_str()), &mut missing);

        let mut records = Vec::new();
        for (row_number, row) in csv_reader.records().enumerate() {
            let row = row?;
            records.push(AvailabilityRecord {
                status: StatusLabel::new(status.get(&row).unwrap_or_default()),
                start: Self::timestamp_cell(&row, start, row_number),
                end: Self::timestamp_cell(&row, end, row_number),
            });
        }

        Ok(LoadedFeed {
            records,
            missing_columns: missing,
        })
    }

    /// Load a work-event feed from a CSV file
    pub fn load_work_events(
        path: &Path,
        schema: &WorkEventSchema,
    ) -> Result<LoadedFeed<WorkEvent>> {
        let file = std::fs::File::open(path)?;
        let feed = Self::work_events_from_reader(file, schema)?;
        debug!(
            path = %path.display(),
            records = feed.records.len(),
            "loaded work-event feed"
        );
        Ok(feed)
    }

    /// Parse a work-event feed from any reader
    pub fn work_events_from_reader<R: Read>(
        reader: R,
        schema: &WorkEventSchema,
    ) -> Result<LoadedFeed<WorkEvent>> {
        let mut csv_reader = Self::csv_reader(reader);
        let headers = csv_reader.headers()?.clone();

        let mut missing = Vec::new();
        let case_id = Column::resolve(&headers, schema.case_id.as_deref(), &mut missing);
        let assigned_at = Column::resolve(&headers, schema.assigned_at.as_deref(), &mut missing);
        let opened_at = Column::resolve(&headers, schema.opened_at.as_deref(), &mut missing);
        let closed_at = Column::resolve(&headers, schema.closed_at.as_deref(), &mut missing);
        let replied_at = Column::resolve(&headers, schema.replied_at.as_deref(), &mut missing);
        let handle_seconds =
            Column::resolve(&headers, schema.handle_seconds.as_deref(), &mut missing);

        let mut records = Vec::new();
        for (row_number, row) in csv_reader.records().enumerate() {
            let row = row?;
            records.push(WorkEvent {
                case_id: case_id
                    .get(&row)
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(CaseId::new),
                assigned_at: Self::timestamp_cell(&row, assigned_at, row_number),
                opened_at: Self::timestamp_cell(&row, opened_at, row_number),
                closed_at: Self::timestamp_cell(&row, closed_at, row_number),
                replied_at: Self::timestamp_cell(&row, replied_at, row_number),
                handle_seconds: handle_seconds.get(&row).and_then(parse_seconds),
            });
        }

        Ok(LoadedFeed {
            records,
            missing_columns: missing,
        })
    }

    fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
        ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader)
    }

    fn timestamp_cell(row: &StringRecord, column: Column, row_number: usize) -> Option<NaiveDateTime> {
        let raw = column.get(row)?;
        let parsed = parse_timestamp(raw);
        if parsed.is_none() && !raw.trim().is_empty() {
            warn!(row = row_number + 1, value = raw, "unparseable timestamp, excluding");
        }
        parsed
    }
}
