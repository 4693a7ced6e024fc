//! Error types for mailstat
//!
//! This module defines the error types used throughout the mailstat library.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Malformed report data is deliberately *not* an error: unparseable
//! timestamps, missing columns, and empty feeds degrade to exclusions and
//! zero-valued results inside the engine. The variants below cover I/O
//! failures and caller contract violations only.
//!
//! # Example
//!
//! ```
//! use mailstat::error::{MailstatError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to MailstatError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for mailstat operations
#[derive(Error, Debug)]
pub enum MailstatError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reporting window with end date before start date
    #[error("invalid reporting window: end date {end} is before start date {start}")]
    InvalidWindow {
        /// Requested start date
        start: NaiveDate,
        /// Requested end date
        end: NaiveDate,
    },

    /// Business-hours configuration that spans no time
    #[error("invalid business hours: {0}")]
    InvalidBusinessHours(String),

    /// Parse error with file context
    #[error("Parse error in {file}: {error}")]
    Parse {
        /// The file that caused the error
        file: PathBuf,
        /// The error message
        error: String,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in mailstat
///
/// # Example
///
/// ```
/// use mailstat::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, MailstatError>;
