//! Typed errors for loading, filtering, and exporting strategy records.
//!
//! Every failure maps onto a stable [`ErrorKind`] so that callers (the CLI,
//! the comparator, a presentation layer) can branch on the kind without
//! parsing messages.
//!
//! | Kind | Raised by | Meaning |
//! |------|-----------|---------|
//! | `MALFORMED_DATE` | Loader | `Date` cell is not a calendar date |
//! | `DUPLICATE_DATE` | Loader | Two rows share a date |
//! | `MALFORMED_NUMBER` | Loader | Non-numeric value in a numeric column |
//! | `MISSING_COLUMN` | Loader | Required header column absent |
//! | `MALFORMED_INPUT` | Loader | Delimited text could not be framed into rows |
//! | `INPUT_TOO_LARGE` | Loader | Row count exceeds the configured maximum |
//! | `EMPTY_INPUT` | Loader | Zero data rows (when the caller treats it as fatal) |
//! | `INVALID_RANGE` | Filter | `from` is after `to` |
//! | `INVALID_WEEKDAY` | Filter | Unknown weekday label |
//! | `EXPORT_FAILED` | Exporter | Delimited writer failed |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// `Date` cell could not be parsed.
    MalformedDate,
    /// Two rows share the same date.
    DuplicateDate,
    /// Non-numeric value in a numeric column.
    MalformedNumber,
    /// Required column missing from the header.
    MissingColumn,
    /// Delimited text is not well-formed.
    MalformedInput,
    /// Too many rows.
    InputTooLarge,
    /// No data rows.
    EmptyInput,
    /// Filter bounds inverted.
    InvalidRange,
    /// Unknown weekday label.
    InvalidWeekday,
    /// Export serialization failed.
    ExportFailed,
}

impl ErrorKind {
    /// Get the stable reason string for this kind.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::MalformedDate => "MALFORMED_DATE",
            Self::DuplicateDate => "DUPLICATE_DATE",
            Self::MalformedNumber => "MALFORMED_NUMBER",
            Self::MissingColumn => "MISSING_COLUMN",
            Self::MalformedInput => "MALFORMED_INPUT",
            Self::InputTooLarge => "INPUT_TOO_LARGE",
            Self::EmptyInput => "EMPTY_INPUT",
            Self::InvalidRange => "INVALID_RANGE",
            Self::InvalidWeekday => "INVALID_WEEKDAY",
            Self::ExportFailed => "EXPORT_FAILED",
        }
    }

    /// Whether this kind comes from bad input data (as opposed to a bad request).
    #[must_use]
    pub const fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedDate
                | Self::DuplicateDate
                | Self::MalformedNumber
                | Self::MissingColumn
                | Self::MalformedInput
                | Self::InputTooLarge
                | Self::EmptyInput
        )
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Errors raised by the loader, filter and exporter.
///
/// Row numbers are 1-based data rows (the header is not counted).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// `Date` cell could not be parsed.
    #[error("row {row}: malformed date '{value}'")]
    MalformedDate {
        /// Data row number.
        row: usize,
        /// Raw cell contents.
        value: String,
    },

    /// Two rows share the same date.
    #[error("row {row}: duplicate date {date}")]
    DuplicateDate {
        /// Data row number of the second occurrence.
        row: usize,
        /// The repeated date.
        date: NaiveDate,
    },

    /// Non-numeric value in a numeric column.
    #[error("row {row}: malformed number '{value}' in column '{column}'")]
    MalformedNumber {
        /// Data row number.
        row: usize,
        /// Column header.
        column: String,
        /// Raw cell contents.
        value: String,
    },

    /// Required column missing from the header.
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    /// Delimited text is not well-formed.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Row count exceeds the configured maximum.
    #[error("input exceeds maximum of {max_rows} rows")]
    InputTooLarge {
        /// Configured limit.
        max_rows: usize,
    },

    /// No data rows.
    #[error("input has no data rows")]
    EmptyInput,

    /// Filter bounds inverted.
    #[error("invalid date range: from {from} is after to {to}")]
    InvalidRange {
        /// Lower bound.
        from: NaiveDate,
        /// Upper bound.
        to: NaiveDate,
    },

    /// Unknown weekday label.
    #[error("invalid weekday '{0}'")]
    InvalidWeekday(String),

    /// Export serialization failed.
    #[error("export failed: {0}")]
    ExportFailed(String),
}

impl AnalyticsError {
    /// Get the stable kind for this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedDate { .. } => ErrorKind::MalformedDate,
            Self::DuplicateDate { .. } => ErrorKind::DuplicateDate,
            Self::MalformedNumber { .. } => ErrorKind::MalformedNumber,
            Self::MissingColumn(_) => ErrorKind::MissingColumn,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::InputTooLarge { .. } => ErrorKind::InputTooLarge,
            Self::EmptyInput => ErrorKind::EmptyInput,
            Self::InvalidRange { .. } => ErrorKind::InvalidRange,
            Self::InvalidWeekday(_) => ErrorKind::InvalidWeekday,
            Self::ExportFailed(_) => ErrorKind::ExportFailed,
        }
    }

    pub(crate) fn malformed_number(
        row: usize,
        column: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::MalformedNumber {
            row,
            column: column.into(),
            value: value.into(),
        }
    }
}

impl From<csv::Error> for AnalyticsError {
    fn from(err: csv::Error) -> Self {
        Self::MalformedInput(err.to_string())
    }
}

/// Result alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
