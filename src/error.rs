use chrono::NaiveDate;
use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for range filtering, aggregation and RFM analysis.
pub type AnalysisResult<T> = Result<T, AnalysisError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV/JSON/Parquet ingestion.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Parquet ingestion error.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// The input does not have the shape of a rental log (missing columns, wrong document shape).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },

    /// A value could not be parsed into the type its rental record field requires.
    #[error("failed to parse value at row {row} column '{column}': {message} (raw='{raw}')")]
    ParseError {
        row: usize,
        column: String,
        raw: String,
        message: String,
    },
}

/// Error type returned by the aggregation and RFM layer.
///
/// Every failure is reported as a whole; no operation returns a partial table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// A date range whose start is after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    /// The RFM reference date precedes an observed record date.
    #[error("reference date {reference} precedes record date {observed} (instant {instant})")]
    InvalidReferenceDate {
        reference: NaiveDate,
        observed: NaiveDate,
        instant: i64,
    },

    /// A reduction that needs at least one row received none.
    #[error("empty dataset: {operation} requires at least one row")]
    EmptyDataset { operation: &'static str },
}
