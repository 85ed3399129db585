//! Rental-log ingestion.
//!
//! This is the ready-made `load()` for dashboard hosts. Most callers should use
//! [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects format by file extension (or you can override via [`IngestionOptions`])
//! - maps source columns to record fields through a [`crate::types::RentalSchema`]
//! - returns a [`crate::types::RentalTable`] sorted ascending by date
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`parquet`]

pub mod csv;
pub mod json;
pub mod observability;
pub mod parquet;
mod record;
pub mod unified;

pub use observability::{
    CompositeObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats, StdErrObserver,
    TracingObserver,
};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
