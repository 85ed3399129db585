//! `bike-share-analytics` ingests bike-sharing rental logs into a typed [`types::RentalTable`] and
//! computes the fixed set of dashboard views over it.
//!
//! The primary entrypoints are [`ingestion::ingest_from_path`], which auto-detects the source
//! format from the file extension, and [`execution::DashboardEngine`], which turns a table and a
//! date range into a [`execution::DashboardReport`].
//!
//! ## What you can ingest
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`
//! - **JSON**: `.json` (array-of-objects) and `.ndjson` (newline-delimited objects)
//! - **Parquet**: `.parquet`, `.pq`
//!
//! Column names come from a [`types::RentalSchema`]. [`types::RentalSchema::default`] matches the
//! reference export (`instant`, `dteday`, `weekday`, `holiday`, `workingday`, `temp2`, `hum2`,
//! `windspeed2`, `casual`, `registered`, `cnt`); override single columns with
//! [`types::RentalSchema::with_column`].
//!
//! ## Quick example: ingest and build a report
//!
//! ```no_run
//! use bike_share_analytics::execution::{DashboardEngine, ExecutionOptions};
//! use bike_share_analytics::ingestion::{ingest_from_path, IngestionOptions};
//! use bike_share_analytics::types::{DateRange, RentalSchema};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let table = ingest_from_path("day.csv", &RentalSchema::default(), &IngestionOptions::default())?;
//!
//! let engine = DashboardEngine::new(ExecutionOptions::default())?;
//! let range = DateRange::new("2011-01-01".parse()?, "2011-06-30".parse()?)?;
//! let report = engine.build_report(&table, range)?;
//! println!("{}", report.to_json_pretty()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: unified ingestion entrypoint, format-specific readers, observers
//! - [`types`]: rental records, tables, date ranges, schema
//! - [`processing`]: range filter, aggregations, RFM, descriptive statistics
//! - [`execution`]: dashboard reports, parallel report building, metrics
//! - [`error`]: error types for ingestion and analysis
//!
//! ## Logging
//!
//! The library emits through [`tracing`] only when a `Tracing*Observer` is attached (plus one
//! debug span per report). Installing a subscriber is left to the binary.

pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use error::{AnalysisError, AnalysisResult, IngestionError, IngestionResult};
