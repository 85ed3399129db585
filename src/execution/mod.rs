//! Dashboard report builder.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - [`DashboardReport`]: every dashboard view for one date range, ready to serialize
//! - [`DashboardEngine`]: builds reports from an explicitly passed [`RentalTable`], one at a time
//!   or many at once on a thread pool (one report per dashboard session)
//! - Real-time metrics + observer hooks for monitoring
//!
//! Reports never share mutable state: each one filters its own copy of the table and allocates
//! its own views, so concurrent builds cannot interfere.

mod observer;

use std::sync::Arc;
use std::time::Instant;

use chrono::NaiveDate;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::processing::{
    category_breakdown, daily_totals, default_reference_date, describe, filter_range, mean_cnt_where, monthly_split,
    rfm, usage_overview, weekday_profile, CategoryBreakdown, DailyTotal, MonthlySplit, RfmSummary, RfmTable,
    UsageOverview, WeekdayProfile,
};
use crate::types::{CategoryKind, DateRange, DayFlag, MonetaryField, RentalTable};

pub use observer::{
    DashboardView, ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver,
    StdErrExecutionObserver, TracingExecutionObserver,
};

/// Configuration for the [`DashboardEngine`].
///
/// Deserializable with per-field defaults, so a partial JSON document such as
/// `{"monetary_field": "casual"}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionOptions {
    /// Number of worker threads used by [`DashboardEngine::build_reports`].
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Date RFM recency is measured against.
    pub reference_date: NaiveDate,
    /// Count field summed into RFM `monetary`.
    pub monetary_field: MonetaryField,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            num_threads: None,
            reference_date: default_reference_date(),
            monetary_field: MonetaryField::default(),
        }
    }
}

impl ExecutionOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

/// Every dashboard view for one date range.
///
/// Views that are undefined on the filtered records (no rows, no holidays, ...) are `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub range: DateRange,
    /// Number of records inside `range`.
    pub rows: usize,
    pub overview: Option<UsageOverview>,
    pub daily_totals: Vec<DailyTotal>,
    pub weekday_profile: WeekdayProfile,
    pub monthly_split: MonthlySplit,
    /// Mean `cnt` over working days; `None` when the range has none.
    pub workingday_mean: Option<f64>,
    /// Mean `cnt` over holidays; `None` when the range has none.
    pub holiday_mean: Option<f64>,
    pub temperature: CategoryBreakdown,
    pub humidity: CategoryBreakdown,
    pub wind_speed: CategoryBreakdown,
    pub rfm: RfmTable,
    pub rfm_summary: Option<RfmSummary>,
}

impl DashboardReport {
    /// Serialize the report for a presentation layer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Pretty-printed variant of [`Self::to_json`].
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Builds [`DashboardReport`]s from rental tables.
pub struct DashboardEngine {
    pool: ThreadPool,
    opts: ExecutionOptions,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl DashboardEngine {
    /// Create a new engine with the given options.
    pub fn new(opts: ExecutionOptions) -> Result<Self, ThreadPoolBuildError> {
        let mut builder = ThreadPoolBuilder::new();
        if let Some(n) = opts.num_threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;

        Ok(Self {
            pool,
            opts,
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn options(&self) -> &ExecutionOptions {
        &self.opts
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Build the report for one range on the calling thread.
    pub fn build_report(&self, table: &RentalTable, range: DateRange) -> AnalysisResult<DashboardReport> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted { reports: 1 });

        let out = self.report_for(table, range);

        self.finish_run(start);
        out
    }

    /// Build one report per range on the engine's thread pool.
    ///
    /// Results are returned in the order of `ranges`; a failing range does not affect the others.
    pub fn build_reports(
        &self,
        table: &RentalTable,
        ranges: &[DateRange],
    ) -> Vec<AnalysisResult<DashboardReport>> {
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted { reports: ranges.len() });

        let out = self
            .pool
            .install(|| ranges.par_iter().map(|&range| self.report_for(table, range)).collect());

        self.finish_run(start);
        out
    }

    /// Build the report covering the whole table, or `None` if the table is empty.
    pub fn build_full_report(&self, table: &RentalTable) -> AnalysisResult<Option<DashboardReport>> {
        match table.date_bounds() {
            Some(range) => self.build_report(table, range).map(Some),
            None => Ok(None),
        }
    }

    fn report_for(&self, table: &RentalTable, range: DateRange) -> AnalysisResult<DashboardReport> {
        let _span = tracing::debug_span!("dashboard_report", %range).entered();
        let start = Instant::now();

        let result = self.assemble(table, range);
        match &result {
            Ok(report) => {
                self.metrics.on_report_built();
                self.emit(ExecutionEvent::ReportFinished {
                    range,
                    input_rows: report.rows,
                    elapsed: start.elapsed(),
                });
            }
            Err(error) => {
                self.metrics.on_report_failed();
                self.emit(ExecutionEvent::ReportFailed {
                    range,
                    error: error.clone(),
                });
            }
        }
        result
    }

    fn assemble(&self, table: &RentalTable, range: DateRange) -> AnalysisResult<DashboardReport> {
        let records = filter_range(table, &range);
        self.metrics.on_rows_scanned(table.row_count());

        let overview = self.optional(range, DashboardView::Overview, usage_overview(&records))?;

        let daily = daily_totals(&records);
        self.built(range, DashboardView::DailyTotals, daily.len());

        let weekdays = weekday_profile(&records);
        self.built(range, DashboardView::WeekdayProfile, weekdays.len());

        let monthly = monthly_split(&records);
        self.built(range, DashboardView::MonthlySplit, monthly.len());

        let workingday_mean = self.optional(
            range,
            DashboardView::WorkingDayMean,
            mean_cnt_where(&records, DayFlag::WorkingDay),
        )?;
        let holiday_mean = self.optional(range, DashboardView::HolidayMean, mean_cnt_where(&records, DayFlag::Holiday))?;

        let [temperature, humidity, wind_speed] = CategoryKind::ALL.map(|kind| {
            let breakdown = category_breakdown(&records, kind);
            let view = match kind {
                CategoryKind::Temperature => DashboardView::Temperature,
                CategoryKind::Humidity => DashboardView::Humidity,
                CategoryKind::WindSpeed => DashboardView::WindSpeed,
            };
            self.built(range, view, breakdown.rows.len());
            breakdown
        });

        let rfm_table = rfm(&records, self.opts.reference_date, self.opts.monetary_field)?;
        self.built(range, DashboardView::Rfm, rfm_table.len());

        let rfm_summary = self.optional(range, DashboardView::RfmSummary, describe(&rfm_table))?;

        Ok(DashboardReport {
            range,
            rows: records.row_count(),
            overview,
            daily_totals: daily,
            weekday_profile: weekdays,
            monthly_split: monthly,
            workingday_mean,
            holiday_mean,
            temperature,
            humidity,
            wind_speed,
            rfm: rfm_table,
            rfm_summary,
        })
    }

    // Maps `EmptyDataset` to an undefined (`None`) view; every other error fails the report.
    fn optional<T>(
        &self,
        range: DateRange,
        view: DashboardView,
        result: AnalysisResult<T>,
    ) -> AnalysisResult<Option<T>> {
        match result {
            Ok(value) => {
                self.built(range, view, 1);
                Ok(Some(value))
            }
            Err(reason @ AnalysisError::EmptyDataset { .. }) => {
                self.metrics.on_view_undefined();
                self.emit(ExecutionEvent::ViewUndefined { range, view, reason });
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }

    fn built(&self, range: DateRange, view: DashboardView, rows: usize) {
        self.metrics.on_view_built();
        self.emit(ExecutionEvent::ViewBuilt { range, view, rows });
    }

    fn finish_run(&self, start: Instant) {
        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}
