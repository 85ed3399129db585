use std::fmt;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::AnalysisError;
use crate::types::DateRange;

/// One view of a [`super::DashboardReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardView {
    Overview,
    DailyTotals,
    WeekdayProfile,
    MonthlySplit,
    WorkingDayMean,
    HolidayMean,
    Temperature,
    Humidity,
    WindSpeed,
    Rfm,
    RfmSummary,
}

/// Execution events emitted by the engine.
#[derive(Debug, Clone)]
pub enum ExecutionEvent {
    RunStarted { reports: usize },
    ViewBuilt { range: DateRange, view: DashboardView, rows: usize },
    /// The view has no defined value on this range (e.g. no holidays in it).
    ViewUndefined { range: DateRange, view: DashboardView, reason: AnalysisError },
    ReportFinished { range: DateRange, input_rows: usize, elapsed: Duration },
    ReportFailed { range: DateRange, error: AnalysisError },
    RunFinished {
        elapsed: Duration,
        metrics: ExecutionMetricsSnapshot,
    },
}

/// Observer hook for execution events.
pub trait ExecutionObserver: Send + Sync {
    fn on_event(&self, event: &ExecutionEvent);
}

/// A simple stderr logger for execution events.
#[derive(Debug, Default)]
pub struct StdErrExecutionObserver;

impl ExecutionObserver for StdErrExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        eprintln!("[dashboard] {event:?}");
    }
}

/// Forwards execution events to `tracing` under the `bike_share_analytics::execution` target.
#[derive(Debug, Default)]
pub struct TracingExecutionObserver;

impl ExecutionObserver for TracingExecutionObserver {
    fn on_event(&self, event: &ExecutionEvent) {
        match event {
            ExecutionEvent::RunStarted { reports } => {
                tracing::debug!(target: "bike_share_analytics::execution", reports, "run started");
            }
            ExecutionEvent::ViewBuilt { range, view, rows } => {
                tracing::trace!(
                    target: "bike_share_analytics::execution",
                    %range, ?view, rows, "view built"
                );
            }
            ExecutionEvent::ViewUndefined { range, view, reason } => {
                tracing::debug!(
                    target: "bike_share_analytics::execution",
                    %range, ?view, %reason, "view undefined"
                );
            }
            ExecutionEvent::ReportFinished {
                range,
                input_rows,
                elapsed,
            } => {
                tracing::debug!(
                    target: "bike_share_analytics::execution",
                    %range, input_rows, ?elapsed, "report finished"
                );
            }
            ExecutionEvent::ReportFailed { range, error } => {
                tracing::warn!(
                    target: "bike_share_analytics::execution",
                    %range, %error, "report failed"
                );
            }
            ExecutionEvent::RunFinished { elapsed, metrics } => {
                tracing::info!(
                    target: "bike_share_analytics::execution",
                    ?elapsed, %metrics, "run finished"
                );
            }
        }
    }
}

/// Real-time metrics for the engine's most recent run.
///
/// The engine updates these counters while building reports; callers can snapshot them at any
/// time.
pub struct ExecutionMetrics {
    run_id: AtomicU64,
    started_at: Mutex<Option<Instant>>,
    elapsed_ns: AtomicU64,

    rows_scanned: AtomicU64,
    reports_built: AtomicU64,
    reports_failed: AtomicU64,
    views_built: AtomicU64,
    views_undefined: AtomicU64,
}

impl ExecutionMetrics {
    pub fn new() -> Self {
        Self {
            run_id: AtomicU64::new(0),
            started_at: Mutex::new(None),
            elapsed_ns: AtomicU64::new(0),
            rows_scanned: AtomicU64::new(0),
            reports_built: AtomicU64::new(0),
            reports_failed: AtomicU64::new(0),
            views_built: AtomicU64::new(0),
            views_undefined: AtomicU64::new(0),
        }
    }

    pub fn begin_run(&self) {
        let _ = self.run_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut started) = self.started_at.lock() {
            *started = Some(Instant::now());
        }

        self.elapsed_ns.store(0, Ordering::SeqCst);
        self.rows_scanned.store(0, Ordering::SeqCst);
        self.reports_built.store(0, Ordering::SeqCst);
        self.reports_failed.store(0, Ordering::SeqCst);
        self.views_built.store(0, Ordering::SeqCst);
        self.views_undefined.store(0, Ordering::SeqCst);
    }

    pub fn end_run(&self, elapsed: Duration) {
        self.elapsed_ns
            .store(elapsed.as_nanos().min(u64::MAX as u128) as u64, Ordering::SeqCst);
    }

    pub fn on_rows_scanned(&self, rows: usize) {
        let _ = self.rows_scanned.fetch_add(rows as u64, Ordering::SeqCst);
    }

    pub fn on_report_built(&self) {
        let _ = self.reports_built.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_report_failed(&self) {
        let _ = self.reports_failed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_view_built(&self) {
        let _ = self.views_built.fetch_add(1, Ordering::SeqCst);
    }

    pub fn on_view_undefined(&self) {
        let _ = self.views_undefined.fetch_add(1, Ordering::SeqCst);
    }

    /// Time since the current run began, if one has begun.
    pub fn running_for(&self) -> Option<Duration> {
        self.started_at
            .lock()
            .ok()
            .and_then(|started| started.map(|t| t.elapsed()))
    }

    pub fn snapshot(&self) -> ExecutionMetricsSnapshot {
        let elapsed_ns = self.elapsed_ns.load(Ordering::SeqCst);
        let elapsed = if elapsed_ns > 0 {
            Some(Duration::from_nanos(elapsed_ns))
        } else {
            None
        };

        ExecutionMetricsSnapshot {
            run_id: self.run_id.load(Ordering::SeqCst),
            elapsed,
            rows_scanned: self.rows_scanned.load(Ordering::SeqCst),
            reports_built: self.reports_built.load(Ordering::SeqCst),
            reports_failed: self.reports_failed.load(Ordering::SeqCst),
            views_built: self.views_built.load(Ordering::SeqCst),
            views_undefined: self.views_undefined.load(Ordering::SeqCst),
        }
    }
}

impl Default for ExecutionMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExecutionMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExecutionMetrics").field(&self.snapshot()).finish()
    }
}

/// Immutable snapshot of [`ExecutionMetrics`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionMetricsSnapshot {
    pub run_id: u64,
    pub elapsed: Option<Duration>,
    pub rows_scanned: u64,
    pub reports_built: u64,
    pub reports_failed: u64,
    pub views_built: u64,
    pub views_undefined: u64,
}

impl fmt::Display for ExecutionMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "run_id={}, rows_scanned={}, reports={} ok/{} failed, views={} built/{} undefined, elapsed={:?}",
            self.run_id,
            self.rows_scanned,
            self.reports_built,
            self.reports_failed,
            self.views_built,
            self.views_undefined,
            self.elapsed
        )
    }
}
