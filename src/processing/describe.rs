//! Descriptive statistics for numeric columns and RFM tables.
//!
//! Semantics match the usual dataframe `describe()`: sample standard deviation (`n - 1`) and
//! quartiles by linear interpolation between closest ranks.

use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};

use super::rfm::RfmTable;

/// Summary statistics of one numeric column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Summary statistics for each RFM column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RfmSummary {
    pub recency: ColumnSummary,
    pub frequency: ColumnSummary,
    pub monetary: ColumnSummary,
}

/// Summarize `values`. Fails with [`AnalysisError::EmptyDataset`] when empty.
pub fn summarize(values: impl IntoIterator<Item = f64>) -> AnalysisResult<ColumnSummary> {
    let mut sorted: Vec<f64> = values.into_iter().collect();
    if sorted.is_empty() {
        return Err(AnalysisError::EmptyDataset { operation: "describe" });
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = (n > 1).then(|| {
        let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n - 1) as f64).sqrt()
    });

    Ok(ColumnSummary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q1: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q3: quantile(&sorted, 0.75),
        max: sorted[n - 1],
    })
}

/// Describe the three RFM columns.
///
/// Fails with [`AnalysisError::EmptyDataset`] for an empty RFM table.
pub fn describe(rfm: &RfmTable) -> AnalysisResult<RfmSummary> {
    if rfm.is_empty() {
        return Err(AnalysisError::EmptyDataset { operation: "describe" });
    }
    Ok(RfmSummary {
        recency: summarize(rfm.recency().map(|v| v as f64))?,
        frequency: summarize(rfm.frequency().map(|v| v as f64))?,
        monetary: summarize(rfm.monetary().map(|v| v as f64))?,
    })
}

// `sorted` must be non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
