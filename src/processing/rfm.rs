//! Recency/Frequency/Monetary analysis per `instant`.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{AnalysisError, AnalysisResult};
use crate::types::{MonetaryField, RentalTable};

/// Reference date used by the dashboard when none is configured.
pub fn default_reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2012, 12, 31).unwrap_or(NaiveDate::MIN)
}

/// RFM values for one `instant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RfmRow {
    pub instant: i64,
    /// Whole days from the latest record date to the reference date.
    pub recency: u64,
    /// Number of records sharing the `instant`.
    pub frequency: u64,
    /// Sum of the selected count field over those records.
    pub monetary: u64,
}

/// RFM rows in ascending `instant` order, with the parameters that produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfmTable {
    pub reference_date: NaiveDate,
    pub monetary_field: MonetaryField,
    pub rows: Vec<RfmRow>,
}

impl RfmTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn recency(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(|r| r.recency)
    }

    pub fn frequency(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(|r| r.frequency)
    }

    pub fn monetary(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.iter().map(|r| r.monetary)
    }
}

/// Compute one RFM row per distinct `instant`.
///
/// Recency uses the latest date seen for the `instant`. Fails with
/// [`AnalysisError::InvalidReferenceDate`] if `reference_date` precedes it. An empty table
/// yields an empty RFM table.
pub fn rfm(
    records: &RentalTable,
    reference_date: NaiveDate,
    monetary_field: MonetaryField,
) -> AnalysisResult<RfmTable> {
    let mut groups: BTreeMap<i64, (NaiveDate, u64, u64)> = BTreeMap::new();
    for r in records {
        let value = monetary_field.value_of(r);
        groups
            .entry(r.instant)
            .and_modify(|(latest, n, sum)| {
                *latest = (*latest).max(r.date);
                *n += 1;
                *sum += value;
            })
            .or_insert((r.date, 1, value));
    }

    let rows = groups
        .into_iter()
        .map(|(instant, (latest, frequency, monetary))| {
            let days = reference_date.signed_duration_since(latest).num_days();
            let recency = u64::try_from(days).map_err(|_| AnalysisError::InvalidReferenceDate {
                reference: reference_date,
                observed: latest,
                instant,
            })?;
            Ok(RfmRow {
                instant,
                recency,
                frequency,
                monetary,
            })
        })
        .collect::<AnalysisResult<Vec<_>>>()?;

    Ok(RfmTable {
        reference_date,
        monetary_field,
        rows,
    })
}
