//! Date-range filtering for [`crate::types::RentalTable`].

use chrono::NaiveDate;

use crate::error::AnalysisResult;
use crate::types::{DateRange, RentalTable};

/// Returns the records dated within `[start, end]`, in their original order.
///
/// Fails with [`crate::AnalysisError::InvalidRange`] if `start > end`. An empty result is not an
/// error.
pub fn filter(records: &RentalTable, start: NaiveDate, end: NaiveDate) -> AnalysisResult<RentalTable> {
    let range = DateRange::new(start, end)?;
    Ok(filter_range(records, &range))
}

/// Same as [`filter`] for an already validated [`DateRange`].
pub fn filter_range(records: &RentalTable, range: &DateRange) -> RentalTable {
    records.filter_rows(|r| range.contains(r.date))
}
