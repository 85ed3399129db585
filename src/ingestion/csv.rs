//! CSV ingestion implementation.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RentalSchema, RentalTable};

use super::record::{build_record, check_schema, RawValue};

/// Ingest a CSV rental log into a [`RentalTable`].
///
/// Rules:
///
/// - CSV must have headers.
/// - Headers must contain every schema column (order can differ, extra columns are ignored).
/// - Each value is parsed according to the record field it feeds.
pub fn ingest_csv_from_path(path: impl AsRef<Path>, schema: &RentalSchema) -> IngestionResult<RentalTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)?;
    ingest_csv_from_reader(&mut rdr, schema)
}

/// Ingest CSV data from an existing CSV reader.
pub fn ingest_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
    schema: &RentalSchema,
) -> IngestionResult<RentalTable> {
    check_schema(schema)?;
    let headers = rdr.headers()?.clone();

    // Map schema fields -> CSV column indexes (allows re-ordered CSV columns).
    let mut col_idxs = Vec::with_capacity(schema.fields.len());
    for field in &schema.fields {
        match headers.iter().position(|h| h.trim() == field.name) {
            Some(idx) => col_idxs.push(idx),
            None => {
                return Err(IngestionError::SchemaMismatch {
                    message: format!(
                        "missing required column '{field}'. headers={:?}",
                        headers.iter().collect::<Vec<_>>(),
                        field = field.name
                    ),
                });
            }
        }
    }

    let mut records = Vec::new();
    for (row_idx0, result) in rdr.records().enumerate() {
        // Report 1-based row number for users; +1 again because header is row 1.
        let user_row = row_idx0 + 2;
        let record = result?;

        let cells: Vec<RawValue> = col_idxs
            .iter()
            .map(|&csv_idx| match record.get(csv_idx).map(str::trim) {
                None | Some("") => RawValue::Null,
                Some(raw) => RawValue::Text(raw.to_owned()),
            })
            .collect();
        records.push(build_record(user_row, schema, &cells)?);
    }

    Ok(RentalTable::new(records))
}
