//! Parquet ingestion implementation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use chrono::{Days, NaiveDate};
use parquet::file::reader::{ChunkReader, FileReader};
use parquet::file::serialized_reader::SerializedFileReader;
use parquet::record::Field;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RentalSchema, RentalTable};

use super::record::{build_record, check_schema, RawValue};

/// Ingest a Parquet rental log into a [`RentalTable`].
///
/// Notes:
/// - Validates that every schema column exists as a Parquet leaf column (by column path string)
/// - `DATE` columns are read as days since the Unix epoch; string dates are parsed like CSV
/// - Uses the Parquet record API (`RowIter`)
pub fn ingest_parquet_from_path(path: impl AsRef<Path>, schema: &RentalSchema) -> IngestionResult<RentalTable> {
    check_schema(schema)?;
    let reader = SerializedFileReader::try_from(path.as_ref())?;

    let available_columns = parquet_leaf_column_paths(&reader);
    for field in &schema.fields {
        if !available_columns.contains(field.name.as_str()) {
            return Err(IngestionError::SchemaMismatch {
                message: format!("missing required column '{}'", field.name),
            });
        }
    }

    let mut records = Vec::new();
    for (idx0, row_res) in reader.into_iter().enumerate() {
        let row_num = idx0 + 1;
        let row = row_res?;

        let map: HashMap<&str, &Field> = row
            .get_column_iter()
            .map(|(name, field)| (name.as_str(), field))
            .collect();

        let mut cells = Vec::with_capacity(schema.fields.len());
        for f in &schema.fields {
            let v = map.get(f.name.as_str()).ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!("row {row_num} missing required column '{}'", f.name),
            })?;
            cells.push(raw_from_parquet(v));
        }
        records.push(build_record(row_num, schema, &cells)?);
    }

    Ok(RentalTable::new(records))
}

fn parquet_leaf_column_paths<R: ChunkReader + 'static>(
    reader: &SerializedFileReader<R>,
) -> HashSet<String> {
    reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| c.path().string())
        .collect()
}

fn raw_from_parquet(f: &Field) -> RawValue {
    match f {
        Field::Null => RawValue::Null,
        Field::Bool(b) => RawValue::Bool(*b),
        Field::Byte(v) => RawValue::Int(i64::from(*v)),
        Field::Short(v) => RawValue::Int(i64::from(*v)),
        Field::Int(v) => RawValue::Int(i64::from(*v)),
        Field::Long(v) => RawValue::Int(*v),
        Field::UByte(v) => RawValue::Int(i64::from(*v)),
        Field::UShort(v) => RawValue::Int(i64::from(*v)),
        Field::UInt(v) => RawValue::Int(i64::from(*v)),
        Field::ULong(v) => match i64::try_from(*v) {
            Ok(i) => RawValue::Int(i),
            Err(_) => RawValue::Text(v.to_string()),
        },
        Field::Float(v) => RawValue::Float(f64::from(*v)),
        Field::Double(v) => RawValue::Float(*v),
        Field::Str(s) => RawValue::Text(s.clone()),
        Field::Date(days) => match epoch_day(*days) {
            Some(d) => RawValue::Date(d),
            None => RawValue::Text(f.to_string()),
        },
        other => RawValue::Text(other.to_string()),
    }
}

fn epoch_day(days: i32) -> Option<NaiveDate> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    if days >= 0 {
        epoch.checked_add_days(Days::new(u64::from(days.unsigned_abs())))
    } else {
        epoch.checked_sub_days(Days::new(u64::from(days.unsigned_abs())))
    }
}
