//! Conversion of format-level cell values into typed [`RentalRecord`]s.
//!
//! Each format reader yields one [`RawValue`] per schema field (in schema order); this module
//! turns them into a record, reporting the row/column of the first failing cell.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RecordField, RentalRecord, RentalSchema, Weekday};

/// A single untyped cell as read from a source format.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum RawValue {
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Date(NaiveDate),
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => f.write_str("null"),
            RawValue::Int(v) => write!(f, "{v}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Bool(v) => write!(f, "{v}"),
            RawValue::Text(s) => f.write_str(s),
            RawValue::Date(d) => write!(f, "{d}"),
        }
    }
}

/// Build a record from `cells`, which must be ordered like `schema.fields`.
///
/// `row` is the user-facing row number used in error messages.
pub(crate) fn build_record(
    row: usize,
    schema: &RentalSchema,
    cells: &[RawValue],
) -> IngestionResult<RentalRecord> {
    if cells.len() != schema.fields.len() {
        return Err(IngestionError::SchemaMismatch {
            message: format!(
                "row {row} has {} values, expected {}",
                cells.len(),
                schema.fields.len()
            ),
        });
    }

    let slots = field_slots(schema)?;
    let row_cells = RowCells {
        row,
        schema,
        slots,
        cells,
    };
    let cell = |field| row_cells.get(field);

    Ok(RentalRecord {
        instant: cell(RecordField::Instant).int()?,
        date: cell(RecordField::Date).date()?,
        weekday: cell(RecordField::Weekday).weekday()?,
        holiday: cell(RecordField::Holiday).flag()?,
        workingday: cell(RecordField::WorkingDay).flag()?,
        temp_bucket: cell(RecordField::TempBucket).label()?,
        hum_bucket: cell(RecordField::HumBucket).label()?,
        wind_bucket: cell(RecordField::WindBucket).label()?,
        casual: cell(RecordField::Casual).count()?,
        registered: cell(RecordField::Registered).count()?,
        cnt: cell(RecordField::Cnt).count()?,
    })
}

/// Fail with [`IngestionError::SchemaMismatch`] unless every record field has a column.
pub(crate) fn check_schema(schema: &RentalSchema) -> IngestionResult<()> {
    field_slots(schema).map(|_| ())
}

// Position in `schema.fields` of each field, indexed like `RecordField::ALL`.
fn field_slots(schema: &RentalSchema) -> IngestionResult<[usize; RecordField::ALL.len()]> {
    let mut slots = [0; RecordField::ALL.len()];
    for (slot, field) in slots.iter_mut().zip(RecordField::ALL) {
        *slot = schema
            .fields
            .iter()
            .position(|f| f.field == field)
            .ok_or_else(|| IngestionError::SchemaMismatch {
                message: format!(
                    "schema has no column for record field {field:?} (default '{}')",
                    field.default_column()
                ),
            })?;
    }
    Ok(slots)
}

struct RowCells<'a> {
    row: usize,
    schema: &'a RentalSchema,
    slots: [usize; RecordField::ALL.len()],
    cells: &'a [RawValue],
}

impl<'a> RowCells<'a> {
    fn get(&self, field: RecordField) -> CellRef<'a> {
        let idx = self.slots[field as usize];
        CellRef {
            row: self.row,
            column: &self.schema.fields[idx].name,
            value: &self.cells[idx],
        }
    }
}

struct CellRef<'a> {
    row: usize,
    column: &'a str,
    value: &'a RawValue,
}

impl CellRef<'_> {
    fn fail(&self, message: impl Into<String>) -> IngestionError {
        IngestionError::ParseError {
            row: self.row,
            column: self.column.to_owned(),
            raw: self.value.to_string(),
            message: message.into(),
        }
    }

    fn int(&self) -> IngestionResult<i64> {
        match self.value {
            RawValue::Int(v) => Ok(*v),
            RawValue::Text(s) => s.trim().parse::<i64>().map_err(|e| self.fail(e.to_string())),
            RawValue::Null => Err(self.fail("missing value")),
            _ => Err(self.fail("expected integer")),
        }
    }

    fn count(&self) -> IngestionResult<u64> {
        match self.value {
            RawValue::Int(v) => u64::try_from(*v).map_err(|_| self.fail("count must be non-negative")),
            RawValue::Text(s) => s.trim().parse::<u64>().map_err(|e| self.fail(e.to_string())),
            RawValue::Null => Err(self.fail("missing value")),
            _ => Err(self.fail("expected non-negative integer")),
        }
    }

    fn flag(&self) -> IngestionResult<bool> {
        match self.value {
            RawValue::Bool(b) => Ok(*b),
            RawValue::Int(0) => Ok(false),
            RawValue::Int(1) => Ok(true),
            RawValue::Text(s) => parse_bool(s.trim()).map_err(|m| self.fail(m)),
            RawValue::Null => Err(self.fail("missing value")),
            _ => Err(self.fail("expected bool (true/false/1/0/yes/no)")),
        }
    }

    fn date(&self) -> IngestionResult<NaiveDate> {
        match self.value {
            RawValue::Date(d) => Ok(*d),
            RawValue::Text(s) => parse_date(s.trim()).map_err(|m| self.fail(m)),
            RawValue::Null => Err(self.fail("missing value")),
            _ => Err(self.fail("expected date")),
        }
    }

    fn weekday(&self) -> IngestionResult<Weekday> {
        match self.value {
            RawValue::Text(s) => s.parse::<Weekday>().map_err(|m| self.fail(m)),
            RawValue::Null => Err(self.fail("missing value")),
            _ => Err(self.fail("expected weekday label (Mon..Sun)")),
        }
    }

    fn label(&self) -> IngestionResult<String> {
        match self.value {
            RawValue::Text(s) if !s.trim().is_empty() => Ok(s.trim().to_owned()),
            RawValue::Text(_) | RawValue::Null => Err(self.fail("missing bucket label")),
            RawValue::Int(v) => Ok(v.to_string()),
            _ => Err(self.fail("expected bucket label")),
        }
    }
}

fn parse_bool(s: &str) -> Result<bool, String> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "t" | "1" | "yes" | "y" => Ok(true),
        "false" | "f" | "0" | "no" | "n" => Ok(false),
        "" => Err("missing value".to_string()),
        _ => Err("expected bool (true/false/1/0/yes/no)".to_string()),
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    if s.is_empty() {
        return Err("missing value".to_string());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| "expected date (YYYY-MM-DD)".to_string())
}
