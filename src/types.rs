//! Core data model types for rental logs.
//!
//! Ingestion produces a [`RentalTable`] of typed [`RentalRecord`]s, read through a
//! [`RentalSchema`] that maps every record field to a source column name.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};

/// Day-of-week label, declared in canonical dashboard order (`Mon` first).
///
/// The derived `Ord` follows declaration order, so sorting by `Weekday` yields `Mon..Sun`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

impl Weekday {
    /// All labels in canonical order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];

    /// Three-letter label (`"Mon"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            Weekday::Mon => "Mon",
            Weekday::Tue => "Tue",
            Weekday::Wed => "Wed",
            Weekday::Thu => "Thu",
            Weekday::Fri => "Fri",
            Weekday::Sat => "Sat",
            Weekday::Sun => "Sun",
        }
    }

    /// `true` for `Sat` and `Sun`.
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Sat | Weekday::Sun)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Weekday {
    type Err = String;

    /// Accepts three-letter labels or full English names, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mon" | "monday" => Ok(Weekday::Mon),
            "tue" | "tuesday" => Ok(Weekday::Tue),
            "wed" | "wednesday" => Ok(Weekday::Wed),
            "thu" | "thursday" => Ok(Weekday::Thu),
            "fri" | "friday" => Ok(Weekday::Fri),
            "sat" | "saturday" => Ok(Weekday::Sat),
            "sun" | "sunday" => Ok(Weekday::Sun),
            _ => Err("expected weekday label (Mon..Sun)".to_string()),
        }
    }
}

/// One row of the rental log: usage observed for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalRecord {
    /// Unique identifier; stable order within a day.
    pub instant: i64,
    /// Calendar date of the observation.
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub holiday: bool,
    pub workingday: bool,
    /// Discretized temperature label.
    pub temp_bucket: String,
    /// Discretized humidity label.
    pub hum_bucket: String,
    /// Discretized wind-speed label.
    pub wind_bucket: String,
    pub casual: u64,
    pub registered: u64,
    /// Total usage. Expected to equal `casual + registered`; not verified.
    pub cnt: u64,
}

/// Inclusive calendar range `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Create a range, failing with [`AnalysisError::InvalidRange`] if `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> AnalysisResult<Self> {
        if start > end {
            return Err(AnalysisError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` lies within the range (both ends inclusive).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Rental log held in ascending date order.
///
/// Construction sorts stably by date, so records sharing a date keep their input order. A
/// record's position in the table is its re-index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RentalTable {
    records: Vec<RentalRecord>,
}

impl RentalTable {
    /// Create a table from records in any order.
    pub fn new(mut records: Vec<RentalRecord>) -> Self {
        records.sort_by_key(|r| r.date);
        Self { records }
    }

    /// Number of records in the table.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RentalRecord> {
        self.records.iter()
    }

    /// Earliest and latest dates in the table, or `None` when empty.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let first = self.records.first()?;
        let last = self.records.last()?;
        Some(DateRange {
            start: first.date,
            end: last.date,
        })
    }

    /// Create a new table containing only records that match `predicate`.
    ///
    /// Order is preserved, so the result is still sorted.
    pub fn filter_rows<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&RentalRecord) -> bool,
    {
        let records = self
            .records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect();
        Self { records }
    }

    pub fn into_records(self) -> Vec<RentalRecord> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RentalTable {
    type Item = &'a RentalRecord;
    type IntoIter = std::slice::Iter<'a, RentalRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<RentalRecord> for RentalTable {
    fn from_iter<I: IntoIterator<Item = RentalRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Which count field feeds the RFM `monetary` column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonetaryField {
    Casual,
    #[default]
    Registered,
    Total,
}

impl MonetaryField {
    /// Read the selected count from a record.
    pub fn value_of(self, record: &RentalRecord) -> u64 {
        match self {
            MonetaryField::Casual => record.casual,
            MonetaryField::Registered => record.registered,
            MonetaryField::Total => record.cnt,
        }
    }
}

/// Weather factor used as a category-breakdown key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Temperature,
    Humidity,
    WindSpeed,
}

impl CategoryKind {
    pub const ALL: [CategoryKind; 3] = [
        CategoryKind::Temperature,
        CategoryKind::Humidity,
        CategoryKind::WindSpeed,
    ];

    /// Bucket label for this factor on `record`.
    pub fn bucket_of(self, record: &RentalRecord) -> &str {
        match self {
            CategoryKind::Temperature => &record.temp_bucket,
            CategoryKind::Humidity => &record.hum_bucket,
            CategoryKind::WindSpeed => &record.wind_bucket,
        }
    }
}

/// Boolean day flag used for flag-level grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayFlag {
    Holiday,
    WorkingDay,
}

impl DayFlag {
    pub fn value_of(self, record: &RentalRecord) -> bool {
        match self {
            DayFlag::Holiday => record.holiday,
            DayFlag::WorkingDay => record.workingday,
        }
    }
}

/// A rental record field that must be read from the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Instant,
    Date,
    Weekday,
    Holiday,
    WorkingDay,
    TempBucket,
    HumBucket,
    WindBucket,
    Casual,
    Registered,
    Cnt,
}

impl RecordField {
    /// Every field, in the order ingestion reads them.
    pub const ALL: [RecordField; 11] = [
        RecordField::Instant,
        RecordField::Date,
        RecordField::Weekday,
        RecordField::Holiday,
        RecordField::WorkingDay,
        RecordField::TempBucket,
        RecordField::HumBucket,
        RecordField::WindBucket,
        RecordField::Casual,
        RecordField::Registered,
        RecordField::Cnt,
    ];

    /// Column name used by the reference bike-sharing export.
    pub fn default_column(self) -> &'static str {
        match self {
            RecordField::Instant => "instant",
            RecordField::Date => "dteday",
            RecordField::Weekday => "weekday",
            RecordField::Holiday => "holiday",
            RecordField::WorkingDay => "workingday",
            RecordField::TempBucket => "temp2",
            RecordField::HumBucket => "hum2",
            RecordField::WindBucket => "windspeed2",
            RecordField::Casual => "casual",
            RecordField::Registered => "registered",
            RecordField::Cnt => "cnt",
        }
    }
}

/// A single record field bound to its source column name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Source column name.
    pub name: String,
    /// Record field populated from the column.
    pub field: RecordField,
}

impl Field {
    pub fn new(name: impl Into<String>, field: RecordField) -> Self {
        Self {
            name: name.into(),
            field,
        }
    }
}

/// Column mapping for rental-log sources.
///
/// [`Default`] uses the reference export's names (`dteday`, `temp2`, `hum2`, `windspeed2`, ...).
/// Fields are always listed in [`RecordField::ALL`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalSchema {
    pub fields: Vec<Field>,
}

impl Default for RentalSchema {
    fn default() -> Self {
        Self {
            fields: RecordField::ALL
                .iter()
                .map(|&f| Field::new(f.default_column(), f))
                .collect(),
        }
    }
}

impl RentalSchema {
    /// Override the source column name for one field.
    pub fn with_column(mut self, field: RecordField, name: impl Into<String>) -> Self {
        if let Some(f) = self.fields.iter_mut().find(|f| f.field == field) {
            f.name = name.into();
        }
        self
    }

    /// Iterate column names in field order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Source column name for `field`.
    pub fn column(&self, field: RecordField) -> &str {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.name.as_str())
            .unwrap_or_else(|| field.default_column())
    }
}
