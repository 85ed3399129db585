use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use bike_share_analytics::ingestion::parquet::ingest_parquet_from_path;
use bike_share_analytics::types::{RentalSchema, Weekday};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("bike-share-analytics-{name}-{nanos}.parquet"))
}

/// How the `dteday` column is stored.
#[derive(Clone, Copy)]
enum DateColumn {
    /// `INT32 (DATE)`, days since the Unix epoch.
    Logical,
    /// `BINARY (UTF8)` holding `YYYY-MM-DD`.
    Text,
    /// Column left out of the file.
    Missing,
}

fn write_rentals_parquet(path: &PathBuf, dates: DateColumn, weekdays: [&str; 2]) {
    let date_decl = match dates {
        DateColumn::Logical => "REQUIRED INT32 dteday (DATE);",
        DateColumn::Text => "REQUIRED BINARY dteday (UTF8);",
        DateColumn::Missing => "",
    };
    let schema_str = format!(
        r#"
        message schema {{
          REQUIRED INT64 instant;
          {date_decl}
          REQUIRED BINARY weekday (UTF8);
          REQUIRED BOOLEAN holiday;
          REQUIRED BOOLEAN workingday;
          REQUIRED BINARY temp2 (UTF8);
          REQUIRED BINARY hum2 (UTF8);
          REQUIRED BINARY windspeed2 (UTF8);
          REQUIRED INT64 casual;
          REQUIRED INT64 registered;
          REQUIRED INT64 cnt;
        }}
        "#
    );

    let schema = Arc::new(parse_message_type(&schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let names: Vec<&str> = [
        "instant", "dteday", "weekday", "holiday", "workingday", "temp2", "hum2", "windspeed2", "casual",
        "registered", "cnt",
    ]
    .into_iter()
    .filter(|n| *n != "dteday" || !matches!(dates, DateColumn::Missing))
    .collect();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        let name = names[col_idx];
        match col.untyped() {
            ColumnWriter::Int32ColumnWriter(w) => {
                // 2011-01-02, 2011-01-01
                w.write_batch(&[14976_i32, 14975_i32], None, None).unwrap();
            }
            ColumnWriter::Int64ColumnWriter(w) => {
                let values: [i64; 2] = match name {
                    "instant" => [2, 1],
                    "casual" => [131, 331],
                    "registered" => [670, 654],
                    "cnt" => [801, 985],
                    other => panic!("unexpected int64 column {other}"),
                };
                w.write_batch(&values, None, None).unwrap();
            }
            ColumnWriter::BoolColumnWriter(w) => {
                w.write_batch(&[false, false], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let values: [&str; 2] = match name {
                    "dteday" => ["2011-01-02", "2011-01-01"],
                    "weekday" => weekdays,
                    "temp2" => ["Cold", "Cold"],
                    "hum2" => ["Humid", "Humid"],
                    "windspeed2" => ["Windy", "Moderate"],
                    other => panic!("unexpected byte array column {other}"),
                };
                let values: Vec<ByteArray> = values.into_iter().map(ByteArray::from).collect();
                w.write_batch(&values, None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

#[test]
fn ingest_parquet_with_logical_dates() {
    let path = tmp_file("logical");
    write_rentals_parquet(&path, DateColumn::Logical, ["Sun", "Sat"]);

    let table = ingest_parquet_from_path(&path, &RentalSchema::default()).unwrap();
    assert_eq!(table.row_count(), 2);
    // Written Jan 2 first; the table is date-sorted.
    let first = &table.records()[0];
    assert_eq!(first.instant, 1);
    assert_eq!(first.date.to_string(), "2011-01-01");
    assert_eq!(first.weekday, Weekday::Sat);
    assert_eq!(first.wind_bucket, "Moderate");
    assert_eq!(first.cnt, 985);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_with_text_dates() {
    let path = tmp_file("text");
    write_rentals_parquet(&path, DateColumn::Text, ["Sun", "Sat"]);

    let table = ingest_parquet_from_path(&path, &RentalSchema::default()).unwrap();
    let bounds = table.date_bounds().unwrap();
    assert_eq!(bounds.to_string(), "2011-01-01..=2011-01-02");

    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_missing_required_column() {
    let path = tmp_file("missing");
    write_rentals_parquet(&path, DateColumn::Missing, ["Sun", "Sat"]);

    let err = ingest_parquet_from_path(&path, &RentalSchema::default()).unwrap_err();
    assert!(err.to_string().contains("missing required column 'dteday'"));
    let _ = std::fs::remove_file(&path);
}

#[test]
fn ingest_parquet_errors_on_bad_weekday() {
    let path = tmp_file("bad-weekday");
    write_rentals_parquet(&path, DateColumn::Logical, ["Sun", "Someday"]);

    let err = ingest_parquet_from_path(&path, &RentalSchema::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value at row 2"));
    assert!(msg.contains("column 'weekday'"));
    let _ = std::fs::remove_file(&path);
}
