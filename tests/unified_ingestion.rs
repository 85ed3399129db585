use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parquet::column::writer::ColumnWriter;
use parquet::data_type::ByteArray;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::parser::parse_message_type;

use bike_share_analytics::ingestion::{ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
use bike_share_analytics::types::{RentalSchema, RentalTable};

fn tmp_file(ext: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("bike-share-analytics-unified-{nanos}.{ext}"))
}

const CSV_ROWS: &str = "instant,dteday,weekday,holiday,workingday,temp2,hum2,windspeed2,casual,registered,cnt\n\
                        1,2011-01-01,Sat,0,0,Cold,Humid,Moderate,331,654,985\n";

fn write_one_row_parquet(path: &PathBuf) {
    let schema_str = r#"
    message schema {
      REQUIRED INT64 instant;
      REQUIRED INT32 dteday (DATE);
      REQUIRED BINARY weekday (UTF8);
      REQUIRED INT32 holiday;
      REQUIRED INT32 workingday;
      REQUIRED BINARY temp2 (UTF8);
      REQUIRED BINARY hum2 (UTF8);
      REQUIRED BINARY windspeed2 (UTF8);
      REQUIRED INT64 casual;
      REQUIRED INT64 registered;
      REQUIRED INT64 cnt;
    }
    "#;

    let schema = Arc::new(parse_message_type(schema_str).unwrap());
    let props = Arc::new(WriterProperties::builder().build());
    let file = File::create(path).unwrap();
    let mut writer = SerializedFileWriter::new(file, schema, props).unwrap();

    let mut rg = writer.next_row_group().unwrap();
    let mut col_idx: usize = 0;
    while let Some(mut col) = rg.next_column().unwrap() {
        match col.untyped() {
            // dteday (2011-01-01), holiday, workingday
            ColumnWriter::Int32ColumnWriter(w) => {
                let v = if col_idx == 1 { 14975 } else { 0 };
                w.write_batch(&[v], None, None).unwrap();
            }
            // instant, casual, registered, cnt
            ColumnWriter::Int64ColumnWriter(w) => {
                let v = match col_idx {
                    0 => 1,
                    8 => 331,
                    9 => 654,
                    _ => 985,
                };
                w.write_batch(&[v], None, None).unwrap();
            }
            ColumnWriter::ByteArrayColumnWriter(w) => {
                let v = match col_idx {
                    2 => "Sat",
                    5 => "Cold",
                    6 => "Humid",
                    _ => "Moderate",
                };
                w.write_batch(&[ByteArray::from(v)], None, None).unwrap();
            }
            _ => panic!("unexpected column writer in test"),
        }
        col.close().unwrap();
        col_idx += 1;
    }
    rg.close().unwrap();
    writer.close().unwrap();
}

fn assert_single_saturday(table: &RentalTable) {
    assert_eq!(table.row_count(), 1);
    let r = &table.records()[0];
    assert_eq!(r.instant, 1);
    assert_eq!(r.date.to_string(), "2011-01-01");
    assert_eq!((r.casual, r.registered, r.cnt), (331, 654, 985));
    assert!(!r.holiday && !r.workingday);
}

#[test]
fn unified_ingest_infers_csv_json_and_parquet() {
    let schema = RentalSchema::default();
    let opts = IngestionOptions::default();

    let csv_path = tmp_file("csv");
    std::fs::write(&csv_path, CSV_ROWS).unwrap();
    assert_single_saturday(&ingest_from_path(&csv_path, &schema, &opts).unwrap());

    let json_path = tmp_file("ndjson");
    std::fs::write(
        &json_path,
        r#"{"instant":1,"dteday":"2011-01-01","weekday":"Sat","holiday":0,"workingday":0,"temp2":"Cold","hum2":"Humid","windspeed2":"Moderate","casual":331,"registered":654,"cnt":985}"#,
    )
    .unwrap();
    assert_single_saturday(&ingest_from_path(&json_path, &schema, &opts).unwrap());

    let pq_path = tmp_file("parquet");
    write_one_row_parquet(&pq_path);
    assert_single_saturday(&ingest_from_path(&pq_path, &schema, &opts).unwrap());

    for p in [csv_path, json_path, pq_path] {
        let _ = std::fs::remove_file(p);
    }
}

#[test]
fn unified_ingest_respects_forced_format() {
    let path = tmp_file("txt");
    std::fs::write(&path, CSV_ROWS).unwrap();

    let opts = IngestionOptions {
        format: Some(IngestionFormat::Csv),
        ..Default::default()
    };
    assert_single_saturday(&ingest_from_path(&path, &RentalSchema::default(), &opts).unwrap());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn unified_ingest_rejects_unknown_extension() {
    let err = ingest_from_path("rentals.xlsx", &RentalSchema::default(), &IngestionOptions::default())
        .unwrap_err();
    assert!(err.to_string().contains("cannot infer format from extension 'xlsx'"));
}

#[test]
fn ingestion_request_runs_against_fixture() {
    let request = IngestionRequest {
        path: PathBuf::from("tests/fixtures/rentals.csv"),
        schema: RentalSchema::default(),
        options: IngestionOptions::default(),
    };
    let table = request.run().unwrap();
    assert_eq!(table.row_count(), 8);
    assert_eq!(table.iter().map(|r| r.cnt).sum::<u64>(), 10_572);
}
