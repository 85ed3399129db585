use bike_share_analytics::ingestion::csv::{ingest_csv_from_path, ingest_csv_from_reader};
use bike_share_analytics::types::{RecordField, RentalSchema, Weekday};
use bike_share_analytics::IngestionError;

const HEADER: &str = "instant,dteday,weekday,holiday,workingday,temp2,hum2,windspeed2,casual,registered,cnt";

fn reader(input: &str) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes())
}

#[test]
fn ingest_csv_from_path_happy_path() {
    let table = ingest_csv_from_path("tests/fixtures/rentals.csv", &RentalSchema::default()).unwrap();

    assert_eq!(table.row_count(), 8);
    let first = &table.records()[0];
    assert_eq!(first.instant, 1);
    assert_eq!(first.date.to_string(), "2011-01-01");
    assert_eq!(first.weekday, Weekday::Sat);
    assert!(!first.holiday);
    assert_eq!(first.wind_bucket, "Moderate");
    assert_eq!((first.casual, first.registered, first.cnt), (331, 654, 985));

    let bounds = table.date_bounds().unwrap();
    assert_eq!(bounds.to_string(), "2011-01-01..=2011-02-14");
}

#[test]
fn ingest_csv_sorts_rows_by_date() {
    let input = format!(
        "{HEADER}\n\
         2,2011-01-02,Sun,0,0,Cold,Humid,Windy,131,670,801\n\
         1,2011-01-01,Sat,0,0,Cold,Humid,Moderate,331,654,985\n"
    );
    let table = ingest_csv_from_reader(&mut reader(&input), &RentalSchema::default()).unwrap();
    let instants: Vec<i64> = table.iter().map(|r| r.instant).collect();
    assert_eq!(instants, vec![1, 2]);
}

#[test]
fn ingest_csv_allows_reordered_and_renamed_columns() {
    let schema = RentalSchema::default()
        .with_column(RecordField::Date, "day")
        .with_column(RecordField::TempBucket, "temperature");
    let input = "cnt,registered,casual,windspeed2,hum2,temperature,workingday,holiday,weekday,day,instant\n\
                 985,654,331,Moderate,Humid,Cold,false,false,saturday,2011-01-01,1\n";

    let table = ingest_csv_from_reader(&mut reader(input), &schema).unwrap();
    assert_eq!(table.row_count(), 1);
    assert_eq!(table.records()[0].weekday, Weekday::Sat);
    assert_eq!(table.records()[0].temp_bucket, "Cold");
    assert_eq!(table.records()[0].cnt, 985);
}

#[test]
fn ingest_csv_errors_on_missing_required_column() {
    let input = "instant,dteday,weekday,holiday,workingday,temp2,hum2,casual,registered,cnt\n";

    let err = ingest_csv_from_reader(&mut reader(input), &RentalSchema::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required column 'windspeed2'"));
}

#[test]
fn ingest_csv_errors_on_type_parse() {
    let input = format!("{HEADER}\n1,2011-01-01,Sat,0,0,Cold,Humid,Calm,many,654,985\n");

    let err = ingest_csv_from_reader(&mut reader(&input), &RentalSchema::default()).unwrap_err();
    match err {
        IngestionError::ParseError { row, column, raw, .. } => {
            assert_eq!(row, 2);
            assert_eq!(column, "casual");
            assert_eq!(raw, "many");
        }
        other => panic!("expected parse error, got {other}"),
    }
}

#[test]
fn ingest_csv_rejects_negative_counts_and_bad_dates() {
    let negative = format!("{HEADER}\n1,2011-01-01,Sat,0,0,Cold,Humid,Calm,-5,654,985\n");
    let err = ingest_csv_from_reader(&mut reader(&negative), &RentalSchema::default()).unwrap_err();
    assert!(err.to_string().contains("column 'casual'"));

    let bad_date = format!("{HEADER}\n1,01/01/2011,Sat,0,0,Cold,Humid,Calm,5,654,985\n");
    let err = ingest_csv_from_reader(&mut reader(&bad_date), &RentalSchema::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("column 'dteday'"));
    assert!(msg.contains("expected date"));
}

#[test]
fn ingest_csv_header_only_gives_empty_table() {
    let table = ingest_csv_from_reader(&mut reader(HEADER), &RentalSchema::default()).unwrap();
    assert!(table.is_empty());
    assert!(table.date_bounds().is_none());
}

#[test]
fn ingest_csv_rejects_schema_missing_a_field() {
    let mut schema = RentalSchema::default();
    schema.fields.retain(|f| f.field != RecordField::Casual);

    // Even with no data rows, an incomplete schema is an error rather than an empty table.
    let err = ingest_csv_from_reader(&mut reader(HEADER), &schema).unwrap_err();
    assert!(matches!(err, IngestionError::SchemaMismatch { .. }));
    assert!(err.to_string().contains("Casual"));
}
