use bike_share_analytics::ingestion::json::{ingest_json_from_path, ingest_json_from_str};
use bike_share_analytics::types::{RecordField, RentalSchema, Weekday};

#[test]
fn ingest_json_array_from_path_happy_path() {
    let table = ingest_json_from_path("tests/fixtures/rentals.json", &RentalSchema::default()).unwrap();

    assert_eq!(table.row_count(), 3);
    // Input order is 3, 1, 6; the table is date-sorted.
    let instants: Vec<i64> = table.iter().map(|r| r.instant).collect();
    assert_eq!(instants, vec![1, 3, 6]);

    let holiday = &table.records()[2];
    assert!(holiday.holiday);
    assert!(!holiday.workingday);
    assert_eq!(holiday.weekday, Weekday::Mon);
}

#[test]
fn ingest_json_ndjson_with_nested_weather() {
    let schema = RentalSchema::default()
        .with_column(RecordField::TempBucket, "weather.temp2")
        .with_column(RecordField::HumBucket, "weather.hum2")
        .with_column(RecordField::WindBucket, "weather.windspeed2");
    let input = r#"
{"instant":1,"dteday":"2011-01-01","weekday":"Sat","holiday":0,"workingday":0,"weather":{"temp2":"Cold","hum2":"Humid","windspeed2":"Moderate"},"casual":331,"registered":654,"cnt":985}
{"instant":2,"dteday":"2011-01-02","weekday":"Sun","holiday":0,"workingday":0,"weather":{"temp2":"Cold","hum2":"Humid","windspeed2":"Windy"},"casual":131,"registered":670,"cnt":801}
"#;
    let table = ingest_json_from_str(input, &schema).unwrap();
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.records()[1].wind_bucket, "Windy");
}

#[test]
fn ingest_json_accepts_datetime_strings() {
    let input = r#"{"instant":9,"dteday":"2011-03-05T00:00:00","weekday":"Sat","holiday":false,"workingday":false,
        "temp2":"Mild","hum2":"Dry","windspeed2":"Calm","casual":10,"registered":20,"cnt":30}"#;
    let table = ingest_json_from_str(input, &RentalSchema::default()).unwrap();
    assert_eq!(table.records()[0].date.to_string(), "2011-03-05");
}

#[test]
fn ingest_json_errors_on_missing_field() {
    let input = r#"[{"instant":1,"dteday":"2011-01-01","weekday":"Sat","holiday":0,"workingday":0,
        "temp2":"Cold","hum2":"Humid","windspeed2":"Calm","casual":1,"registered":2}]"#;
    let err = ingest_json_from_str(input, &RentalSchema::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("schema mismatch"));
    assert!(msg.contains("missing required field 'cnt'"));
}

#[test]
fn ingest_json_errors_on_type_mismatch() {
    let input = r#"[{"instant":1,"dteday":"2011-01-01","weekday":"Caturday","holiday":0,"workingday":0,
        "temp2":"Cold","hum2":"Humid","windspeed2":"Calm","casual":1,"registered":2,"cnt":3}]"#;
    let err = ingest_json_from_str(input, &RentalSchema::default()).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("failed to parse value"));
    assert!(msg.contains("column 'weekday'"));
}

#[test]
fn ingest_json_rejects_scalar_documents_and_empty_input() {
    assert!(ingest_json_from_str("42", &RentalSchema::default()).is_err());
    let err = ingest_json_from_str("   ", &RentalSchema::default()).unwrap_err();
    assert!(err.to_string().contains("json input is empty"));
}

#[test]
fn ingest_json_empty_array_gives_empty_table() {
    let table = ingest_json_from_str("[]", &RentalSchema::default()).unwrap();
    assert!(table.is_empty());
}
