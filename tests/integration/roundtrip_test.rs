//! Integration tests for conversion round-trips and idempotence properties

use csvconv::formatter::quotes::{escape_field, QuoteEngine};
use csvconv::parser::detect::detect_delimiter;
use csvconv::parser::tokenizer::tokenize_line;
use csvconv::{
    csv_to_records, json_to_csv, json_to_csv_with_config, CsvToJsonConfig, JsonToCsvConfig,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn compact() -> CsvToJsonConfig {
    let mut config = CsvToJsonConfig::default();
    config.pretty = false;
    config
}

#[test]
fn test_csv_json_csv_identity() {
    let original = "id,name\n1,\"Smith, John\"\n2,Doe";

    let records = csv_to_records(original, &compact()).unwrap();
    let back = json_to_csv(&records.value).unwrap();

    assert_eq!(back, original);
}

#[test]
fn test_json_csv_json_identity() {
    let original = json!([
        {"id": 1, "name": "Alice", "active": true, "score": 3.5},
        {"id": 2, "name": "Bob", "active": false, "score": 4.25}
    ]);

    let delimited = json_to_csv(&original).unwrap();
    let back = csv_to_records(&delimited, &compact()).unwrap();

    assert_eq!(back.value, original);
}

#[test]
fn test_nested_flatten_unflatten_identity() {
    let original = json!([
        {"user": {"name": "Ada", "age": 36}, "id": 1},
        {"user": {"name": "Grace", "age": 45}, "id": 2}
    ]);

    let delimited = json_to_csv(&original).unwrap();
    assert_eq!(delimited, "user.name,user.age,id\nAda,36,1\nGrace,45,2");

    let mut config = compact();
    config.nested_output = true;
    let back = csv_to_records(&delimited, &config).unwrap();

    assert_eq!(back.value, original);
}

#[test]
fn test_tsv_roundtrip() {
    let original = "a\tb\n1\tx\n2\ty";

    let records = csv_to_records(original, &compact()).unwrap();
    let back = json_to_csv_with_config(
        &records.value,
        &JsonToCsvConfig::default().with_delimiter('\t'),
    )
    .unwrap();

    assert_eq!(back, original);
}

#[test]
fn test_detection_is_deterministic() {
    let input = "a;b,c\n1;2,3\nx;y,z";
    let first = detect_delimiter(input);
    for _ in 0..10 {
        assert_eq!(detect_delimiter(input), first);
    }
}

#[test]
fn test_escaping_tokenizing_inverse() {
    let values = [
        "plain",
        "with, comma",
        "with \"quotes\"",
        "line\nbreak",
        "",
        "trailing space ",
    ];

    for value in values {
        let escaped = escape_field(value, ',');
        let line = format!("{},after", escaped);
        let tokenized = tokenize_line(&line, ',');
        assert!(!tokenized.unterminated);
        assert_eq!(tokenized.fields, vec![value.to_string(), "after".to_string()]);
    }
}

#[test]
fn test_quoting_idempotent_for_clean_fields() {
    let engine = QuoteEngine::new(',', '"');
    // A field with nothing special passes through untouched however many
    // times it is escaped
    let clean = "nothing-special";
    assert_eq!(engine.escape(clean), clean);
    assert_eq!(engine.escape(&engine.escape(clean)), clean);
}

#[test]
fn test_null_fields_survive_roundtrip() {
    let original = json!([
        {"a": 1, "b": null},
        {"a": 2, "b": "x"}
    ]);

    let delimited = json_to_csv(&original).unwrap();
    assert_eq!(delimited, "a,b\n1,\n2,x");

    let back = csv_to_records(&delimited, &compact()).unwrap();
    assert_eq!(back.value, original);
}

#[test]
fn test_quoted_multiline_field_roundtrip() {
    let original = json!([{"id": 1, "note": "two\nlines"}]);

    let delimited = json_to_csv(&original).unwrap();
    assert_eq!(delimited, "id,note\n1,\"two\nlines\"");

    let back = csv_to_records(&delimited, &compact()).unwrap();
    assert_eq!(back.value, original);
}
