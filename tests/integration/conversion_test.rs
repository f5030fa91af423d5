//! Integration tests for end-to-end conversion in both directions

use assert_matches::assert_matches;
use csvconv::{
    csv_to_json_with_config, csv_to_records, json_to_csv, json_to_csv_with_config,
    records_to_delimited, ConversionErrorKind, CsvEngine, CsvToJsonConfig, JsonToCsvConfig,
    OutputFormat, Warning,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn compact() -> CsvToJsonConfig {
    let mut config = CsvToJsonConfig::default();
    config.pretty = false;
    config
}

#[test]
fn test_csv_to_json_with_quoted_delimiter() {
    let input = "id,name\n1,\"Smith, John\"\n2,Doe";
    let output = csv_to_json_with_config(input, &compact()).unwrap();
    assert_eq!(
        output,
        r#"[{"id":1,"name":"Smith, John"},{"id":2,"name":"Doe"}]"#
    );
}

#[test]
fn test_type_coercion_defaults() {
    let input = "name,age,active,score,note\nAda,36,true,3.14,";
    let output = csv_to_records(input, &CsvToJsonConfig::default()).unwrap();
    assert_eq!(
        output.value,
        json!([{"name":"Ada","age":36,"active":true,"score":3.14,"note":null}])
    );
}

#[test]
fn test_coercion_disabled_keeps_strings() {
    let mut config = compact();
    config.parse_numbers = false;
    config.parse_booleans = false;
    config.parse_nulls = false;

    let output = csv_to_records("a,b\n1,true", &config).unwrap();
    assert_eq!(output.value, json!([{"a":"1","b":"true"}]));
}

#[test]
fn test_semicolon_and_tab_detection() {
    let semicolon = csv_to_records("a;b\n1;2", &CsvToJsonConfig::default()).unwrap();
    assert_eq!(semicolon.value, json!([{"a":1,"b":2}]));

    let tab = csv_to_records("a\tb\n1\t2", &CsvToJsonConfig::default()).unwrap();
    assert_eq!(tab.value, json!([{"a":1,"b":2}]));
}

#[test]
fn test_row_normalization_policies() {
    // Short rows are padded with null, long rows truncated by default
    let input = "a,b,c\n1,2\n1,2,3,4";
    let output = csv_to_records(input, &CsvToJsonConfig::default()).unwrap();
    assert_eq!(
        output.value,
        json!([{"a":1,"b":2,"c":null},{"a":1,"b":2,"c":3}])
    );
    assert_eq!(output.warnings.len(), 2);

    // Opting in keeps extras under synthesized names
    let mut config = CsvToJsonConfig::default();
    config.keep_extra_columns = true;
    let kept = csv_to_records(input, &config).unwrap();
    assert_eq!(
        kept.value,
        json!([{"a":1,"b":2,"c":null,"column4":null},{"a":1,"b":2,"c":3,"column4":4}])
    );
}

#[test]
fn test_object_output_format() {
    let mut config = compact();
    config.output_format = OutputFormat::Object;

    let output = csv_to_json_with_config("a\n1\n2", &config).unwrap();
    assert_eq!(output, r#"{"0":{"a":1},"1":{"a":2}}"#);
}

#[test]
fn test_nested_output_from_dotted_headers() {
    let mut config = CsvToJsonConfig::default();
    config.nested_output = true;

    let output = csv_to_records("user.name,user.age\nAda,36", &config).unwrap();
    assert_eq!(output.value, json!([{"user":{"name":"Ada","age":36}}]));
}

#[test]
fn test_empty_input_errors() {
    let err = csv_to_records("", &CsvToJsonConfig::default()).unwrap_err();
    assert_matches!(err.kind(), Some(ConversionErrorKind::EmptyInput));

    let err = csv_to_records("   \n  ", &CsvToJsonConfig::default()).unwrap_err();
    assert_matches!(err.kind(), Some(ConversionErrorKind::EmptyInput));
}

#[test]
fn test_malformed_quoting_strict_and_recovering() {
    let input = "a,b\n1,2\n3,\"open";

    let err = csv_to_records(input, &CsvToJsonConfig::default()).unwrap_err();
    assert_matches!(
        err.kind(),
        Some(ConversionErrorKind::MalformedQuoting { line: 3 })
    );

    let mut config = CsvToJsonConfig::default();
    config.skip_malformed_lines = true;
    let output = csv_to_records(input, &config).unwrap();
    assert_eq!(output.row_count, 1);
    assert!(output
        .warnings
        .iter()
        .any(|w| matches!(w, Warning::SkippedMalformedLine { line: 3 })));
}

#[test]
fn test_json_to_csv_basic() {
    let output = json_to_csv(&json!([
        {"id": 1, "name": "Alice"},
        {"id": 2, "name": "Bob, Jr."}
    ]))
    .unwrap();
    assert_eq!(output, "id,name\n1,Alice\n2,\"Bob, Jr.\"");
}

#[test]
fn test_json_to_csv_flattens_nested_objects() {
    let output = json_to_csv(&json!([
        {"id": 1, "address": {"city": "Paris", "zip": "75001"}}
    ]))
    .unwrap();
    assert_eq!(output, "id,address.city,address.zip\n1,Paris,75001");
}

#[test]
fn test_json_to_csv_scalar_rejected() {
    let err = json_to_csv(&json!("just a string")).unwrap_err();
    assert_matches!(err.kind(), Some(ConversionErrorKind::UnsupportedShape { .. }));
}

#[test]
fn test_json_to_csv_key_union_warning() {
    let config = JsonToCsvConfig::default().with_flatten_objects(false);
    let output = records_to_delimited(
        &json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob", "extra": "x"}
        ]),
        &config,
    )
    .unwrap();
    assert_eq!(output.content, "id,name,extra\n1,Alice,\n2,Bob,x");
    assert_matches!(
        output.warnings.as_slice(),
        [Warning::InconsistentRecordKeys { keys }] if keys == &vec!["extra".to_string()]
    );
}

#[test]
fn test_chunked_progress_reports_monotonic_totals() {
    let mut text = String::from("n\n");
    for i in 0..25 {
        text.push_str(&i.to_string());
        text.push('\n');
    }

    let mut config = compact();
    config.chunk_size = 10;
    let engine = CsvEngine::new(config);

    let mut seen = Vec::new();
    let output = engine
        .convert_with_progress(&text, |p| seen.push((p.processed_rows, p.total_rows)))
        .unwrap();

    assert_eq!(output.row_count, 25);
    assert_eq!(seen, vec![(10, 25), (20, 25), (25, 25)]);
}

#[test]
fn test_custom_headers_and_mapping() {
    let mut config = compact();
    config.header_mapping = Some(
        [("id".to_string(), "identifier".to_string())]
            .into_iter()
            .collect(),
    );

    let output = csv_to_json_with_config("id,name\n1,Ada", &config).unwrap();
    assert_eq!(output, r#"[{"identifier":1,"name":"Ada"}]"#);

    let headerless = json_to_csv_with_config(
        &json!([{"x": 1, "y": 2}]),
        &JsonToCsvConfig::default().with_include_headers(false),
    )
    .unwrap();
    assert_eq!(headerless, "1,2");
}
