//! Integration tests for the advisory validators and their agreement with
//! the conversion engines

use assert_matches::assert_matches;
use csvconv::{
    csv_to_records, validate_delimited_text, validate_structured_text, ConversionErrorKind,
    CsvToJsonConfig,
};
use csvconv::parser::parse_structured;

#[test]
fn test_valid_delimited_input() {
    let report = validate_delimited_text("id,name\n1,Alice\n2,Bob");
    assert!(report.is_valid());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_empty_delimited_input_is_error() {
    let report = validate_delimited_text("");
    assert!(!report.is_valid());

    let err = csv_to_records("", &CsvToJsonConfig::default()).unwrap_err();
    assert_matches!(err.kind(), Some(ConversionErrorKind::EmptyInput));
}

#[test]
fn test_detection_failure_flagged_by_both() {
    let input = "alpha\nbeta\ngamma";

    let report = validate_delimited_text(input);
    assert!(!report.is_valid());

    let err = csv_to_records(input, &CsvToJsonConfig::default()).unwrap_err();
    assert_matches!(
        err.kind(),
        Some(ConversionErrorKind::DelimiterDetectionFailed)
    );
}

#[test]
fn test_malformed_quoting_line_agrees_with_engine() {
    let input = "a,b\n1,2\n3,\"open";

    let report = validate_delimited_text(input);
    assert!(!report.is_valid());
    assert_eq!(report.errors[0].line, Some(3));

    let err = csv_to_records(input, &CsvToJsonConfig::default()).unwrap_err();
    assert_matches!(
        err.kind(),
        Some(ConversionErrorKind::MalformedQuoting { line: 3 })
    );
}

#[test]
fn test_inconsistent_column_count_is_warning_not_error() {
    let input = "a,b\n1,2,3\n4,5";

    let report = validate_delimited_text(input);
    assert!(report.is_valid());
    assert!(!report.warnings.is_empty());

    // Conversion still succeeds with a matching warning
    let output = csv_to_records(input, &CsvToJsonConfig::default()).unwrap();
    assert_eq!(output.row_count, 2);
    assert!(!output.warnings.is_empty());
}

#[test]
fn test_multiline_quoted_field_not_flagged() {
    let report = validate_delimited_text("id,note\n1,\"two\nlines\"\n2,short");
    assert!(report.is_valid());
}

#[test]
fn test_structured_syntax_error_line_agrees_with_parser() {
    let input = "{\n  \"a\": 1,\n  \"b\":\n}";

    let report = validate_structured_text(input);
    assert!(!report.is_valid());
    let report_line = report.errors[0].line;

    let err = parse_structured(input).unwrap_err();
    match err.kind() {
        Some(ConversionErrorKind::Syntax { line, .. }) => assert_eq!(*line, report_line),
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn test_structured_shape_warnings() {
    let scalar = validate_structured_text("42");
    assert!(scalar.is_valid());
    assert_eq!(scalar.warnings.len(), 1);

    let empty = validate_structured_text("[]");
    assert!(empty.is_valid());
    assert_eq!(empty.warnings.len(), 1);

    let mixed = validate_structured_text(r#"[{"a":1}, "loose"]"#);
    assert!(mixed.is_valid());
    assert!(mixed.warnings[0].message.contains("mixes"));
}

#[test]
fn test_structured_key_consistency_warning() {
    let report = validate_structured_text(r#"[{"id":1},{"id":2,"extra":true}]"#);
    assert!(report.is_valid());
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].message.contains("extra"));
}

#[test]
fn test_valid_structured_input_clean_report() {
    let report = validate_structured_text(r#"[{"id":1,"name":"Ada"},{"id":2,"name":"Lin"}]"#);
    assert!(report.is_valid());
    assert!(report.warnings.is_empty());
}
