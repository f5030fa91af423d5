//! Advisory validation of delimited text
//!
//! Mirrors the checks the delimited-to-record engine performs, without
//! converting: malformed quoting is an error, inconsistent column counts and
//! empty rows are warnings.

use crate::parser::detect::detect_delimiter;
use crate::parser::strip_bom;
use crate::parser::tokenizer::{count_unescaped_quotes, tokenize_line};
use crate::validation::{ValidationIssue, ValidationReport};

/// Validate delimited text and collect findings
pub fn validate_delimited_text(text: &str) -> ValidationReport {
    let mut report = ValidationReport::new();
    let text = strip_bom(text);

    if text.trim().is_empty() {
        report.error(ValidationIssue::new("input is empty".to_string()));
        return report;
    }

    let delimiter = detect_delimiter(text);
    if delimiter.is_none() {
        report.error(ValidationIssue::new(
            "no delimiter could be detected; specify one explicitly".to_string(),
        ));
    }

    let mut expected_columns: Option<usize> = None;
    let mut logical_start = 0usize;
    let mut logical_line = String::new();

    for (index, physical) in text.lines().enumerate() {
        if logical_line.is_empty() {
            logical_start = index + 1;
            logical_line.push_str(physical);
        } else {
            // Continuation of an open quoted field
            logical_line.push('\n');
            logical_line.push_str(physical);
        }

        if count_unescaped_quotes(&logical_line) % 2 != 0 {
            continue;
        }

        check_logical_line(
            &logical_line,
            logical_start,
            delimiter,
            &mut expected_columns,
            &mut report,
        );
        logical_line.clear();
    }

    // Input ended with an open quoted field
    if !logical_line.is_empty() {
        report.error(ValidationIssue::at_line(
            logical_start,
            "malformed quoting: odd number of unescaped quote characters".to_string(),
        ));
    }

    report
}

fn check_logical_line(
    line: &str,
    line_number: usize,
    delimiter: Option<char>,
    expected_columns: &mut Option<usize>,
    report: &mut ValidationReport,
) {
    if line.trim().is_empty() {
        report.warning(ValidationIssue::at_line(
            line_number,
            "empty row".to_string(),
        ));
        return;
    }

    let Some(delimiter) = delimiter else {
        return;
    };

    let fields = tokenize_line(line, delimiter).fields;
    match expected_columns {
        None => *expected_columns = Some(fields.len()),
        Some(expected) if fields.len() != *expected => {
            report.warning(ValidationIssue::at_line(
                line_number,
                format!(
                    "inconsistent column count: expected {}, found {}",
                    expected,
                    fields.len()
                ),
            ));
        }
        _ => {}
    }

    if fields.iter().all(|f| f.trim().is_empty()) {
        report.warning(ValidationIssue::at_line(
            line_number,
            "empty row".to_string(),
        ));
    }
}
