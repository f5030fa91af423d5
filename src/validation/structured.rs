//! Advisory validation of structured (JSON) text
//!
//! Syntax failures are errors; shape concerns (scalar top level, mixed
//! arrays, keys present in some records but not all) are warnings because
//! conversion handles them with fallbacks.

use crate::validation::{ValidationIssue, ValidationReport};
use serde_json::Value;
use std::collections::HashSet;

/// Validate structured text and collect findings
pub fn validate_structured_text(text: &str) -> ValidationReport {
    let mut report = ValidationReport::new();
    let trimmed = text.trim_start_matches('\u{feff}').trim();

    if trimmed.is_empty() {
        report.error(ValidationIssue::new("input is empty".to_string()));
        return report;
    }

    let value: Value = match serde_json::from_str(trimmed) {
        Ok(value) => value,
        Err(e) => {
            report.error(ValidationIssue::at_line(e.line(), e.to_string()));
            return report;
        }
    };

    match &value {
        Value::Array(items) => check_array(items, &mut report),
        Value::Object(_) => {}
        other => {
            report.warning(ValidationIssue::new(format!(
                "top-level value is {}; delimited output works best with an object or array",
                value_kind(other)
            )));
        }
    }

    report
}

fn check_array(items: &[Value], report: &mut ValidationReport) {
    if items.is_empty() {
        report.warning(ValidationIssue::new(
            "array is empty; conversion will produce no data rows".to_string(),
        ));
        return;
    }

    let object_count = items.iter().filter(|v| v.is_object()).count();
    if object_count > 0 && object_count < items.len() {
        report.warning(ValidationIssue::new(
            "array mixes objects and non-objects; rows will be uneven".to_string(),
        ));
    }

    if object_count == items.len() {
        check_key_consistency(items, report);
    }
}

/// Warn about keys that appear in some records but not all
fn check_key_consistency(items: &[Value], report: &mut ValidationReport) {
    let mut seen: Vec<String> = Vec::new();
    let mut seen_set: HashSet<String> = HashSet::new();

    for item in items {
        if let Some(obj) = item.as_object() {
            for key in obj.keys() {
                if seen_set.insert(key.clone()) {
                    seen.push(key.clone());
                }
            }
        }
    }

    let inconsistent: Vec<String> = seen
        .into_iter()
        .filter(|key| {
            !items
                .iter()
                .all(|item| item.as_object().is_some_and(|o| o.contains_key(key)))
        })
        .collect();

    if !inconsistent.is_empty() {
        report.warning(ValidationIssue::new(format!(
            "keys present in some records but not all: {}",
            inconsistent.join(", ")
        )));
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
