//! Record-to-delimited conversion engine
//!
//! Dispatches on the input shape once at entry, computes the column set
//! across heterogeneous records (plain key union or recursive flattening),
//! formats and escapes each field, and assembles delimited rows.

use crate::conversion::config::JsonToCsvConfig;
use crate::conversion::{ChunkProgress, ConversionOutput, ConversionResult, Warning};
use crate::error::{ConversionError, ConversionErrorKind};
use crate::formatter::flatten::{flattened_key_union, key_union, lookup_path};
use crate::formatter::quotes::QuoteEngine;
use crate::parser::coerce::value_to_field;
use crate::validation::circular_refs::CircularRefDetector;
use serde_json::{Map, Value};

/// Depth limit for the structural safety pass, independent of the
/// flattening depth limit
const STRUCTURE_DEPTH_LIMIT: usize = 100;

/// Top-level input shape, decided once at entry
enum InputShape<'a> {
    /// A single record: one-row output with its own keys as the header
    SingleRecord(&'a Map<String, Value>),
    /// An array of records
    RecordArray(Vec<&'a Map<String, Value>>),
    /// An array of primitives: a single "value" column
    ScalarArray(&'a [Value]),
}

/// Record-to-delimited engine
pub struct JsonEngine {
    config: JsonToCsvConfig,
}

impl JsonEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: JsonToCsvConfig) -> Self {
        Self { config }
    }

    /// Convert a structured value into delimited text
    pub fn convert(&self, value: &Value) -> ConversionResult<ConversionOutput> {
        self.convert_with_progress(value, |_| {})
    }

    /// Convert with a progress callback invoked after each row chunk.
    ///
    /// The column set is computed up front; batching changes nothing about
    /// the output text.
    pub fn convert_with_progress<F>(
        &self,
        value: &Value,
        mut progress: F,
    ) -> ConversionResult<ConversionOutput>
    where
        F: FnMut(ChunkProgress),
    {
        self.config.validate().map_err(|message| {
            ConversionError::conversion(ConversionErrorKind::configuration(message))
        })?;

        let mut detector = CircularRefDetector::new(STRUCTURE_DEPTH_LIMIT);
        detector.detect(value).map_err(|e| {
            ConversionError::conversion(ConversionErrorKind::circular_reference(e.to_string()))
        })?;

        let shape = self.classify(value)?;
        let mut warnings = Vec::new();

        let (columns, rows) = match &shape {
            InputShape::SingleRecord(record) => {
                let columns = self.compute_columns(&[*record]);
                let rows = vec![self.format_record(record, &columns)];
                (columns, rows)
            }
            InputShape::RecordArray(records) => {
                let columns = self.compute_columns(records);
                self.check_key_consistency(records, &columns, &mut warnings);

                let total_rows = records.len();
                let mut processed = 0usize;
                let mut rows = Vec::with_capacity(total_rows);
                for chunk in records.chunks(self.config.chunk_size) {
                    for record in chunk {
                        rows.push(self.format_record(record, &columns));
                    }
                    processed += chunk.len();
                    progress(ChunkProgress {
                        processed_rows: processed,
                        total_rows,
                    });
                }
                (columns, rows)
            }
            InputShape::ScalarArray(items) => {
                let columns = vec!["value".to_string()];
                let quotes = self.quote_engine();
                let rows = items
                    .iter()
                    .map(|item| {
                        quotes.escape(&value_to_field(item, self.config.flatten_objects))
                    })
                    .collect();
                (columns, rows)
            }
        };

        let quotes = self.quote_engine();
        let delimiter = self.config.delimiter.to_string();
        let mut lines = Vec::with_capacity(rows.len() + 1);
        if self.config.include_headers {
            let header = columns
                .iter()
                .map(|name| quotes.escape(name))
                .collect::<Vec<_>>()
                .join(&delimiter);
            lines.push(header);
        }
        lines.extend(rows);

        let row_count = lines.len() - usize::from(self.config.include_headers);
        let content = lines.join(self.config.line_ending.as_str());

        Ok(ConversionOutput {
            content,
            value: value.clone(),
            row_count,
            column_count: columns.len(),
            warnings,
        })
    }

    /// Decide the input shape once, rejecting top-level scalars
    fn classify<'a>(&self, value: &'a Value) -> ConversionResult<InputShape<'a>> {
        match value {
            Value::Object(record) => {
                if record.is_empty() {
                    return Err(ConversionError::conversion(ConversionErrorKind::NoDataRows));
                }
                Ok(InputShape::SingleRecord(record))
            }
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(ConversionError::conversion(ConversionErrorKind::NoDataRows));
                }
                if items.iter().all(|item| item.is_object()) {
                    let records = items
                        .iter()
                        .filter_map(|item| item.as_object())
                        .collect();
                    Ok(InputShape::RecordArray(records))
                } else {
                    Ok(InputShape::ScalarArray(items))
                }
            }
            other => Err(ConversionError::conversion(
                ConversionErrorKind::unsupported_shape(value_kind(other)),
            )),
        }
    }

    /// Compute the column set: custom headers override outright, otherwise
    /// a plain or flattened key union in first-appearance order
    fn compute_columns(&self, records: &[&Map<String, Value>]) -> Vec<String> {
        if let Some(custom) = &self.config.custom_headers {
            return custom.clone();
        }

        if self.config.flatten_objects {
            flattened_key_union(
                records,
                &self.config.nesting_separator,
                self.config.max_nesting_depth,
            )
        } else {
            key_union(records)
        }
    }

    /// Format one record into an escaped, delimiter-joined row
    fn format_record(&self, record: &Map<String, Value>, columns: &[String]) -> String {
        let quotes = self.quote_engine();
        let delimiter = self.config.delimiter.to_string();

        columns
            .iter()
            .map(|column| {
                let value = if self.config.flatten_objects {
                    lookup_path(record, column, &self.config.nesting_separator)
                } else {
                    record.get(column)
                };
                // Missing keys render as empty fields, same as null
                let text = value
                    .map(|v| value_to_field(v, self.config.flatten_objects))
                    .unwrap_or_default();
                quotes.escape(&text)
            })
            .collect::<Vec<_>>()
            .join(&delimiter)
    }

    /// Warn about columns missing from some records
    fn check_key_consistency(
        &self,
        records: &[&Map<String, Value>],
        columns: &[String],
        warnings: &mut Vec<Warning>,
    ) {
        if records.len() < 2 || self.config.custom_headers.is_some() {
            return;
        }

        let missing: Vec<String> = columns
            .iter()
            .filter(|column| {
                !records.iter().all(|record| {
                    if self.config.flatten_objects {
                        lookup_path(record, column, &self.config.nesting_separator).is_some()
                    } else {
                        record.contains_key(*column)
                    }
                })
            })
            .cloned()
            .collect();

        if !missing.is_empty() {
            warnings.push(Warning::InconsistentRecordKeys { keys: missing });
        }
    }

    fn quote_engine(&self) -> QuoteEngine {
        QuoteEngine::new(self.config.delimiter, self.config.quote_char)
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert a structured value to delimited text with the given configuration
pub fn records_to_delimited(
    value: &Value,
    config: &JsonToCsvConfig,
) -> ConversionResult<ConversionOutput> {
    let engine = JsonEngine::new(config.clone());
    engine.convert(value)
}
