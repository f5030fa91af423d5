//! Delimited-to-record conversion engine
//!
//! Orchestrates delimiter resolution, logical-line assembly, tokenization,
//! header resolution, row normalization, value coercion, and optional key
//! nesting. One call fully consumes its input and returns either a complete
//! result or a failure; warnings accumulate locally per call.

use crate::conversion::config::{CsvToJsonConfig, OutputFormat};
use crate::conversion::{ChunkProgress, ConversionOutput, ConversionResult, Warning};
use crate::error::{ConversionError, ConversionErrorKind};
use crate::formatter::flatten::insert_nested;
use crate::parser::coerce::coerce_field;
use crate::parser::detect::detect_delimiter;
use crate::parser::strip_bom;
use crate::parser::tokenizer::tokenize_line;
use serde_json::{Map, Value};

/// One tokenized data row, tagged with its starting physical line
#[derive(Debug)]
struct RawRow {
    line: usize,
    fields: Vec<String>,
}

/// Delimited-to-record engine
pub struct CsvEngine {
    config: CsvToJsonConfig,
}

impl CsvEngine {
    /// Create a new engine with the given configuration
    pub fn new(config: CsvToJsonConfig) -> Self {
        Self { config }
    }

    /// Convert delimited text into structured records
    pub fn convert(&self, text: &str) -> ConversionResult<ConversionOutput> {
        self.convert_with_progress(text, |_| {})
    }

    /// Convert with a progress callback invoked after each row chunk.
    ///
    /// Chunking exists purely for progress reporting; the output is
    /// identical to single-pass processing.
    pub fn convert_with_progress<F>(
        &self,
        text: &str,
        mut progress: F,
    ) -> ConversionResult<ConversionOutput>
    where
        F: FnMut(ChunkProgress),
    {
        self.config.validate().map_err(|message| {
            ConversionError::conversion(ConversionErrorKind::configuration(message))
        })?;

        let text = strip_bom(text);
        if text.trim().is_empty() {
            return Err(ConversionError::conversion(ConversionErrorKind::EmptyInput));
        }

        let delimiter = match self.config.delimiter {
            Some(delimiter) => delimiter,
            None => detect_delimiter(text).ok_or_else(|| {
                ConversionError::conversion(ConversionErrorKind::DelimiterDetectionFailed)
            })?,
        };

        let mut warnings = Vec::new();
        let rows = self.assemble_rows(text, delimiter, &mut warnings)?;
        if rows.is_empty() {
            return Err(ConversionError::conversion(ConversionErrorKind::NoDataRows));
        }

        let data_start = usize::from(self.config.has_headers);
        let data_rows = &rows[data_start..];
        if data_rows.is_empty() {
            return Err(ConversionError::conversion(ConversionErrorKind::NoDataRows));
        }

        let header_row = self.config.has_headers.then(|| rows[0].fields.as_slice());
        let (names, expected_width) = self.resolve_columns(header_row, data_rows);

        let total_rows = data_rows.len();
        let mut processed = 0usize;
        let mut records: Vec<Map<String, Value>> = Vec::with_capacity(total_rows);

        for chunk in data_rows.chunks(self.config.chunk_size) {
            for row in chunk {
                records.push(self.build_record(row, &names, expected_width, &mut warnings));
            }
            processed += chunk.len();
            progress(ChunkProgress {
                processed_rows: processed,
                total_rows,
            });
        }

        let row_count = records.len();
        let value = match self.config.output_format {
            OutputFormat::Array => {
                Value::Array(records.into_iter().map(Value::Object).collect())
            }
            OutputFormat::Object => {
                let mut wrapper = Map::new();
                for (index, record) in records.into_iter().enumerate() {
                    wrapper.insert(index.to_string(), Value::Object(record));
                }
                Value::Object(wrapper)
            }
        };

        let content = if self.config.pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
        .map_err(|e| ConversionError::other(e.into()))?;

        Ok(ConversionOutput {
            content,
            value,
            row_count,
            column_count: names.len(),
            warnings,
        })
    }

    /// Assemble logical rows, joining physical lines across unterminated
    /// quoted fields with an embedded newline.
    fn assemble_rows(
        &self,
        text: &str,
        delimiter: char,
        warnings: &mut Vec<Warning>,
    ) -> ConversionResult<Vec<RawRow>> {
        let mut rows = Vec::new();
        let mut pending: Option<(usize, String)> = None;

        for (index, physical) in text.lines().enumerate() {
            let line_number = index + 1;
            let (start, logical) = match pending.take() {
                Some((start, mut buffered)) => {
                    buffered.push('\n');
                    buffered.push_str(physical);
                    (start, buffered)
                }
                None => {
                    if physical.trim().is_empty() && self.config.skip_empty_lines {
                        continue;
                    }
                    (line_number, physical.to_string())
                }
            };

            let tokenized = tokenize_line(&logical, delimiter);
            if tokenized.unterminated {
                pending = Some((start, logical));
                continue;
            }

            rows.push(RawRow {
                line: start,
                fields: tokenized.fields,
            });
        }

        // Input ended inside an open quoted field
        if let Some((start, _)) = pending {
            if self.config.skip_malformed_lines {
                warnings.push(Warning::SkippedMalformedLine { line: start });
            } else {
                return Err(ConversionError::conversion(
                    ConversionErrorKind::MalformedQuoting { line: start },
                ));
            }
        }

        Ok(rows)
    }

    /// Resolve the column set: header row, custom headers, or synthesized
    /// `column1..N` names. Returns the names and the expected row width
    /// used for consistency warnings.
    fn resolve_columns(
        &self,
        header_row: Option<&[String]>,
        data_rows: &[RawRow],
    ) -> (Vec<String>, usize) {
        let mut names: Vec<String> = match (&self.config.custom_headers, header_row) {
            (Some(custom), _) => custom.clone(),
            (None, Some(header)) => header
                .iter()
                .map(|name| {
                    if self.config.trim_values {
                        name.trim().to_string()
                    } else {
                        name.clone()
                    }
                })
                .collect(),
            (None, None) => Vec::new(),
        };

        let max_row_len = data_rows.iter().map(|row| row.fields.len()).max().unwrap_or(0);

        if names.is_empty() {
            names = (1..=max_row_len).map(|i| format!("column{}", i)).collect();
        }

        let expected_width = names.len();

        if self.config.keep_extra_columns {
            while names.len() < max_row_len {
                names.push(format!("column{}", names.len() + 1));
            }
        }

        (names, expected_width)
    }

    /// Build one record: normalize the row to the column set, coerce each
    /// field, apply header renaming, and optionally nest dotted keys.
    fn build_record(
        &self,
        row: &RawRow,
        names: &[String],
        expected_width: usize,
        warnings: &mut Vec<Warning>,
    ) -> Map<String, Value> {
        if row.fields.len() != expected_width {
            warnings.push(Warning::InconsistentColumnCount {
                line: row.line,
                expected: expected_width,
                found: row.fields.len(),
            });
        }

        if row.fields.iter().all(|field| field.trim().is_empty()) {
            warnings.push(Warning::EmptyRow { line: row.line });
        }

        let opts = self.config.coerce_options();
        let mut record = Map::new();

        for (index, name) in names.iter().enumerate() {
            // Short rows pad with Null regardless of coercion toggles
            let value = match row.fields.get(index) {
                Some(raw) => {
                    coerce_field(raw, self.config.column_types.get(name).copied(), &opts)
                }
                None => Value::Null,
            };

            let key = self
                .config
                .header_mapping
                .as_ref()
                .and_then(|mapping| mapping.get(name))
                .cloned()
                .unwrap_or_else(|| name.clone());

            if self.config.nested_output && key.contains(&self.config.nesting_separator) {
                insert_nested(&mut record, &key, &self.config.nesting_separator, value);
            } else {
                record.insert(key, value);
            }
        }

        record
    }
}

/// Convert delimited text to records with the given configuration
pub fn csv_to_records(
    text: &str,
    config: &CsvToJsonConfig,
) -> ConversionResult<ConversionOutput> {
    let engine = CsvEngine::new(config.clone());
    engine.convert(text)
}
