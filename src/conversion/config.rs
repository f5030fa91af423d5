//! Configuration options for the two conversion engines
//!
//! Both configuration types are closed: every option is enumerated here, so
//! unknown settings cannot be smuggled in. Engines take one configuration
//! value at construction and hold no other state, which makes an engine safe
//! to reuse across conversions.

use crate::parser::coerce::{CoerceOptions, ColumnType};
use std::collections::HashMap;

/// Line ending used for delimited output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// Unix line endings (\n)
    Lf,
    /// Windows line endings (\r\n)
    CrLf,
}

impl LineEnding {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Top-level wrapper for structured output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A JSON array of records
    Array,
    /// A JSON object keyed by row index ("0", "1", ...)
    Object,
}

/// Options for the delimited-to-record direction
#[derive(Debug, Clone)]
pub struct CsvToJsonConfig {
    /// Fixed delimiter; `None` means auto-detect
    pub delimiter: Option<char>,
    /// Treat the first row as the header
    pub has_headers: bool,
    /// Trim whitespace from fields before coercion
    pub trim_values: bool,
    /// Coerce numeric-looking fields to numbers
    pub parse_numbers: bool,
    /// Coerce `true`/`false` fields to booleans
    pub parse_booleans: bool,
    /// Coerce empty and `null`/`NULL` fields to null
    pub parse_nulls: bool,
    /// Override computed column names
    pub custom_headers: Option<Vec<String>>,
    /// Rename columns (original header -> output key)
    pub header_mapping: Option<HashMap<String, String>>,
    /// Drop blank lines instead of producing empty rows
    pub skip_empty_lines: bool,
    /// Forced per-column types, keyed by original header
    pub column_types: HashMap<String, ColumnType>,
    /// Expand separator-delimited keys into nested objects
    pub nested_output: bool,
    /// Path separator for nested output
    pub nesting_separator: String,
    /// Shape of the structured output
    pub output_format: OutputFormat,
    /// Pretty-print the structured output
    pub pretty: bool,
    /// Rows per processing chunk (progress reporting only)
    pub chunk_size: usize,
    /// Skip malformed lines with a diagnostic instead of failing
    pub skip_malformed_lines: bool,
    /// Keep fields beyond the header width under synthesized column names
    /// instead of truncating them
    pub keep_extra_columns: bool,
}

impl Default for CsvToJsonConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_headers: true,
            trim_values: true,
            parse_numbers: true,
            parse_booleans: true,
            parse_nulls: true,
            custom_headers: None,
            header_mapping: None,
            skip_empty_lines: true,
            column_types: HashMap::new(),
            nested_output: false,
            nesting_separator: ".".to_string(),
            output_format: OutputFormat::Array,
            pretty: true,
            chunk_size: 1000,
            skip_malformed_lines: false,
            keep_extra_columns: false,
        }
    }
}

impl CsvToJsonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a fixed delimiter instead of auto-detecting
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub fn with_custom_headers(mut self, headers: Vec<String>) -> Self {
        self.custom_headers = Some(headers);
        self
    }

    pub fn with_header_mapping(mut self, mapping: HashMap<String, String>) -> Self {
        self.header_mapping = Some(mapping);
        self
    }

    pub fn with_column_types(mut self, types: HashMap<String, ColumnType>) -> Self {
        self.column_types = types;
        self
    }

    pub fn with_nested_output(mut self, nested: bool) -> Self {
        self.nested_output = nested;
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Coercion toggles for the field coercion chain
    pub fn coerce_options(&self) -> CoerceOptions {
        CoerceOptions {
            trim_values: self.trim_values,
            parse_numbers: self.parse_numbers,
            parse_booleans: self.parse_booleans,
            parse_nulls: self.parse_nulls,
        }
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Chunk size must be at least 1".to_string());
        }
        if self.nesting_separator.is_empty() {
            return Err("Nesting separator must not be empty".to_string());
        }
        if self.delimiter == Some('"') {
            return Err("Delimiter must not be the quote character".to_string());
        }
        Ok(())
    }
}

/// Options for the record-to-delimited direction
#[derive(Debug, Clone)]
pub struct JsonToCsvConfig {
    /// Output delimiter
    pub delimiter: char,
    /// Descend into nested objects, joining keys with the separator
    pub flatten_objects: bool,
    /// Path separator for flattened keys
    pub nesting_separator: String,
    /// Depth limit for flattening; a sub-object at the limit is kept whole
    pub max_nesting_depth: usize,
    /// Override the computed column order outright
    pub custom_headers: Option<Vec<String>>,
    /// Emit the header row
    pub include_headers: bool,
    /// Line ending for the output
    pub line_ending: LineEnding,
    /// Quote character for field escaping
    pub quote_char: char,
    /// Rows per processing chunk (progress reporting only)
    pub chunk_size: usize,
}

impl Default for JsonToCsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            flatten_objects: true,
            nesting_separator: ".".to_string(),
            max_nesting_depth: 3,
            custom_headers: None,
            include_headers: true,
            line_ending: LineEnding::Lf,
            quote_char: '"',
            chunk_size: 1000,
        }
    }
}

impl JsonToCsvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_flatten_objects(mut self, flatten: bool) -> Self {
        self.flatten_objects = flatten;
        self
    }

    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    pub fn with_custom_headers(mut self, headers: Vec<String>) -> Self {
        self.custom_headers = Some(headers);
        self
    }

    pub fn with_include_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validate configuration consistency
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("Chunk size must be at least 1".to_string());
        }
        if self.max_nesting_depth == 0 {
            return Err("Max nesting depth must be at least 1".to_string());
        }
        if self.nesting_separator.is_empty() {
            return Err("Nesting separator must not be empty".to_string());
        }
        if self.delimiter == self.quote_char {
            return Err("Delimiter and quote character must differ".to_string());
        }
        Ok(())
    }
}
