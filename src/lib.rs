//! CSV/JSON converter
//!
//! A Rust library and CLI tool for converting delimited text (CSV, TSV, and
//! friends) to JSON records and back, with delimiter auto-detection, type
//! coercion, and key flattening for nested data.

pub mod cli;
pub mod conversion;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod validation;

// Re-export commonly used types
pub use conversion::{
    csv_to_records, records_to_delimited, ConversionOutput, CsvEngine, CsvToJsonConfig,
    JsonEngine, JsonToCsvConfig, OutputFormat, Warning,
};
pub use error::{ConversionError, ConversionErrorKind, ConversionResult};
pub use parser::detect::detect_delimiter;
pub use parser::InputSource;
pub use validation::{validate_delimited_text, validate_structured_text, ValidationReport};

/// Convert delimited text to JSON with default configuration
pub fn csv_to_json(text: &str) -> Result<String, ConversionError> {
    csv_to_json_with_config(text, &CsvToJsonConfig::default())
}

/// Convert delimited text to JSON with custom configuration
pub fn csv_to_json_with_config(
    text: &str,
    config: &CsvToJsonConfig,
) -> Result<String, ConversionError> {
    let result = csv_to_records(text, config)?;
    Ok(result.content)
}

/// Convert a JSON value to delimited text with default configuration
pub fn json_to_csv(value: &serde_json::Value) -> Result<String, ConversionError> {
    json_to_csv_with_config(value, &JsonToCsvConfig::default())
}

/// Convert a JSON value to delimited text with custom configuration
pub fn json_to_csv_with_config(
    value: &serde_json::Value,
    config: &JsonToCsvConfig,
) -> Result<String, ConversionError> {
    let result = records_to_delimited(value, config)?;
    Ok(result.content)
}
