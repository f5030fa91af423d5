//! CSV/JSON conversion module
//!
//! This module contains the two conversion engines, their configuration,
//! and per-conversion statistics.

pub mod config;
pub mod csv_engine;
pub mod json_engine;
pub mod stats;

pub use config::{CsvToJsonConfig, JsonToCsvConfig, LineEnding, OutputFormat};
pub use csv_engine::{csv_to_records, CsvEngine};
pub use json_engine::{records_to_delimited, JsonEngine};

use crate::error::ConversionError;
use serde_json::Value;

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;

/// Result of one conversion call
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    /// Serialized output text (JSON or delimited, depending on direction)
    pub content: String,
    /// The parsed value produced (or consumed) by the conversion
    pub value: Value,
    /// Number of data rows
    pub row_count: usize,
    /// Number of columns
    pub column_count: usize,
    /// Non-blocking findings collected during this call
    pub warnings: Vec<Warning>,
}

impl ConversionOutput {
    /// Get the serialized output
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Non-blocking diagnostic attached to a successful conversion
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// A data row's field count differed from the column set
    InconsistentColumnCount {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A row whose fields were all blank or null
    EmptyRow { line: usize },
    /// Keys present in some records but not all
    InconsistentRecordKeys { keys: Vec<String> },
    /// A malformed line dropped under the opt-in recovery policy
    SkippedMalformedLine { line: usize },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::InconsistentColumnCount {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {}: inconsistent column count (expected {}, found {})",
                line, expected, found
            ),
            Warning::EmptyRow { line } => write!(f, "line {}: empty row", line),
            Warning::InconsistentRecordKeys { keys } => write!(
                f,
                "keys present in some records but not all: {}",
                keys.join(", ")
            ),
            Warning::SkippedMalformedLine { line } => {
                write!(f, "line {}: skipped malformed line", line)
            }
        }
    }
}

/// Progress snapshot handed to the chunked-processing callback.
///
/// Chunks are processed strictly in order on the calling thread; the
/// callback only observes progress and must not reconfigure the in-flight
/// conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkProgress {
    pub processed_rows: usize,
    pub total_rows: usize,
}

impl ChunkProgress {
    pub fn fraction(&self) -> f64 {
        if self.total_rows == 0 {
            1.0
        } else {
            self.processed_rows as f64 / self.total_rows as f64
        }
    }
}
