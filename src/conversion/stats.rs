//! Per-conversion statistics
//!
//! Collected around an engine call and rendered for the CLI's `--stats`
//! output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Direction of a conversion run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Delimited text to structured records
    CsvToJson,
    /// Structured records to delimited text
    JsonToCsv,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::CsvToJson => "csv -> json",
            Direction::JsonToCsv => "json -> csv",
        }
    }
}

/// Statistics for one conversion run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionStats {
    pub direction: Direction,
    pub input_bytes: usize,
    pub output_bytes: usize,
    pub row_count: usize,
    pub column_count: usize,
    pub warning_count: usize,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl ConversionStats {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            input_bytes: 0,
            output_bytes: 0,
            row_count: 0,
            column_count: 0,
            warning_count: 0,
            duration: Duration::ZERO,
            completed_at: Utc::now(),
        }
    }

    /// Size change relative to the input, as a percentage
    pub fn size_change_percent(&self) -> f64 {
        if self.input_bytes == 0 {
            return 0.0;
        }
        let input = self.input_bytes as f64;
        let output = self.output_bytes as f64;
        (output - input) / input * 100.0
    }

    /// Human-readable multi-line summary
    pub fn summary(&self) -> String {
        format!(
            "Direction:  {}\nRows:       {}\nColumns:    {}\nInput:      {} bytes\nOutput:     {} bytes ({:+.1}%)\nWarnings:   {}\nDuration:   {:.2?}\nFinished:   {}",
            self.direction.as_str(),
            self.row_count,
            self.column_count,
            self.input_bytes,
            self.output_bytes,
            self.size_change_percent(),
            self.warning_count,
            self.duration,
            self.completed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        )
    }
}
