//! Error types and handling infrastructure for CSV/JSON conversion

use anyhow::Error;
use std::path::PathBuf;

/// Core error types for the conversion process
#[derive(Debug, thiserror::Error)]
pub enum ConversionErrorKind {
    #[error("input is empty")]
    EmptyInput,

    #[error("could not detect a delimiter from the input sample")]
    DelimiterDetectionFailed,

    #[error("no data rows found in input")]
    NoDataRows,

    #[error("malformed quoting on line {line}: odd number of unescaped quote characters")]
    MalformedQuoting { line: usize },

    #[error("unsupported input shape: {found} (expected an object or an array)")]
    UnsupportedShape { found: String },

    #[error("circular reference detected: {message}")]
    CircularReference { message: String },

    #[error("syntax error: {message}")]
    Syntax {
        message: String,
        line: Option<usize>,
    },

    #[error("unknown file type: '{extension}'")]
    UnknownFileType { extension: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
    },

    #[error("invalid configuration: {message}")]
    Configuration { message: String },
}

impl ConversionErrorKind {
    pub fn syntax(message: String, line: Option<usize>) -> Self {
        Self::Syntax { message, line }
    }

    pub fn unsupported_shape(found: &str) -> Self {
        Self::UnsupportedShape {
            found: found.to_string(),
        }
    }

    pub fn circular_reference(message: String) -> Self {
        Self::CircularReference { message }
    }

    pub fn io(message: String, path: Option<PathBuf>) -> Self {
        Self::Io { message, path }
    }

    pub fn configuration(message: String) -> Self {
        Self::Configuration { message }
    }
}

/// Main error type for conversion operations
#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("{kind}")]
    Conversion {
        kind: ConversionErrorKind,
        source: Option<anyhow::Error>,
    },

    #[error(transparent)]
    Other(#[from] Error),
}

impl ConversionError {
    pub fn conversion(kind: ConversionErrorKind) -> Self {
        Self::Conversion { kind, source: None }
    }

    pub fn conversion_with_source(kind: ConversionErrorKind, source: anyhow::Error) -> Self {
        Self::Conversion {
            kind,
            source: Some(source),
        }
    }

    pub fn syntax(message: String, line: Option<usize>) -> Self {
        Self::conversion(ConversionErrorKind::syntax(message, line))
    }

    pub fn other(error: Error) -> Self {
        Self::Other(error)
    }

    /// The error kind, when this is a structured conversion error
    pub fn kind(&self) -> Option<&ConversionErrorKind> {
        match self {
            Self::Conversion { kind, .. } => Some(kind),
            Self::Other(_) => None,
        }
    }

    /// Create a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Conversion { kind, .. } => match kind {
                ConversionErrorKind::Syntax { message, line } => {
                    if let Some(line) = line {
                        format!("Syntax error at line {}: {}", line, message)
                    } else {
                        format!("Syntax error: {}", message)
                    }
                }
                ConversionErrorKind::MalformedQuoting { line } => {
                    format!("Malformed quoting on line {}", line)
                }
                ConversionErrorKind::DelimiterDetectionFailed => {
                    "Could not detect a delimiter in the input".to_string()
                }
                ConversionErrorKind::UnsupportedShape { found } => {
                    format!("Unsupported top-level value: {}", found)
                }
                ConversionErrorKind::CircularReference { .. } => {
                    "Circular reference detected in input data".to_string()
                }
                _ => self.to_string(),
            },
            Self::Other(err) => {
                format!("Unexpected error: {}", err)
            }
        }
    }
}

/// Result type for conversion operations
pub type ConversionResult<T> = Result<T, ConversionError>;
