//! Input handling and low-level text parsing

pub mod coerce;
pub mod detect;
pub mod tokenizer;

use crate::error::{ConversionError, ConversionResult};
use std::io::Read;
use std::path::PathBuf;

/// Types of input sources
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// Raw text input
    String(String),
    /// Single file path
    File(PathBuf),
    /// Directory containing multiple convertible files
    Directory(PathBuf),
    /// Standard input stream
    Stdin,
}

impl InputSource {
    /// Get a human-readable description of the source
    pub fn description(&self) -> String {
        match self {
            InputSource::String(_) => "string input".to_string(),
            InputSource::File(path) => format!("file: {}", path.display()),
            InputSource::Directory(path) => format!("directory: {}", path.display()),
            InputSource::Stdin => "standard input".to_string(),
        }
    }

    /// Check if the source exists and is accessible
    pub fn exists(&self) -> bool {
        match self {
            InputSource::String(_) => true,
            InputSource::File(path) => path.exists() && path.is_file(),
            InputSource::Directory(path) => path.exists() && path.is_dir(),
            InputSource::Stdin => true,
        }
    }

    /// Get the estimated size of the source in bytes (if known)
    pub fn estimated_size(&self) -> Option<u64> {
        match self {
            InputSource::String(s) => Some(s.len() as u64),
            InputSource::File(path) => std::fs::metadata(path).ok().map(|m| m.len()),
            InputSource::Directory(_) => None,
            InputSource::Stdin => None,
        }
    }

    /// Read the full content of this source as text
    pub fn read_content(&self) -> ConversionResult<String> {
        match self {
            InputSource::String(content) => Ok(content.clone()),
            InputSource::File(path) => std::fs::read_to_string(path).map_err(|e| {
                ConversionError::conversion(crate::error::ConversionErrorKind::io(
                    format!("failed to read file: {}", e),
                    Some(path.clone()),
                ))
            }),
            InputSource::Stdin => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer).map_err(|e| {
                    ConversionError::conversion(crate::error::ConversionErrorKind::io(
                        format!("failed to read stdin: {}", e),
                        None,
                    ))
                })?;
                Ok(buffer)
            }
            InputSource::Directory(path) => Err(ConversionError::conversion(
                crate::error::ConversionErrorKind::io(
                    "cannot read a directory as a single input".to_string(),
                    Some(path.clone()),
                ),
            )),
        }
    }
}

/// Parse structured (JSON) text into a value.
///
/// Syntax failures carry the line number reported by the parser so callers
/// can point at the offending location.
pub fn parse_structured(content: &str) -> ConversionResult<serde_json::Value> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(ConversionError::conversion(
            crate::error::ConversionErrorKind::EmptyInput,
        ));
    }

    serde_json::from_str(trimmed)
        .map_err(|e| ConversionError::syntax(e.to_string(), Some(e.line())))
}

/// Strip a leading UTF-8 byte-order-mark, if present
pub fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConversionErrorKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_source_descriptions() {
        let source = InputSource::String("a,b".to_string());
        assert!(source.exists());
        assert_eq!(source.description(), "string input");
        assert_eq!(source.estimated_size(), Some(3));
    }

    #[test]
    fn test_file_source_read() {
        let mut tmp = NamedTempFile::new().unwrap();
        writeln!(tmp, "id,name").unwrap();

        let source = InputSource::File(tmp.path().to_path_buf());
        assert!(source.exists());
        assert_eq!(source.read_content().unwrap(), "id,name\n");
    }

    #[test]
    fn test_directory_source_cannot_be_read() {
        let dir = tempfile::tempdir().unwrap();
        let source = InputSource::Directory(dir.path().to_path_buf());
        assert!(source.exists());
        assert!(source.read_content().is_err());
    }

    #[test]
    fn test_parse_structured_valid() {
        let value = parse_structured(r#"{"name": "test", "value": 42}"#).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn test_parse_structured_reports_line() {
        let err = parse_structured("{\n  \"a\": 1,\n  \"b\":\n}").unwrap_err();
        match err.kind() {
            Some(ConversionErrorKind::Syntax { line, .. }) => {
                assert!(line.is_some());
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_structured_empty() {
        let err = parse_structured("   ").unwrap_err();
        assert!(matches!(err.kind(), Some(ConversionErrorKind::EmptyInput)));
    }

    #[test]
    fn test_strip_bom() {
        assert_eq!(strip_bom("\u{feff}a,b"), "a,b");
        assert_eq!(strip_bom("a,b"), "a,b");
    }
}
