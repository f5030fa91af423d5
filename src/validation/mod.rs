//! Advisory validation and structural safety checks

pub mod circular_refs;
pub mod delimited;
pub mod structured;

pub use circular_refs::CircularRefDetector;
pub use delimited::validate_delimited_text;
pub use structured::validate_structured_text;

/// One validation finding, optionally tied to a line
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub line: Option<usize>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(message: String) -> Self {
        Self {
            line: None,
            message,
        }
    }

    pub fn at_line(line: usize, message: String) -> Self {
        Self {
            line: Some(line),
            message,
        }
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(line) = self.line {
            write!(f, "line {}: {}", line, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

/// Advisory report produced by the validators.
///
/// Errors mean conversion of the same input would fail; warnings never
/// block a conversion.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, issue: ValidationIssue) {
        self.errors.push(issue);
    }

    pub fn warning(&mut self, issue: ValidationIssue) {
        self.warnings.push(issue);
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}
