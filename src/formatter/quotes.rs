//! CSV field quoting
//!
//! A field is quoted only when its content would otherwise be ambiguous:
//! when it contains the delimiter, the quote character, or a line break.
//! Quoting doubles every embedded quote character, so escaped output
//! re-tokenizes to the original string exactly.

/// Field quoting engine for delimited output
pub struct QuoteEngine {
    delimiter: char,
    quote: char,
}

impl QuoteEngine {
    /// Create a new quote engine for the given delimiter and quote character
    pub fn new(delimiter: char, quote: char) -> Self {
        Self { delimiter, quote }
    }

    /// Determine if a field needs quoting
    pub fn needs_quoting(&self, value: &str) -> bool {
        value.contains(self.delimiter)
            || value.contains(self.quote)
            || value.contains('\n')
            || value.contains('\r')
    }

    /// Quote a field, doubling embedded quote characters
    pub fn quote(&self, value: &str) -> String {
        let mut result = String::with_capacity(value.len() + 2);
        result.push(self.quote);
        for ch in value.chars() {
            if ch == self.quote {
                result.push(self.quote);
            }
            result.push(ch);
        }
        result.push(self.quote);
        result
    }

    /// Escape a field for output, quoting only when necessary
    pub fn escape(&self, value: &str) -> String {
        if self.needs_quoting(value) {
            self.quote(value)
        } else {
            value.to_string()
        }
    }
}

/// Convenience function using the standard `"` quote character
pub fn escape_field(value: &str, delimiter: char) -> String {
    QuoteEngine::new(delimiter, '"').escape(value)
}
