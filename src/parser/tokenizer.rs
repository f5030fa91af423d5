//! Quote-aware field tokenizer for delimited lines
//!
//! Splits one logical line of delimited text into raw field strings. The
//! scanner is a single-pass state machine with one boolean state (`in_quotes`)
//! and the following transitions:
//!
//! - `"` outside quotes enters a quoted span
//! - `""` inside quotes emits a literal `"`
//! - `"` inside quotes (not doubled) exits the quoted span
//! - the delimiter outside quotes closes the current field
//! - `\` followed by the delimiter, outside quotes, emits a literal delimiter
//! - anything else is appended to the current field
//!
//! A line that ends while still inside a quoted span is reported as
//! unterminated so the caller can join it with the following physical line.

pub const QUOTE: char = '"';

/// Result of tokenizing one line
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedLine {
    /// Raw field strings, quoting and escapes already resolved
    pub fields: Vec<String>,
    /// The line ended inside an open quoted span
    pub unterminated: bool,
}

/// Tokenize one logical line into raw field strings
pub fn tokenize_line(line: &str, delimiter: char) -> TokenizedLine {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if in_quotes {
            if ch == QUOTE {
                if chars.peek() == Some(&QUOTE) {
                    // Escaped quote inside a quoted field
                    current.push(QUOTE);
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(ch);
            }
        } else if ch == QUOTE {
            in_quotes = true;
        } else if ch == '\\' && chars.peek() == Some(&delimiter) {
            // Backslash-escaped delimiter outside quotes
            current.push(delimiter);
            chars.next();
        } else if ch == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
    }

    fields.push(current);

    TokenizedLine {
        fields,
        unterminated: in_quotes,
    }
}

/// Count quote characters that are not doubled (i.e. not `""` escapes).
///
/// An odd count means the quote state at end of line is unreliable, which
/// the recovery layer treats as malformed quoting.
pub fn count_unescaped_quotes(line: &str) -> usize {
    let mut count = 0;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == QUOTE {
            if chars.peek() == Some(&QUOTE) {
                chars.next();
            } else {
                count += 1;
            }
        }
    }

    count
}

/// Count occurrences of a candidate delimiter outside quoted spans.
///
/// Quoting toggles on each unescaped quote character; occurrences inside a
/// quoted span are not counted.
pub fn count_delimiter_occurrences(line: &str, delimiter: char) -> usize {
    let mut count = 0;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == QUOTE {
            if in_quotes && chars.peek() == Some(&QUOTE) {
                chars.next();
            } else {
                in_quotes = !in_quotes;
            }
        } else if ch == delimiter && !in_quotes {
            count += 1;
        }
    }

    count
}
