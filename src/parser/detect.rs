//! Heuristic delimiter detection
//!
//! Samples the first few non-blank lines and scores a fixed candidate set by
//! how consistently each candidate's quote-aware occurrence count matches the
//! first sampled line.

use crate::parser::tokenizer::count_delimiter_occurrences;

/// Candidate delimiters, in tie-break priority order
pub const DELIMITER_CANDIDATES: [char; 4] = [',', ';', '\t', '|'];

/// Number of non-blank lines sampled for detection
const SAMPLE_LINES: usize = 5;

/// Detect the delimiter used by a text sample.
///
/// For each candidate, the quote-aware occurrence count is computed per
/// sampled line. Candidates that do not appear on the first line are
/// rejected. The remaining candidates are ranked by the fraction of lines
/// whose count equals the first line's count; ties go to the earliest
/// candidate in [`DELIMITER_CANDIDATES`]. Returns `None` when no candidate
/// qualifies, which callers must surface as a detection failure rather than
/// defaulting silently.
pub fn detect_delimiter(text: &str) -> Option<char> {
    let sample: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .take(SAMPLE_LINES)
        .collect();

    if sample.is_empty() {
        return None;
    }

    let mut best: Option<(char, f64)> = None;

    for &candidate in DELIMITER_CANDIDATES.iter() {
        let first_count = count_delimiter_occurrences(sample[0], candidate);
        if first_count == 0 {
            continue;
        }

        let matching = sample
            .iter()
            .filter(|line| count_delimiter_occurrences(line, candidate) == first_count)
            .count();
        let consistency = matching as f64 / sample.len() as f64;

        if consistency <= 0.0 {
            continue;
        }

        // Strictly-greater keeps the earliest candidate on ties
        match best {
            Some((_, best_score)) if consistency <= best_score => {}
            _ => best = Some((candidate, consistency)),
        }
    }

    best.map(|(delimiter, _)| delimiter)
}
