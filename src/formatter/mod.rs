//! Delimited-output formatting
//!
//! Field escaping and key flattening used by the record-to-delimited engine.

pub mod flatten;
pub mod quotes;

pub use flatten::{flatten_keys, insert_nested, lookup_path};
pub use quotes::QuoteEngine;
