// src/stream/pattern.rs

use regex::Regex;

use crate::errors::{Result, StreammonError};

/// Pattern used when none is configured: matches every line.
pub const MATCH_ALL: &str = ".*";

/// Compile a stream's match pattern.
///
/// Called at stream construction so that a malformed pattern is rejected
/// before any line is read.
pub fn compile_pattern(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| StreammonError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}
