//! Reading `requirements.txt` into an ordered list of specifiers.
//!
//! Specifiers are kept as opaque strings: no parsing of names or version
//! constraints, no deduplication.
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

const COMMENT_MARKER: char = '#';

/// Read and filter the requirements file at `path`.
pub fn read_requirements(path: &Path) -> Result<Vec<String>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    Ok(parse_requirements(&content))
}

/// Keep trimmed lines that are neither blank nor comments, in input order.
pub fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_MARKER))
        .map(str::to_string)
        .collect()
}
