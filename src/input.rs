// src/input.rs
use anyhow::{Context, Result};
use std::path::Path;

/// Read the job URL list: one URL per line, blank lines ignored,
/// surrounding whitespace trimmed. Order is preserved.
pub fn read_job_links(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read url list: {}", path.display()))?;

    Ok(parse_job_links(&content))
}

fn parse_job_links(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
