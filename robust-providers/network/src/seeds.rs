use std::{collections::HashSet, io::BufRead};

use tracing::info;

use crate::NetworkProviderError;

/// Parses seed labels, one per line.
///
/// Only the first tab-separated column is used. Blank lines are skipped and
/// repeated labels are kept once, in first-seen order.
///
/// # Errors
/// Returns [`NetworkProviderError::EmptyInput`] when no label is found and
/// [`NetworkProviderError::Read`] on I/O failure.
pub fn read_seeds<R: BufRead>(reader: R) -> Result<Vec<String>, NetworkProviderError> {
    let mut seen = HashSet::new();
    let mut seeds = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let label = line.split('\t').next().unwrap_or_default().trim();
        if label.is_empty() || seen.contains(label) {
            continue;
        }
        seen.insert(label.to_owned());
        seeds.push(label.to_owned());
    }
    if seeds.is_empty() {
        return Err(NetworkProviderError::EmptyInput);
    }
    info!(seeds = seeds.len(), "seeds loaded");
    Ok(seeds)
}
