use std::io::BufRead;

use robust_core::BiasWeights;
use tracing::{debug, info};

use crate::NetworkProviderError;

/// Header of the column holding vertex labels.
pub const BIAS_KEY_COLUMN: &str = "gene";

fn column_position(header: &str, column: &str) -> Result<usize, NetworkProviderError> {
    header
        .split(',')
        .position(|name| name.trim() == column)
        .ok_or_else(|| NetworkProviderError::MissingColumn {
            column: column.to_owned(),
        })
}

/// Parses a comma-separated bias table, reading weights from `column`.
///
/// The header must contain [`BIAS_KEY_COLUMN`] and `column`. Rows whose bias
/// cell is empty are skipped, so those vertices fall back to the default
/// weight of [`BiasWeights`].
///
/// # Errors
/// Returns [`NetworkProviderError::MissingColumn`] when either column is
/// absent, [`NetworkProviderError::Malformed`] for short rows,
/// [`NetworkProviderError::InvalidBias`] for unparsable or non-finite cells,
/// [`NetworkProviderError::EmptyInput`] when the header is missing, and
/// [`NetworkProviderError::Read`] on I/O failure.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use robust_providers_network::read_bias;
///
/// let table = "gene,bait_usage,study_attention\nTP53,40,900\nBRCA1,12,310\n";
/// let weights = read_bias(Cursor::new(table), "bait_usage")?;
/// assert_eq!(weights.weight("TP53"), 40.0);
/// assert_eq!(weights.weight("unlisted"), 1.0);
/// # Ok::<(), robust_providers_network::NetworkProviderError>(())
/// ```
pub fn read_bias<R: BufRead>(reader: R, column: &str) -> Result<BiasWeights, NetworkProviderError> {
    let mut lines = reader.lines();
    let header = lines.next().ok_or(NetworkProviderError::EmptyInput)??;
    let key_at = column_position(&header, BIAS_KEY_COLUMN)?;
    let value_at = column_position(&header, column)?;
    let expected = key_at.max(value_at) + 1;

    let mut entries = Vec::new();
    let mut skipped = 0_usize;
    for (index, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_no = index + 2;
        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        let (Some(&label), Some(&raw)) = (cells.get(key_at), cells.get(value_at)) else {
            return Err(NetworkProviderError::Malformed {
                line: line_no,
                expected,
            });
        };
        if raw.is_empty() {
            skipped += 1;
            continue;
        }
        let value = raw
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| NetworkProviderError::InvalidBias {
                line: line_no,
                value: raw.to_owned(),
            })?;
        entries.push((label.to_owned(), value));
    }
    if skipped > 0 {
        debug!(skipped, column, "bias rows without a value");
    }
    let weights = BiasWeights::new(entries);
    info!(entries = weights.len(), column, "bias table loaded");
    Ok(weights)
}
