use std::io::BufRead;

use robust_core::Network;
use tracing::{debug, info};

use crate::NetworkProviderError;

/// Parses a tab-separated edge list into a [`Network`].
///
/// The first line is a header and is skipped. Blank lines are ignored, extra
/// columns are ignored, and labels are trimmed. Self-loops and repeated
/// edges collapse as in [`Network::add_edge`].
///
/// # Errors
/// Returns [`NetworkProviderError::Malformed`] for a row with fewer than two
/// columns, [`NetworkProviderError::EmptyInput`] when no edge rows follow the
/// header, and [`NetworkProviderError::Read`] on I/O failure.
///
/// # Examples
/// ```
/// use std::io::Cursor;
///
/// use robust_providers_network::read_network;
///
/// let network = read_network(Cursor::new("from\tto\na\tb\nb\tc\tscore\n"))?;
/// assert_eq!(network.vertex_count(), 3);
/// assert_eq!(network.edge_count(), 2);
/// # Ok::<(), robust_providers_network::NetworkProviderError>(())
/// ```
pub fn read_network<R: BufRead>(reader: R) -> Result<Network, NetworkProviderError> {
    let mut network = Network::new();
    let mut rows = 0_usize;
    let mut collapsed = 0_usize;
    for (index, line) in reader.lines().enumerate().skip(1) {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let mut columns = line.split('\t').map(str::trim);
        let (Some(left), Some(right)) = (columns.next(), columns.next()) else {
            return Err(NetworkProviderError::Malformed {
                line: index + 1,
                expected: 2,
            });
        };
        if left.is_empty() || right.is_empty() {
            return Err(NetworkProviderError::Malformed {
                line: index + 1,
                expected: 2,
            });
        }
        rows += 1;
        if !network.add_edge(left, right) {
            collapsed += 1;
        }
    }
    if rows == 0 {
        return Err(NetworkProviderError::EmptyInput);
    }
    if collapsed > 0 {
        debug!(collapsed, "skipped self-loops and repeated edges");
    }
    info!(
        vertices = network.vertex_count(),
        edges = network.edge_count(),
        "network loaded"
    );
    Ok(network)
}
