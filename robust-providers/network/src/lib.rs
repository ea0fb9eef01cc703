//! Loaders for the tabular inputs of a ROBUST run.
//!
//! * [`read_network`] parses a tab-separated edge list whose first row is a
//!   header; the first two columns of each row name an edge.
//! * [`read_seeds`] parses a seed list, keeping the first tab-separated
//!   column of each non-blank row.
//! * [`read_bias`] parses a comma-separated study-bias table keyed by a
//!   `gene` column.
//!
//! Each reader has a `load_*` counterpart that opens a file and attaches its
//! path to I/O errors.

mod bias;
mod edge_list;
mod error;
mod seeds;

use std::{
    fs::File,
    io::BufReader,
    path::Path,
};

pub use bias::{BIAS_KEY_COLUMN, read_bias};
pub use edge_list::read_network;
pub use error::NetworkProviderError;
pub use seeds::read_seeds;

use robust_core::{BiasWeights, Network};

fn open(path: &Path) -> Result<BufReader<File>, NetworkProviderError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| NetworkProviderError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Reads a network from the edge-list file at `path`.
///
/// # Errors
/// Returns [`NetworkProviderError::Io`] if the file cannot be opened and any
/// error reported by [`read_network`].
pub fn load_network(path: &Path) -> Result<Network, NetworkProviderError> {
    read_network(open(path)?).map_err(|err| err.with_path(path))
}

/// Reads seed labels from the file at `path`.
///
/// # Errors
/// Returns [`NetworkProviderError::Io`] if the file cannot be opened and any
/// error reported by [`read_seeds`].
pub fn load_seeds(path: &Path) -> Result<Vec<String>, NetworkProviderError> {
    read_seeds(open(path)?).map_err(|err| err.with_path(path))
}

/// Reads the `column` of the bias table at `path`.
///
/// # Errors
/// Returns [`NetworkProviderError::Io`] if the file cannot be opened and any
/// error reported by [`read_bias`].
pub fn load_bias(path: &Path, column: &str) -> Result<BiasWeights, NetworkProviderError> {
    read_bias(open(path)?, column).map_err(|err| err.with_path(path))
}
