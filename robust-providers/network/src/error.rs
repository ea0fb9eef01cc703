use std::{
    io,
    path::{Path, PathBuf},
};

use thiserror::Error;

/// Errors raised while loading networks, seeds, or bias tables.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NetworkProviderError {
    /// Opening or reading a file failed.
    #[error("failed to read `{}`", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying failure.
        #[source]
        source: io::Error,
    },
    /// Reading from an in-memory or borrowed reader failed.
    #[error("i/o error: {0}")]
    Read(#[from] io::Error),
    /// A row had fewer columns than required.
    #[error("line {line}: expected at least {expected} columns")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// Minimum number of columns.
        expected: usize,
    },
    /// The input contained a header but no data rows.
    #[error("input contains no data rows")]
    EmptyInput,
    /// The bias table header lacks a required column.
    #[error("column `{column}` not found in bias table header")]
    MissingColumn {
        /// Column that was requested.
        column: String,
    },
    /// A bias cell did not parse as a finite number.
    #[error("line {line}: bias value `{value}` is not a finite number")]
    InvalidBias {
        /// One-based line number.
        line: usize,
        /// Raw cell contents.
        value: String,
    },
}

impl NetworkProviderError {
    /// Replaces a pathless read failure with one naming `path`.
    pub(crate) fn with_path(self, path: &Path) -> Self {
        match self {
            Self::Read(source) => Self::Io {
                path: path.to_path_buf(),
                source,
            },
            other => other,
        }
    }
}
