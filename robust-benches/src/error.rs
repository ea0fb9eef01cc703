//! Benchmark setup error type.
//!
//! Lets setup functions propagate failures with `?` instead of using
//! `.expect()`.

use crate::synthetic::SyntheticError;
use robust_core::{RobustError, SolverError};

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic network generation failed.
    #[error("synthetic network generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// Building or diversifying the instance failed.
    #[error("diversification failed: {0}")]
    Robust(#[from] RobustError),
    /// A direct solver call failed.
    #[error("solver failed: {0}")]
    Solver(#[from] SolverError),
}
