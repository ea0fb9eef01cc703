//! Benchmark support crate for ROBUST.
//!
//! Provides seeded synthetic interaction networks and parameter types used
//! by the Criterion benchmarks of the diversification loop and the growth
//! solver.

pub mod error;
pub mod params;
pub mod synthetic;
