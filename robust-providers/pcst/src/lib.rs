//! Reference prize-collecting Steiner tree solver for the ROBUST engine.
//!
//! [`GrowthSolver`] is deterministic: ties are always broken by vertex id,
//! so repeated solves of the same instance return the same selection.

mod graph;
mod growth;
mod prune;
mod solver;

pub use solver::GrowthSolver;

#[cfg(test)]
mod tests;
