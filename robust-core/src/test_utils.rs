//! Shared test utilities for `robust-core`.

use std::cell::RefCell;

use proptest::test_runner::Config as ProptestConfig;
use robust_test_support::property::PropertyProfile;

use crate::{
    error::SolverError,
    index::{EdgeId, VertexId},
    network::Network,
    solver::{PcstSolver, Selection, SolverInput},
};

/// Builds a proptest configuration honouring the shared case override.
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    ProptestConfig {
        cases: PropertyProfile::load(default_cases).cases(),
        ..ProptestConfig::default()
    }
}

/// Five-vertex path `a-b-c-d-e`.
pub(crate) fn path_network() -> Network {
    Network::from_edges([("a", "b"), ("b", "c"), ("c", "d"), ("d", "e")])
}

/// [`PcstSolver`] replaying canned answers and recording the prizes it was
/// shown on each call.
pub(crate) struct ScriptedSolver {
    script: Vec<Selection>,
    repeat_last: bool,
    seen_prizes: RefCell<Vec<Vec<f64>>>,
}

impl ScriptedSolver {
    /// Answers with each selection once, then fails.
    pub(crate) fn new(script: Vec<Selection>) -> Self {
        Self {
            script,
            repeat_last: false,
            seen_prizes: RefCell::new(Vec::new()),
        }
    }

    /// Answers every call with the same selection.
    pub(crate) fn repeating(vertices: &[usize], edges: &[usize]) -> Self {
        let selection = Selection {
            vertices: vertices.iter().copied().map(VertexId::new).collect(),
            edges: edges.iter().copied().map(EdgeId::new).collect(),
        };
        Self {
            script: vec![selection],
            repeat_last: true,
            seen_prizes: RefCell::new(Vec::new()),
        }
    }

    /// Returns the prize arrays observed so far, one per call.
    pub(crate) fn seen_prizes(&self) -> Vec<Vec<f64>> {
        self.seen_prizes.borrow().clone()
    }
}

impl PcstSolver for ScriptedSolver {
    fn name(&self) -> &str {
        "scripted"
    }

    fn solve(&self, input: &SolverInput<'_>) -> Result<Selection, SolverError> {
        let call = {
            let mut seen = self.seen_prizes.borrow_mut();
            seen.push(input.prizes.to_vec());
            seen.len() - 1
        };
        let position = if self.repeat_last {
            call.min(self.script.len().saturating_sub(1))
        } else {
            call
        };
        self.script
            .get(position)
            .cloned()
            .ok_or_else(|| SolverError::Backend {
                message: format!("script exhausted after {call} calls"),
            })
    }
}
