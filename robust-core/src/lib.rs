//! ROBUST core library: diverse prize-collecting Steiner trees.
//!
//! A [`Network`] and [`TerminalSet`] are turned into a numeric
//! [`InstanceModel`] once; a [`Diversifier`] then repeatedly hands the
//! instance to a [`PcstSolver`], penalising reused Steiner vertices between
//! solves, and gathers the distinct trees in a [`SolutionSet`].
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod cost;
mod diversify;
mod error;
mod index;
mod instance;
mod network;
mod solution_set;
mod solver;
mod tree;
mod union_find;

#[cfg(test)]
mod test_utils;

pub use crate::{
    builder::{DiversifierBuilder, DiversifierParams},
    cost::{BiasWeights, EdgeCost, EdgeCostPolicy, Lambda},
    diversify::{DiverseTrees, Diversifier},
    error::{
        IndexError, IndexErrorCode, Result, RobustError, RobustErrorCode, SolverError,
        SolverErrorCode,
    },
    index::{EdgeId, EdgeIndex, EdgeKey, VertexId, VertexIndex},
    instance::InstanceModel,
    network::{Network, TerminalSet},
    solution_set::{ModuleGraph, ModuleNode, OccurrenceRow, SolutionSet, SolutionSummary},
    solver::{PcstSolver, Pruning, RootMode, Selection, SolverInput},
    tree::Tree,
};
