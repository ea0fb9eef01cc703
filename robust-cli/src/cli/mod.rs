//! Command-line interface for computing disease modules with ROBUST.
//!
//! The single `run` command loads a network and a seed list, collects
//! diverse Steiner trees, and writes the vertices that recur across them.

mod commands;
mod output;

pub use commands::{
    Cli, CliError, Command, EdgeCostMode, ExecutionSummary, RunCommand, SummaryFormat,
    render_summary, run_cli, run_command,
};
pub use output::{
    OutputFormat, Written, write_edge_list, write_graphml, write_occurrences, write_output,
};

#[cfg(test)]
mod test_helpers;
#[cfg(test)]
mod tests;
