//! Command implementations and argument parsing for the `robust` binary.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use robust_core::{
    BiasWeights, DiversifierBuilder, EdgeCostPolicy, Lambda, Network, RobustError, TerminalSet,
};
use robust_providers_network::{NetworkProviderError, load_bias, load_network, load_seeds};
use robust_providers_pcst::GrowthSolver;
use serde::Serialize;
use thiserror::Error;
use tracing::{Span, field, info, instrument, warn};

use super::output::{OutputFormat, write_output};
use crate::logging::{LOG_FORMAT_ENV, LogFormat};

const DEFAULT_INITIAL_FRACTION: f64 = 0.25;
const DEFAULT_REDUCTION_FACTOR: f64 = 0.9;
const DEFAULT_TREES: usize = 30;
const DEFAULT_THRESHOLD: f64 = 0.1;
const DEFAULT_TERMINAL_MULTIPLE: f64 = 2.0;
const DEFAULT_DIAMETER: f64 = 8.0;
const DEFAULT_LAMBDA: f64 = 0.5;
const DEFAULT_BIAS_COLUMN: &str = "bait_usage";

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "robust",
    about = "Compute diverse prize-collecting Steiner trees connecting seed vertices."
)]
pub struct Cli {
    /// Log renderer for diagnostics on stderr.
    #[arg(
        long,
        global = true,
        value_enum,
        env = LOG_FORMAT_ENV,
        default_value_t = LogFormat::Human
    )]
    pub log_format: LogFormat,

    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Compute a disease module from a network and a seed list.
    Run(RunCommand),
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunCommand {
    /// Tab-separated edge list with a header row.
    pub network: PathBuf,

    /// Seed list, one label per line (first tab-separated column).
    pub seeds: PathBuf,

    /// Output path; `.csv` and `.graphml` select their formats, anything
    /// else receives a plain edge list.
    pub outfile: PathBuf,

    /// Share of the cheapest edge cost given to every non-seed vertex.
    #[arg(long, default_value_t = DEFAULT_INITIAL_FRACTION)]
    pub initial_fraction: f64,

    /// Factor applied to the prize of reused non-seed vertices.
    #[arg(long, default_value_t = DEFAULT_REDUCTION_FACTOR)]
    pub reduction_factor: f64,

    /// Maximum number of distinct trees to collect.
    #[arg(long, default_value_t = DEFAULT_TREES)]
    pub trees: usize,

    /// Minimum share of trees a vertex must appear in to be reported.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: f64,

    /// Seed prize multiple of the diameter times the dearest edge cost.
    #[arg(long, default_value_t = DEFAULT_TERMINAL_MULTIPLE)]
    pub terminal_multiple: f64,

    /// Assumed network diameter used for seed prizes.
    #[arg(long, default_value_t = DEFAULT_DIAMETER)]
    pub diameter: f64,

    /// Edge cost function.
    #[arg(long, value_enum, default_value_t = EdgeCostMode::Uniform)]
    pub edge_cost: EdgeCostMode,

    /// Interpolation weight for the non-uniform edge costs; values outside
    /// `[0, 1]` fall back to `0`.
    #[arg(long, default_value_t = DEFAULT_LAMBDA)]
    pub lambda: f64,

    /// Comma-separated study-bias table with a `gene` column.
    #[arg(long)]
    pub bias_table: Option<PathBuf>,

    /// Bias table column holding the weights.
    #[arg(long, default_value = DEFAULT_BIAS_COLUMN)]
    pub bias_column: String,

    /// Rendering of the run summary on stdout.
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub summary: SummaryFormat,
}

impl RunCommand {
    /// Returns a command with every option at its default.
    #[must_use]
    pub fn new(network: PathBuf, seeds: PathBuf, outfile: PathBuf) -> Self {
        Self {
            network,
            seeds,
            outfile,
            initial_fraction: DEFAULT_INITIAL_FRACTION,
            reduction_factor: DEFAULT_REDUCTION_FACTOR,
            trees: DEFAULT_TREES,
            threshold: DEFAULT_THRESHOLD,
            terminal_multiple: DEFAULT_TERMINAL_MULTIPLE,
            diameter: DEFAULT_DIAMETER,
            edge_cost: EdgeCostMode::Uniform,
            lambda: DEFAULT_LAMBDA,
            bias_table: None,
            bias_column: DEFAULT_BIAS_COLUMN.to_owned(),
            summary: SummaryFormat::Text,
        }
    }
}

/// Edge cost functions selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EdgeCostMode {
    /// Every edge costs one.
    Uniform,
    /// Edges between high-degree vertices cost more.
    HubPenalty,
    /// Additive study-bias weighting; needs `--bias-table`.
    BiasAdditive,
    /// Exponential study-bias weighting; needs `--bias-table`.
    BiasExponential,
}

impl EdgeCostMode {
    const fn needs_bias(self) -> bool {
        matches!(self, Self::BiasAdditive | Self::BiasExponential)
    }
}

/// Summary renderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SummaryFormat {
    /// `key: value` lines.
    Text,
    /// A single JSON object.
    Json,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading the network, seeds, or bias table failed.
    #[error(transparent)]
    Input(#[from] NetworkProviderError),
    /// Configuration or diversification failed.
    #[error(transparent)]
    Core(#[from] RobustError),
    /// A bias-aware edge cost was requested without a bias table.
    #[error("edge cost `{mode:?}` requires --bias-table")]
    MissingBiasTable {
        /// Requested edge cost.
        mode: EdgeCostMode,
    },
    /// Writing the output file failed.
    #[error("failed to write `{}`: {source}", path.display())]
    Output {
        /// Destination path.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
}

/// Outcome of a `run` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionSummary {
    /// Vertices in the loaded network.
    pub vertices: usize,
    /// Edges in the loaded network.
    pub edges: usize,
    /// Seeds present in the network.
    pub terminals: usize,
    /// Seeds discarded because the network lacks them.
    pub dropped_seeds: usize,
    /// Name of the edge cost function.
    pub edge_cost: &'static str,
    /// Number of distinct trees collected.
    pub trees: usize,
    /// Distinct vertices across all trees.
    pub distinct_vertices: usize,
    /// Mean tree size in vertices.
    pub avg_size: f64,
    /// Cheapest tree cost.
    pub min_cost: f64,
    /// Mean tree cost.
    pub avg_cost: f64,
    /// Dearest tree cost.
    pub max_cost: f64,
    /// Written file.
    pub outfile: PathBuf,
    /// Format chosen for the written file.
    pub format: OutputFormat,
    /// Vertices written after thresholding.
    pub module_vertices: usize,
    /// Edges written after thresholding; zero for occurrence tables.
    pub module_edges: usize,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading, diversification, or writing fails.
#[instrument(
    name = "cli.run",
    err,
    skip(cli),
    fields(command = field::Empty),
)]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Run(run) => {
            Span::current().record("command", field::display("run"));
            run_command(run)
        }
    }
}

/// Loads the inputs, collects the trees, and writes the module.
///
/// # Errors
/// Returns [`CliError`] when loading, diversification, or writing fails.
#[instrument(
    name = "cli.execute",
    err,
    skip(command),
    fields(
        network = %command.network.display(),
        seeds = %command.seeds.display(),
        edge_cost = ?command.edge_cost,
        trees = command.trees,
    ),
)]
pub fn run_command(command: RunCommand) -> Result<ExecutionSummary, CliError> {
    let diversifier = DiversifierBuilder::new()
        .with_initial_fraction(command.initial_fraction)
        .with_reduction_factor(command.reduction_factor)
        .with_terminal_prize_multiple(command.terminal_multiple)
        .with_graph_diameter(command.diameter)
        .with_target_count(command.trees)
        .build()?;
    if !(0.0..=1.0).contains(&command.threshold) {
        return Err(RobustError::InvalidParameter {
            name: "threshold",
            value: command.threshold,
            expected: "in [0, 1]",
        }
        .into());
    }
    if command.edge_cost.needs_bias() && command.bias_table.is_none() {
        return Err(CliError::MissingBiasTable {
            mode: command.edge_cost,
        });
    }

    let network = load_network(&command.network)?;
    let seeds = load_seeds(&command.seeds)?;
    let (terminals, dropped_seeds) = TerminalSet::restricted_to(&seeds, &network)?;
    if dropped_seeds > 0 {
        warn!(
            dropped = dropped_seeds,
            kept = terminals.len(),
            "seeds missing from the network were ignored"
        );
    }
    let policy = edge_cost_policy(&command, &network)?;

    let solutions = diversifier.run(&network, &terminals, &policy, &GrowthSolver::new())?;
    let totals = solutions.summary(&policy)?;
    let format = OutputFormat::from_path(&command.outfile);
    let written = write_output(&command.outfile, format, &solutions, command.threshold)?;

    info!(
        trees = totals.trees,
        module_vertices = written.vertices,
        outfile = %command.outfile.display(),
        "command completed"
    );
    Ok(ExecutionSummary {
        vertices: network.vertex_count(),
        edges: network.edge_count(),
        terminals: terminals.len(),
        dropped_seeds,
        edge_cost: policy.name(),
        trees: totals.trees,
        distinct_vertices: totals.distinct_vertices,
        avg_size: totals.avg_size,
        min_cost: totals.min_cost,
        avg_cost: totals.avg_cost,
        max_cost: totals.max_cost,
        outfile: command.outfile,
        format,
        module_vertices: written.vertices,
        module_edges: written.edges,
    })
}

pub(super) fn edge_cost_policy(
    command: &RunCommand,
    network: &Network,
) -> Result<EdgeCostPolicy, CliError> {
    let lambda = Lambda::new_or_default(command.lambda);
    let bias = || -> Result<BiasWeights, CliError> {
        let path = command
            .bias_table
            .as_deref()
            .ok_or_else(|| CliError::MissingBiasTable {
                mode: command.edge_cost,
            })?;
        Ok(load_bias(path, &command.bias_column)?)
    };
    Ok(match command.edge_cost {
        EdgeCostMode::Uniform => EdgeCostPolicy::Uniform,
        EdgeCostMode::HubPenalty => EdgeCostPolicy::hub_penalty(network, lambda),
        EdgeCostMode::BiasAdditive => EdgeCostPolicy::bias_additive(network, bias()?, lambda),
        EdgeCostMode::BiasExponential => EdgeCostPolicy::bias_exponential(bias()?, lambda),
    })
}

/// Renders `summary` to `writer`.
///
/// # Errors
/// Returns [`io::Error`] if writing or JSON encoding fails.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use std::path::PathBuf;
/// # use robust_cli::cli::{ExecutionSummary, OutputFormat, SummaryFormat, render_summary};
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let summary = ExecutionSummary {
///     vertices: 5,
///     edges: 4,
///     terminals: 2,
///     dropped_seeds: 0,
///     edge_cost: "uniform",
///     trees: 1,
///     distinct_vertices: 5,
///     avg_size: 5.0,
///     min_cost: 4.0,
///     avg_cost: 4.0,
///     max_cost: 4.0,
///     outfile: PathBuf::from("module.csv"),
///     format: OutputFormat::Csv,
///     module_vertices: 5,
///     module_edges: 0,
/// };
/// let mut buffer = Vec::new();
/// render_summary(&summary, SummaryFormat::Json, &mut buffer)?;
/// let value: serde_json::Value = serde_json::from_slice(&buffer)?;
/// assert_eq!(value["trees"], 1);
/// assert_eq!(value["format"], "csv");
/// # Ok(())
/// # }
/// ```
pub fn render_summary(
    summary: &ExecutionSummary,
    format: SummaryFormat,
    mut writer: impl Write,
) -> io::Result<()> {
    match format {
        SummaryFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, summary)?;
            writeln!(writer)
        }
        SummaryFormat::Text => {
            writeln!(
                writer,
                "network: {} vertices, {} edges",
                summary.vertices, summary.edges
            )?;
            writeln!(
                writer,
                "seeds: {} used, {} not in network",
                summary.terminals, summary.dropped_seeds
            )?;
            writeln!(writer, "edge cost: {}", summary.edge_cost)?;
            writeln!(writer, "trees: {}", summary.trees)?;
            writeln!(writer, "distinct vertices: {}", summary.distinct_vertices)?;
            writeln!(writer, "average size: {:.3}", summary.avg_size)?;
            writeln!(
                writer,
                "cost: min {:.3}, avg {:.3}, max {:.3}",
                summary.min_cost, summary.avg_cost, summary.max_cost
            )?;
            writeln!(
                writer,
                "module: {} vertices, {} edges -> {} ({})",
                summary.module_vertices,
                summary.module_edges,
                summary.outfile.display(),
                summary.format.as_str()
            )
        }
    }
}
