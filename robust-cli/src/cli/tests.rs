//! Unit tests for the `run` command, its output writers, and the summary.

use super::test_helpers::{bias_table, command_for, run_command_expecting_error, temp_dir};
use super::{
    Cli, CliError, Command, EdgeCostMode, ExecutionSummary, OutputFormat, RunCommand,
    SummaryFormat, render_summary, run_cli, run_command, write_edge_list, write_graphml,
    write_occurrences,
};

use std::fs;
use std::path::{Path, PathBuf};

use crate::logging::LogFormat;
use clap::Parser;
use robust_core::{RobustError, SolutionSet, TerminalSet, Tree};
use robust_providers_network::NetworkProviderError;
use robust_test_support::fixtures::{DIAMOND, PATH};
use robust_test_support::tracing::RecordingLayer;
use rstest::rstest;
use tracing::Level;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[rstest]
fn path_run_writes_single_tree_occurrences() -> TestResult {
    let dir = temp_dir();
    let command = command_for(&dir, PATH, &["a", "e"], "module.csv")?;
    let outfile = command.outfile.clone();
    let summary = run_cli(Cli {
        log_format: LogFormat::Human,
        command: Command::Run(command),
    })?;

    assert_eq!(summary.trees, 1);
    assert_eq!(summary.distinct_vertices, 5);
    assert_eq!(summary.format, OutputFormat::Csv);
    assert_eq!(summary.module_vertices, 5);
    assert!((summary.min_cost - 4.0).abs() < 1e-12);
    assert!((summary.max_cost - 4.0).abs() < 1e-12);

    let contents = fs::read_to_string(outfile)?;
    let mut lines = contents.lines();
    assert_eq!(
        lines.next(),
        Some("vertex,occurrences,%occurrences,terminal")
    );
    let mut rows: Vec<&str> = lines.collect();
    rows.sort_unstable();
    assert_eq!(
        rows,
        [
            "a,1,1,true",
            "b,1,1,false",
            "c,1,1,false",
            "d,1,1,false",
            "e,1,1,true"
        ]
    );
    Ok(())
}

#[rstest]
#[case::everything(0.0, 4, 4)]
#[case::shared_half(0.5, 4, 4)]
#[case::seeds_only(0.6, 2, 0)]
fn diamond_run_thresholds_module(
    #[case] threshold: f64,
    #[case] vertices: usize,
    #[case] edges: usize,
) -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, DIAMOND, &["s", "t"], "module.txt")?;
    command.threshold = threshold;
    let outfile = command.outfile.clone();
    let summary = run_command(command)?;

    assert_eq!(summary.trees, 2);
    assert_eq!(summary.distinct_vertices, 4);
    assert_eq!(summary.format, OutputFormat::EdgeList);
    assert_eq!(summary.module_vertices, vertices);
    assert_eq!(summary.module_edges, edges);
    assert_eq!(fs::read_to_string(outfile)?.lines().count(), edges);
    Ok(())
}

#[rstest]
fn graphml_output_labels_components() -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, DIAMOND, &["s", "t"], "module.graphml")?;
    command.threshold = 0.6;
    let outfile = command.outfile.clone();
    let summary = run_command(command)?;
    assert_eq!(summary.format, OutputFormat::GraphMl);

    let xml = fs::read_to_string(outfile)?;
    assert!(xml.contains(r#"attr.name="connected_components_id""#));
    assert_eq!(xml.matches("<node ").count(), 2);
    assert_eq!(xml.matches("<edge ").count(), 0);
    // s and t are not adjacent, so they form components 0 and 1
    assert!(xml.contains(r#"<data key="d3">0</data>"#));
    assert!(xml.contains(r#"<data key="d3">1</data>"#));
    Ok(())
}

#[rstest]
fn seeds_outside_network_are_dropped() -> TestResult {
    let dir = temp_dir();
    let command = command_for(&dir, PATH, &["a", "nowhere", "e"], "module.csv")?;
    let summary = run_command(command)?;
    assert_eq!(summary.terminals, 2);
    assert_eq!(summary.dropped_seeds, 1);
    Ok(())
}

#[rstest]
fn seeds_all_missing_fail() -> TestResult {
    let dir = temp_dir();
    let command = command_for(&dir, PATH, &["x", "y"], "module.csv")?;
    let err = run_command_expecting_error(command, "no usable seed must fail");
    assert!(matches!(err, CliError::Core(RobustError::EmptyTerminals)));
    Ok(())
}

#[rstest]
#[case::bias_additive(EdgeCostMode::BiasAdditive)]
#[case::bias_exponential(EdgeCostMode::BiasExponential)]
fn bias_costs_require_table(#[case] mode: EdgeCostMode) -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, PATH, &["a", "e"], "module.csv")?;
    command.edge_cost = mode;
    let err = run_command_expecting_error(command, "missing bias table must fail");
    assert!(matches!(err, CliError::MissingBiasTable { mode: got } if got == mode));
    Ok(())
}

#[rstest]
fn bias_additive_with_neutral_table_matches_uniform() -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, PATH, &["a", "e"], "module.csv")?;
    command.edge_cost = EdgeCostMode::BiasAdditive;
    command.bias_table = Some(bias_table(&dir, "gene,bait_usage\na,1\nc,1\n")?);
    let summary = run_command(command)?;
    assert_eq!(summary.edge_cost, "bias-additive");
    assert_eq!(summary.trees, 1);
    assert!((summary.avg_cost - 4.0).abs() < 1e-12);
    Ok(())
}

#[rstest]
fn hub_penalty_runs_on_path() -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, PATH, &["a", "e"], "module.csv")?;
    command.edge_cost = EdgeCostMode::HubPenalty;
    let summary = run_command(command)?;
    assert_eq!(summary.edge_cost, "hub-penalty");
    assert_eq!(summary.distinct_vertices, 5);
    Ok(())
}

#[rstest]
fn bias_column_must_exist() -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, PATH, &["a", "e"], "module.csv")?;
    command.edge_cost = EdgeCostMode::BiasExponential;
    command.bias_table = Some(bias_table(&dir, "gene,bait_usage\na,3\n")?);
    command.bias_column = "study_attention".to_owned();
    let err = run_command_expecting_error(command, "unknown column must fail");
    assert!(matches!(
        err,
        CliError::Input(NetworkProviderError::MissingColumn { .. })
    ));
    Ok(())
}

#[rstest]
#[case::threshold_too_high(|c: &mut RunCommand| c.threshold = 1.5, "threshold")]
#[case::reduction_zero(|c: &mut RunCommand| c.reduction_factor = 0.0, "reduction_factor")]
#[case::no_trees(|c: &mut RunCommand| c.trees = 0, "target_count")]
fn invalid_parameters_are_rejected(
    #[case] tweak: fn(&mut RunCommand),
    #[case] parameter: &str,
) -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, PATH, &["a", "e"], "module.csv")?;
    tweak(&mut command);
    let err = run_command_expecting_error(command, "invalid parameter must fail");
    assert!(
        matches!(&err, CliError::Core(RobustError::InvalidParameter { name, .. }) if *name == parameter),
        "unexpected error: {err:?}"
    );
    Ok(())
}

#[rstest]
fn missing_network_reports_path() -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, PATH, &["a"], "module.csv")?;
    command.network = dir.path().join("absent.tsv");
    let err = run_command_expecting_error(command, "missing network must fail");
    assert!(matches!(
        &err,
        CliError::Input(NetworkProviderError::Io { path, .. }) if path.ends_with("absent.tsv")
    ));
    Ok(())
}

#[rstest]
fn unwritable_outfile_is_reported() -> TestResult {
    let dir = temp_dir();
    let mut command = command_for(&dir, PATH, &["a", "e"], "module.csv")?;
    command.outfile = dir.path().join("no-such-dir").join("module.csv");
    let err = run_command_expecting_error(command, "unwritable outfile must fail");
    assert!(matches!(err, CliError::Output { .. }));
    Ok(())
}

#[rstest]
fn clap_applies_defaults() -> TestResult {
    let cli = Cli::try_parse_from(["robust", "run", "net.tsv", "seeds.txt", "out.csv"])?;
    let Command::Run(run) = cli.command;
    assert_eq!(run.network, PathBuf::from("net.tsv"));
    assert!((run.initial_fraction - 0.25).abs() < f64::EPSILON);
    assert!((run.reduction_factor - 0.9).abs() < f64::EPSILON);
    assert_eq!(run.trees, 30);
    assert!((run.threshold - 0.1).abs() < f64::EPSILON);
    assert_eq!(run.edge_cost, EdgeCostMode::Uniform);
    assert_eq!(run.bias_column, "bait_usage");
    assert_eq!(run.summary, SummaryFormat::Text);
    Ok(())
}

#[rstest]
fn clap_parses_kebab_case_options() -> TestResult {
    let cli = Cli::try_parse_from([
        "robust",
        "run",
        "net.tsv",
        "seeds.txt",
        "out.graphml",
        "--edge-cost",
        "bias-exponential",
        "--bias-table",
        "bias.csv",
        "--bias-column",
        "custom",
        "--lambda",
        "0.2",
        "--summary",
        "json",
        "--trees",
        "5",
    ])?;
    let Command::Run(run) = cli.command;
    assert_eq!(run.edge_cost, EdgeCostMode::BiasExponential);
    assert_eq!(run.bias_table.as_deref(), Some(Path::new("bias.csv")));
    assert_eq!(run.bias_column, "custom");
    assert_eq!(run.summary, SummaryFormat::Json);
    assert_eq!(run.trees, 5);
    Ok(())
}

#[rstest]
#[case::after_subcommand(&["robust", "run", "n", "s", "o", "--log-format", "json"], LogFormat::Json)]
#[case::before_subcommand(&["robust", "--log-format", "json", "run", "n", "s", "o"], LogFormat::Json)]
#[case::explicit_human(&["robust", "run", "n", "s", "o", "--log-format", "human"], LogFormat::Human)]
fn clap_parses_global_log_format(#[case] args: &[&str], #[case] expected: LogFormat) -> TestResult {
    let cli = Cli::try_parse_from(args)?;
    assert_eq!(cli.log_format, expected);
    Ok(())
}

#[rstest]
#[case::unknown_log_format(&["robust", "run", "n", "s", "o", "--log-format", "xml"])]
#[case::unknown_cost(&["robust", "run", "n", "s", "o", "--edge-cost", "random"])]
#[case::missing_outfile(&["robust", "run", "n", "s"])]
fn clap_rejects_bad_arguments(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

fn sample_summary() -> ExecutionSummary {
    ExecutionSummary {
        vertices: 5,
        edges: 5,
        terminals: 2,
        dropped_seeds: 1,
        edge_cost: "uniform",
        trees: 2,
        distinct_vertices: 4,
        avg_size: 3.0,
        min_cost: 2.0,
        avg_cost: 2.0,
        max_cost: 2.0,
        outfile: PathBuf::from("module.graphml"),
        format: OutputFormat::GraphMl,
        module_vertices: 4,
        module_edges: 4,
    }
}

#[rstest]
fn render_summary_text_lists_figures() -> TestResult {
    let mut buffer = Vec::new();
    render_summary(&sample_summary(), SummaryFormat::Text, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert!(text.contains("seeds: 2 used, 1 not in network"));
    assert!(text.contains("trees: 2"));
    assert!(text.contains("cost: min 2.000, avg 2.000, max 2.000"));
    assert!(text.contains("module: 4 vertices, 4 edges -> module.graphml (graphml)"));
    Ok(())
}

#[rstest]
fn render_summary_json_is_parseable() -> TestResult {
    let mut buffer = Vec::new();
    render_summary(&sample_summary(), SummaryFormat::Json, &mut buffer)?;
    let value: serde_json::Value = serde_json::from_slice(&buffer)?;
    assert_eq!(value["distinct_vertices"], 4);
    assert_eq!(value["format"], "graphml");
    assert_eq!(value["edge_cost"], "uniform");
    Ok(())
}

#[rstest]
#[case("module.csv", OutputFormat::Csv)]
#[case("MODULE.GRAPHML", OutputFormat::GraphMl)]
#[case("module.tsv", OutputFormat::EdgeList)]
#[case("module", OutputFormat::EdgeList)]
fn output_format_follows_extension(#[case] path: &str, #[case] expected: OutputFormat) {
    assert_eq!(OutputFormat::from_path(Path::new(path)), expected);
}

fn quoted_set() -> SolutionSet {
    let mut set = SolutionSet::new(TerminalSet::new(["a,1", "b"]).expect("non-empty terminals"));
    let tree =
        Tree::new(["a,1", "<c>", "b"], [("a,1", "<c>"), ("<c>", "b")]).expect("fixture is a tree");
    set.insert(tree);
    set
}

#[rstest]
fn occurrences_csv_quotes_labels() -> TestResult {
    let rows = quoted_set().occurrences(true, None)?;
    let mut buffer = Vec::new();
    write_occurrences(&rows, &mut buffer)?;
    let text = String::from_utf8(buffer)?;
    assert!(text.contains("\"a,1\",1,1,true"));
    assert!(text.contains("<c>,1,1,false"));
    Ok(())
}

#[rstest]
fn graphml_escapes_labels() -> TestResult {
    let module = quoted_set().subgraph(0.0)?;
    let mut buffer = Vec::new();
    write_graphml(&module, &mut buffer)?;
    let xml = String::from_utf8(buffer)?;
    assert!(xml.contains(r#"<node id="&lt;c&gt;">"#));
    assert!(
        xml.contains(r#"<edge source="a,1" target="&lt;c&gt;"/>"#)
            || xml.contains(r#"<edge source="&lt;c&gt;" target="a,1"/>"#)
    );
    assert!(!xml.contains("<c>"));
    Ok(())
}

#[rstest]
fn edge_list_writes_one_pair_per_line() -> TestResult {
    let module = quoted_set().subgraph(0.0)?;
    let mut buffer = Vec::new();
    write_edge_list(&module, &mut buffer)?;
    assert_eq!(String::from_utf8(buffer)?.lines().count(), 2);
    Ok(())
}

#[rstest]
fn run_command_emits_tracing_fields() -> TestResult {
    let dir = temp_dir();
    let command = command_for(&dir, DIAMOND, &["s", "t"], "module.csv")?;
    let (result, layer) = RecordingLayer::capture(|| run_command(command));
    let summary = result?;
    assert_eq!(summary.trees, 2);

    let execute = layer
        .span("cli.execute")
        .expect("cli.execute span must exist");
    assert_eq!(execute.field("edge_cost"), Some("Uniform"));
    assert!(
        execute
            .field("network")
            .is_some_and(|value| value.ends_with("network.tsv"))
    );
    let output = layer
        .span("cli.write_output")
        .expect("cli.write_output span must exist");
    assert_eq!(output.field("rows"), Some("4"));
    assert!(layer.span("diversify.run").is_some());
    assert!(layer.has_event(Level::INFO, "command completed"));
    Ok(())
}

#[rstest]
fn dropped_seeds_are_warned_about() -> TestResult {
    let dir = temp_dir();
    let command = command_for(&dir, PATH, &["a", "zz", "e"], "module.csv")?;
    let (result, layer) = RecordingLayer::capture(|| run_command(command));
    result?;
    let warning = layer
        .events()
        .into_iter()
        .find(|event| event.level == Level::WARN)
        .expect("dropped seeds must be logged");
    assert_eq!(warning.field("dropped"), Some("1"));
    Ok(())
}
