//! Small helpers shared across CLI tests.

use std::io;
use std::path::PathBuf;

use robust_test_support::fixtures::{write_edge_list, write_seeds};
use tempfile::TempDir;

use super::{CliError, RunCommand, run_command};

pub(super) fn temp_dir() -> TempDir {
    match TempDir::new() {
        Ok(dir) => dir,
        Err(err) => panic!("failed to create temp dir: {err}"),
    }
}

/// Writes `edges` and `seeds` into `dir` and returns a default command
/// writing to `outfile` inside the same directory.
pub(super) fn command_for(
    dir: &TempDir,
    edges: &[(&str, &str)],
    seeds: &[&str],
    outfile: &str,
) -> io::Result<RunCommand> {
    let network = write_edge_list(dir.path(), "network.tsv", edges)?;
    let seeds = write_seeds(dir.path(), "seeds.txt", seeds)?;
    Ok(RunCommand::new(network, seeds, dir.path().join(outfile)))
}

pub(super) fn bias_table(dir: &TempDir, contents: &str) -> io::Result<PathBuf> {
    let path = dir.path().join("bias.csv");
    std::fs::write(&path, contents)?;
    Ok(path)
}

pub(super) fn run_command_expecting_error(cmd: RunCommand, panic_msg: &str) -> CliError {
    match run_command(cmd) {
        Ok(_) => panic!("{panic_msg}"),
        Err(err) => err,
    }
}
