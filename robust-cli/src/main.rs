//! Entry point of the `robust` binary.
//!
//! Parses arguments with clap, runs the command, renders the summary to
//! stdout, and maps failures to a non-zero exit code. Logging is installed
//! right after parsing so every later step can emit `tracing` diagnostics.

use std::io::{self, BufWriter, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use robust_cli::{
    cli::{Cli, CliError, Command, render_summary, run_cli},
    logging,
};
use tracing::{error, field};

/// Parse CLI arguments, execute the command, render the summary, and flush
/// the output stream.
fn try_main(cli: Cli) -> Result<()> {
    let Command::Run(run) = &cli.command;
    let format = run.summary;
    let summary = run_cli(cli).context("failed to execute command")?;
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    render_summary(&summary, format, &mut writer).context("failed to render summary")?;
    writer.flush().context("failed to flush output")?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_logging(cli.log_format);

    if let Err(err) = try_main(cli) {
        let (code, solver_code) = err
            .downcast_ref::<CliError>()
            .and_then(|cli_error| match cli_error {
                CliError::Core(core) => Some((Some(core.code()), core.solver_code())),
                _ => None,
            })
            .unwrap_or((None, None));

        let code_field = code.map(|code| field::display(code.as_str()));
        let solver_code_field = solver_code.map(|code| field::display(code.as_str()));

        error!(
            error = %format!("{err:#}"),
            code = code_field,
            solver_code = solver_code_field,
            "command execution failed"
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
