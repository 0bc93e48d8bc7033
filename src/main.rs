//! `toolbox-connection` application entry point.
//!
//! Runs one transport operation against a toolbox container and mirrors the
//! container command's output and exit code. It uses `eyre` for opaque error
//! handling at the application boundary, converting domain-specific errors
//! into human-readable reports.
//!
//! Configuration is loaded with layered precedence via `OrthoConfig`:
//! 1. Application defaults
//! 2. Configuration file (`--config` or `TOOLBOX_CONNECTION_CONFIG_PATH`)
//! 3. Environment variables (`TOOLBOX_CONNECTION_*`)
//! 4. Command-line arguments

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use eyre::{Report, Result as EyreResult, WrapErr};
use mockable::DefaultEnv;
use toolbox_connection::api::{self, CommandReport};
use toolbox_connection::config::{Cli, Commands, ConnectionConfig, load_config};
use toolbox_connection::connection::ToolboxConnection;
use toolbox_connection::engine::SystemCommandRunner;
use toolbox_connection::error::{ConnectionError, Result as ToolboxResult};
use toolbox_connection::logging;

/// Application entry point.
///
/// Returns the container command's exit code so callers see the same status
/// they would have seen running it inside the container directly.
fn main() -> EyreResult<ExitCode> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let env = DefaultEnv::new();
    let config = load_config(&cli, &env).map_err(Report::from)?;

    let in_data = read_stdin_if_requested(&cli.command)?;
    let report = run(&cli, &config, &env, in_data.as_deref()).map_err(Report::from)?;

    write_output(&report)?;
    Ok(ExitCode::from(report.outcome().exit_status()))
}

/// Execute the CLI command, returning domain-specific errors.
///
/// Keeps semantic errors inside the run loop so the CLI boundary owns
/// conversion to `eyre::Report`.
fn run(
    cli: &Cli,
    config: &ConnectionConfig,
    env: &DefaultEnv,
    in_data: Option<&[u8]>,
) -> ToolboxResult<CommandReport> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|error| ConnectionError::RuntimeCreationFailed {
            message: error.to_string(),
        })?;

    let mut connection =
        ToolboxConnection::new(config, SystemCommandRunner, env, runtime.handle().clone())?;
    api::run_command(&mut connection, &cli.command, in_data)
}

/// Read this process's standard input when `exec --stdin` was given.
fn read_stdin_if_requested(command: &Commands) -> EyreResult<Option<Vec<u8>>> {
    let Commands::Exec(args) = command else {
        return Ok(None);
    };
    if !args.stdin {
        return Ok(None);
    }

    let mut buffer = Vec::new();
    io::stdin()
        .lock()
        .read_to_end(&mut buffer)
        .wrap_err("failed to read standard input")?;
    Ok(Some(buffer))
}

/// Copy the captured streams to this process's streams, byte for byte.
fn write_output(report: &CommandReport) -> EyreResult<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(report.stdout())
        .and_then(|()| stdout.flush())
        .wrap_err("failed to write standard output")?;

    let mut stderr = io::stderr().lock();
    stderr
        .write_all(report.stderr())
        .and_then(|()| stderr.flush())
        .wrap_err("failed to write standard error")?;
    Ok(())
}
