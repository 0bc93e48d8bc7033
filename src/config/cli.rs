//! Command-line argument definitions for the toolbox connection binary.

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser, Subcommand};

/// Command-line interface for `toolbox-connection`.
#[derive(Debug, Parser)]
#[command(name = "toolbox-connection")]
#[command(
    author,
    version,
    about = "Run commands and copy files in a toolbox container"
)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a configuration file.
    #[arg(long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Name of the target container.
    #[arg(long, global = true)]
    pub container: Option<String>,

    /// User to run commands as inside the container.
    #[arg(long = "user", global = true)]
    pub remote_user: Option<String>,

    /// Container engine executable name or path.
    #[arg(long, global = true)]
    pub engine_executable: Option<String>,

    /// Toolbox executable name or path.
    #[arg(long, global = true)]
    pub toolbox_executable: Option<String>,

    /// Increase log verbosity (repeat for more detail).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Execute a shell command inside the container.
    Exec(ExecArgs),

    /// Copy a host file into the container.
    Put(TransferArgs),

    /// Copy a file out of the container onto the host.
    Fetch(TransferArgs),
}

/// Arguments for the `exec` subcommand.
#[derive(Debug, Parser)]
pub struct ExecArgs {
    /// Command line passed to `bash -l -c` inside the container.
    #[arg(required = true, allow_hyphen_values = true)]
    pub command: String,

    /// Forward this process's standard input to the command.
    #[arg(long)]
    pub stdin: bool,
}

/// Arguments for the `put` and `fetch` subcommands.
#[derive(Debug, Parser)]
pub struct TransferArgs {
    /// Path the file is copied from.
    #[arg(required = true)]
    pub source: Utf8PathBuf,

    /// Path the file is copied to.
    #[arg(required = true)]
    pub destination: Utf8PathBuf,
}
