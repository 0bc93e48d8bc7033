//! Orchestration API for the `toolbox-connection` commands.
//!
//! Each function drives one [`Transport`] through a full task the way an
//! automation engine would: connect, perform the operation, close. They
//! take library-owned types, never print, and never exit the process; the
//! binary decides what to do with the returned [`CommandReport`].

mod exec;
mod transfer;

pub use exec::exec;
pub use transfer::{fetch, put};

use crate::config::Commands;
use crate::connection::Transport;
use crate::engine::ProcessOutput;
use crate::error::Result as ToolboxResult;

/// Outcome of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// The command completed successfully (exit code 0).
    Success,
    /// The command ran but the process in the container exited non-zero.
    CommandExit {
        /// The exit code reported by the toolbox CLI.
        code: i32,
    },
}

impl CommandOutcome {
    /// Map an exit code to an outcome.
    #[must_use]
    pub const fn from_exit_code(code: i32) -> Self {
        if code == 0 {
            Self::Success
        } else {
            Self::CommandExit { code }
        }
    }

    /// Map the outcome to a process exit status.
    ///
    /// Codes outside `1..=255`, such as the signal sentinel, become `1`.
    #[must_use]
    pub fn exit_status(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::CommandExit { code } => u8::try_from(code)
                .ok()
                .filter(|status| *status != 0)
                .unwrap_or(1),
        }
    }
}

/// What a command produced: its outcome and any captured output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandReport {
    outcome: CommandOutcome,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl CommandReport {
    /// A successful report with no output, as file transfers produce.
    #[must_use]
    pub const fn success() -> Self {
        Self {
            outcome: CommandOutcome::Success,
            stdout: Vec::new(),
            stderr: Vec::new(),
        }
    }

    /// Return the command outcome.
    #[must_use]
    pub const fn outcome(&self) -> CommandOutcome {
        self.outcome
    }

    /// Return the captured standard output.
    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Return the captured standard error.
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }
}

impl From<ProcessOutput> for CommandReport {
    fn from(output: ProcessOutput) -> Self {
        let (exit_code, stdout, stderr) = output.into_parts();
        Self {
            outcome: CommandOutcome::from_exit_code(exit_code),
            stdout,
            stderr,
        }
    }
}

/// Dispatch a parsed subcommand to the matching orchestration function.
///
/// `in_data` is only used by `exec`.
///
/// # Errors
///
/// Returns the errors of [`exec`], [`put`] and [`fetch`].
pub fn run_command<T: Transport>(
    transport: &mut T,
    command: &Commands,
    in_data: Option<&[u8]>,
) -> ToolboxResult<CommandReport> {
    match command {
        Commands::Exec(args) => exec(transport, &args.command, in_data),
        Commands::Put(args) => put(transport, &args.source, &args.destination),
        Commands::Fetch(args) => fetch(transport, &args.source, &args.destination),
    }
}

/// Run `operation` between `connect` and `close`.
///
/// The transport is closed even when the operation fails; the operation's
/// error wins over a close error.
fn with_connection<T, F, O>(transport: &mut T, operation: F) -> ToolboxResult<O>
where
    T: Transport,
    F: FnOnce(&mut T) -> ToolboxResult<O>,
{
    transport.connect()?;
    let result = operation(transport);
    let closed = transport.close();
    let value = result?;
    closed?;
    Ok(value)
}
