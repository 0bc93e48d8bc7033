//! Child-process execution behind a small trait seam.
//!
//! [`SystemCommandRunner`] spawns the real tools with `tokio::process`.
//! Everything above it talks to [`CommandRunner`], so argument construction
//! and exit-code mapping are unit-tested without spawning anything.

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::invocation::ToolInvocation;

/// Exit code reported when a child was terminated by a signal.
pub const SIGNALLED_EXIT_CODE: i32 = -1;

/// Boxed future type returned by [`CommandRunner::run`].
pub type RunCommandFuture<'a> = Pin<Box<dyn Future<Output = io::Result<ProcessOutput>> + Send + 'a>>;

/// Behaviour required to run one external tool invocation to completion.
pub trait CommandRunner {
    /// Spawn the invocation, feed its standard input and collect its output.
    fn run(&self, invocation: &ToolInvocation) -> RunCommandFuture<'_>;
}

/// Exit code and raw byte streams of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    exit_code: i32,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

impl ProcessOutput {
    /// Create an output record.
    #[must_use]
    pub const fn new(exit_code: i32, stdout: Vec<u8>, stderr: Vec<u8>) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
        }
    }

    /// Return the child's exit code.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        self.exit_code
    }

    /// Return whether the child exited with code zero.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Return captured standard output, unchanged.
    #[must_use]
    pub fn stdout(&self) -> &[u8] {
        &self.stdout
    }

    /// Return captured standard error, unchanged.
    #[must_use]
    pub fn stderr(&self) -> &[u8] {
        &self.stderr
    }

    /// Return standard error decoded for inclusion in error messages.
    #[must_use]
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }

    /// Split into `(exit_code, stdout, stderr)`.
    #[must_use]
    pub fn into_parts(self) -> (i32, Vec<u8>, Vec<u8>) {
        (self.exit_code, self.stdout, self.stderr)
    }
}

impl From<std::process::Output> for ProcessOutput {
    fn from(output: std::process::Output) -> Self {
        Self {
            exit_code: output.status.code().unwrap_or(SIGNALLED_EXIT_CODE),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, invocation: &ToolInvocation) -> RunCommandFuture<'_> {
        let owned = invocation.clone();
        Box::pin(async move { run_child_process(&owned).await })
    }
}

/// Spawn the child with all three streams piped.
///
/// Standard input is written concurrently with output collection so a child
/// that fills its output pipe before reading input cannot deadlock. Standard
/// input is closed once written, or immediately when there is nothing to
/// send. A child that exits without reading its input is not an error.
async fn run_child_process(invocation: &ToolInvocation) -> io::Result<ProcessOutput> {
    let mut child = Command::new(invocation.program())
        .args(invocation.args())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()?;

    let stdin_pipe = child.stdin.take();
    let input = invocation.stdin().unwrap_or_default();
    let feed_input = async move {
        let Some(mut pipe) = stdin_pipe else {
            return Ok(());
        };
        if !input.is_empty() {
            pipe.write_all(input).await?;
        }
        pipe.shutdown().await
    };

    let (fed, output) = tokio::join!(feed_input, child.wait_with_output());
    if let Err(error) = fed
        && error.kind() != io::ErrorKind::BrokenPipe
    {
        return Err(error);
    }

    output.map(ProcessOutput::from)
}
