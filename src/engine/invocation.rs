//! Argument-vector construction for the engine and toolbox CLIs.
//!
//! The builders here are pure: they never consult the environment or the
//! filesystem, so equal inputs always produce equal argument vectors.

use std::path::{Path, PathBuf};

use camino::Utf8Path;

/// User that commands run as when no remote user is configured.
pub const DEFAULT_EXEC_USER: &str = "root";

/// The external tool an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// The container engine CLI (`podman` by default).
    Engine,
    /// The toolbox CLI (`distrobox` by default).
    Toolbox,
}

/// A fully built command line for one of the external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    tool: Tool,
    program: PathBuf,
    args: Vec<String>,
    stdin: Option<Vec<u8>>,
}

impl ToolInvocation {
    /// Create an invocation of `program` with `args` and no standard input.
    #[must_use]
    pub fn new(tool: Tool, program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            tool,
            program: program.into(),
            args,
            stdin: None,
        }
    }

    /// Attach bytes to be written to the child's standard input.
    #[must_use]
    pub fn with_stdin(mut self, stdin: Option<Vec<u8>>) -> Self {
        self.stdin = stdin;
        self
    }

    /// Return which tool this invocation runs.
    #[must_use]
    pub const fn tool(&self) -> Tool {
        self.tool
    }

    /// Return the resolved program path.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Return the arguments following the program.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Return the bytes piped to standard input, if any.
    #[must_use]
    pub fn stdin(&self) -> Option<&[u8]> {
        self.stdin.as_deref()
    }

    /// Return the full argument vector, program first, for display.
    #[must_use]
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.display().to_string())
            .chain(self.args.iter().cloned())
            .collect()
    }
}

/// Format a `container:path` reference understood by the engine's `cp`.
fn container_path(container: &str, path: &Utf8Path) -> String {
    format!("{container}:{path}")
}

/// Engine arguments copying a host file into the container.
///
/// `cp <source> <container>:<destination>`
#[must_use]
pub fn copy_in_args(container: &str, source: &Utf8Path, destination: &Utf8Path) -> Vec<String> {
    vec![
        String::from("cp"),
        source.to_string(),
        container_path(container, destination),
    ]
}

/// Engine arguments copying a container file onto the host.
///
/// `cp <container>:<source> <destination>`
#[must_use]
pub fn copy_out_args(container: &str, source: &Utf8Path, destination: &Utf8Path) -> Vec<String> {
    vec![
        String::from("cp"),
        container_path(container, source),
        destination.to_string(),
    ]
}

/// Engine arguments handing an uploaded file to `user`.
///
/// `exec <container> chown <user> <path>`
#[must_use]
pub fn chown_args(container: &str, user: &str, path: &Utf8Path) -> Vec<String> {
    vec![
        String::from("exec"),
        String::from(container),
        String::from("chown"),
        String::from(user),
        path.to_string(),
    ]
}

/// Toolbox arguments running `command` inside the container.
///
/// `enter -a --user=<user> --name <container> -- bash -l -c <command>`
///
/// `-a` forwards `--user` to the engine's `exec`. The command goes through a
/// login `bash` because `su` inside the toolbox splits arguments on its own
/// terms; it stays a single argument and never touches a host shell.
///
/// The `-a --user=<user>` pair appears once. `distrobox enter` accumulates
/// repeated `-a` values, so passing it a second time after `--name` would
/// add nothing.
#[must_use]
pub fn enter_args(container: &str, user: Option<&str>, command: &str) -> Vec<String> {
    let user_name = user.unwrap_or(DEFAULT_EXEC_USER);
    vec![
        String::from("enter"),
        String::from("-a"),
        format!("--user={user_name}"),
        String::from("--name"),
        String::from(container),
        String::from("--"),
        String::from("bash"),
        String::from("-l"),
        String::from("-c"),
        String::from(command),
    ]
}
