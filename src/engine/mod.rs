//! Process plumbing for the container engine and toolbox CLIs.
//!
//! Three pieces, each usable on its own:
//!
//! 1. [`ExecutableResolver`] turns a configured executable name into a path.
//! 2. The argument builders ([`copy_in_args`], [`copy_out_args`],
//!    [`chown_args`], [`enter_args`]) produce argument vectors.
//! 3. [`CommandRunner`] spawns a [`ToolInvocation`] and returns its
//!    [`ProcessOutput`] unchanged.

mod executable;
mod invocation;
mod runner;

pub use executable::ExecutableResolver;
pub use invocation::{
    DEFAULT_EXEC_USER, Tool, ToolInvocation, chown_args, copy_in_args, copy_out_args, enter_args,
};
pub use runner::{
    CommandRunner, ProcessOutput, RunCommandFuture, SIGNALLED_EXIT_CODE, SystemCommandRunner,
};
