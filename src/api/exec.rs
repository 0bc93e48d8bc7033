//! Command execution orchestration.

use super::{CommandReport, with_connection};
use crate::connection::Transport;
use crate::error::Result as ToolboxResult;

/// Execute `command` on the transport's target.
///
/// The child's exit code becomes the report's outcome; its streams are
/// passed back byte for byte.
///
/// # Errors
///
/// Returns `ConnectionError::ExecutableNotFound` or
/// `ConnectionError::SpawnFailed` when the toolbox CLI cannot be run. A
/// non-zero exit code is an outcome, not an error.
pub fn exec<T: Transport>(
    transport: &mut T,
    command: &str,
    in_data: Option<&[u8]>,
) -> ToolboxResult<CommandReport> {
    with_connection(transport, |target| {
        target
            .exec_command(command, in_data)
            .map(CommandReport::from)
    })
}
