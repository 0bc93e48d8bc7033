//! File transfer orchestration.

use camino::Utf8Path;

use super::{CommandReport, with_connection};
use crate::connection::Transport;
use crate::error::Result as ToolboxResult;

/// Copy the host file `source` to `destination` inside the target.
///
/// # Errors
///
/// Returns `FilesystemError::NotFound` for a missing source, and
/// `ConnectionError::CopyInFailed` or `ConnectionError::ChownFailed` when
/// the engine CLI reports a failure.
pub fn put<T: Transport>(
    transport: &mut T,
    source: &Utf8Path,
    destination: &Utf8Path,
) -> ToolboxResult<CommandReport> {
    with_connection(transport, |target| target.put_file(source, destination))?;
    Ok(CommandReport::success())
}

/// Copy `source` inside the target to the host path `destination`.
///
/// # Errors
///
/// Returns `FilesystemError::NotFound` when the destination directory is
/// missing and `ConnectionError::FetchFailed` when the engine CLI reports a
/// failure.
pub fn fetch<T: Transport>(
    transport: &mut T,
    source: &Utf8Path,
    destination: &Utf8Path,
) -> ToolboxResult<CommandReport> {
    with_connection(transport, |target| target.fetch_file(source, destination))?;
    Ok(CommandReport::success())
}
