//! Host-side path checks run before a copy is attempted.

use std::io;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::{FilesystemError, ToolboxError};

fn open_dir(path: &Utf8Path) -> io::Result<Dir> {
    let dir = if path.as_str().is_empty() {
        Utf8Path::new(".")
    } else {
        path
    };
    Dir::open_ambient_dir(dir, ambient_authority())
}

fn classify(path: &Utf8Path, error: &io::Error) -> ToolboxError {
    let std_path = path.as_std_path().to_path_buf();
    if error.kind() == io::ErrorKind::NotFound {
        FilesystemError::NotFound { path: std_path }.into()
    } else {
        FilesystemError::IoError {
            path: std_path,
            message: error.to_string(),
        }
        .into()
    }
}

/// Confirm that `path` exists on the host.
///
/// Symbolic links are not followed, so a link counts as present even when
/// its target lies outside the parent directory.
pub(super) fn ensure_exists(path: &Utf8Path) -> Result<(), ToolboxError> {
    let checked = match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => open_dir(parent)
            .and_then(|dir| dir.symlink_metadata(name))
            .map(drop),
        _ => open_dir(path).map(drop),
    };
    checked.map_err(|error| classify(path, &error))
}

/// Confirm that the directory a file will be written into exists.
pub(super) fn ensure_parent_dir(path: &Utf8Path) -> Result<(), ToolboxError> {
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    open_dir(parent)
        .map(drop)
        .map_err(|error| classify(parent, &error))
}
