//! Semantic error types for the toolbox connection.
//!
//! Conditions a caller might inspect (a missing executable, a failed copy,
//! a bad configuration value) are modelled as `thiserror` enums. Opaque
//! `eyre::Report` values are reserved for the binary boundary.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the given path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: PathBuf,
    },

    /// The configuration file could not be read or parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// The `OrthoConfig` library returned an error while merging layers.
    #[error("configuration loading failed: {0}")]
    OrthoConfig(Arc<ortho_config::OrthoError>),
}

/// Errors raised while driving the engine and toolbox CLIs.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The configured executable could not be resolved on the search path.
    #[error("{name} command not found in PATH")]
    ExecutableNotFound {
        /// The executable name as configured.
        name: String,
    },

    /// The child process could not be spawned or awaited.
    #[error("failed to run '{program}': {message}")]
    SpawnFailed {
        /// The resolved program path.
        program: PathBuf,
        /// A description of the spawn failure.
        message: String,
    },

    /// Copying a host file into the container exited non-zero.
    #[error("failed to copy file from {source_path} to {dest_path} in container '{container}': {stderr}")]
    CopyInFailed {
        /// The host path being copied.
        source_path: String,
        /// The destination path inside the container.
        dest_path: String,
        /// The container name.
        container: String,
        /// Captured standard error from the engine CLI.
        stderr: String,
    },

    /// Changing ownership of an uploaded file exited non-zero.
    #[error("failed to chown file {path} for user {user} in container '{container}': {stderr}")]
    ChownFailed {
        /// The path inside the container.
        path: String,
        /// The user that should own the file.
        user: String,
        /// The container name.
        container: String,
        /// Captured standard error from the engine CLI.
        stderr: String,
    },

    /// Copying a file out of the container exited non-zero.
    #[error("failed to fetch file from {source_path} to {dest_path} from container '{container}': {stderr}")]
    FetchFailed {
        /// The path inside the container.
        source_path: String,
        /// The destination path on the host.
        dest_path: String,
        /// The container name.
        container: String,
        /// Captured standard error from the engine CLI.
        stderr: String,
    },

    /// Blocking operations were given a handle to a current-thread runtime,
    /// which cannot drive child processes from `block_on`.
    #[error("blocking operations require a multi-thread async runtime")]
    CurrentThreadRuntime,

    /// A Tokio runtime could not be created for synchronous operation.
    #[error("failed to create async runtime: {message}")]
    RuntimeCreationFailed {
        /// A description of the runtime failure.
        message: String,
    },
}

/// Errors that can occur during host filesystem checks.
#[derive(Debug, Error)]
pub enum FilesystemError {
    /// A file or directory was not found.
    #[error("path not found: {path}")]
    NotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// An I/O error occurred.
    #[error("I/O error at '{path}': {message}")]
    IoError {
        /// The path where the error occurred.
        path: PathBuf,
        /// A description of the I/O error.
        message: String,
    },
}

/// Top-level error type for the toolbox connection.
///
/// Aggregates the domain errors into a single type. The binary converts it
/// into an `eyre::Report` for human-readable reporting.
#[derive(Debug, Error)]
pub enum ToolboxError {
    /// An error occurred during configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred while running one of the external tools.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// An error occurred while checking host paths.
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),
}

/// A specialised `Result` type for toolbox connection operations.
pub type Result<T> = std::result::Result<T, ToolboxError>;
