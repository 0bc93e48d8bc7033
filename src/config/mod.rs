//! Configuration system for the toolbox connection.
//!
//! Configuration is merged by `ortho_config` with the precedence CLI flags >
//! environment variables > explicit configuration file > defaults.
//!
//! # Example Configuration
//!
//! ```toml
//! container = "fedora-toolbox"
//! remote_user = "dev"
//! engine_executable = "podman"
//! toolbox_executable = "/usr/local/bin/distrobox"
//! ```

mod cli;
mod loader;
mod types;


pub use cli::{Cli, Commands, ExecArgs, TransferArgs};
pub use loader::{CONFIG_PATH_ENV_VAR, env_var_names, load_config};
pub use types::{ConnectionConfig, DEFAULT_ENGINE_EXECUTABLE, DEFAULT_TOOLBOX_EXECUTABLE};
