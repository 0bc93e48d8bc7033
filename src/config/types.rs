//! Configuration data types for the toolbox connection.

use ortho_config::{OrthoConfig, OrthoResult, PostMergeContext, PostMergeHook};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default container engine executable.
pub const DEFAULT_ENGINE_EXECUTABLE: &str = "podman";

/// Default toolbox executable.
pub const DEFAULT_TOOLBOX_EXECUTABLE: &str = "distrobox";

fn default_engine_executable() -> String {
    String::from(DEFAULT_ENGINE_EXECUTABLE)
}

fn default_toolbox_executable() -> String {
    String::from(DEFAULT_TOOLBOX_EXECUTABLE)
}

/// Root connection configuration.
///
/// Loaded from defaults, an explicit configuration file, environment
/// variables and command-line arguments, in increasing precedence. There is
/// no file discovery: a file is only read when its path is given.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "TOOLBOX_CONNECTION", post_merge_hook)]
pub struct ConnectionConfig {
    /// Name of the toolbox container to target.
    pub container: Option<String>,

    /// User that commands run as inside the container.
    ///
    /// When unset, commands run as `root` and uploaded files keep the
    /// ownership assigned by the engine.
    pub remote_user: Option<String>,

    /// Container engine executable, as a name or a path.
    #[serde(default = "default_engine_executable")]
    pub engine_executable: String,

    /// Toolbox executable, as a name or a path.
    #[serde(default = "default_toolbox_executable")]
    pub toolbox_executable: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            container: None,
            remote_user: None,
            engine_executable: default_engine_executable(),
            toolbox_executable: default_toolbox_executable(),
        }
    }
}

impl ConnectionConfig {
    /// Validates that the configuration can drive a connection.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when no container is set, and
    /// `ConfigError::InvalidValue` when an executable name is blank.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self
            .container
            .as_deref()
            .is_none_or(|container| container.trim().is_empty())
        {
            return Err(ConfigError::MissingRequired {
                field: String::from("container"),
            }
            .into());
        }

        for (field, value) in [
            ("engine_executable", &self.engine_executable),
            ("toolbox_executable", &self.toolbox_executable),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: String::from(field),
                    reason: String::from("executable name must not be empty"),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Trims the container and user names, dropping blank values.
    ///
    /// An empty `TOOLBOX_CONNECTION_REMOTE_USER` therefore means "no user"
    /// rather than a user with an empty name. Applying it twice is a no-op.
    pub fn normalise(&mut self) {
        self.container = normalise_optional(self.container.take());
        self.remote_user = normalise_optional(self.remote_user.take());
    }
}

/// Trim a value and drop it when nothing is left.
fn normalise_optional(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|trimmed| !trimmed.is_empty())
}

impl PostMergeHook for ConnectionConfig {
    fn post_merge(&mut self, _ctx: &PostMergeContext) -> OrthoResult<()> {
        self.normalise();
        Ok(())
    }
}
