//! Configuration loading with layered precedence.
//!
//! Layers, lowest to highest: application defaults, an explicit
//! configuration file, environment variables, command-line arguments.
//!
//! Layers are composed by hand with `MergeComposer` rather than through the
//! derived `load()` because the `Cli` struct owns subcommand parsing, and
//! because only an explicitly named file is read. The file comes from
//! `--config` or `TOOLBOX_CONNECTION_CONFIG_PATH`; nothing is discovered.
//!
//! Environment access goes through `mockable::Env` so that tests can drive
//! the environment layer without touching process state.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use ortho_config::serde_json::{Map, Value};
use ortho_config::{MergeComposer, serde_json, toml};

use crate::config::{Cli, ConnectionConfig};
use crate::error::{ConfigError, Result};

/// Environment variable naming an explicit configuration file.
pub const CONFIG_PATH_ENV_VAR: &str = "TOOLBOX_CONNECTION_CONFIG_PATH";

/// Specification for a single environment variable mapping.
struct EnvVarSpec {
    /// The environment variable name.
    env_var: &'static str,
    /// The configuration key it populates.
    key: &'static str,
}

/// Table of all environment variables and the keys they set.
///
/// All values are strings, so no parsing step can fail.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "TOOLBOX_CONNECTION_CONTAINER",
        key: "container",
    },
    EnvVarSpec {
        env_var: "TOOLBOX_CONNECTION_REMOTE_USER",
        key: "remote_user",
    },
    EnvVarSpec {
        env_var: "TOOLBOX_CONNECTION_ENGINE_EXECUTABLE",
        key: "engine_executable",
    },
    EnvVarSpec {
        env_var: "TOOLBOX_CONNECTION_TOOLBOX_EXECUTABLE",
        key: "toolbox_executable",
    },
];

/// Returns the environment variable names recognised by the loader.
///
/// Includes [`CONFIG_PATH_ENV_VAR`]. Tests use this to clear the
/// environment without hard-coding the list.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS
        .iter()
        .map(|spec| spec.env_var)
        .chain(std::iter::once(CONFIG_PATH_ENV_VAR))
        .collect()
}

/// Read a TOML configuration file and push it to the composer.
///
/// The parent directory is opened through `cap_std` and the file is read
/// relative to it.
fn load_config_file(path: &Utf8Path, composer: &mut MergeComposer) -> Result<()> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let read_error = |error: io::Error| {
        if error.kind() == io::ErrorKind::NotFound {
            ConfigError::FileNotFound {
                path: path.as_std_path().to_path_buf(),
            }
        } else {
            ConfigError::ParseError {
                message: format!("failed to read {path}: {error}"),
            }
        }
    };

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
    let content = dir.read_to_string(file_name).map_err(read_error)?;

    let value = toml::from_str::<Value>(&content).map_err(|e| ConfigError::ParseError {
        message: format!("failed to parse {path}: {e}"),
    })?;

    composer.push_file(value, Some(path.to_path_buf()));
    Ok(())
}

/// Load configuration with full layer precedence.
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` when an explicitly named file does not
/// exist, `ConfigError::ParseError` when it cannot be read or parsed, and
/// `ConfigError::OrthoConfig` when the merged layers do not deserialise.
pub fn load_config<E: mockable::Env>(cli: &Cli, env: &E) -> Result<ConnectionConfig> {
    let mut composer = MergeComposer::new();

    let defaults =
        serde_json::to_value(ConnectionConfig::default()).map_err(|e| ConfigError::ParseError {
            message: format!("failed to serialise defaults: {e}"),
        })?;
    composer.push_defaults(defaults);

    let config_path = cli.config.clone().or_else(|| {
        env.string(CONFIG_PATH_ENV_VAR)
            .filter(|value| !value.is_empty())
            .map(Utf8PathBuf::from)
    });
    if let Some(ref path) = config_path {
        load_config_file(path, &mut composer)?;
    }

    let env_values = collect_env_vars(env);
    if !env_values.is_null() {
        composer.push_environment(env_values);
    }

    let cli_overrides = build_cli_overrides(cli);
    if !cli_overrides.is_null() {
        composer.push_cli(cli_overrides);
    }

    let mut config = ConnectionConfig::merge_from_layers(composer.layers())
        .map_err(ConfigError::OrthoConfig)?;
    config.normalise();

    Ok(config)
}

/// Collect the recognised environment variables into a JSON object.
fn collect_env_vars<E: mockable::Env>(env: &E) -> Value {
    let root: Map<String, Value> = ENV_VAR_SPECS
        .iter()
        .filter_map(|spec| {
            env.string(spec.env_var)
                .map(|raw| (spec.key.to_owned(), Value::String(raw)))
        })
        .collect();

    if root.is_empty() {
        Value::Null
    } else {
        Value::Object(root)
    }
}

/// Build a JSON value containing CLI overrides.
fn build_cli_overrides(cli: &Cli) -> Value {
    let overrides: Map<String, Value> = [
        ("container", cli.container.as_ref()),
        ("remote_user", cli.remote_user.as_ref()),
        ("engine_executable", cli.engine_executable.as_ref()),
        ("toolbox_executable", cli.toolbox_executable.as_ref()),
    ]
    .into_iter()
    .filter_map(|(key, value)| value.map(|v| (key.to_owned(), Value::String(v.clone()))))
    .collect();

    if overrides.is_empty() {
        Value::Null
    } else {
        Value::Object(overrides)
    }
}
