//! Resolution of configured executable names to paths.

use std::path::PathBuf;

use crate::error::{ConnectionError, ToolboxError};

/// Environment variable holding the executable search path.
const SEARCH_PATH_VAR: &str = "PATH";

/// Resolves executable names against the search path of an injected
/// environment.
///
/// Names containing a path separator are checked as paths instead of being
/// searched for. Every call resolves afresh; nothing is cached.
///
/// # Type Parameters
///
/// * `E` - An environment provider implementing the `mockable::Env` trait,
///   allowing the search path to be controlled in tests.
///
/// # Example
///
/// ```ignore
/// use mockable::DefaultEnv;
/// use toolbox_connection::engine::ExecutableResolver;
///
/// let env = DefaultEnv::new();
/// let resolver = ExecutableResolver::new(&env);
/// let podman = resolver.resolve("podman")?;
/// ```
pub struct ExecutableResolver<'a, E: mockable::Env> {
    env: &'a E,
}

impl<'a, E: mockable::Env> ExecutableResolver<'a, E> {
    /// Creates a resolver reading `PATH` from the given environment.
    #[must_use]
    pub const fn new(env: &'a E) -> Self {
        Self { env }
    }

    /// Resolves `name` to the path of an executable file.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::ExecutableNotFound` when `name` is blank,
    /// when no executable of that name is on the search path, or when a path
    /// given directly does not point at an executable.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, ToolboxError> {
        let not_found = || {
            ToolboxError::from(ConnectionError::ExecutableNotFound {
                name: String::from(name),
            })
        };

        if name.trim().is_empty() {
            return Err(not_found());
        }

        let search_path = self.env.string(SEARCH_PATH_VAR);
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

        which::which_in(name, search_path, cwd).map_err(|_| not_found())
    }
}
