//! The transport contract and its toolbox-backed implementation.
//!
//! An automation engine drives a target through [`Transport`]: connect, run
//! commands, push and fetch files, close. [`ToolboxConnection`] fulfils that
//! contract for one named container by shelling out to the engine CLI (file
//! copy, ownership) and the toolbox CLI (command execution).
//!
//! There is no live session behind a connection. `connect` and `close` only
//! flip a flag; every operation is a fresh child process.

mod host_paths;

use camino::Utf8Path;
use tokio::runtime::RuntimeFlavor;
use tracing::{debug, trace};

use crate::config::ConnectionConfig;
use crate::engine::{
    CommandRunner, ExecutableResolver, ProcessOutput, Tool, ToolInvocation, chown_args,
    copy_in_args, copy_out_args, enter_args,
};
use crate::error::{ConfigError, ConnectionError, Result};

/// Transport name reported to the automation engine.
pub const TRANSPORT_NAME: &str = "toolbox";

/// The plugin contract an automation engine uses to drive one target.
pub trait Transport {
    /// Return the transport's registered name.
    fn transport_name(&self) -> &'static str;

    /// Return whether commands may receive module source on standard input.
    fn has_pipelining(&self) -> bool;

    /// Return whether [`Transport::connect`] has been called since the last
    /// [`Transport::close`].
    fn is_connected(&self) -> bool;

    /// Prepare the target for use.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the target cannot be reached.
    fn connect(&mut self) -> Result<()>;

    /// Run `command` on the target, piping `in_data` to its standard input.
    ///
    /// A non-zero exit code is reported in the returned output, not as an
    /// error.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the command cannot be started.
    fn exec_command(&mut self, command: &str, in_data: Option<&[u8]>) -> Result<ProcessOutput>;

    /// Copy the host file `source` to `destination` on the target.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the copy fails.
    fn put_file(&mut self, source: &Utf8Path, destination: &Utf8Path) -> Result<()>;

    /// Copy `source` on the target to the host path `destination`.
    ///
    /// # Errors
    ///
    /// Implementations return an error when the copy fails.
    fn fetch_file(&mut self, source: &Utf8Path, destination: &Utf8Path) -> Result<()>;

    /// Release the target.
    ///
    /// # Errors
    ///
    /// Implementations return an error when teardown fails.
    fn close(&mut self) -> Result<()>;
}

/// A [`Transport`] targeting one toolbox container through external CLIs.
///
/// Blocking [`Transport`] methods drive the `*_async` methods on the runtime
/// handle given at construction, which must belong to a multi-thread
/// runtime. Call the async methods directly when already inside a runtime.
pub struct ToolboxConnection<'a, R: CommandRunner, E: mockable::Env> {
    container: String,
    remote_user: Option<String>,
    engine_executable: String,
    toolbox_executable: String,
    runner: R,
    resolver: ExecutableResolver<'a, E>,
    runtime: tokio::runtime::Handle,
    connected: bool,
}

impl<'a, R: CommandRunner, E: mockable::Env> ToolboxConnection<'a, R, E> {
    /// Create a connection from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when no container is
    /// configured, `ConfigError::InvalidValue` for blank executables, and
    /// `ConnectionError::CurrentThreadRuntime` when `runtime` belongs to a
    /// current-thread runtime.
    pub fn new(
        config: &ConnectionConfig,
        runner: R,
        env: &'a E,
        runtime: tokio::runtime::Handle,
    ) -> Result<Self> {
        config.validate()?;
        if runtime.runtime_flavor() == RuntimeFlavor::CurrentThread {
            return Err(ConnectionError::CurrentThreadRuntime.into());
        }
        let container = config
            .container
            .clone()
            .ok_or_else(|| ConfigError::MissingRequired {
                field: String::from("container"),
            })?;

        debug!(host = %container, "using toolbox connection");
        Ok(Self {
            container,
            remote_user: config.remote_user.clone(),
            engine_executable: config.engine_executable.clone(),
            toolbox_executable: config.toolbox_executable.clone(),
            runner,
            resolver: ExecutableResolver::new(env),
            runtime,
            connected: false,
        })
    }

    /// Return the target container name.
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Return the configured remote user, if any.
    #[must_use]
    pub fn remote_user(&self) -> Option<&str> {
        self.remote_user.as_deref()
    }

    fn ensure_connected(&mut self) {
        if !self.connected {
            trace!(host = %self.container, "connecting on first use");
            self.connected = true;
        }
    }

    /// Resolve the tool's executable and wrap `args` in an invocation.
    fn invocation(&self, tool: Tool, args: Vec<String>) -> Result<ToolInvocation> {
        let name = match tool {
            Tool::Engine => &self.engine_executable,
            Tool::Toolbox => &self.toolbox_executable,
        };
        let program = self.resolver.resolve(name)?;
        Ok(ToolInvocation::new(tool, program, args))
    }

    /// Run an invocation and log what went in and came out.
    async fn run(&self, invocation: &ToolInvocation) -> Result<ProcessOutput> {
        debug!(host = %self.container, "RUN {:?}", invocation.argv());

        let output = self.runner.run(invocation).await.map_err(|error| {
            ConnectionError::SpawnFailed {
                program: invocation.program().to_path_buf(),
                message: error.to_string(),
            }
        })?;

        trace!(host = %self.container, "STDOUT {:?}", String::from_utf8_lossy(output.stdout()));
        trace!(host = %self.container, "STDERR {:?}", String::from_utf8_lossy(output.stderr()));
        trace!(host = %self.container, "RC CODE {}", output.exit_code());
        Ok(output)
    }

    /// Run `command` inside the container through the toolbox CLI.
    ///
    /// Connects first if needed. The exit code and both byte streams are
    /// returned unchanged; a non-zero exit code is not an error.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::ExecutableNotFound` when the toolbox CLI
    /// cannot be resolved and `ConnectionError::SpawnFailed` when it cannot
    /// be started.
    pub async fn exec_command_async(
        &mut self,
        command: &str,
        in_data: Option<&[u8]>,
    ) -> Result<ProcessOutput> {
        self.ensure_connected();

        let args = enter_args(&self.container, self.remote_user.as_deref(), command);
        let invocation = self
            .invocation(Tool::Toolbox, args)?
            .with_stdin(in_data.map(<[u8]>::to_vec));
        self.run(&invocation).await
    }

    /// Copy a host file into the container with the engine CLI.
    ///
    /// When a remote user is configured the copied file is then handed to
    /// that user with `chown`, since the engine copies as root.
    ///
    /// # Errors
    ///
    /// Returns `FilesystemError::NotFound` when `source` does not exist,
    /// `ConnectionError::CopyInFailed` when the copy exits non-zero,
    /// `ConnectionError::ChownFailed` when the ownership change exits
    /// non-zero, and the resolution and spawn errors of
    /// [`Self::exec_command_async`].
    pub async fn put_file_async(&mut self, source: &Utf8Path, destination: &Utf8Path) -> Result<()> {
        self.ensure_connected();
        debug!(host = %self.container, "PUT {source} TO {destination}");

        host_paths::ensure_exists(source)?;

        let copy = self.invocation(
            Tool::Engine,
            copy_in_args(&self.container, source, destination),
        )?;
        let output = self.run(&copy).await?;
        if !output.success() {
            return Err(ConnectionError::CopyInFailed {
                source_path: source.to_string(),
                dest_path: destination.to_string(),
                container: self.container.clone(),
                stderr: output.stderr_lossy(),
            }
            .into());
        }

        if let Some(user) = self.remote_user.as_deref() {
            let chown = self.invocation(
                Tool::Engine,
                chown_args(&self.container, user, destination),
            )?;
            let chown_output = self.run(&chown).await?;
            if !chown_output.success() {
                return Err(ConnectionError::ChownFailed {
                    path: destination.to_string(),
                    user: String::from(user),
                    container: self.container.clone(),
                    stderr: chown_output.stderr_lossy(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Copy a file out of the container with the engine CLI.
    ///
    /// # Errors
    ///
    /// Returns `FilesystemError::NotFound` when the directory that would hold
    /// `destination` does not exist, `ConnectionError::FetchFailed` when the
    /// copy exits non-zero, and the resolution and spawn errors of
    /// [`Self::exec_command_async`].
    pub async fn fetch_file_async(
        &mut self,
        source: &Utf8Path,
        destination: &Utf8Path,
    ) -> Result<()> {
        self.ensure_connected();
        debug!(host = %self.container, "FETCH {source} TO {destination}");

        host_paths::ensure_parent_dir(destination)?;

        let copy = self.invocation(
            Tool::Engine,
            copy_out_args(&self.container, source, destination),
        )?;
        let output = self.run(&copy).await?;
        if !output.success() {
            return Err(ConnectionError::FetchFailed {
                source_path: source.to_string(),
                dest_path: destination.to_string(),
                container: self.container.clone(),
                stderr: output.stderr_lossy(),
            }
            .into());
        }

        Ok(())
    }
}

impl<R: CommandRunner, E: mockable::Env> Transport for ToolboxConnection<'_, R, E> {
    fn transport_name(&self) -> &'static str {
        TRANSPORT_NAME
    }

    fn has_pipelining(&self) -> bool {
        false
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn connect(&mut self) -> Result<()> {
        self.connected = true;
        Ok(())
    }

    fn exec_command(&mut self, command: &str, in_data: Option<&[u8]>) -> Result<ProcessOutput> {
        let runtime = self.runtime.clone();
        runtime.block_on(self.exec_command_async(command, in_data))
    }

    fn put_file(&mut self, source: &Utf8Path, destination: &Utf8Path) -> Result<()> {
        let runtime = self.runtime.clone();
        runtime.block_on(self.put_file_async(source, destination))
    }

    fn fetch_file(&mut self, source: &Utf8Path, destination: &Utf8Path) -> Result<()> {
        let runtime = self.runtime.clone();
        runtime.block_on(self.fetch_file_async(source, destination))
    }

    fn close(&mut self) -> Result<()> {
        self.connected = false;
        Ok(())
    }
}
