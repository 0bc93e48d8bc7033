//! Given/When steps for toolbox transport scenarios.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};
use mockable::MockEnv;
use mockall::mock;
use rstest_bdd_macros::{given, when};
use tempfile::TempDir;
use toolbox_connection::config::ConnectionConfig;
use toolbox_connection::connection::{ToolboxConnection, Transport};
use toolbox_connection::engine::{CommandRunner, ProcessOutput, RunCommandFuture, ToolInvocation};
use toolbox_connection::error::Result as ToolboxResult;

use super::state::{TransportOutcome, TransportState};

pub type StepResult<T> = Result<T, String>;

mock! {
    #[derive(Debug)]
    Runner {}

    impl CommandRunner for Runner {
        fn run(&self, invocation: &ToolInvocation) -> RunCommandFuture<'_>;
    }
}

#[given("a toolbox container named {name}")]
fn toolbox_container_named(transport_state: &TransportState, name: String) {
    transport_state.container.set(name);
}

#[given("the remote user is {user}")]
fn remote_user_is(transport_state: &TransportState, user: String) {
    transport_state.remote_user.set(user);
}

#[given("the tools exit with code {code}")]
fn tools_exit_with_code(transport_state: &TransportState, code: i32) {
    transport_state.exit_code.set(code);
}

#[given("the tools write {text} to standard error")]
fn tools_write_to_stderr(transport_state: &TransportState, text: String) {
    transport_state.stderr.set(text);
}

#[given("the toolbox executable is not installed")]
fn toolbox_not_installed(transport_state: &TransportState) {
    transport_state.toolbox_missing.set(true);
}

#[given("a host file named {name}")]
fn host_file_named(transport_state: &TransportState, name: String) -> StepResult<()> {
    let workspace = workspace(transport_state)?;
    fs::write(workspace.path().join(name), "payload")
        .map_err(|error| format!("failed to write host file: {error}"))
}

#[when("the command {command} is executed")]
fn command_is_executed(transport_state: &TransportState, command: String) -> StepResult<()> {
    drive(transport_state, |connection, _| {
        connection
            .exec_command(&command, None)
            .map(|output| completed(&output))
    })
}

#[when("the command {command} is executed with input {input}")]
fn command_is_executed_with_input(
    transport_state: &TransportState,
    command: String,
    input: String,
) -> StepResult<()> {
    drive(transport_state, |connection, _| {
        connection
            .exec_command(&command, Some(input.as_bytes()))
            .map(|output| completed(&output))
    })
}

#[when("{name} is put to {destination}")]
fn file_is_put(
    transport_state: &TransportState,
    name: String,
    destination: String,
) -> StepResult<()> {
    drive(transport_state, |connection, workspace| {
        let source = workspace.join(&name);
        connection
            .put_file(&source, Utf8Path::new(&destination))
            .map(|()| success())
    })
}

#[when("{source} is fetched to {name}")]
fn file_is_fetched(transport_state: &TransportState, source: String, name: String) -> StepResult<()> {
    drive(transport_state, |connection, workspace| {
        let destination = workspace.join(&name);
        connection
            .fetch_file(Utf8Path::new(&source), &destination)
            .map(|()| success())
    })
}

fn completed(output: &ProcessOutput) -> TransportOutcome {
    TransportOutcome::Completed {
        exit_code: output.exit_code(),
        stderr: output.stderr_lossy(),
    }
}

const fn success() -> TransportOutcome {
    TransportOutcome::Completed {
        exit_code: 0,
        stderr: String::new(),
    }
}

fn workspace(transport_state: &TransportState) -> StepResult<Arc<TempDir>> {
    if let Some(existing) = transport_state.workspace.get() {
        return Ok(existing);
    }
    let created = Arc::new(
        tempfile::tempdir().map_err(|error| format!("failed to create workspace: {error}"))?,
    );
    transport_state.workspace.set(Arc::clone(&created));
    Ok(created)
}

fn install_stub(dir: &Path, name: &str) -> StepResult<()> {
    let path = dir.join(name);
    fs::write(&path, "#!/bin/sh\nexit 0\n")
        .map_err(|error| format!("failed to write stub {name}: {error}"))?;
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
        .map_err(|error| format!("failed to mark stub {name} executable: {error}"))
}

type Connection<'a> = ToolboxConnection<'a, MockRunner, MockEnv>;

/// Build a connection over stub tools, run `operation` and record the outcome
/// together with every invocation the runner received.
fn drive<F>(transport_state: &TransportState, operation: F) -> StepResult<()>
where
    F: FnOnce(&mut Connection<'_>, &Utf8Path) -> ToolboxResult<TransportOutcome>,
{
    let workspace = workspace(transport_state)?;
    let workspace_path = Utf8PathBuf::try_from(workspace.path().to_path_buf())
        .map_err(|error| format!("workspace path is not UTF-8: {error}"))?;

    let tools = tempfile::tempdir().map_err(|error| format!("failed to create tool dir: {error}"))?;
    install_stub(tools.path(), "podman")?;
    if !transport_state.toolbox_missing.get().unwrap_or(false) {
        install_stub(tools.path(), "distrobox")?;
    }

    let search_path = tools.path().display().to_string();
    let mut env = MockEnv::new();
    env.expect_string()
        .returning(move |key| (key == "PATH").then(|| search_path.clone()));

    let exit_code = transport_state.exit_code.get().unwrap_or(0);
    let stderr = transport_state.stderr.get().unwrap_or_default();
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    let mut runner = MockRunner::new();
    runner.expect_run().returning(move |invocation| {
        sink.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(invocation.clone());
        let output = ProcessOutput::new(exit_code, Vec::new(), stderr.clone().into_bytes());
        Box::pin(async move { Ok(output) })
    });

    let config = ConnectionConfig {
        container: transport_state.container.get(),
        remote_user: transport_state.remote_user.get(),
        ..ConnectionConfig::default()
    };
    let runtime = tokio::runtime::Runtime::new()
        .map_err(|error| format!("failed to create runtime: {error}"))?;
    let mut connection = ToolboxConnection::new(&config, runner, &env, runtime.handle().clone())
        .map_err(|error| format!("failed to build connection: {error}"))?;

    let outcome = match operation(&mut connection, &workspace_path) {
        Ok(outcome) => outcome,
        Err(error) => TransportOutcome::Failed {
            message: error.to_string(),
        },
    };
    drop(connection);

    transport_state.outcome.set(outcome);
    transport_state.invocations.set(
        recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone(),
    );
    Ok(())
}
