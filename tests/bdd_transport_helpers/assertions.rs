//! Then-step assertions for toolbox transport scenarios.

use rstest_bdd_macros::then;
use toolbox_connection::engine::ToolInvocation;

use super::state::{TransportOutcome, TransportState};
use super::steps::StepResult;

fn recorded_outcome(transport_state: &TransportState) -> StepResult<TransportOutcome> {
    transport_state
        .outcome
        .get()
        .ok_or_else(|| String::from("transport outcome should be recorded"))
}

fn recorded_invocations(transport_state: &TransportState) -> StepResult<Vec<ToolInvocation>> {
    transport_state
        .invocations
        .get()
        .ok_or_else(|| String::from("invocations should be recorded"))
}

fn invocation_at(transport_state: &TransportState, index: usize) -> StepResult<ToolInvocation> {
    recorded_invocations(transport_state)?
        .get(index)
        .cloned()
        .ok_or_else(|| format!("expected an invocation at position {index}"))
}

fn program_name(invocation: &ToolInvocation) -> String {
    invocation
        .program()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[then("the toolbox was invoked with {args}")]
fn toolbox_invoked_with(transport_state: &TransportState, args: String) -> StepResult<()> {
    let invocation = invocation_at(transport_state, 0)?;
    let expected: Vec<&str> = args.split_whitespace().collect();

    if program_name(&invocation) != "distrobox" {
        return Err(format!("expected distrobox, ran {}", invocation.program().display()));
    }
    if invocation.args() != expected.as_slice() {
        return Err(format!("expected {expected:?}, got {:?}", invocation.args()));
    }
    Ok(())
}

#[then("the toolbox received input {input}")]
fn toolbox_received_input(transport_state: &TransportState, input: String) -> StepResult<()> {
    let invocation = invocation_at(transport_state, 0)?;
    match invocation.stdin() {
        Some(bytes) if bytes == input.as_bytes() => Ok(()),
        other => Err(format!("expected input {input:?}, got {other:?}")),
    }
}

#[then("the reported exit code is {code}")]
fn reported_exit_code_is(transport_state: &TransportState, code: i32) -> StepResult<()> {
    match recorded_outcome(transport_state)? {
        TransportOutcome::Completed { exit_code, .. } if exit_code == code => Ok(()),
        TransportOutcome::Completed { exit_code, .. } => {
            Err(format!("expected exit code {code}, got {exit_code}"))
        }
        TransportOutcome::Failed { message } => Err(format!(
            "expected completion with exit code {code}, got failure: {message}"
        )),
    }
}

#[then("the reported standard error is {text}")]
fn reported_stderr_is(transport_state: &TransportState, text: String) -> StepResult<()> {
    match recorded_outcome(transport_state)? {
        TransportOutcome::Completed { stderr, .. } if stderr == text => Ok(()),
        TransportOutcome::Completed { stderr, .. } => {
            Err(format!("expected standard error {text:?}, got {stderr:?}"))
        }
        TransportOutcome::Failed { message } => {
            Err(format!("expected completion, got failure: {message}"))
        }
    }
}

#[then("the operation fails mentioning {text}")]
fn operation_fails_mentioning(transport_state: &TransportState, text: String) -> StepResult<()> {
    match recorded_outcome(transport_state)? {
        TransportOutcome::Failed { message } if message.contains(&text) => Ok(()),
        TransportOutcome::Failed { message } => {
            Err(format!("expected failure mentioning {text:?}, got: {message}"))
        }
        TransportOutcome::Completed { exit_code, .. } => Err(format!(
            "expected failure, got completion with exit code {exit_code}"
        )),
    }
}

#[then("no tool was invoked")]
fn no_tool_was_invoked(transport_state: &TransportState) -> StepResult<()> {
    let invocations = recorded_invocations(transport_state)?;
    if invocations.is_empty() {
        Ok(())
    } else {
        Err(format!("expected no invocations, got {invocations:?}"))
    }
}

#[then("{count} tool invocation was made")]
fn tool_invocation_count(transport_state: &TransportState, count: usize) -> StepResult<()> {
    let made = recorded_invocations(transport_state)?.len();
    if made == count {
        Ok(())
    } else {
        Err(format!("expected {count} invocations, got {made}"))
    }
}

#[then("the engine copied the host file to {target}")]
fn engine_copied_in(transport_state: &TransportState, target: String) -> StepResult<()> {
    let invocation = invocation_at(transport_state, 0)?;
    match invocation.args() {
        [cp, _, dest] if program_name(&invocation) == "podman" && cp == "cp" && *dest == target => {
            Ok(())
        }
        other => Err(format!("expected podman cp <file> {target}, got {other:?}")),
    }
}

#[then("the engine copied {source} to the host")]
fn engine_copied_out(transport_state: &TransportState, source: String) -> StepResult<()> {
    let invocation = invocation_at(transport_state, 0)?;
    match invocation.args() {
        [cp, src, _] if program_name(&invocation) == "podman" && cp == "cp" && *src == source => {
            Ok(())
        }
        other => Err(format!("expected podman cp {source} <file>, got {other:?}")),
    }
}

#[then("the engine changed the owner of {path} to {user}")]
fn engine_changed_owner(
    transport_state: &TransportState,
    path: String,
    user: String,
) -> StepResult<()> {
    let invocation = invocation_at(transport_state, 1)?;
    let container = transport_state
        .container
        .get()
        .ok_or_else(|| String::from("container should be configured"))?;
    let expected = ["exec", container.as_str(), "chown", user.as_str(), path.as_str()];
    if program_name(&invocation) == "podman" && invocation.args() == expected.as_slice() {
        Ok(())
    } else {
        Err(format!("expected podman {expected:?}, got {:?}", invocation.args()))
    }
}
