//! Scenario state for toolbox transport behavioural tests.

use std::sync::Arc;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;
use toolbox_connection::engine::ToolInvocation;

#[derive(Debug, Clone)]
pub(crate) enum TransportOutcome {
    Completed {
        exit_code: i32,
        stderr: String,
    },
    Failed {
        message: String,
    },
}

#[derive(Default, ScenarioState)]
pub(crate) struct TransportState {
    pub(crate) container: Slot<String>,
    pub(crate) remote_user: Slot<String>,
    pub(crate) exit_code: Slot<i32>,
    pub(crate) stderr: Slot<String>,
    pub(crate) toolbox_missing: Slot<bool>,
    pub(crate) workspace: Slot<Arc<TempDir>>,
    pub(crate) invocations: Slot<Vec<ToolInvocation>>,
    pub(crate) outcome: Slot<TransportOutcome>,
}

#[fixture]
pub(crate) fn transport_state() -> TransportState {
    let state = TransportState::default();
    state.exit_code.set(0);
    state.stderr.set(String::new());
    state.toolbox_missing.set(false);
    state
}
