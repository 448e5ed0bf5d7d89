//! Worker lifecycle states.

use std::fmt;

/// Lifecycle of an offline worker.
///
/// Mirrors the service worker state machine: a worker is built idle,
/// installs its app shell, waits for the activation signal, evicts prior
/// generations, and only then serves fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    /// Built but not yet installed. Also the state after a failed install,
    /// so the host may retry.
    Idle,
    /// Precaching the manifest.
    Installing,
    /// Install finished; waiting for activation.
    Installed,
    /// Evicting stale stores.
    Activating,
    /// Serving requests.
    Active,
}

impl WorkerState {
    /// Whether an install may begin from this state.
    pub fn can_install(self) -> bool {
        matches!(self, WorkerState::Idle)
    }

    /// Whether an activation may begin from this state.
    pub fn can_activate(self) -> bool {
        matches!(self, WorkerState::Installed)
    }
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Idle => "idle",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Active => "active",
        };
        f.write_str(name)
    }
}
