// src/engine/mod.rs

//! Execution engine.
//!
//! - [`plan`] does all pre-execution work and can reject a run.
//! - [`state`] tracks per-task states for one run.
//! - [`runtime`] is the async shell: it drives executors, writes progress
//!   lines to the sink and produces a [`RunReport`].

pub mod plan;
pub mod runtime;
pub mod state;

use std::time::Duration;

use crate::errors::{Result, TaskweaveError};
use crate::task::{name_key, TaskName};

pub use plan::ExecutionPlan;
pub use runtime::Engine;
pub use state::{RunLedger, TaskState};

/// Summary of a finished run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Primary run order, dependencies first.
    pub order: Vec<TaskName>,
    /// Final state of every task in `order`.
    pub states: Vec<(TaskName, TaskState)>,
    /// Failed primary tasks, in failure order.
    pub failed: Vec<TaskName>,
    /// Cancellation stopped the primary phase before every task ran.
    pub cancelled: bool,
    /// Finalizers that were invoked.
    pub finalizers_run: Vec<TaskName>,
    /// Finalizers that returned an error. These never fail the run.
    pub finalizer_failures: Vec<TaskName>,
    /// Supplied argument keys no task consulted.
    pub unused_args: Vec<String>,
    pub duration: Duration,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty() && !self.cancelled
    }

    pub fn state_of(&self, task: &str) -> Option<TaskState> {
        let key = name_key(task);
        self.states
            .iter()
            .find(|(name, _)| name_key(name) == key)
            .map(|(_, state)| *state)
    }

    /// Tasks that actually ran (succeeded or failed), in run order.
    pub fn executed(&self) -> Vec<TaskName> {
        self.states
            .iter()
            .filter(|(_, state)| state.is_terminal())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Turn a failed run into [`TaskweaveError::TaskExecution`], or a run
    /// stopped early with no failures into [`TaskweaveError::Cancelled`].
    pub fn into_result(self) -> Result<RunReport> {
        if self.is_success() {
            Ok(self)
        } else if self.failed.is_empty() {
            Err(TaskweaveError::Cancelled)
        } else {
            Err(TaskweaveError::TaskExecution(self.failed))
        }
    }
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Help was requested (or no task was named); nothing ran.
    HelpShown,
    Finished(RunReport),
}

impl RunOutcome {
    pub fn report(&self) -> Option<&RunReport> {
        match self {
            RunOutcome::HelpShown => None,
            RunOutcome::Finished(report) => Some(report),
        }
    }

    /// Process exit status: `0` success, `1` help shown, `2` failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            RunOutcome::HelpShown => 1,
            RunOutcome::Finished(report) if report.is_success() => 0,
            RunOutcome::Finished(_) => 2,
        }
    }
}
