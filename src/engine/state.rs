// src/engine/state.rs

//! Per-run task state ledger.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::task::{name_key, Task, TaskName};

/// State of a task within one run.
///
/// `Pending -> Running -> {Succeeded, Failed}`. Aggregate tasks and tasks
/// never reached (after a stop) stay `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Failed)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    name: TaskName,
    key: String,
    state: TaskState,
}

/// States of every task of the primary run, in run order.
#[derive(Debug, Clone, Default)]
pub struct RunLedger {
    entries: Vec<Entry>,
    failed: Vec<TaskName>,
}

impl RunLedger {
    pub fn new(order: &[Arc<Task>]) -> Self {
        let entries = order
            .iter()
            .map(|task| Entry {
                name: task.name().to_string(),
                key: task.key(),
                state: TaskState::Pending,
            })
            .collect();
        Self {
            entries,
            failed: Vec::new(),
        }
    }

    pub fn state(&self, name: &str) -> Option<TaskState> {
        let key = name_key(name);
        self.entries.iter().find(|e| e.key == key).map(|e| e.state)
    }

    pub fn start(&mut self, name: &str) {
        self.transition(name, TaskState::Pending, TaskState::Running);
    }

    pub fn succeed(&mut self, name: &str) {
        self.transition(name, TaskState::Running, TaskState::Succeeded);
    }

    pub fn fail(&mut self, name: &str) {
        if self.transition(name, TaskState::Running, TaskState::Failed) {
            self.failed.push(name.to_string());
        }
    }

    /// Names of failed tasks, in failure order.
    pub fn failed(&self) -> &[TaskName] {
        &self.failed
    }

    pub fn has_failed(&self, name: &str) -> bool {
        self.state(name) == Some(TaskState::Failed)
    }

    pub fn states(&self) -> Vec<(TaskName, TaskState)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.state))
            .collect()
    }

    fn transition(&mut self, name: &str, from: TaskState, to: TaskState) -> bool {
        let key = name_key(name);
        let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) else {
            warn!(task = %name, "state change for a task outside the run");
            return false;
        };

        if entry.state != from {
            warn!(
                task = %name,
                current = ?entry.state,
                expected = ?from,
                next = ?to,
                "ignoring invalid state transition"
            );
            return false;
        }

        debug!(task = %name, from = ?from, to = ?to, "task state changed");
        entry.state = to;
        true
    }
}
