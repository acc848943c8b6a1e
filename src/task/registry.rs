// src/task/registry.rs

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use super::builder::TaskBuilder;
use super::{name_key, Task};
use crate::errors::{Result, TaskweaveError};
use crate::types::{FailurePolicy, UnusedArgsPolicy};

/// Run-wide switches stored alongside the declared tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryOptions {
    /// Bind un-namespaced flags that follow a task token to that task.
    #[serde(default)]
    pub auto_namespace: bool,

    #[serde(default)]
    pub unused_args: UnusedArgsPolicy,

    #[serde(default)]
    pub on_failure: FailurePolicy,
}

/// Append-only collection of declared tasks.
///
/// Tasks are kept in declaration order (used by the help listing) and indexed
/// by lowercased name for lookups.
#[derive(Debug, Default)]
pub struct Registry {
    tasks: Vec<Arc<Task>>,
    index: HashMap<String, usize>,
    options: RegistryOptions,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RegistryOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> RegistryOptions {
        self.options
    }

    /// Start declaring a task.
    ///
    /// Fails if the name is unusable from the CLI or already declared under
    /// any casing.
    pub fn declare(&mut self, name: impl Into<String>) -> Result<TaskBuilder<'_>> {
        let name = name.into();
        validate_task_name(&name)?;

        if let Some(existing) = self.get(&name) {
            return Err(TaskweaveError::DuplicateTask {
                name,
                existing: existing.name().to_string(),
            });
        }

        Ok(TaskBuilder::new(self, name))
    }

    /// All declared tasks in declaration order.
    pub fn tasks(&self) -> &[Arc<Task>] {
        &self.tasks
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&Arc<Task>> {
        self.index.get(&name_key(name)).map(|&i| &self.tasks[i])
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn insert(&mut self, task: Task) {
        debug!(
            task = %task.name(),
            deps = ?task.dependencies(),
            aggregate = task.is_aggregate(),
            "registered task"
        );
        self.index.insert(task.key(), self.tasks.len());
        self.tasks.push(Arc::new(task));
    }
}

fn validate_task_name(name: &str) -> Result<()> {
    let unusable = name.is_empty()
        || name.starts_with('-')
        || name.starts_with('/')
        || name.contains('=')
        || name.chars().any(char::is_whitespace);

    if unusable {
        return Err(TaskweaveError::InvalidTaskName(name.to_string()));
    }
    Ok(())
}
