// src/task/mod.rs

//! Task model and declaration API.
//!
//! - [`builder`] holds the fluent draft that is frozen into a [`Task`].
//! - [`registry`] owns every declared task plus run-wide options.
//! - [`executor`] defines the unit-of-work contract and closure adapters.
//! - [`context`] is the per-invocation context handed to an executor.
//! - [`validators`] provides argument validators.

pub mod builder;
pub mod context;
pub mod executor;
pub mod registry;
pub mod validators;

use std::fmt;
use std::sync::Arc;

pub use builder::TaskBuilder;
pub use context::TaskContext;
pub use executor::{Executor, TaskFuture};
pub use registry::{Registry, RegistryOptions};
pub use validators::ArgValidator;

/// Display name of a task (case preserved).
pub type TaskName = String;

/// Case-insensitive lookup key for a task name.
pub fn name_key(name: &str) -> String {
    name.to_lowercase()
}

/// What happens when the engine reaches a task in the run order.
#[derive(Clone, Default)]
pub enum TaskAction {
    /// Pure grouping task: occupies a slot in the order but never runs.
    #[default]
    Aggregate,
    Runnable(Arc<dyn Executor>),
}

impl fmt::Debug for TaskAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskAction::Aggregate => f.write_str("Aggregate"),
            TaskAction::Runnable(_) => f.write_str("Runnable(..)"),
        }
    }
}

/// An argument a task accepts from the CLI.
#[derive(Clone)]
pub struct DeclaredArg {
    pub name: String,
    pub validator: Option<ArgValidator>,
}

impl DeclaredArg {
    /// An argument is required when its validator rejects the empty value.
    pub fn is_required(&self) -> bool {
        match &self.validator {
            Some(validator) => validator(&self.name, "").is_err(),
            None => false,
        }
    }
}

impl fmt::Debug for DeclaredArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeclaredArg")
            .field("name", &self.name)
            .field("validated", &self.validator.is_some())
            .finish()
    }
}

/// Immutable task record owned by a [`Registry`].
#[derive(Debug, Clone)]
pub struct Task {
    pub(crate) name: TaskName,
    pub(crate) description: String,
    pub(crate) dependencies: Vec<TaskName>,
    pub(crate) declared_args: Vec<DeclaredArg>,
    pub(crate) action: TaskAction,
    pub(crate) finally: Vec<TaskName>,
    pub(crate) hidden: bool,
    pub(crate) continue_on_error: bool,
    pub(crate) skip_finally_on_error: bool,
}

impl Task {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> String {
        name_key(&self.name)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn dependencies(&self) -> &[TaskName] {
        &self.dependencies
    }

    pub fn declared_args(&self) -> &[DeclaredArg] {
        &self.declared_args
    }

    pub fn executor(&self) -> Option<&Arc<dyn Executor>> {
        match &self.action {
            TaskAction::Aggregate => None,
            TaskAction::Runnable(executor) => Some(executor),
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self.action, TaskAction::Aggregate)
    }

    pub fn finally(&self) -> &[TaskName] {
        &self.finally
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn continue_on_error(&self) -> bool {
        self.continue_on_error
    }

    pub fn skip_finally_on_error(&self) -> bool {
        self.skip_finally_on_error
    }

    /// First declared argument that cannot be satisfied by an empty value.
    pub fn first_required_arg(&self) -> Option<&DeclaredArg> {
        self.declared_args.iter().find(|arg| arg.is_required())
    }
}
