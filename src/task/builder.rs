// src/task/builder.rs

//! Fluent task declaration.
//!
//! `Registry::declare` hands out a [`TaskBuilder`] that owns a private draft.
//! Every call mutates the draft only; when the builder is dropped (at the end
//! of the declaring statement) the draft is frozen into an immutable [`Task`]
//! and handed to the registry.

use std::future::Future;
use std::sync::Arc;

use super::executor::{AsyncFnExecutor, Executor, FnExecutor};
use super::registry::Registry;
use super::validators::{self, ArgValidator};
use super::{DeclaredArg, Task, TaskAction, TaskContext, TaskName};

#[derive(Debug, Default)]
struct TaskDraft {
    name: TaskName,
    description: String,
    dependencies: Vec<TaskName>,
    declared_args: Vec<DeclaredArg>,
    action: TaskAction,
    finally: Vec<TaskName>,
    hidden: bool,
    continue_on_error: bool,
    skip_finally_on_error: bool,
}

impl TaskDraft {
    fn freeze(self) -> Task {
        Task {
            name: self.name,
            description: self.description,
            dependencies: self.dependencies,
            declared_args: self.declared_args,
            action: self.action,
            finally: self.finally,
            hidden: self.hidden,
            continue_on_error: self.continue_on_error,
            skip_finally_on_error: self.skip_finally_on_error,
        }
    }
}

/// Builder for one task. Registers the task when dropped.
pub struct TaskBuilder<'r> {
    registry: &'r mut Registry,
    draft: TaskDraft,
}

impl<'r> TaskBuilder<'r> {
    pub(crate) fn new(registry: &'r mut Registry, name: TaskName) -> Self {
        Self {
            registry,
            draft: TaskDraft {
                name,
                ..TaskDraft::default()
            },
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.draft.description = description.into();
        self
    }

    /// Tasks that must run before this one. Repeated calls append.
    pub fn depends_on<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft
            .dependencies
            .extend(names.into_iter().map(Into::into));
        self
    }

    /// Tasks to run once after the whole requested run has finished.
    pub fn finally<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.draft.finally.extend(names.into_iter().map(Into::into));
        self
    }

    /// Drop this task's finally tasks if the task itself fails.
    pub fn skip_finally_on_error(mut self) -> Self {
        self.draft.skip_finally_on_error = true;
        self
    }

    /// Keep running later tasks if this one fails.
    pub fn continue_on_error(mut self) -> Self {
        self.draft.continue_on_error = true;
        self
    }

    pub fn required_arg(self, name: impl Into<String>) -> Self {
        self.arg(name, validators::required())
    }

    pub fn optional_arg(mut self, name: impl Into<String>) -> Self {
        self.draft.declared_args.push(DeclaredArg {
            name: name.into(),
            validator: None,
        });
        self
    }

    /// Declare an argument checked by a custom validator.
    pub fn arg(mut self, name: impl Into<String>, validator: ArgValidator) -> Self {
        self.draft.declared_args.push(DeclaredArg {
            name: name.into(),
            validator: Some(validator),
        });
        self
    }

    /// Keep the task out of the help listing.
    pub fn hide(mut self) -> Self {
        self.draft.hidden = true;
        self
    }

    /// Attach any [`Executor`] as the task body.
    pub fn executor(mut self, executor: impl Executor + 'static) {
        self.draft.action = TaskAction::Runnable(Arc::new(executor));
    }

    /// Attach a synchronous body.
    pub fn run<F>(self, body: F)
    where
        F: Fn(&mut TaskContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.executor(FnExecutor(body));
    }

    /// Attach an asynchronous body.
    pub fn run_async<F, Fut>(self, body: F)
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.executor(AsyncFnExecutor(body));
    }
}

impl Drop for TaskBuilder<'_> {
    fn drop(&mut self) {
        let draft = std::mem::take(&mut self.draft);
        self.registry.insert(draft.freeze());
    }
}
