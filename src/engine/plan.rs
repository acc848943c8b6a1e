// src/engine/plan.rs

//! Pre-execution planning.
//!
//! Everything that can reject a run happens here, before any task body runs:
//! graph expansion, sorting, finalizer validation, argument validation and
//! the unused-argument policy.

use std::sync::Arc;

use tracing::debug;

use crate::args::{resolve_args, ResolvedArgs};
use crate::cli::Invocation;
use crate::dag::{sort_tasks_to_run, SortedRun};
use crate::errors::{Result, TaskweaveError};
use crate::task::{Registry, Task, TaskName};
use crate::types::UnusedArgsPolicy;

#[derive(Debug, Clone)]
pub struct ExecutionPlan {
    /// Requested tasks and their dependencies, dependencies first.
    pub primary: SortedRun,
    /// Every finalizer that could run, assuming no owner is skipped.
    pub finalizer_candidates: SortedRun,
    /// Arguments for the primary run and every candidate finalizer.
    pub args: ResolvedArgs,
}

impl ExecutionPlan {
    pub fn prepare(registry: &Registry, invocation: &Invocation) -> Result<Self> {
        let primary = sort_tasks_to_run(registry.tasks(), invocation.task_names.as_slice())?;
        debug!(order = ?primary.task_names(), "sorted primary run");

        let candidate_names = primary.finally_names(|_| false);
        let finalizer_candidates = sort_tasks_to_run(registry.tasks(), candidate_names.as_slice())?;
        debug!(
            finalizers = ?finalizer_candidates.task_names(),
            "sorted candidate finalizers"
        );

        let executed = primary
            .tasks
            .iter()
            .chain(finalizer_candidates.tasks.iter())
            .map(Arc::as_ref);
        let args = resolve_args(executed, &invocation.args)?;

        if !args.unused().is_empty() && registry.options().unused_args == UnusedArgsPolicy::Error
        {
            return Err(TaskweaveError::UnusedArguments(args.unused().to_vec()));
        }

        Ok(Self {
            primary,
            finalizer_candidates,
            args,
        })
    }

    /// Finalizers to run once the primary phase is over.
    ///
    /// Owners for which `failed` holds and that skip their finalizers on
    /// error contribute nothing; every other owner contributes its list,
    /// whether or not it got to run.
    pub fn finalizers<F>(&self, registry: &Registry, failed: F) -> Result<Vec<Arc<Task>>>
    where
        F: Fn(&Task) -> bool,
    {
        let names: Vec<TaskName> = self
            .primary
            .finally_names(|owner| owner.skip_finally_on_error() && failed(owner));
        Ok(sort_tasks_to_run(registry.tasks(), names.as_slice())?.tasks)
    }
}
