// src/dag/mod.rs

//! Task graph resolution.
//!
//! - [`graph`] expands requested task names into the required set of nodes.
//! - [`sort`] orders those nodes with Kahn's algorithm (FIFO tie-break).
//! - [`finally`] validates `finally` clauses and accumulates finalizer names.
//!
//! The finalizer phase is not special-cased: the accumulated names are fed
//! back through [`sort_tasks_to_run`] like any other request.

pub mod finally;
pub mod graph;
pub mod sort;

use std::sync::Arc;

use crate::errors::Result;
use crate::task::{Task, TaskName};

pub use finally::{accumulate_finally, FinallyValidator};
pub use graph::{GraphNode, TaskGraph};
pub use sort::toposort;

/// Result of building and sorting a graph for a set of requested names.
#[derive(Debug, Clone)]
pub struct SortedRun {
    /// Every required task, dependencies first.
    pub tasks: Vec<Arc<Task>>,
    /// Tasks with a non-empty `finally` clause, in discovery order.
    pub finally_owners: Vec<Arc<Task>>,
}

impl SortedRun {
    pub fn task_names(&self) -> Vec<TaskName> {
        self.tasks.iter().map(|t| t.name().to_string()).collect()
    }

    /// Accumulated finalizer names, skipping owners for which `skip` holds.
    pub fn finally_names<F>(&self, skip: F) -> Vec<TaskName>
    where
        F: Fn(&Task) -> bool,
    {
        accumulate_finally(
            self.finally_owners
                .iter()
                .map(Arc::as_ref)
                .filter(|&owner| !skip(owner)),
        )
    }
}

/// Build the graph for `requested` and sort it.
pub fn sort_tasks_to_run<S: AsRef<str>>(tasks: &[Arc<Task>], requested: &[S]) -> Result<SortedRun> {
    TaskGraph::build(tasks, requested)?.sort()
}
