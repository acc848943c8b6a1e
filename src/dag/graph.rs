// src/dag/graph.rs

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use tracing::debug;

use crate::dag::finally::FinallyValidator;
use crate::dag::sort::toposort;
use crate::dag::SortedRun;
use crate::errors::{Result, TaskweaveError};
use crate::task::{name_key, Task};

/// Lowercased name -> declared task.
pub type TaskIndex<'a> = HashMap<String, &'a Arc<Task>>;

pub fn index_tasks(tasks: &[Arc<Task>]) -> TaskIndex<'_> {
    tasks.iter().map(|t| (t.key(), t)).collect()
}

/// A task plus the keys of the dependencies it still waits on.
#[derive(Debug, Clone)]
pub struct GraphNode {
    pub task: Arc<Task>,
    /// Lowercased dependency names, each listed once.
    pub edges: Vec<String>,
}

impl GraphNode {
    pub fn new(task: Arc<Task>) -> Self {
        let mut seen = HashSet::new();
        let edges = task
            .dependencies()
            .iter()
            .map(|dep| name_key(dep))
            .filter(|key| seen.insert(key.clone()))
            .collect();
        Self { task, edges }
    }
}

/// The subset of declared tasks required by a request, in discovery order.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    nodes: Vec<GraphNode>,
    finally_owners: Vec<Arc<Task>>,
}

impl TaskGraph {
    /// Breadth-first expansion of `requested` through dependency edges.
    ///
    /// Each task is expanded (and has its `finally` clause validated) once,
    /// however many paths reach it. Unknown names fail the whole build.
    pub fn build<S: AsRef<str>>(tasks: &[Arc<Task>], requested: &[S]) -> Result<Self> {
        let index = index_tasks(tasks);
        let mut validator = FinallyValidator::new();

        let mut queue: VecDeque<String> =
            requested.iter().map(|s| s.as_ref().to_string()).collect();
        let mut seen: HashSet<String> = HashSet::new();
        let mut nodes = Vec::new();
        let mut finally_owners = Vec::new();

        while let Some(name) = queue.pop_front() {
            let key = name_key(&name);
            let task = *index
                .get(&key)
                .ok_or_else(|| TaskweaveError::TaskNotFound(name.clone()))?;

            if !seen.insert(key) {
                continue;
            }

            validator.validate_owner(&index, task)?;
            if !task.finally().is_empty() {
                finally_owners.push(Arc::clone(task));
            }

            debug!(task = %task.name(), deps = ?task.dependencies(), "expanded task");
            nodes.push(GraphNode::new(Arc::clone(task)));
            queue.extend(task.dependencies().iter().cloned());
        }

        Ok(Self {
            nodes,
            finally_owners,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn sort(self) -> Result<SortedRun> {
        let tasks = toposort(self.nodes)?;
        Ok(SortedRun {
            tasks,
            finally_owners: self.finally_owners,
        })
    }
}
