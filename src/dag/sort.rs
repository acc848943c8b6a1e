// src/dag/sort.rs

use std::collections::VecDeque;
use std::sync::Arc;

use crate::dag::graph::GraphNode;
use crate::errors::{Result, TaskweaveError};
use crate::task::Task;

/// Kahn's algorithm over graph nodes.
///
/// The queue is seeded with edge-free nodes in node order. Each dequeued task
/// is removed from every node's edge list (again in node order), and nodes
/// whose list becomes empty join the back of the queue. Ties are therefore
/// broken by discovery order, and the same input always sorts the same way.
///
/// Nodes left with edges once the queue drains form or wait on a cycle;
/// the whole sort fails with [`TaskweaveError::CycleDetected`].
pub fn toposort(mut nodes: Vec<GraphNode>) -> Result<Vec<Arc<Task>>> {
    let mut queue: VecDeque<usize> = nodes
        .iter()
        .enumerate()
        .filter(|(_, n)| n.edges.is_empty())
        .map(|(i, _)| i)
        .collect();

    let mut sorted = Vec::with_capacity(nodes.len());

    while let Some(i) = queue.pop_front() {
        let done = nodes[i].task.key();
        sorted.push(Arc::clone(&nodes[i].task));

        for (j, node) in nodes.iter_mut().enumerate() {
            if let Some(pos) = node.edges.iter().position(|e| *e == done) {
                node.edges.remove(pos);
                if node.edges.is_empty() {
                    queue.push_back(j);
                }
            }
        }
    }

    let stuck: Vec<_> = nodes
        .iter()
        .filter(|n| !n.edges.is_empty())
        .map(|n| n.task.name().to_string())
        .collect();

    if !stuck.is_empty() {
        return Err(TaskweaveError::CycleDetected(stuck));
    }

    Ok(sorted)
}
