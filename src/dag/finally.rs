// src/dag/finally.rs

//! Validation and accumulation of `finally` clauses.
//!
//! A finalizer runs once after the whole requested run. It executes without
//! task-specific argument binding and cannot schedule finalizers of its own,
//! so a task named in any `finally` clause must:
//! - resolve to a declared task,
//! - have an empty `finally` list,
//! - have no required argument,
//! - and satisfy the same rules through all of its dependencies.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::dag::graph::TaskIndex;
use crate::errors::{FinallyViolation, Result, TaskweaveError};
use crate::task::{name_key, Task, TaskName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

/// Three-state marks shared across one graph build, so a finalizer named by
/// several owners is only checked once. Unvisited names have no entry.
#[derive(Debug, Default)]
pub struct FinallyValidator {
    marks: HashMap<String, Mark>,
}

impl FinallyValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the `finally` clause declared by `owner`.
    pub fn validate_owner(&mut self, index: &TaskIndex<'_>, owner: &Task) -> Result<()> {
        if owner.finally().is_empty() {
            return Ok(());
        }
        if owner.is_aggregate() {
            return Err(TaskweaveError::FinallyConfiguration {
                task: owner.name().to_string(),
                violation: FinallyViolation::AggregateOwner,
            });
        }
        self.validate_names(index, owner.finally())
    }

    fn validate_names(&mut self, index: &TaskIndex<'_>, names: &[TaskName]) -> Result<()> {
        for name in names {
            let key = name_key(name);
            match self.marks.get(&key) {
                Some(Mark::Done) => continue,
                Some(Mark::InProgress) => {
                    return Err(TaskweaveError::FinallyCycle(name.clone()));
                }
                None => {}
            }

            self.marks.insert(key.clone(), Mark::InProgress);

            let task = index
                .get(&key)
                .ok_or_else(|| TaskweaveError::TaskNotFound(name.clone()))?;

            if !task.finally().is_empty() {
                return Err(TaskweaveError::FinallyConfiguration {
                    task: task.name().to_string(),
                    violation: FinallyViolation::Chained,
                });
            }
            if let Some(arg) = task.first_required_arg() {
                return Err(TaskweaveError::FinallyConfiguration {
                    task: task.name().to_string(),
                    violation: FinallyViolation::RequiredArgument(arg.name.clone()),
                });
            }

            self.validate_names(index, task.dependencies())?;

            debug!(task = %task.name(), "finalizer validated");
            self.marks.insert(key, Mark::Done);
        }
        Ok(())
    }
}

/// Merge the `finally` lists of `owners` (given in discovery order).
///
/// Each owner's list is prepended as a block, so later owners come first;
/// duplicates are then dropped keeping the first occurrence.
pub fn accumulate_finally<'a, I>(owners: I) -> Vec<TaskName>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut names: Vec<TaskName> = Vec::new();
    for owner in owners {
        let mut block = owner.finally().to_vec();
        block.append(&mut names);
        names = block;
    }

    let mut seen = HashSet::new();
    names.retain(|name| seen.insert(name_key(name)));
    names
}
