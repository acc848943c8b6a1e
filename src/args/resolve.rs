// src/args/resolve.rs

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use super::{display_key, ArgMap, GLOBAL_NAMESPACE};
use crate::errors::{Result, TaskweaveError};
use crate::task::{name_key, Task};

/// Per-task argument maps for a whole run, plus the supplied keys nobody used.
#[derive(Debug, Clone, Default)]
pub struct ResolvedArgs {
    per_task: HashMap<String, BTreeMap<String, String>>,
    unused: Vec<String>,
}

impl ResolvedArgs {
    /// Arguments bound for `task` (empty if it declares none).
    pub fn for_task(&self, task: &str) -> BTreeMap<String, String> {
        self.per_task
            .get(&name_key(task))
            .cloned()
            .unwrap_or_default()
    }

    /// Supplied keys no task consulted, as `name` or `namespace:name`.
    pub fn unused(&self) -> &[String] {
        &self.unused
    }
}

/// Bind and validate the declared arguments of one task.
///
/// The task's own namespace wins over the global scope. A validator sees the
/// empty string when neither scope has a value; a key that was not supplied
/// stays absent from the returned map.
pub fn args_for_task(task: &Task, args: &ArgMap) -> Result<BTreeMap<String, String>> {
    let mut bound = BTreeMap::new();

    for declared in task.declared_args() {
        let value = args
            .get(task.name(), &declared.name)
            .or_else(|| args.get(GLOBAL_NAMESPACE, &declared.name));

        if let Some(validator) = &declared.validator {
            validator(&declared.name, value.unwrap_or("")).map_err(|err| {
                TaskweaveError::ArgumentValidation {
                    task: task.name().to_string(),
                    arg: declared.name.clone(),
                    message: err.to_string(),
                }
            })?;
        }

        if let Some(value) = value {
            bound.insert(declared.name.clone(), value.to_string());
        }
    }

    Ok(bound)
}

/// Supplied keys not consulted by any of `tasks`, sorted.
///
/// A namespaced key counts as used when its task declares the argument; a
/// global key counts as used when some task declaring the argument had no
/// namespaced value for it.
pub fn unused_args<'a, I>(tasks: I, args: &ArgMap) -> Vec<String>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut used: HashSet<(String, String)> = HashSet::new();

    for task in tasks {
        for declared in task.declared_args() {
            if args.get(task.name(), &declared.name).is_some() {
                used.insert((task.key(), declared.name.clone()));
            } else if args.get(GLOBAL_NAMESPACE, &declared.name).is_some() {
                used.insert((GLOBAL_NAMESPACE.to_string(), declared.name.clone()));
            }
        }
    }

    args.keys()
        .filter(|(ns, name)| !used.contains(&(ns.to_string(), name.to_string())))
        .map(|(ns, name)| display_key(ns, name))
        .collect()
}

/// Resolve arguments for every task of a run and collect unused keys.
///
/// The first validation failure aborts resolution.
pub fn resolve_args<'a, I>(tasks: I, args: &ArgMap) -> Result<ResolvedArgs>
where
    I: IntoIterator<Item = &'a Task> + Clone,
{
    let mut per_task = HashMap::new();

    for task in tasks.clone() {
        let bound = args_for_task(task, args)?;
        debug!(task = %task.name(), args = ?bound, "resolved task arguments");
        per_task.insert(task.key(), bound);
    }

    Ok(ResolvedArgs {
        per_task,
        unused: unused_args(tasks, args),
    })
}
