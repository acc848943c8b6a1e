// src/config/validate.rs

use std::collections::HashMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use regex::Regex;

use crate::config::model::{RawTaskFile, TaskFile};
use crate::errors::{Result, TaskweaveError};
use crate::task::name_key;

impl TryFrom<RawTaskFile> for TaskFile {
    type Error = TaskweaveError;

    fn try_from(raw: RawTaskFile) -> std::result::Result<Self, Self::Error> {
        validate_task_file(&raw)?;
        Ok(TaskFile::new_unchecked(raw.config, raw.task))
    }
}

pub fn validate_task_file(file: &RawTaskFile) -> Result<()> {
    ensure_has_tasks(file)?;
    let names = unique_names(file)?;
    validate_references(file, &names)?;
    validate_arg_patterns(file)?;
    validate_dag(file)?;
    Ok(())
}

fn ensure_has_tasks(file: &RawTaskFile) -> Result<()> {
    if file.task.is_empty() {
        return Err(TaskweaveError::ConfigError(
            "task file must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

/// Lowercased name -> declared name. TOML keys are case-sensitive, task
/// names are not.
fn unique_names(file: &RawTaskFile) -> Result<HashMap<String, &str>> {
    let mut names = HashMap::new();
    for name in file.task.keys() {
        if let Some(existing) = names.insert(name_key(name), name.as_str()) {
            return Err(TaskweaveError::DuplicateTask {
                name: name.clone(),
                existing: existing.to_string(),
            });
        }
    }
    Ok(names)
}

fn validate_references(file: &RawTaskFile, names: &HashMap<String, &str>) -> Result<()> {
    for (name, task) in &file.task {
        for dep in &task.depends_on {
            if !names.contains_key(&name_key(dep)) {
                return Err(TaskweaveError::ConfigError(format!(
                    "task '{name}' has unknown dependency '{dep}' in `depends_on`"
                )));
            }
            if name_key(dep) == name_key(name) {
                return Err(TaskweaveError::ConfigError(format!(
                    "task '{name}' cannot depend on itself in `depends_on`"
                )));
            }
        }
        for fin in &task.finally {
            if !names.contains_key(&name_key(fin)) {
                return Err(TaskweaveError::ConfigError(format!(
                    "task '{name}' has unknown task '{fin}' in `finally`"
                )));
            }
        }
    }
    Ok(())
}

fn validate_arg_patterns(file: &RawTaskFile) -> Result<()> {
    for (name, task) in &file.task {
        for (arg, arg_cfg) in &task.args {
            if let Some(pattern) = &arg_cfg.pattern {
                Regex::new(pattern).map_err(|err| {
                    TaskweaveError::ConfigError(format!(
                        "task '{name}' argument '{arg}' has an invalid pattern: {err}"
                    ))
                })?;
            }
        }
    }
    Ok(())
}

fn validate_dag(file: &RawTaskFile) -> Result<()> {
    // Edge direction: dependency -> dependent.
    let keys: Vec<(String, Vec<String>)> = file
        .task
        .iter()
        .map(|(name, task)| (name_key(name), task.depends_on.iter().map(|d| name_key(d)).collect()))
        .collect();

    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();
    for (name, _) in &keys {
        graph.add_node(name.as_str());
    }
    for (name, deps) in &keys {
        for dep in deps {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(_) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            let display = file
                .task
                .keys()
                .find(|name| name_key(name) == node)
                .cloned()
                .unwrap_or_else(|| node.to_string());
            Err(TaskweaveError::CycleDetected(vec![display]))
        }
    }
}
