// src/config/register.rs

use regex::Regex;
use tracing::debug;

use crate::config::model::{ArgConfig, TaskConfig, TaskFile};
use crate::errors::{Result, TaskweaveError};
use crate::exec::ShellCommand;
use crate::task::validators::{self, ArgValidator};
use crate::task::Registry;

impl TaskFile {
    /// Declare every task of the file in a fresh registry.
    ///
    /// Tasks with `cmd` run it through [`ShellCommand`]; tasks without one
    /// are aggregate tasks.
    pub fn into_registry(self) -> Result<Registry> {
        let mut registry = Registry::with_options(self.options());
        for (name, task) in self.tasks() {
            declare(&mut registry, name, task)?;
        }
        debug!(tasks = registry.len(), "registered task file");
        Ok(registry)
    }
}

fn declare(registry: &mut Registry, name: &str, task: &TaskConfig) -> Result<()> {
    let mut builder = registry
        .declare(name)?
        .description(task.description.clone())
        .depends_on(task.depends_on.iter().cloned())
        .finally(task.finally.iter().cloned());

    if task.hidden {
        builder = builder.hide();
    }
    if task.continue_on_error {
        builder = builder.continue_on_error();
    }
    if task.skip_finally_on_error {
        builder = builder.skip_finally_on_error();
    }

    for (arg, arg_cfg) in &task.args {
        builder = match arg_validator(name, arg, arg_cfg)? {
            Some(validator) => builder.arg(arg.clone(), validator),
            None => builder.optional_arg(arg.clone()),
        };
    }

    if let Some(cmd) = &task.cmd {
        builder.executor(ShellCommand::new(cmd.clone()));
    }
    Ok(())
}

/// Combine the checks of an `[args]` entry into one validator.
fn arg_validator(task: &str, arg: &str, arg_cfg: &ArgConfig) -> Result<Option<ArgValidator>> {
    let mut checks = Vec::new();

    if arg_cfg.required {
        checks.push(validators::required());
    }
    if let Some(pattern) = &arg_cfg.pattern {
        let regex = Regex::new(pattern).map_err(|err| {
            TaskweaveError::ConfigError(format!(
                "task '{task}' argument '{arg}' has an invalid pattern: {err}"
            ))
        })?;
        checks.push(validators::matches(regex));
    }
    if !arg_cfg.one_of.is_empty() {
        checks.push(validators::one_of(arg_cfg.one_of.iter().cloned()));
    }

    Ok(match checks.len() {
        0 => None,
        1 => checks.pop(),
        _ => Some(validators::all(checks)),
    })
}
