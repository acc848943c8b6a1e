// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::task::RegistryOptions;

/// Task file as read from TOML, before validation.
///
/// ```toml
/// [config]
/// unused_args = "error"
///
/// [task.build]
/// cmd = "cargo build"
/// depends_on = ["fmt"]
///
/// [task.build.args.profile]
/// one_of = ["dev", "release"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTaskFile {
    /// Run-wide switches from `[config]`.
    #[serde(default)]
    pub config: RegistryOptions,

    /// All tasks from `[task.<name>]`.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// A validated task file. Only obtainable through `TryFrom<RawTaskFile>`.
#[derive(Debug, Clone)]
pub struct TaskFile {
    config: RegistryOptions,
    task: BTreeMap<String, TaskConfig>,
}

impl TaskFile {
    pub(crate) fn new_unchecked(config: RegistryOptions, task: BTreeMap<String, TaskConfig>) -> Self {
        Self { config, task }
    }

    pub fn options(&self) -> RegistryOptions {
        self.config
    }

    /// Tasks keyed by name, in name order.
    pub fn tasks(&self) -> &BTreeMap<String, TaskConfig> {
        &self.task
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub description: String,

    /// Shell command line. A task without one is an aggregate task.
    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default)]
    pub depends_on: Vec<String>,

    /// Tasks to run after the whole requested run.
    #[serde(default)]
    pub finally: Vec<String>,

    #[serde(default)]
    pub hidden: bool,

    #[serde(default)]
    pub continue_on_error: bool,

    #[serde(default)]
    pub skip_finally_on_error: bool,

    /// Declared arguments from `[task.<name>.args.<arg>]`.
    #[serde(default)]
    pub args: BTreeMap<String, ArgConfig>,
}

/// `[task.<name>.args.<arg>]` section. An empty table declares an optional,
/// unchecked argument.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ArgConfig {
    #[serde(default)]
    pub required: bool,

    /// Regex a supplied value must match.
    #[serde(default)]
    pub pattern: Option<String>,

    /// Allowed values for a supplied value.
    #[serde(default)]
    pub one_of: Vec<String>,
}
