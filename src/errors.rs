// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::task::TaskName;

/// Why a task cannot take part in a `finally` clause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FinallyViolation {
    #[error("a finalizer cannot declare its own finally tasks")]
    Chained,

    #[error("a finalizer cannot require argument '{0}'")]
    RequiredArgument(String),

    #[error("a task without an executor cannot use finally")]
    AggregateOwner,
}

#[derive(Error, Debug)]
pub enum TaskweaveError {
    #[error("task '{name}' is already declared as '{existing}'")]
    DuplicateTask { name: TaskName, existing: TaskName },

    #[error("invalid task name '{0}'")]
    InvalidTaskName(String),

    #[error("unknown task '{0}'")]
    TaskNotFound(String),

    #[error("a cycle exists between tasks {0:?}")]
    CycleDetected(Vec<TaskName>),

    #[error("'{task}' not allowed in finally: {violation}")]
    FinallyConfiguration {
        task: TaskName,
        violation: FinallyViolation,
    },

    #[error("finally cycle detected at '{0}'")]
    FinallyCycle(TaskName),

    #[error("failed to validate argument {arg:?} of task '{task}': {message}")]
    ArgumentValidation {
        task: TaskName,
        arg: String,
        message: String,
    },

    #[error("task(s) {0:?} failed")]
    TaskExecution(Vec<TaskName>),

    #[error("run cancelled before all tasks ran")]
    Cancelled,

    #[error("unused argument(s) {0:?}")]
    UnusedArguments(Vec<String>),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskweaveError>;
