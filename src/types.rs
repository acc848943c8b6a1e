use std::str::FromStr;
use serde::Deserialize;

/// What to do with CLI arguments that no task in the run consulted.
///
/// - `Warn`: print a warning line per unused key and run anyway (default).
/// - `Error`: abort the run before any task starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnusedArgsPolicy {
    Warn,
    Error,
}

impl Default for UnusedArgsPolicy {
    fn default() -> Self {
        UnusedArgsPolicy::Warn
    }
}

impl FromStr for UnusedArgsPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" | "warning" => Ok(UnusedArgsPolicy::Warn),
            "error" => Ok(UnusedArgsPolicy::Error),
            other => Err(format!(
                "invalid unused_args: {other} (expected \"warn\" or \"error\")"
            )),
        }
    }
}

/// Run-wide behaviour after a task fails.
///
/// Individual tasks can still opt into continuing with `continue_on_error`;
/// this switch applies it to every task of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the primary loop at the first failure.
    Stop,
    /// Keep running the remaining tasks and report all failures at the end.
    Continue,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        FailurePolicy::Stop
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stop" => Ok(FailurePolicy::Stop),
            "continue" => Ok(FailurePolicy::Continue),
            other => Err(format!(
                "invalid on_failure: {other} (expected \"stop\" or \"continue\")"
            )),
        }
    }
}
