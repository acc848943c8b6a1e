use std::sync::{Arc, Mutex};

use anyhow::anyhow;
use taskweave::task::{Executor, TaskContext, TaskFuture};

/// Shared, ordered record of which tasks were executed.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, name: &str) {
        self.entries.lock().unwrap().push(name.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }
}

/// A fake executor that:
/// - records the task name into an [`ExecutionLog`]
/// - optionally writes a line of output
/// - succeeds, or fails with `"<task> exploded"`.
#[derive(Debug, Clone)]
pub struct FakeExecutor {
    log: ExecutionLog,
    fail: bool,
    output: Option<String>,
}

impl FakeExecutor {
    pub fn succeeding(log: &ExecutionLog) -> Self {
        Self {
            log: log.clone(),
            fail: false,
            output: None,
        }
    }

    pub fn failing(log: &ExecutionLog) -> Self {
        Self {
            log: log.clone(),
            fail: true,
            output: None,
        }
    }

    pub fn with_output(mut self, line: &str) -> Self {
        self.output = Some(line.to_string());
        self
    }
}

impl Executor for FakeExecutor {
    fn execute(&self, ctx: TaskContext) -> TaskFuture<'_> {
        Box::pin(async move {
            self.log.record(ctx.task_name());
            if let Some(line) = &self.output {
                ctx.log(line);
            }
            if self.fail {
                return Err(anyhow!("{} exploded", ctx.task_name()));
            }
            Ok(())
        })
    }
}
