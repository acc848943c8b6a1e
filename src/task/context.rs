// src/task/context.rs

use std::collections::BTreeMap;
use std::fmt::Display;
use std::io::{self, Write};

use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::sink::SharedWriter;

/// Everything a task body receives for one invocation.
///
/// A context is built fresh for every task the engine runs and is moved into
/// the executor, so nothing leaks from one task to the next.
#[derive(Debug)]
pub struct TaskContext {
    task_name: String,
    /// Arguments resolved for this task; keys absent from the CLI are absent here.
    pub args: BTreeMap<String, String>,
    pub verbose: bool,
    pub dry_run: bool,
    writer: SharedWriter,
    cancel: CancellationToken,
}

impl TaskContext {
    pub fn new(
        task_name: impl Into<String>,
        args: BTreeMap<String, String>,
        writer: SharedWriter,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            task_name: task_name.into(),
            args,
            verbose: false,
            dry_run: false,
            writer,
            cancel,
        }
    }

    pub fn task_name(&self) -> &str {
        &self.task_name
    }

    pub fn arg(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    /// A handle to the shared sink, e.g. for output pumps of child processes.
    pub fn writer(&self) -> SharedWriter {
        self.writer.clone()
    }

    /// Ambient cancellation token. The engine never cancels it itself.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Write one line to the sink.
    pub fn log(&self, msg: impl Display) {
        if let Err(err) = self.writer.write_line(&msg.to_string()) {
            warn!(task = %self.task_name, error = %err, "failed to write task output");
        }
    }

    /// Write one line to the sink only when running verbosely.
    pub fn log_verbose(&self, msg: impl Display) {
        if self.verbose {
            self.log(msg);
        }
    }
}

impl Write for TaskContext {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
