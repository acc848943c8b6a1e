// src/exec/shell.rs

//! Shell command executor.

use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::exec::pump::spawn_line_pump;
use crate::task::{Executor, TaskContext, TaskFuture};

/// Runs a command line with `sh -c` (or `cmd /C` on Windows).
///
/// Resolved task arguments are passed as environment variables named by
/// [`arg_env_var`]. Output is forwarded to the task's sink. The child is
/// killed when the context's cancellation token fires.
#[derive(Debug, Clone)]
pub struct ShellCommand {
    cmd: String,
}

impl ShellCommand {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }
}

impl Executor for ShellCommand {
    fn execute(&self, ctx: TaskContext) -> TaskFuture<'_> {
        Box::pin(run_command(&self.cmd, ctx))
    }
}

/// `TASKWEAVE_ARG_<NAME>`: uppercased, `-` replaced by `_`.
pub fn arg_env_var(arg: &str) -> String {
    format!("TASKWEAVE_ARG_{}", arg.to_uppercase().replace('-', "_"))
}

fn shell_command(cmd_line: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    }
}

async fn run_command(cmd_line: &str, ctx: TaskContext) -> Result<()> {
    if ctx.dry_run {
        ctx.log(format!("exec: {cmd_line}"));
        return Ok(());
    }
    ctx.log_verbose(format!("exec: {cmd_line}"));

    let mut cmd = shell_command(cmd_line);
    for (name, value) in &ctx.args {
        cmd.env(arg_env_var(name), value);
    }
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    info!(task = %ctx.task_name(), cmd = %cmd_line, "starting task process");

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", ctx.task_name()))?;

    let mut pumps = Vec::with_capacity(2);
    if let Some(stdout) = child.stdout.take() {
        pumps.push(spawn_line_pump(ctx.task_name(), "stdout", stdout, ctx.writer()));
    }
    if let Some(stderr) = child.stderr.take() {
        pumps.push(spawn_line_pump(ctx.task_name(), "stderr", stderr, ctx.writer()));
    }

    let status = tokio::select! {
        status = child.wait() => status.with_context(|| {
            format!("waiting for process of task '{}'", ctx.task_name())
        })?,

        _ = ctx.cancellation().cancelled() => {
            info!(task = %ctx.task_name(), "cancellation requested; killing process");
            if let Err(err) = child.kill().await {
                warn!(task = %ctx.task_name(), error = %err, "failed to kill child process");
            }
            bail!("task '{}' was cancelled", ctx.task_name());
        }
    };

    // Drain both pumps so all output lands before the task is reported.
    for pump in pumps {
        if let Err(err) = pump.await {
            warn!(task = %ctx.task_name(), error = %err, "output pump panicked");
        }
    }

    debug!(
        task = %ctx.task_name(),
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "task process exited"
    );

    if !status.success() {
        bail!("command `{cmd_line}` failed with {status}");
    }
    Ok(())
}
