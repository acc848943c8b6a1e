// src/engine/runtime.rs

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::cli::Invocation;
use crate::errors::Result;
use crate::help::write_help;
use crate::sink::SharedWriter;
use crate::task::{Executor, Registry, Task, TaskContext};
use crate::types::FailurePolicy;

use super::plan::ExecutionPlan;
use super::state::RunLedger;
use super::{RunOutcome, RunReport};

/// Inserted in front of every sink line written while a task body runs.
pub const TASK_OUTPUT_PREFIX: &[u8] = b"       | ";

const SEPARATOR: &str = "---------------";

/// Runs invocations against a registry, one task at a time.
///
/// The engine only reads the registry. Progress lines and task output go to
/// the sink; diagnostics go through `tracing`.
pub struct Engine<'r> {
    registry: &'r Registry,
    writer: SharedWriter,
    cancel: CancellationToken,
}

impl fmt::Debug for Engine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("tasks", &self.registry.len())
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl<'r> Engine<'r> {
    pub fn new(registry: &'r Registry, writer: SharedWriter) -> Self {
        Self {
            registry,
            writer,
            cancel: CancellationToken::new(),
        }
    }

    /// Use `cancel` as the token handed to every task context.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Plan and execute `invocation`.
    ///
    /// Errors are pre-execution errors only; task failures are reported in
    /// the returned [`RunReport`].
    pub async fn run(&self, invocation: &Invocation) -> Result<RunOutcome> {
        if invocation.help || invocation.task_names.is_empty() {
            write_help(self.registry, &mut self.writer.clone())?;
            return Ok(RunOutcome::HelpShown);
        }

        let started = Instant::now();
        info!(tasks = ?invocation.task_names, "starting run");

        let plan = ExecutionPlan::prepare(self.registry, invocation)?;
        self.warn_unused(plan.args.unused());

        let mut ledger = RunLedger::new(&plan.primary.tasks);
        let cancelled = self.run_primary(&plan, invocation, &mut ledger).await;

        let finalizers = plan.finalizers(self.registry, |owner| ledger.has_failed(owner.name()))?;
        let (finalizers_run, finalizer_failures) =
            self.run_finalizers(&plan, invocation, &finalizers).await;

        let report = RunReport {
            order: plan.primary.task_names(),
            states: ledger.states(),
            failed: ledger.failed().to_vec(),
            cancelled,
            finalizers_run,
            finalizer_failures,
            unused_args: plan.args.unused().to_vec(),
            duration: started.elapsed(),
        };
        self.write_summary(&report);

        info!(
            success = report.is_success(),
            cancelled = report.cancelled,
            failed = ?report.failed,
            duration = ?report.duration,
            "run finished"
        );
        Ok(RunOutcome::Finished(report))
    }

    /// Returns `true` when cancellation kept a runnable task from starting.
    async fn run_primary(
        &self,
        plan: &ExecutionPlan,
        invocation: &Invocation,
        ledger: &mut RunLedger,
    ) -> bool {
        let keep_going = self.registry.options().on_failure == FailurePolicy::Continue;

        for task in &plan.primary.tasks {
            let Some(executor) = task.executor() else {
                debug!(task = %task.name(), "skipping aggregate task");
                continue;
            };

            if self.cancel.is_cancelled() {
                warn!(task = %task.name(), "run cancelled; not starting further tasks");
                return true;
            }

            ledger.start(task.name());
            self.line(&format!("START  | {}", task.name()));

            self.writer.set_prefix(Some(TASK_OUTPUT_PREFIX));
            let ctx = self.context(task, plan.args.for_task(task.name()), invocation);
            let (elapsed, result) = execute(executor, ctx).await;
            self.writer.set_prefix(None);

            match result {
                Ok(()) => {
                    ledger.succeed(task.name());
                    self.line(&format!("FINISH | {} in {elapsed:?}", task.name()));
                }
                Err(err) => {
                    ledger.fail(task.name());
                    error!(task = %task.name(), error = %err, "task failed");
                    self.line(&format!("FAIL   | {} in {elapsed:?}", task.name()));
                    self.writer.set_prefix(Some(TASK_OUTPUT_PREFIX));
                    self.line(&format!("{err:#}"));
                    self.writer.set_prefix(None);

                    if !(keep_going || task.continue_on_error()) {
                        info!(task = %task.name(), "stopping after failure");
                        break;
                    }
                }
            }
        }
        false
    }

    /// Run finalizers in order. A failure is reported and never stops the
    /// remaining finalizers.
    async fn run_finalizers(
        &self,
        plan: &ExecutionPlan,
        invocation: &Invocation,
        finalizers: &[Arc<Task>],
    ) -> (Vec<String>, Vec<String>) {
        let mut ran = Vec::new();
        let mut failures = Vec::new();

        if finalizers.is_empty() {
            return (ran, failures);
        }

        let started = Instant::now();
        self.line("START  | finalizing tasks");

        for task in finalizers {
            let Some(executor) = task.executor() else {
                debug!(task = %task.name(), "skipping aggregate finalizer");
                continue;
            };

            debug!(task = %task.name(), "running finalizer");
            self.writer.set_prefix(Some(TASK_OUTPUT_PREFIX));
            let ctx = self.context(task, plan.args.for_task(task.name()), invocation);
            let (_, result) = execute(executor, ctx).await;
            self.writer.set_prefix(None);

            ran.push(task.name().to_string());
            match result {
                Ok(()) => self.line(&format!("{} finished", task.name())),
                Err(err) => {
                    warn!(task = %task.name(), error = %err, "finalizer failed");
                    self.line(&format!("WARN   | {} failed: {err:#}", task.name()));
                    failures.push(task.name().to_string());
                }
            }
        }

        self.line(&format!(
            "FINISH | finalizing tasks in {:?}",
            started.elapsed()
        ));
        (ran, failures)
    }

    fn context(&self, task: &Task, args: BTreeMap<String, String>, invocation: &Invocation) -> TaskContext {
        let mut ctx = TaskContext::new(task.name(), args, self.writer.clone(), self.cancel.clone());
        ctx.verbose = invocation.verbose;
        ctx.dry_run = invocation.dry_run;
        ctx
    }

    fn warn_unused(&self, unused: &[String]) {
        for key in unused {
            warn!(arg = %key, "unused argument");
            self.line(&format!("WARNING unused argument {key}"));
        }
    }

    fn write_summary(&self, report: &RunReport) {
        self.line(SEPARATOR);
        if report.is_success() {
            self.line(&format!("Completed in {:?}", report.duration));
        } else if report.cancelled && report.failed.is_empty() {
            self.line(&format!("Cancelled in {:?}", report.duration));
        } else if report.cancelled {
            self.line(&format!(
                "Cancelled in {:?}: task(s) [{}] failed",
                report.duration,
                report.failed.join(", ")
            ));
        } else {
            self.line(&format!(
                "Failed in {:?}: task(s) [{}] failed",
                report.duration,
                report.failed.join(", ")
            ));
        }
    }

    fn line(&self, text: &str) {
        if let Err(err) = self.writer.write_line(text) {
            warn!(error = %err, "failed to write to output sink");
        }
    }
}

async fn execute(executor: &Arc<dyn Executor>, ctx: TaskContext) -> (Duration, anyhow::Result<()>) {
    let started = Instant::now();
    let result = executor.execute(ctx).await;
    (started.elapsed(), result)
}
