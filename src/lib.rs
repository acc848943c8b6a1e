// src/lib.rs

pub mod args;
pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod help;
pub mod logging;
pub mod sink;
pub mod task;
pub mod types;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::cli::{CliArgs, Invocation};
use crate::config::loader::load_and_validate;
use crate::engine::{Engine, RunOutcome};
use crate::errors::Result;
use crate::sink::SharedWriter;
use crate::task::Registry;

/// Parse `tokens` against `registry` and run them.
///
/// This is the entry point for programs that declare their tasks in code.
pub async fn run_registry<I, S>(
    registry: &Registry,
    tokens: I,
    writer: SharedWriter,
    cancel: CancellationToken,
) -> Result<RunOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let invocation = Invocation::parse(tokens, registry.options().auto_namespace);
    debug!(?invocation, "parsed invocation");

    Engine::new(registry, writer)
        .with_cancellation(cancel)
        .run(&invocation)
        .await
}

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - task file loading
/// - Ctrl-C handling (cancels running commands)
/// - the engine, writing to stdout
pub async fn run(args: CliArgs) -> Result<RunOutcome> {
    let file = load_and_validate(&args.config)?;
    info!(config = %args.config.display(), tasks = file.tasks().len(), "loaded task file");
    let registry = file.into_registry()?;

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            info!("Ctrl+C received; cancelling run");
            cancel.cancel();
        });
    }

    run_registry(&registry, &args.tokens, SharedWriter::stdout(), cancel).await
}
