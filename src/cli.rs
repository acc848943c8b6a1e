// src/cli.rs

//! Command-line parsing.
//!
//! The binary's own options (`--config`, `--log-level`) are parsed by `clap`.
//! Everything after them is a free-form list of task names and task argument
//! flags, handled by [`Invocation::parse`]:
//!
//! - `build test` requests tasks `build` and `test`,
//! - `-name`, `--name`, `/name` set global argument `name` to `"true"`,
//! - `--name=value` sets it to `value`,
//! - `--build:name=value` sets `name` only for task `build`,
//! - `-h`/`--help`, `-v`/`--verbose` and `-n`/`--dry-run` are reserved.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::args::{ArgMap, GLOBAL_NAMESPACE};
use crate::config::default_config_path;

/// Command-line arguments for `taskweave`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskweave",
    about = "Run declared tasks in dependency order.",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct CliArgs {
    /// Path to the task file (TOML).
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKWEAVE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Tasks to run and their arguments.
    #[arg(
        value_name = "TASKS_AND_ARGS",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub tokens: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

const TRUE: &str = "true";

/// Parsed task tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    pub task_names: Vec<String>,
    pub args: ArgMap,
    pub help: bool,
    pub verbose: bool,
    pub dry_run: bool,
}

impl Invocation {
    /// Split raw tokens into requested task names and argument flags.
    ///
    /// With `auto_namespace`, a flag without an explicit namespace binds to
    /// the most recent task token instead of the global scope.
    pub fn parse<I, S>(tokens: I, auto_namespace: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut inv = Invocation::default();
        let mut current_task: Option<String> = None;

        for token in tokens {
            let token = token.as_ref();
            if token.is_empty() {
                continue;
            }

            if !token.starts_with(['-', '/']) {
                inv.task_names.push(token.to_string());
                current_task = Some(token.to_string());
                continue;
            }

            let (namespace, name, value) = parse_flag(token);
            if name.is_empty() {
                warn!(token = %token, "ignoring flag without a name");
                continue;
            }

            if namespace.is_empty() && inv.apply_reserved(name, value) {
                continue;
            }

            let namespace = match (namespace, &current_task) {
                ("", Some(task)) if auto_namespace => task.as_str(),
                (ns, _) => ns,
            };
            inv.args.set(namespace, name, value);
        }

        inv
    }

    fn apply_reserved(&mut self, name: &str, value: &str) -> bool {
        let on = value.eq_ignore_ascii_case(TRUE);
        match name {
            "h" | "help" => self.help = on,
            "v" | "verbose" => self.verbose = on,
            "n" | "dry-run" => self.dry_run = on,
            _ => return false,
        }
        true
    }
}

/// Split a flag token into `(namespace, name, value)`.
///
/// The namespace is everything before the last `:` of the name part; the
/// value defaults to `"true"`.
pub fn parse_flag(token: &str) -> (&str, &str, &str) {
    let body = token.trim_start_matches(['-', '/']);
    let (key, value) = body.split_once('=').unwrap_or((body, TRUE));
    let (namespace, name) = key.rsplit_once(':').unwrap_or((GLOBAL_NAMESPACE, key));
    (namespace, name, value)
}
