// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`shell`] provides [`ShellCommand`], an [`Executor`](crate::task::Executor)
//!   that runs a command line through the platform shell.
//! - [`pump`] copies a child's stdout/stderr into the shared sink line by line.

pub mod pump;
pub mod shell;

pub use pump::spawn_line_pump;
pub use shell::{arg_env_var, ShellCommand};
