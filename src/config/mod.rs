// src/config/mod.rs

//! Task file loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a task file from disk (`loader.rs`).
//! - Validate references, cycles and argument patterns (`validate.rs`).
//! - Declare the file's tasks in a [`Registry`](crate::task::Registry)
//!   (`register.rs`).

pub mod loader;
pub mod model;
pub mod register;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path};
pub use model::{ArgConfig, RawTaskFile, TaskConfig, TaskFile};
