// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{RawTaskFile, TaskFile};
use crate::errors::Result;

/// Read and deserialize a task file without semantic validation.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawTaskFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let raw: RawTaskFile = toml::from_str(&contents)?;
    debug!(path = %path.display(), tasks = raw.task.len(), "read task file");
    Ok(raw)
}

/// Read a task file and validate it.
///
/// Rejects files without tasks, unknown `depends_on`/`finally` references,
/// self-dependencies, dependency cycles and invalid argument patterns.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TaskFile> {
    let raw = load_from_path(&path)?;
    TaskFile::try_from(raw)
}

/// `Taskweave.toml` in the current directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Taskweave.toml")
}
