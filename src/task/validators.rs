// src/task/validators.rs

//! Argument validators.
//!
//! A validator is called with `(arg_name, value)`, where `value` is the empty
//! string when the CLI supplied nothing. Rejecting the empty string is what
//! makes an argument required.

use std::sync::Arc;

use anyhow::{anyhow, bail};
use regex::Regex;

pub type ArgValidator = Arc<dyn Fn(&str, &str) -> anyhow::Result<()> + Send + Sync>;

/// Reject an empty value.
pub fn required() -> ArgValidator {
    Arc::new(|name, value| {
        if value.is_empty() {
            bail!("argument '{name}' is required");
        }
        Ok(())
    })
}

/// Accept the empty value or one of `allowed`.
pub fn one_of<I, S>(allowed: I) -> ArgValidator
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let allowed: Vec<String> = allowed.into_iter().map(Into::into).collect();
    Arc::new(move |name, value| {
        if value.is_empty() || allowed.iter().any(|a| a == value) {
            return Ok(());
        }
        Err(anyhow!(
            "value {value:?} for '{name}' is not one of {allowed:?}"
        ))
    })
}

/// Accept the empty value or a value matching `pattern`.
pub fn matches(pattern: Regex) -> ArgValidator {
    Arc::new(move |name, value| {
        if value.is_empty() || pattern.is_match(value) {
            return Ok(());
        }
        Err(anyhow!(
            "value {value:?} for '{name}' does not match /{}/",
            pattern.as_str()
        ))
    })
}

/// Run every validator in order; the first rejection wins.
pub fn all(validators: Vec<ArgValidator>) -> ArgValidator {
    Arc::new(move |name, value| {
        for validator in &validators {
            validator(name, value)?;
        }
        Ok(())
    })
}
