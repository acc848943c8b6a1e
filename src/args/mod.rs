// src/args/mod.rs

//! CLI-supplied task arguments.
//!
//! Arguments live in a two-level map: the global scope (namespace `""`) and
//! one scope per task namespace, keyed by lowercased task name. Resolution
//! against declared arguments lives in [`resolve`].

pub mod resolve;

use std::collections::BTreeMap;

use crate::task::name_key;

pub use resolve::{args_for_task, resolve_args, unused_args, ResolvedArgs};

/// Namespace of arguments that apply to every task.
pub const GLOBAL_NAMESPACE: &str = "";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgMap {
    scopes: BTreeMap<String, BTreeMap<String, String>>,
}

impl ArgMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `name` in `namespace` (a task name, or [`GLOBAL_NAMESPACE`]).
    /// A later value for the same key replaces the earlier one.
    pub fn set(&mut self, namespace: &str, name: impl Into<String>, value: impl Into<String>) {
        self.scopes
            .entry(name_key(namespace))
            .or_default()
            .insert(name.into(), value.into());
    }

    pub fn get(&self, namespace: &str, name: &str) -> Option<&str> {
        self.scopes
            .get(&name_key(namespace))
            .and_then(|scope| scope.get(name))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.values().all(BTreeMap::is_empty)
    }

    /// Every supplied `(namespace, name)` pair, sorted.
    pub fn keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.scopes.iter().flat_map(|(ns, scope)| {
            scope.keys().map(move |name| (ns.as_str(), name.as_str()))
        })
    }
}

/// How a supplied key is shown to users: `name` or `namespace:name`.
pub fn display_key(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}:{name}")
    }
}
