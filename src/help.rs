// src/help.rs

//! Help listing: every non-hidden task with its arguments, dependencies and
//! description, followed by the reserved options.
//!
//! Tasks are listed in declaration order. Consecutive tasks sharing a
//! namespace (the part of the name before the first `:`) form a group;
//! groups are separated by a dashed rule as wide as the longest line.

use std::io::{self, Write};

use crate::task::{Registry, Task};

const MAX_RULE_WIDTH: usize = 80;

const OPTIONS: &[(&str, &str)] = &[
    ("-h, --help", "show this help"),
    ("-v, --verbose", "generate verbose logs"),
    ("-n, --dry-run", "ask tasks not to make changes"),
    ("--<arg>[=<value>]", "set an argument for every task"),
    ("--<task>:<arg>[=<value>]", "set an argument for one task"),
];

fn namespace_of(name: &str) -> &str {
    name.split_once(':').map_or(name, |(ns, _)| ns)
}

fn task_line(task: &Task) -> String {
    let mut line = format!("  {}", task.name());
    let args = task.declared_args();
    if !args.is_empty() {
        let names: Vec<&str> = args.iter().map(|a| a.name.as_str()).collect();
        line.push_str(&format!("({})", names.join(", ")));
    }
    if !task.dependencies().is_empty() {
        line.push_str(&format!(" -> [{}]", task.dependencies().join(", ")));
    }
    line
}

/// Write the help listing for `registry` to `out`.
pub fn write_help<W: Write>(registry: &Registry, out: &mut W) -> io::Result<()> {
    let visible: Vec<&Task> = registry
        .tasks()
        .iter()
        .map(|t| t.as_ref())
        .filter(|t| !t.hidden())
        .collect();

    let entries: Vec<(String, &str, &str)> = visible
        .iter()
        .map(|t| (task_line(t), t.description(), namespace_of(t.name())))
        .collect();

    let rule_width = entries
        .iter()
        .flat_map(|(line, desc, _)| [line.len(), desc.len() + 8])
        .max()
        .unwrap_or(0)
        .min(MAX_RULE_WIDTH);

    writeln!(out, "USAGE: [tasks ...] [options ...]")?;
    writeln!(out)?;
    writeln!(out, "TASKS:")?;

    let mut current_ns: Option<&str> = None;
    for (line, description, ns) in &entries {
        if let Some(prev) = current_ns {
            if prev != *ns {
                writeln!(out, "  {}", "-".repeat(rule_width))?;
            }
        }
        current_ns = Some(ns);

        writeln!(out, "{line}")?;
        if !description.is_empty() {
            writeln!(out, "        {description}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "OPTIONS:")?;
    for (flag, text) in OPTIONS {
        writeln!(out, "  {flag:<28}{text}")?;
    }

    Ok(())
}
