//! Terminal output formatting utilities.

use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use repofs::FileTreeNode;

static QUIET_MODE: AtomicBool = AtomicBool::new(false);

/// Set quiet mode globally. Call once at startup.
pub fn set_quiet(quiet: bool) {
    QUIET_MODE.store(quiet, Ordering::Relaxed);
}

fn is_quiet() -> bool {
    QUIET_MODE.load(Ordering::Relaxed)
}

/// Print a success message (suppressed in quiet mode).
pub fn success(msg: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "✓".green(), msg);
    }
}

/// Print an error message (always prints to stderr).
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a warning message (always prints to stderr).
pub fn warn(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print an info message (suppressed in quiet mode).
pub fn info(msg: &str) {
    if !is_quiet() {
        eprintln!("{} {}", "→".blue(), msg);
    }
}

/// Print essential machine-readable output (always prints).
///
/// Use for results that should be available for piping, like commit SHAs.
pub fn essential(msg: &str) {
    println!("{msg}");
}

/// Print a value as pretty JSON on stdout.
pub fn json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// First eight characters of a SHA.
#[must_use]
pub fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

/// Render a file tree as indented lines.
///
/// Directories get a trailing `/`; unexpanded directories are marked.
#[must_use]
pub fn tree_lines(nodes: &[FileTreeNode]) -> Vec<String> {
    let mut lines = Vec::new();
    push_tree_lines(nodes, "", &mut lines);
    lines
}

fn push_tree_lines(nodes: &[FileTreeNode], prefix: &str, lines: &mut Vec<String>) {
    for (i, node) in nodes.iter().enumerate() {
        let last = i + 1 == nodes.len();
        let branch = if last { "└── " } else { "├── " };
        let name = &node.entry.name;

        let label = match (&node.children, node.is_dir()) {
            (_, false) => name.clone(),
            (Some(_), true) => format!("{}/", name.blue().bold()),
            (None, true) => format!("{}/ {}", name.blue().bold(), "…".dimmed()),
        };
        lines.push(format!("{prefix}{branch}{label}"));

        if let Some(children) = &node.children {
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            push_tree_lines(children, &child_prefix, lines);
        }
    }
}
