//! CLI command definitions and implementations.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use clap_complete::Shell;

pub mod api;
pub mod cat;
pub mod completions;
pub mod config;
pub mod exists;
pub mod mv;
pub mod put;
pub mod rm;
pub mod tree;
pub mod url;
pub mod utils;

#[cfg(test)]
mod test_mocks;

/// repofs - edit files in a hosted Git repository over its contents API.
#[derive(Debug, Parser)]
#[command(name = "repofs", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub remote: RemoteArgs,

    /// Config file (defaults to $XDG_CONFIG_HOME/repofs/config.toml).
    #[arg(long, global = true, env = "REPOFS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress informational output.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Repository selection flags; each overrides the config file.
#[derive(Debug, Args)]
pub struct RemoteArgs {
    /// Platform preset (github, gitea, codeberg, gitee) or custom API URL.
    #[arg(long, global = true, env = "REPOFS_API")]
    pub api: Option<String>,

    /// Repository owner.
    #[arg(long, global = true, env = "REPOFS_OWNER")]
    pub owner: Option<String>,

    /// Repository name.
    #[arg(long, global = true, env = "REPOFS_REPO")]
    pub repo: Option<String>,

    /// Branch to read from and commit to.
    #[arg(long, global = true, env = "REPOFS_BRANCH")]
    pub branch: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the resolved repository API URL.
    Url,

    /// Print a file's content hash; exits non-zero when absent.
    Exists {
        /// Path in the repository.
        path: String,
    },

    /// Print a file's contents.
    Cat {
        /// Path in the repository.
        path: String,
    },

    /// Create or update a file from a local file or stdin.
    Put {
        /// Path in the repository.
        path: String,

        /// Read content from this file instead of stdin.
        #[arg(short, long, value_name = "FILE")]
        file: Option<PathBuf>,

        /// Replace the file if it already exists.
        #[arg(long)]
        overwrite: bool,

        /// Commit message.
        #[arg(short, long)]
        message: Option<String>,

        /// Print the resulting commit as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a file.
    Rm {
        /// Path in the repository.
        path: String,

        /// Commit message.
        #[arg(short, long)]
        message: Option<String>,

        /// Print the resulting commit as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Move a file to a new path.
    Mv {
        /// Current path.
        from: String,

        /// New path.
        to: String,

        /// Commit message used for both steps.
        #[arg(short, long)]
        message: Option<String>,

        /// Print the resulting commit as JSON.
        #[arg(long)]
        json: bool,
    },

    /// List the file tree.
    Tree {
        /// Directory to start from (repository root by default).
        path: Option<String>,

        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Send a raw request relative to the repository API URL.
    Api {
        /// HTTP method (GET, POST, PUT, PATCH, DELETE).
        method: String,

        /// Path below the repository API URL, e.g. `branches`.
        path: String,

        /// JSON request body.
        #[arg(short, long)]
        data: Option<String>,
    },

    /// Print the effective settings as TOML.
    Config {
        /// Write them to the config file instead.
        #[arg(long)]
        save: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
