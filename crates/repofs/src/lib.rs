//! # repofs
//!
//! File-level create, read, update, delete and rename against a Git hosting
//! platform's REST contents API, one HTTP round trip per step. There is no
//! local repository involved.
//!
//! ```no_run
//! use repofs::{ApiEndpoint, Auth, ClientConfig, RepositoryClient, SecretString};
//!
//! # async fn demo() -> repofs::Result<()> {
//! let config = ClientConfig::new(
//!     ApiEndpoint::parse("github"),
//!     Auth::Token(SecretString::from("ghp_example")),
//!     "octocat",
//!     "notes.git",
//! );
//! let client = RepositoryClient::new(config)?;
//! client.create_or_update("todo.md", "- ship it\n", true, None).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Security
//!
//! Authentication tokens are stored using `SecretString` which automatically
//! zeroizes memory when dropped, and they never appear in `Debug` output or
//! log events.

mod auth;
mod client;
mod endpoint;
mod error;
mod traits;
mod tree;
mod types;

pub use auth::Auth;
pub use client::{ClientConfig, RepositoryClient};
pub use endpoint::{ApiEndpoint, Platform};
pub use error::{Error, Result};
// Re-export SecretString for constructing Auth::Token
pub use secrecy::SecretString;
pub use traits::ContentsApi;
pub use tree::FileTreeNode;
pub use types::{ContentEntry, EntryKind, FileCommit};
// Re-export Method for the raw pass-through request
pub use reqwest::Method;
