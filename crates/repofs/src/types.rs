//! Contents API types.

use serde::{Deserialize, Serialize};

/// Kind of entry returned by the contents endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Regular file.
    File,
    /// Directory.
    Dir,
    /// Symbolic link.
    Symlink,
    /// Git submodule.
    Submodule,
}

/// A file or directory entry as reported by the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentEntry {
    /// Entry name (filename or directory name).
    pub name: String,

    /// Full path from repository root.
    pub path: String,

    /// Content hash identifying the current version of the entry.
    pub sha: String,

    /// Entry type.
    #[serde(rename = "type")]
    pub kind: EntryKind,

    /// Size in bytes.
    #[serde(default)]
    pub size: u64,

    /// Encoded content (only for single-file responses).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Encoding of `content`, usually "base64".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,

    /// Any other platform-provided metadata (urls, links, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ContentEntry {
    /// Whether this entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }
}

/// Body of a contents GET: a directory listing or a single entry.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiContents {
    Listing(Vec<ContentEntry>),
    Entry(Box<ContentEntry>),
}

/// Result of a successful write to the contents endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileCommit {
    /// Path that was written or deleted.
    pub path: String,

    /// New content hash of the file (None after a delete).
    pub content_sha: Option<String>,

    /// Commit created by the write.
    pub commit_sha: String,
}

/// Request body for creating or updating a file.
#[derive(Debug, Serialize)]
pub(crate) struct PutFile<'a> {
    pub message: &'a str,
    /// Base64-encoded file content.
    pub content: &'a str,
    /// Current content hash, required when replacing an existing file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// Request body for deleting a file.
#[derive(Debug, Serialize)]
pub(crate) struct DeleteFile<'a> {
    pub message: &'a str,
    pub sha: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// Response to a write or delete.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiCommitResponse {
    /// Null for deletes.
    pub content: Option<ApiContentRef>,
    pub commit: ApiCommit,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiContentRef {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiCommit {
    pub sha: String,
}

impl ApiCommitResponse {
    /// Convert API response to domain type.
    pub(crate) fn into_file_commit(self, path: &str) -> FileCommit {
        FileCommit {
            path: path.to_string(),
            content_sha: self.content.map(|c| c.sha),
            commit_sha: self.commit.sha,
        }
    }
}
