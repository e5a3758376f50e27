//! Recursive directory listing.

use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::BoxFuture;
use futures::{FutureExt, StreamExt, TryStreamExt, stream};
use serde::Serialize;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::client::{RepositoryClient, normalize_path};
use crate::error::{Error, Result};
use crate::types::ContentEntry;

/// Guards applied to a tree walk.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TreeLimits {
    pub max_depth: usize,
    pub max_entries: usize,
    pub concurrency: usize,
}

/// A node in a listed file tree.
///
/// `children` is `Some` only for directories that were expanded; a
/// directory beyond the depth limit is left as `None`.
#[derive(Debug, Clone, Serialize)]
pub struct FileTreeNode {
    /// The entry as reported by the platform.
    #[serde(flatten)]
    pub entry: ContentEntry,

    /// Directory contents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<FileTreeNode>>,
}

impl FileTreeNode {
    /// Whether this node is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.entry.is_dir()
    }

    /// Number of non-directory entries in this subtree.
    #[must_use]
    pub fn file_count(&self) -> usize {
        match &self.children {
            _ if !self.is_dir() => 1,
            Some(children) => children.iter().map(Self::file_count).sum(),
            None => 0,
        }
    }

    /// Levels of nesting below this node (0 for a leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.children
            .as_ref()
            .and_then(|c| c.iter().map(|n| n.depth() + 1).max())
            .unwrap_or(0)
    }
}

/// Shared state for one walk.
struct Walk<'a> {
    client: &'a RepositoryClient,
    limits: TreeLimits,
    visited: AtomicUsize,
    /// Bounds in-flight listings across every level of the walk.
    permits: Semaphore,
}

impl Walk<'_> {
    async fn list(&self, path: &str) -> Result<Vec<ContentEntry>> {
        let entries = {
            // the semaphore is never closed, so acquiring cannot fail
            let _permit = self.permits.acquire().await;
            self.client.list_dir(path).await?
        };

        let visited = self.visited.fetch_add(entries.len(), Ordering::Relaxed) + entries.len();
        if visited > self.limits.max_entries {
            warn!(path, limit = self.limits.max_entries, "tree listing too large");
            return Err(Error::TreeTooLarge {
                limit: self.limits.max_entries,
            });
        }
        Ok(entries)
    }

    /// Turn a listing at `depth` into nodes, expanding sibling directories
    /// concurrently. Results keep the platform's order.
    fn expand(
        &self,
        entries: Vec<ContentEntry>,
        depth: usize,
    ) -> BoxFuture<'_, Result<Vec<FileTreeNode>>> {
        async move {
            stream::iter(entries)
                .map(|entry| self.node(entry, depth))
                .buffered(self.limits.concurrency)
                .try_collect()
                .await
        }
        .boxed()
    }

    async fn node(&self, entry: ContentEntry, depth: usize) -> Result<FileTreeNode> {
        if !entry.is_dir() {
            return Ok(FileTreeNode {
                entry,
                children: None,
            });
        }

        if depth > self.limits.max_depth {
            warn!(
                path = %entry.path,
                max_depth = self.limits.max_depth,
                "tree depth limit reached, not descending"
            );
            return Ok(FileTreeNode {
                entry,
                children: None,
            });
        }

        let listing = self.list(&entry.path).await?;
        let children = self.expand(listing, depth + 1).await?;
        Ok(FileTreeNode {
            entry,
            children: Some(children),
        })
    }
}

impl RepositoryClient {
    /// List the file tree under `root` (repository root when `None`).
    ///
    /// Each directory costs one request. Directories more than the
    /// configured depth below `root` are returned unexpanded.
    ///
    /// # Errors
    /// Returns [`Error::NotADirectory`] if `root` is a file,
    /// [`Error::TreeTooLarge`] past the entry limit, or any request error.
    pub async fn tree(&self, root: Option<&str>) -> Result<Vec<FileTreeNode>> {
        let root = root.map(normalize_path).unwrap_or_default();
        let limits = *self.tree_limits();
        let walk = Walk {
            client: self,
            limits,
            visited: AtomicUsize::new(0),
            permits: Semaphore::new(limits.concurrency),
        };

        let entries = walk.list(&root).await?;
        let nodes = walk.expand(entries, 1).await?;
        debug!(
            root = %root,
            entries = walk.visited.load(Ordering::Relaxed),
            "tree listed"
        );
        Ok(nodes)
    }
}
