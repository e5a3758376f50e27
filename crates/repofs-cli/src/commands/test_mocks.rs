//! Mock implementation of `ContentsApi` for testing commands.
//!
//! Files live in memory; every mutating call is recorded.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use repofs::{ContentEntry, ContentsApi, Error, FileCommit, FileTreeNode, Result};

/// In-memory repository.
pub struct MockContents {
    files: Mutex<BTreeMap<String, String>>,
    calls: Mutex<Vec<String>>,
    fail_delete: bool,
}

impl Default for MockContents {
    fn default() -> Self {
        Self::new()
    }
}

impl MockContents {
    pub fn new() -> Self {
        Self {
            files: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            fail_delete: false,
        }
    }

    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        self
    }

    /// Make deletes fail so renames are left half-done.
    pub fn with_failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(path).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn commit(path: &str, content: Option<&str>) -> FileCommit {
        FileCommit {
            path: path.to_string(),
            content_sha: content.map(sha),
            commit_sha: format!("commit-{path}"),
        }
    }
}

fn sha(content: &str) -> String {
    format!("{:040x}", content.len())
}

fn entry(path: &str, kind: &str) -> ContentEntry {
    serde_json::from_value(serde_json::json!({
        "name": path.rsplit('/').next().unwrap_or(path),
        "path": path,
        "sha": sha(path),
        "type": kind,
    }))
    .unwrap()
}

impl ContentsApi for MockContents {
    async fn exists(&self, path: &str) -> Result<Option<String>> {
        Ok(self.file(path).as_deref().map(sha))
    }

    async fn read(&self, path: &str) -> Result<String> {
        self.file(path)
            .ok_or_else(|| Error::FileNotFound(path.to_string()))
    }

    async fn create_or_update(
        &self,
        path: &str,
        content: &str,
        overwrite: bool,
        message: Option<&str>,
    ) -> Result<FileCommit> {
        if self.file(path).is_some() && !overwrite {
            return Err(Error::FileExists(path.to_string()));
        }
        self.record(format!("put {path} {}", message.unwrap_or("-")));
        self.files
            .lock()
            .unwrap()
            .insert(path.to_string(), content.to_string());
        Ok(Self::commit(path, Some(content)))
    }

    async fn delete(&self, path: &str, message: Option<&str>) -> Result<FileCommit> {
        self.record(format!("delete {path} {}", message.unwrap_or("-")));
        if self.fail_delete {
            return Err(Error::ApiError {
                status: 500,
                message: "delete failed".into(),
            });
        }
        self.files
            .lock()
            .unwrap()
            .remove(path)
            .ok_or_else(|| Error::FileNotFound(path.to_string()))?;
        Ok(Self::commit(path, None))
    }

    async fn rename(&self, from: &str, to: &str, message: Option<&str>) -> Result<FileCommit> {
        let content = self.read(from).await?;
        let created = self.create_or_update(to, &content, false, message).await?;
        match self.delete(from, message).await {
            Ok(deleted) => Ok(FileCommit {
                path: created.path,
                content_sha: created.content_sha,
                commit_sha: deleted.commit_sha,
            }),
            Err(e) => Err(Error::RenameIncomplete {
                from: from.to_string(),
                to: to.to_string(),
                rolled_back: false,
                source: Box::new(e),
            }),
        }
    }

    async fn tree(&self, root: Option<&str>) -> Result<Vec<FileTreeNode>> {
        self.record(format!("tree /{}", root.unwrap_or("")));
        let files = self.files.lock().unwrap().clone();

        // one level of directories is enough for command tests
        let mut nodes: Vec<FileTreeNode> = Vec::new();
        let mut dirs: BTreeMap<String, Vec<FileTreeNode>> = BTreeMap::new();
        for path in files.keys() {
            match path.split_once('/') {
                Some((dir, _)) => dirs.entry(dir.to_string()).or_default().push(FileTreeNode {
                    entry: entry(path, "file"),
                    children: None,
                }),
                None => nodes.push(FileTreeNode {
                    entry: entry(path, "file"),
                    children: None,
                }),
            }
        }
        nodes.extend(dirs.into_iter().map(|(dir, children)| FileTreeNode {
            entry: entry(&dir, "dir"),
            children: Some(children),
        }));
        Ok(nodes)
    }
}
