//! Trait abstractions for contents API operations.
//!
//! This module defines the `ContentsApi` trait which abstracts the file
//! operations, enabling dependency injection and testability.

use crate::{FileCommit, FileTreeNode, Result};

/// Trait for file-level repository operations.
///
/// This trait abstracts the contents API, allowing for:
/// - Dependency injection in commands
/// - Mock implementations for testing
pub trait ContentsApi: Send + Sync {
    /// Content hash of the file at `path`, `None` when absent.
    fn exists(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<String>>> + Send;

    /// Read a file as text.
    fn read(&self, path: &str) -> impl std::future::Future<Output = Result<String>> + Send;

    /// Create a file, or replace it when `overwrite` is set.
    fn create_or_update(
        &self,
        path: &str,
        content: &str,
        overwrite: bool,
        message: Option<&str>,
    ) -> impl std::future::Future<Output = Result<FileCommit>> + Send;

    /// Delete a file.
    fn delete(
        &self,
        path: &str,
        message: Option<&str>,
    ) -> impl std::future::Future<Output = Result<FileCommit>> + Send;

    /// Move a file to a new path.
    fn rename(
        &self,
        from: &str,
        to: &str,
        message: Option<&str>,
    ) -> impl std::future::Future<Output = Result<FileCommit>> + Send;

    /// List the file tree under `root`.
    fn tree(
        &self,
        root: Option<&str>,
    ) -> impl std::future::Future<Output = Result<Vec<FileTreeNode>>> + Send;
}
