//! `repofs put` command - Create or update a file.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use repofs::{ContentsApi, FileCommit};

use super::utils::Session;
use crate::output;

/// Run the put command.
pub fn run(
    session: &Session,
    path: &str,
    file: Option<&Path>,
    overwrite: bool,
    message: Option<&str>,
    json: bool,
) -> Result<()> {
    let content = read_content(file, std::io::stdin().lock())?;
    let commit = session
        .rt
        .block_on(execute(&session.client, path, &content, overwrite, message))?;

    if json {
        return output::json(&commit);
    }

    output::success(&format!(
        "Wrote {} ({})",
        commit.path,
        output::short_sha(&commit.commit_sha)
    ));
    output::essential(&commit.commit_sha);
    Ok(())
}

/// Content from `file`, or everything on `stdin` when no file is given.
pub fn read_content(file: Option<&Path>, mut stdin: impl Read) -> Result<String> {
    match file {
        Some(file) => std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display())),
        None => {
            let mut content = String::new();
            stdin
                .read_to_string(&mut content)
                .context("Failed to read content from stdin")?;
            Ok(content)
        }
    }
}

/// Write `content` at `path`, turning a conflict into a hint.
pub async fn execute<C: ContentsApi>(
    client: &C,
    path: &str,
    content: &str,
    overwrite: bool,
    message: Option<&str>,
) -> Result<FileCommit> {
    match client
        .create_or_update(path, content, overwrite, message)
        .await
    {
        Ok(commit) => Ok(commit),
        Err(repofs::Error::FileExists(path)) => {
            bail!("{path} already exists - pass --overwrite to replace it")
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::commands::test_mocks::MockContents;

    #[tokio::test]
    async fn test_put_creates_file() {
        let client = MockContents::new();

        let commit = execute(&client, "a.txt", "hello", false, None)
            .await
            .unwrap();

        assert_eq!(commit.path, "a.txt");
        assert_eq!(client.file("a.txt").as_deref(), Some("hello"));
    }

    #[tokio::test]
    async fn test_put_conflict_hints_overwrite() {
        let client = MockContents::new().with_file("a.txt", "old");

        let err = execute(&client, "a.txt", "new", false, None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("--overwrite"));
        assert_eq!(client.file("a.txt").as_deref(), Some("old"));
    }

    #[tokio::test]
    async fn test_put_overwrite_replaces() {
        let client = MockContents::new().with_file("a.txt", "old");

        execute(&client, "a.txt", "new", true, Some("replace"))
            .await
            .unwrap();

        assert_eq!(client.file("a.txt").as_deref(), Some("new"));
        assert_eq!(client.calls(), vec!["put a.txt replace"]);
    }

    #[test]
    fn test_read_content_from_stdin() {
        let content = read_content(None, "piped text".as_bytes()).unwrap();
        assert_eq!(content, "piped text");
    }

    #[test]
    fn test_read_content_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "from disk").unwrap();

        let content = read_content(Some(temp.path()), std::io::empty()).unwrap();
        assert_eq!(content, "from disk");
    }

    #[test]
    fn test_read_content_missing_file() {
        let err = read_content(Some(Path::new("/nonexistent/file.txt")), std::io::empty())
            .unwrap_err();
        assert!(err.to_string().contains("/nonexistent/file.txt"));
    }
}
