//! `repofs mv` command - Move a file to a new path.

use anyhow::Result;
use repofs::{ContentsApi, FileCommit};

use super::utils::Session;
use crate::output;

/// Run the mv command.
pub fn run(
    session: &Session,
    from: &str,
    to: &str,
    message: Option<&str>,
    json: bool,
) -> Result<()> {
    let commit = session
        .rt
        .block_on(execute(&session.client, from, to, message))?;

    if json {
        return output::json(&commit);
    }

    output::success(&format!(
        "Moved {from} -> {} ({})",
        commit.path,
        output::short_sha(&commit.commit_sha)
    ));
    output::essential(&commit.commit_sha);
    Ok(())
}

/// Rename, explaining what is left behind when the move half-completes.
pub async fn execute<C: ContentsApi>(
    client: &C,
    from: &str,
    to: &str,
    message: Option<&str>,
) -> Result<FileCommit> {
    match client.rename(from, to, message).await {
        Ok(commit) => Ok(commit),
        Err(e @ repofs::Error::RenameIncomplete { rolled_back, .. }) => {
            if rolled_back {
                output::warn(&format!("{to} was removed again; {from} is unchanged"));
            } else {
                output::warn(&format!(
                    "{to} was kept and {from} may still exist. Check both paths before removing either with `repofs rm`."
                ));
            }
            Err(e.into())
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
    async fn test_mv_moves_content() {
        let client = MockContents::new().with_file("old.md", "body");

        let commit = execute(&client, "old.md", "new.md", None).await.unwrap();

        assert_eq!(commit.path, "new.md");
        assert_eq!(client.file("new.md").as_deref(), Some("body"));
        assert!(client.file("old.md").is_none());
    }

    #[tokio::test]
    async fn test_mv_incomplete_is_error() {
        let client = MockContents::new()
            .with_file("old.md", "body")
            .with_failing_delete();

        let err = execute(&client, "old.md", "new.md", None)
            .await
            .unwrap_err();

        let err = err.downcast::<repofs::Error>().unwrap();
        assert!(matches!(
            err,
            repofs::Error::RenameIncomplete {
                rolled_back: false,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_mv_missing_source() {
        let client = MockContents::new();

        let err = execute(&client, "old.md", "new.md", None)
            .await
            .unwrap_err();

        assert!(err.to_string().contains("old.md"));
    }
}
