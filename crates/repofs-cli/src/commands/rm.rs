//! `repofs rm` command - Delete a file.

use anyhow::Result;

use super::utils::Session;
use crate::output;

/// Run the rm command.
pub fn run(session: &Session, path: &str, message: Option<&str>, json: bool) -> Result<()> {
    let commit = session.rt.block_on(session.client.delete(path, message))?;

    if json {
        return output::json(&commit);
    }

    output::success(&format!(
        "Deleted {} ({})",
        commit.path,
        output::short_sha(&commit.commit_sha)
    ));
    output::essential(&commit.commit_sha);
    Ok(())
}
