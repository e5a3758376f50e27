//! `repofs cat` command - Print a file's contents.

use std::io::Write;

use anyhow::Result;

use super::utils::Session;

/// Run the cat command.
pub fn run(session: &Session, path: &str) -> Result<()> {
    let content = session.rt.block_on(session.client.read(path))?;

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(content.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
