//! `repofs exists` command - Print a file's content hash.

use anyhow::{Result, bail};

use super::utils::Session;
use crate::output;

/// Run the exists command.
pub fn run(session: &Session, path: &str) -> Result<()> {
    match session.rt.block_on(session.client.exists(path))? {
        Some(sha) => {
            output::essential(&sha);
            Ok(())
        }
        None => bail!("{path} does not exist"),
    }
}
