//! `repofs url` command - Print the resolved repository API URL.

use anyhow::Result;

use super::{Cli, utils};
use crate::output;

/// Run the url command. Needs no token.
pub fn run(cli: &Cli) -> Result<()> {
    let config = utils::load_config(cli)?.client_config()?;
    let url = config.endpoint.resolve(&config.owner, &config.repo)?;
    output::essential(&url);
    Ok(())
}
