//! `repofs config` command - Show or persist the effective settings.

use anyhow::{Result, bail};

use super::{Cli, utils};
use crate::output;

/// Run the config command. Needs no token.
///
/// Flags and `REPOFS_*` variables are merged into the file's settings, so
/// `repofs --api codeberg --owner octo --repo notes config --save` records
/// them for later runs.
pub fn run(cli: &Cli, save: bool) -> Result<()> {
    let config = utils::load_config(cli)?;

    if !save {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let Some(path) = utils::config_path(cli) else {
        bail!("no config location: pass --config or set HOME");
    };
    config.save(&path)?;
    output::success(&format!("Saved config to {}", path.display()));
    Ok(())
}
