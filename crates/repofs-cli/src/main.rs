//! repofs CLI - edit files in a hosted Git repository over its contents API.

use clap::Parser;

mod commands;
mod config;
mod logging;
mod output;

use commands::{Cli, Commands, utils};

fn main() {
    let cli = Cli::parse();

    output::set_quiet(cli.quiet);
    logging::init(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Url => return commands::url::run(cli),
        Commands::Config { save } => return commands::config::run(cli, *save),
        Commands::Completions { shell } => return commands::completions::run(*shell),
        _ => {}
    }

    let session = utils::open_session(cli)?;

    match &cli.command {
        Commands::Exists { path } => commands::exists::run(&session, path),
        Commands::Cat { path } => commands::cat::run(&session, path),
        Commands::Put {
            path,
            file,
            overwrite,
            message,
            json,
        } => commands::put::run(
            &session,
            path,
            file.as_deref(),
            *overwrite,
            message.as_deref(),
            *json,
        ),
        Commands::Rm {
            path,
            message,
            json,
        } => commands::rm::run(&session, path, message.as_deref(), *json),
        Commands::Mv {
            from,
            to,
            message,
            json,
        } => commands::mv::run(&session, from, to, message.as_deref(), *json),
        Commands::Tree { path, json } => commands::tree::run(&session, path.as_deref(), *json),
        Commands::Api { method, path, data } => {
            commands::api::run(&session, method, path, data.as_deref())
        }
        Commands::Url | Commands::Config { .. } | Commands::Completions { .. } => Ok(()),
    }
}
