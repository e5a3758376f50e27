//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Filter directive for the given verbosity.
///
/// Third-party crates stay at `warn`; `-v` raises repofs to `info`, `-vv`
/// and beyond to `debug`.
fn directive(verbose: u8, quiet: bool) -> String {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, _) => "debug",
    };
    format!("warn,repofs={level},repofs_cli={level}")
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flags.
pub fn init(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(directive(verbose, quiet)));

    // a subscriber may already be set in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
