//! Core library entry for the `neighborly` CLI.
//!
//! The [`wizard`] module holds the request-creation flow. It reaches the
//! outside world only through the [`ports`] traits, wired up by
//! [`context::ServiceContext`] with either live or in-memory adapters.

pub mod adapters;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod context;
pub mod error;
pub mod ports;
pub mod wizard;

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "NEIGHBORLY_LOG";

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli.command)
}

/// Install the global tracing subscriber, writing to stderr.
///
/// The filter comes from `NEIGHBORLY_LOG` and defaults to `info`. Calling
/// this more than once is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
