//! Command dispatch and handlers.

pub mod categories;
pub mod create;

use std::io;

use crate::cli::Command;
use crate::config::Config;
use crate::context::ServiceContext;
use crate::wizard::WizardOptions;

/// Dispatch a parsed command to its handler.
///
/// Configuration is read from the environment and a live context is built
/// before the handler runs.
///
/// # Errors
///
/// Returns an error string if configuration is invalid or the selected
/// command handler fails.
pub fn dispatch(command: &Command) -> Result<(), String> {
    let config = Config::from_env().map_err(|e| e.to_string())?;
    let ctx = ServiceContext::live(&config)?;
    dispatch_with_context(command, &ctx, &config)
}

/// Dispatch a command with the given service context.
fn dispatch_with_context(
    command: &Command,
    ctx: &ServiceContext,
    config: &Config,
) -> Result<(), String> {
    let runtime = runtime()?;
    match command {
        Command::Categories => {
            runtime.block_on(categories::run_with_context(ctx, &mut io::stdout().lock()))
        }
        Command::Create { draft, photos } => runtime.block_on(create::run_with_context(
            ctx,
            WizardOptions::from_config(config),
            draft.as_deref(),
            photos,
            io::stdin().lock(),
            io::stdout().lock(),
        )),
    }
}

/// Single-threaded runtime for one command.
fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start async runtime: {e}"))
}
