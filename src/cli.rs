//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for `neighborly`.
#[derive(Debug, Parser)]
#[command(name = "neighborly", version, about = "Ask your neighbors for a hand")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported top-level subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the request categories offered by the backend.
    Categories,
    /// Create a help request, step by step.
    Create {
        /// Fill the form from a YAML draft and submit without prompting.
        #[arg(long)]
        draft: Option<PathBuf>,
        /// Photo to attach (repeatable).
        #[arg(long = "photo", value_name = "PATH")]
        photos: Vec<PathBuf>,
    },
}
