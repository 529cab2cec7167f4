//! Live navigator for the terminal.
//!
//! There is no router in a CLI session: a navigation ends the wizard and is
//! only reported in the log.

use crate::ports::{NavigateOptions, Navigator};

/// Logs redirects.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl TerminalNavigator {
    /// Creates a navigator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str, options: NavigateOptions) {
        tracing::info!(path, replace = options.replace, state = ?options.state, "redirect");
    }
}
