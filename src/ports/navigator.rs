//! Navigation port used for redirects.

use serde_json::Value;

/// How a navigation should be performed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigateOptions {
    /// Data carried to the destination (e.g. the location to return to).
    pub state: Option<Value>,
    /// Replace the current history entry instead of pushing a new one.
    pub replace: bool,
}

impl NavigateOptions {
    /// Replace the current entry, carrying no state.
    #[must_use]
    pub fn replace() -> Self {
        Self { state: None, replace: true }
    }
}

/// Moves the user to another location.
pub trait Navigator: Send + Sync {
    /// Navigate to `path`.
    fn navigate(&self, path: &str, options: NavigateOptions);
}
