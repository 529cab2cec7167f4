//! Live session backed by the configured API token.

use crate::ports::Session;

/// Authenticated when an API token is configured.
pub struct TokenSession {
    token: Option<String>,
}

impl TokenSession {
    /// Creates a session from an optional token.
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }
}

impl Session for TokenSession {
    fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }
}
