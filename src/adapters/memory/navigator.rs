//! Navigator that records every redirect.

use std::sync::{Arc, Mutex};

use crate::adapters::lock;
use crate::ports::{NavigateOptions, Navigator};

/// One recorded navigation.
#[derive(Debug, Clone, PartialEq)]
pub struct Navigation {
    /// Destination path.
    pub path: String,
    /// Options passed along.
    pub options: NavigateOptions,
}

/// Records navigations behind a cloneable handle.
#[derive(Clone, Default)]
pub struct RecordingNavigator {
    log: Arc<Mutex<Vec<Navigation>>>,
}

impl RecordingNavigator {
    /// Creates a navigator with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigations so far, oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<Navigation> {
        lock(&self.log).clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str, options: NavigateOptions) {
        lock(&self.log).push(Navigation { path: path.to_string(), options });
    }
}
