//! Counting preview store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::adapters::lock;
use crate::ports::PreviewStore;
use crate::wizard::photos::SelectedFile;

/// Hands out `blob:` URLs and counts how often each is revoked.
#[derive(Default)]
pub struct MemoryPreviewStore {
    next: AtomicUsize,
    revocations: Mutex<HashMap<String, usize>>,
    created: Mutex<Vec<String>>,
}

impl MemoryPreviewStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of previews ever created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        lock(&self.created).len()
    }

    /// Previews created but not yet revoked.
    #[must_use]
    pub fn live_count(&self) -> usize {
        let revoked = lock(&self.revocations);
        lock(&self.created).iter().filter(|url| !revoked.contains_key(*url)).count()
    }

    /// How many times `url` was revoked.
    #[must_use]
    pub fn revocations(&self, url: &str) -> usize {
        lock(&self.revocations).get(url).copied().unwrap_or(0)
    }

    /// URLs revoked more than once.
    #[must_use]
    pub fn double_revocations(&self) -> Vec<String> {
        lock(&self.revocations)
            .iter()
            .filter(|(_, count)| **count > 1)
            .map(|(url, _)| url.clone())
            .collect()
    }
}

impl PreviewStore for MemoryPreviewStore {
    fn create(&self, file: &SelectedFile) -> std::io::Result<String> {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        let url = format!("blob:preview/{n}/{}", file.name);
        lock(&self.created).push(url.clone());
        Ok(url)
    }

    fn revoke(&self, url: &str) {
        *lock(&self.revocations).entry(url.to_string()).or_insert(0) += 1;
    }
}
