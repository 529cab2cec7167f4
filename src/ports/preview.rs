//! Preview resource port.
//!
//! A preview URL is an owned resource: every URL returned by
//! [`PreviewStore::create`] must be passed to [`PreviewStore::revoke`]
//! exactly once. [`crate::wizard::photos::PreviewHandle`] enforces this.

use crate::wizard::photos::SelectedFile;

/// Creates and releases local preview references for selected images.
pub trait PreviewStore: Send + Sync {
    /// Acquires a preview for `file` and returns its URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the preview cannot be materialized.
    fn create(&self, file: &SelectedFile) -> std::io::Result<String>;

    /// Releases a preview previously returned by [`PreviewStore::create`].
    fn revoke(&self, url: &str);
}
