//! Category listing port.

use super::ApiFuture;
use crate::wizard::form::Category;

/// Lists the categories a request can be filed under.
pub trait CategoryApi: Send + Sync {
    /// Fetches every category with its open task count.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be reached or answers badly.
    fn fetch_categories(&self) -> ApiFuture<'_, Vec<Category>>;
}
