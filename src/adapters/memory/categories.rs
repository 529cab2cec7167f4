//! Static category listing.

use crate::error::ApiError;
use crate::ports::{ApiFuture, CategoryApi};
use crate::wizard::form::Category;

/// Returns a fixed list, or fails every call.
pub struct StaticCategoryApi {
    categories: Option<Vec<Category>>,
}

impl StaticCategoryApi {
    /// Serves `categories`.
    #[must_use]
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories: Some(categories) }
    }

    /// Fails every fetch with a 503.
    #[must_use]
    pub fn unavailable() -> Self {
        Self { categories: None }
    }
}

impl CategoryApi for StaticCategoryApi {
    fn fetch_categories(&self) -> ApiFuture<'_, Vec<Category>> {
        let result = self.categories.clone().ok_or_else(|| ApiError::Status {
            status: 503,
            message: "category service unavailable".to_string(),
        });
        Box::pin(async move { result })
    }
}
