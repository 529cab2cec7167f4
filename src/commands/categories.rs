//! `neighborly categories` command.

use std::io::Write;

use crate::context::ServiceContext;
use crate::wizard::form::category_options;

/// List the categories a request can be filed under.
///
/// # Errors
///
/// Returns an error string if the backend cannot be reached or output fails.
pub async fn run_with_context<W: Write>(ctx: &ServiceContext, out: &mut W) -> Result<(), String> {
    let fetched = ctx
        .categories
        .fetch_categories()
        .await
        .map_err(|e| format!("Failed to load categories: {e}"))?;

    for category in category_options(&fetched) {
        writeln!(
            out,
            "{:<20} {:<24} {:>4} open",
            category.value, category.name, category.task_count
        )
        .map_err(|e| format!("write error: {e}"))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::StaticCategoryApi;
    use crate::wizard::Category;

    #[tokio::test]
    async fn lists_fetched_categories_then_other() {
        let ctx = ServiceContext {
            categories: Box::new(StaticCategoryApi::new(vec![Category {
                value: "SHOPPING".into(),
                name: "Shopping".into(),
                task_count: 3,
            }])),
            ..ServiceContext::in_memory()
        };
        let mut out = Vec::new();

        run_with_context(&ctx, &mut out).await.unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("SHOPPING"));
        assert!(lines[0].ends_with("3 open"));
        assert!(lines[1].starts_with("OTHER"));
    }

    #[tokio::test]
    async fn backend_failure_is_an_error() {
        let ctx = ServiceContext {
            categories: Box::new(StaticCategoryApi::unavailable()),
            ..ServiceContext::in_memory()
        };
        let err = run_with_context(&ctx, &mut Vec::new()).await.unwrap_err();
        assert!(err.starts_with("Failed to load categories"));
    }
}
