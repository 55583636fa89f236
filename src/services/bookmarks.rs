use crate::{
    error::{AppError, AppResult},
    models::{BookmarkStatus, RecipeId, RecipeSummary},
    services::{
        catalog::Lookups,
        recipes::{fold_query, RecipeFormatter},
        tags::TagNormalizer,
    },
};

/// A member's bookmarked recipes, most recently saved first.
///
/// `disease` keeps recipes with a merged tag containing it, case-insensitively.
pub async fn list_bookmarks(
    lookups: &Lookups,
    normalizer: &TagNormalizer,
    member: &str,
    disease: Option<&str>,
) -> AppResult<Vec<RecipeSummary>> {
    lookups.members.get_member_interests(member).await?;

    let recipes = lookups.bookmarks.list_bookmarked_recipes(member).await?;
    let categories = lookups.categories.list_categories().await?;
    let formatter = RecipeFormatter::new(normalizer, &categories);

    let wanted = disease.map(fold_query).unwrap_or_default();
    let summaries: Vec<RecipeSummary> = recipes
        .iter()
        .map(|r| formatter.summary(r))
        .filter(|s| wanted.is_empty() || s.tags.iter().any(|t| fold_query(t).contains(&wanted)))
        .collect();

    tracing::debug!(
        member = %member,
        bookmarked = recipes.len(),
        matched = summaries.len(),
        "Listed bookmarks"
    );

    Ok(summaries)
}

pub async fn bookmark_status(
    lookups: &Lookups,
    member: &str,
    recipe: RecipeId,
) -> AppResult<BookmarkStatus> {
    Ok(BookmarkStatus {
        recipe_id: recipe,
        bookmarked: lookups.bookmarks.is_bookmarked(member, recipe).await?,
        changed: false,
    })
}

/// Saves a recipe for a member; saving it twice is not an error
pub async fn add_bookmark(
    lookups: &Lookups,
    member: &str,
    recipe: RecipeId,
) -> AppResult<BookmarkStatus> {
    lookups.members.get_member_interests(member).await?;
    if lookups.recipes.get_recipe(recipe).await?.is_none() {
        return Err(AppError::NotFound(format!("Recipe {} not found", recipe)));
    }

    let added = lookups.bookmarks.add_bookmark(member, recipe).await?;
    tracing::info!(member = %member, recipe, added, "Bookmark saved");

    Ok(BookmarkStatus {
        recipe_id: recipe,
        bookmarked: true,
        changed: added,
    })
}

pub async fn remove_bookmark(
    lookups: &Lookups,
    member: &str,
    recipe: RecipeId,
) -> AppResult<BookmarkStatus> {
    lookups.members.get_member_interests(member).await?;

    let removed = lookups.bookmarks.remove_bookmark(member, recipe).await?;
    tracing::info!(member = %member, recipe, removed, "Bookmark removed");

    Ok(BookmarkStatus {
        recipe_id: recipe,
        bookmarked: false,
        changed: removed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Disease, Recipe};
    use crate::services::catalog::MemoryCatalog;
    use std::sync::Arc;

    fn lookups() -> Lookups {
        Lookups::from_catalog(Arc::new(
            MemoryCatalog::new()
                .with_category(Disease::new(1, "Diabetes"))
                .with_recipe(
                    Recipe::new(1, "Congee")
                        .with_category(1)
                        .with_tags("diabetes, Kidney")
                        .with_meal("1"),
                )
                .with_recipe(Recipe::new(2, "Curry").with_tags("Gout"))
                .with_member("somchai@example.com", None),
        ))
    }

    #[tokio::test]
    async fn test_list_bookmarks_merges_tags_and_filters() {
        let lookups = lookups();
        let normalizer = TagNormalizer::default();
        add_bookmark(&lookups, "somchai@example.com", 1).await.unwrap();
        add_bookmark(&lookups, "somchai@example.com", 2).await.unwrap();

        let all = list_bookmarks(&lookups, &normalizer, "somchai@example.com", None)
            .await
            .unwrap();
        assert_eq!(all.iter().map(|s| s.id).collect::<Vec<_>>(), vec![2, 1]);
        assert_eq!(all[1].tags, vec!["Diabetes", "Kidney"]);

        let kidney = list_bookmarks(&lookups, &normalizer, "somchai@example.com", Some(" KIDNEY "))
            .await
            .unwrap();
        assert_eq!(kidney.len(), 1);
        assert_eq!(kidney[0].id, 1);

        let blank = list_bookmarks(&lookups, &normalizer, "somchai@example.com", Some(""))
            .await
            .unwrap();
        assert_eq!(blank.len(), 2);
    }

    #[tokio::test]
    async fn test_add_and_remove_report_changes() {
        let lookups = lookups();
        let first = add_bookmark(&lookups, "somchai@example.com", 1).await.unwrap();
        let again = add_bookmark(&lookups, "somchai@example.com", 1).await.unwrap();
        assert!(first.changed && first.bookmarked);
        assert!(!again.changed && again.bookmarked);

        let status = bookmark_status(&lookups, "somchai@example.com", 1).await.unwrap();
        assert!(status.bookmarked);

        let removed = remove_bookmark(&lookups, "somchai@example.com", 1).await.unwrap();
        let missing = remove_bookmark(&lookups, "somchai@example.com", 1).await.unwrap();
        assert!(removed.changed && !removed.bookmarked);
        assert!(!missing.changed);
    }

    #[tokio::test]
    async fn test_unknown_member_or_recipe_is_not_found() {
        let lookups = lookups();
        let normalizer = TagNormalizer::default();

        let result = add_bookmark(&lookups, "somchai@example.com", 99).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = add_bookmark(&lookups, "ghost@example.com", 1).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));

        let result = list_bookmarks(&lookups, &normalizer, "ghost@example.com", None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
