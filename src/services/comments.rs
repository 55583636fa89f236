use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{Comment, CommentId, CommentPage, CommentView, RecipeId},
    services::catalog::Lookups,
};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommentQuery {
    pub limit: Option<usize>,
    /// 1-based
    pub page: Option<usize>,
}

impl CommentQuery {
    /// Page size clamped to 1..=100 and a page number of at least 1
    pub fn window(&self) -> (usize, usize) {
        let limit = self
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        let page = self.page.unwrap_or(1).max(1);
        (limit, page)
    }
}

fn clean_body(body: &str) -> AppResult<&str> {
    let body = body.trim();
    if body.is_empty() {
        return Err(AppError::InvalidInput(
            "Comment body must not be empty".to_string(),
        ));
    }
    Ok(body)
}

async fn require_recipe(lookups: &Lookups, recipe: RecipeId) -> AppResult<()> {
    match lookups.recipes.get_recipe(recipe).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound(format!("Recipe {} not found", recipe))),
    }
}

/// Loads a comment the acting member is allowed to change
async fn owned_comment(lookups: &Lookups, id: CommentId, actor: &str) -> AppResult<Comment> {
    let comment = lookups
        .comments
        .get_comment(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))?;

    if !comment.is_written_by(actor) {
        tracing::warn!(comment = id, actor = %actor, "Rejected change to another member's comment");
        return Err(AppError::Forbidden(
            "Only the author can change this comment".to_string(),
        ));
    }
    Ok(comment)
}

pub async fn list_comments(
    lookups: &Lookups,
    recipe: RecipeId,
    query: &CommentQuery,
) -> AppResult<CommentPage> {
    require_recipe(lookups, recipe).await?;

    let (limit, page) = query.window();
    let offset = (page - 1).saturating_mul(limit);
    let comments = lookups
        .comments
        .list_comments(recipe, limit, offset)
        .await?;

    Ok(CommentPage {
        comments: comments.into_iter().map(CommentView::from).collect(),
        page,
        limit,
    })
}

pub async fn add_comment(
    lookups: &Lookups,
    recipe: RecipeId,
    actor: &str,
    body: &str,
) -> AppResult<CommentView> {
    let body = clean_body(body)?;
    require_recipe(lookups, recipe).await?;
    lookups.members.get_member_interests(actor).await?;

    let comment = lookups.comments.add_comment(recipe, actor, body).await?;
    tracing::info!(comment = comment.id, recipe, "Comment added");

    Ok(comment.into())
}

pub async fn edit_comment(
    lookups: &Lookups,
    id: CommentId,
    actor: &str,
    body: &str,
) -> AppResult<CommentView> {
    let body = clean_body(body)?;
    owned_comment(lookups, id, actor).await?;

    lookups
        .comments
        .update_comment(id, body)
        .await?
        .map(CommentView::from)
        .ok_or_else(|| AppError::NotFound(format!("Comment {} not found", id)))
}

pub async fn delete_comment(lookups: &Lookups, id: CommentId, actor: &str) -> AppResult<()> {
    owned_comment(lookups, id, actor).await?;

    if !lookups.comments.delete_comment(id).await? {
        return Err(AppError::NotFound(format!("Comment {} not found", id)));
    }
    tracing::info!(comment = id, "Comment deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recipe;
    use crate::services::catalog::{MemoryCatalog, MockCommentStore};
    use std::sync::Arc;

    fn lookups() -> Lookups {
        Lookups::from_catalog(Arc::new(
            MemoryCatalog::new()
                .with_recipe(Recipe::new(1, "Congee"))
                .with_named_member("somchai@example.com", Some("Somchai"), None)
                .with_member("malee@example.com", None),
        ))
    }

    #[test]
    fn test_window_clamps() {
        let query = |limit, page| CommentQuery { limit, page };
        assert_eq!(query(None, None).window(), (DEFAULT_PAGE_SIZE, 1));
        assert_eq!(query(Some(0), Some(0)).window(), (1, 1));
        assert_eq!(query(Some(1000), Some(3)).window(), (MAX_PAGE_SIZE, 3));
    }

    #[tokio::test]
    async fn test_add_and_list() {
        let lookups = lookups();
        let added = add_comment(&lookups, 1, "somchai@example.com", "  Lovely  ")
            .await
            .unwrap();
        assert_eq!(added.body, "Lovely");
        assert_eq!(added.author_name, "Somchai");

        add_comment(&lookups, 1, "malee@example.com", "Too salty").await.unwrap();

        let page = list_comments(&lookups, 1, &CommentQuery::default()).await.unwrap();
        assert_eq!(page.comments.len(), 2);
        assert_eq!(page.comments[0].author_name, "malee");
        assert_eq!((page.page, page.limit), (1, DEFAULT_PAGE_SIZE));

        let second = list_comments(
            &lookups,
            1,
            &CommentQuery {
                limit: Some(1),
                page: Some(2),
            },
        )
        .await
        .unwrap();
        assert_eq!(second.comments.len(), 1);
        assert_eq!(second.comments[0].id, added.id);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_body_and_unknowns() {
        let lookups = lookups();
        let blank = add_comment(&lookups, 1, "somchai@example.com", "   ").await;
        assert!(matches!(blank, Err(AppError::InvalidInput(_))));

        let no_recipe = add_comment(&lookups, 9, "somchai@example.com", "Hi").await;
        assert!(matches!(no_recipe, Err(AppError::NotFound(_))));

        let no_member = add_comment(&lookups, 1, "ghost@example.com", "Hi").await;
        assert!(matches!(no_member, Err(AppError::NotFound(_))));

        let listing = list_comments(&lookups, 9, &CommentQuery::default()).await;
        assert!(matches!(listing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_only_author_may_edit_or_delete() {
        let lookups = lookups();
        let added = add_comment(&lookups, 1, "somchai@example.com", "Lovely")
            .await
            .unwrap();

        let edit = edit_comment(&lookups, added.id, "malee@example.com", "Mine now").await;
        assert!(matches!(edit, Err(AppError::Forbidden(_))));
        let delete = delete_comment(&lookups, added.id, "malee@example.com").await;
        assert!(matches!(delete, Err(AppError::Forbidden(_))));

        let edited = edit_comment(&lookups, added.id, "SOMCHAI@example.com", "Lovely!")
            .await
            .unwrap();
        assert_eq!(edited.body, "Lovely!");

        delete_comment(&lookups, added.id, "somchai@example.com")
            .await
            .unwrap();
        let gone = delete_comment(&lookups, added.id, "somchai@example.com").await;
        assert!(matches!(gone, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_forbidden_edit_never_writes() {
        let mut comments = MockCommentStore::new();
        comments.expect_get_comment().returning(|id| {
            Ok(Some(Comment {
                id,
                recipe_id: 1,
                member_email: "somchai@example.com".to_string(),
                author_name: None,
                body: "Lovely".to_string(),
                created_at: chrono::Utc::now(),
            }))
        });
        comments.expect_update_comment().never();
        comments.expect_delete_comment().never();

        let mut lookups = lookups();
        lookups.comments = Arc::new(comments);

        let edit = edit_comment(&lookups, 5, "malee@example.com", "Mine").await;
        assert!(matches!(edit, Err(AppError::Forbidden(_))));
        let delete = delete_comment(&lookups, 5, "malee@example.com").await;
        assert!(matches!(delete, Err(AppError::Forbidden(_))));
    }
}
