//! Lookups and member-owned stores over the recipe catalog
//!
//! Recipes, disease categories and members live in the relational store; this
//! module defines the narrow boundary the recommendation and display logic
//! depends on, so the same logic runs against postgres or an in-memory catalog.
//! Recipes and categories are only read. Members write their own interests,
//! bookmarks and comments.

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{CategoryId, Comment, CommentId, Disease, Recipe, RecipeId},
};

pub mod cached;
pub mod memory;
pub mod postgres;

pub use cached::CachedCategories;
pub use memory::MemoryCatalog;
pub use postgres::PgCatalog;

/// Recipe rows
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait RecipeLookup: Send + Sync {
    /// Every recipe in the catalog
    async fn list_recipes(&self) -> AppResult<Vec<Recipe>>;

    /// Recipes whose free-text tag field contains any term, case-insensitively
    async fn list_recipes_matching_free_text(&self, terms: &[String]) -> AppResult<Vec<Recipe>>;

    /// Recipes whose category tag is one of `ids`
    async fn list_recipes_by_category_ids(&self, ids: &[CategoryId]) -> AppResult<Vec<Recipe>>;

    async fn get_recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>>;

    /// Up to `limit` recipes drawn at random, skipping the ids in `exclude`
    async fn list_random_recipes(
        &self,
        exclude: &[RecipeId],
        limit: usize,
    ) -> AppResult<Vec<Recipe>>;
}

/// Disease categories
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CategoryLookup: Send + Sync {
    /// All categories ordered by name
    async fn list_categories(&self) -> AppResult<Vec<Disease>>;

    /// Ids of the categories named in `names`.
    ///
    /// Names are compared trimmed and case-insensitively; names without a
    /// matching category are skipped.
    async fn resolve_category_ids_by_names(&self, names: &[String]) -> AppResult<Vec<CategoryId>> {
        let categories = self.list_categories().await?;
        Ok(match_category_names(&categories, names))
    }
}

/// Members and their declared interests
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MemberLookup: Send + Sync {
    /// Declared interests of a member, or `NotFound` for an unknown member
    async fn get_member_interests(&self, member: &str) -> AppResult<Vec<String>>;

    /// Replaces the declared interests, stored comma separated
    async fn set_member_interests(&self, member: &str, interests: &[String]) -> AppResult<()>;
}

/// Recipes members saved for later
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Bookmarked recipes, most recently saved first
    async fn list_bookmarked_recipes(&self, member: &str) -> AppResult<Vec<Recipe>>;

    async fn is_bookmarked(&self, member: &str, recipe: RecipeId) -> AppResult<bool>;

    /// Returns false when the bookmark already existed
    async fn add_bookmark(&self, member: &str, recipe: RecipeId) -> AppResult<bool>;

    /// Returns false when there was nothing to remove
    async fn remove_bookmark(&self, member: &str, recipe: RecipeId) -> AppResult<bool>;
}

/// Member comments under recipes
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CommentStore: Send + Sync {
    /// Comments under a recipe, newest first
    async fn list_comments(
        &self,
        recipe: RecipeId,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Comment>>;

    async fn get_comment(&self, id: CommentId) -> AppResult<Option<Comment>>;

    async fn add_comment(&self, recipe: RecipeId, member: &str, body: &str) -> AppResult<Comment>;

    async fn update_comment(&self, id: CommentId, body: &str) -> AppResult<Option<Comment>>;

    async fn delete_comment(&self, id: CommentId) -> AppResult<bool>;
}

/// A store that serves every lookup
pub trait Catalog:
    RecipeLookup + CategoryLookup + MemberLookup + BookmarkStore + CommentStore
{
}

impl<T> Catalog for T where
    T: RecipeLookup + CategoryLookup + MemberLookup + BookmarkStore + CommentStore
{
}

pub(crate) fn match_category_names(categories: &[Disease], names: &[String]) -> Vec<CategoryId> {
    let wanted: Vec<String> = names.iter().map(|n| n.trim().to_lowercase()).collect();
    categories
        .iter()
        .filter(|c| wanted.contains(&c.name.trim().to_lowercase()))
        .map(|c| c.id)
        .collect()
}

/// Shared handles to the lookups, one per boundary
#[derive(Clone)]
pub struct Lookups {
    pub recipes: Arc<dyn RecipeLookup>,
    pub categories: Arc<dyn CategoryLookup>,
    pub members: Arc<dyn MemberLookup>,
    pub bookmarks: Arc<dyn BookmarkStore>,
    pub comments: Arc<dyn CommentStore>,
}

impl Lookups {
    pub fn from_catalog<C: Catalog + 'static>(catalog: Arc<C>) -> Self {
        Self {
            recipes: catalog.clone(),
            categories: catalog.clone(),
            members: catalog.clone(),
            bookmarks: catalog.clone(),
            comments: catalog,
        }
    }

    /// Replaces the category lookup, e.g. with a cached one
    pub fn with_categories(mut self, categories: Arc<dyn CategoryLookup>) -> Self {
        self.categories = categories;
        self
    }
}
