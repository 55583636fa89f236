use std::collections::HashMap;

use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::RwLock;

use crate::{
    error::{AppError, AppResult},
    models::{CategoryId, Comment, CommentId, Disease, Recipe, RecipeId},
    services::{
        catalog::{BookmarkStore, CategoryLookup, CommentStore, MemberLookup, RecipeLookup},
        tags::decode_interests,
    },
};

#[derive(Debug)]
struct MemberRow {
    email: String,
    first_name: Option<String>,
    /// Raw interest field, comma separated or JSON encoded
    interests: Option<String>,
}

/// The part of the catalog members write to
#[derive(Debug, Default)]
struct MemberState {
    /// Keyed by folded member email
    members: HashMap<String, MemberRow>,
    /// (folded email, recipe) in the order they were saved
    bookmarks: Vec<(String, RecipeId)>,
    comments: Vec<Comment>,
    next_comment_id: CommentId,
}

/// Catalog held in memory, with the same matching rules as the postgres one
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    recipes: Vec<Recipe>,
    categories: Vec<Disease>,
    state: RwLock<MemberState>,
}

fn member_key(member: &str) -> String {
    member.trim().to_lowercase()
}

fn member_not_found(member: &str) -> AppError {
    AppError::NotFound(format!("Member {} not found", member))
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    pub fn with_category(mut self, category: Disease) -> Self {
        self.categories.push(category);
        self
    }

    /// Adds a member whose interests are stored in the raw delimited form
    pub fn with_member(self, email: &str, interests: Option<&str>) -> Self {
        self.with_named_member(email, None, interests)
    }

    pub fn with_named_member(
        mut self,
        email: &str,
        first_name: Option<&str>,
        interests: Option<&str>,
    ) -> Self {
        self.state.get_mut().members.insert(
            member_key(email),
            MemberRow {
                email: email.trim().to_string(),
                first_name: first_name.map(String::from),
                interests: interests.map(String::from),
            },
        );
        self
    }

    fn recipe(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }
}

impl MemberState {
    fn with_author(&self, mut comment: Comment) -> Comment {
        comment.author_name = self
            .members
            .get(&member_key(&comment.member_email))
            .and_then(|m| m.first_name.clone());
        comment
    }
}

#[async_trait::async_trait]
impl RecipeLookup for MemoryCatalog {
    async fn list_recipes(&self) -> AppResult<Vec<Recipe>> {
        let mut recipes = self.recipes.clone();
        recipes.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(recipes)
    }

    async fn list_recipes_matching_free_text(&self, terms: &[String]) -> AppResult<Vec<Recipe>> {
        Ok(self
            .recipes
            .iter()
            .filter(|r| r.tags_mention_any(terms))
            .cloned()
            .collect())
    }

    async fn list_recipes_by_category_ids(&self, ids: &[CategoryId]) -> AppResult<Vec<Recipe>> {
        Ok(self
            .recipes
            .iter()
            .filter(|r| r.disease_id.is_some_and(|id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn get_recipe(&self, id: RecipeId) -> AppResult<Option<Recipe>> {
        Ok(self.recipe(id).cloned())
    }

    async fn list_random_recipes(
        &self,
        exclude: &[RecipeId],
        limit: usize,
    ) -> AppResult<Vec<Recipe>> {
        let mut candidates: Vec<Recipe> = self
            .recipes
            .iter()
            .filter(|r| !exclude.contains(&r.id))
            .cloned()
            .collect();
        candidates.shuffle(&mut rand::thread_rng());
        candidates.truncate(limit);
        Ok(candidates)
    }
}

#[async_trait::async_trait]
impl CategoryLookup for MemoryCatalog {
    async fn list_categories(&self) -> AppResult<Vec<Disease>> {
        let mut categories = self.categories.clone();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }
}

#[async_trait::async_trait]
impl MemberLookup for MemoryCatalog {
    async fn get_member_interests(&self, member: &str) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        state
            .members
            .get(&member_key(member))
            .map(|row| decode_interests(row.interests.as_deref()))
            .ok_or_else(|| member_not_found(member))
    }

    async fn set_member_interests(&self, member: &str, interests: &[String]) -> AppResult<()> {
        let mut state = self.state.write().await;
        let row = state
            .members
            .get_mut(&member_key(member))
            .ok_or_else(|| member_not_found(member))?;
        row.interests = Some(interests.join(", "));
        Ok(())
    }
}

#[async_trait::async_trait]
impl BookmarkStore for MemoryCatalog {
    async fn list_bookmarked_recipes(&self, member: &str) -> AppResult<Vec<Recipe>> {
        let key = member_key(member);
        let state = self.state.read().await;
        Ok(state
            .bookmarks
            .iter()
            .rev()
            .filter(|(email, _)| *email == key)
            .filter_map(|(_, id)| self.recipe(*id).cloned())
            .collect())
    }

    async fn is_bookmarked(&self, member: &str, recipe: RecipeId) -> AppResult<bool> {
        let key = member_key(member);
        let state = self.state.read().await;
        Ok(state
            .bookmarks
            .iter()
            .any(|(email, id)| *email == key && *id == recipe))
    }

    async fn add_bookmark(&self, member: &str, recipe: RecipeId) -> AppResult<bool> {
        let key = member_key(member);
        let mut state = self.state.write().await;
        if !state.members.contains_key(&key) {
            return Err(member_not_found(member));
        }
        if self.recipe(recipe).is_none() {
            return Err(AppError::NotFound(format!("Recipe {} not found", recipe)));
        }
        if state
            .bookmarks
            .iter()
            .any(|(email, id)| *email == key && *id == recipe)
        {
            return Ok(false);
        }
        state.bookmarks.push((key, recipe));
        Ok(true)
    }

    async fn remove_bookmark(&self, member: &str, recipe: RecipeId) -> AppResult<bool> {
        let key = member_key(member);
        let mut state = self.state.write().await;
        let before = state.bookmarks.len();
        state
            .bookmarks
            .retain(|(email, id)| !(*email == key && *id == recipe));
        Ok(state.bookmarks.len() < before)
    }
}

#[async_trait::async_trait]
impl CommentStore for MemoryCatalog {
    async fn list_comments(
        &self,
        recipe: RecipeId,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Comment>> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.recipe_id == recipe)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        Ok(comments
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|c| state.with_author(c))
            .collect())
    }

    async fn get_comment(&self, id: CommentId) -> AppResult<Option<Comment>> {
        let state = self.state.read().await;
        Ok(state
            .comments
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .map(|c| state.with_author(c)))
    }

    async fn add_comment(&self, recipe: RecipeId, member: &str, body: &str) -> AppResult<Comment> {
        let mut state = self.state.write().await;
        let email = state
            .members
            .get(&member_key(member))
            .map(|m| m.email.clone())
            .ok_or_else(|| member_not_found(member))?;
        if self.recipe(recipe).is_none() {
            return Err(AppError::NotFound(format!("Recipe {} not found", recipe)));
        }

        state.next_comment_id += 1;
        let comment = Comment {
            id: state.next_comment_id,
            recipe_id: recipe,
            member_email: email,
            author_name: None,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        state.comments.push(comment.clone());
        Ok(state.with_author(comment))
    }

    async fn update_comment(&self, id: CommentId, body: &str) -> AppResult<Option<Comment>> {
        let mut state = self.state.write().await;
        let updated = state.comments.iter_mut().find(|c| c.id == id).map(|c| {
            c.body = body.to_string();
            c.clone()
        });
        Ok(updated.map(|c| state.with_author(c)))
    }

    async fn delete_comment(&self, id: CommentId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        let before = state.comments.len();
        state.comments.retain(|c| c.id != id);
        Ok(state.comments.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_category(Disease::new(2, "Gout"))
            .with_category(Disease::new(1, "Diabetes"))
            .with_recipe(Recipe::new(1, "Congee").with_tags("Diabetes"))
            .with_recipe(Recipe::new(2, "Salad").with_category(2))
            .with_recipe(Recipe::new(3, "Soup"))
            .with_named_member("Somchai@Example.com", Some("Somchai"), Some("diabetes, gout"))
            .with_member("empty@example.com", None)
    }

    #[test]
    fn test_list_recipes_newest_first() {
        let recipes = tokio_test::block_on(catalog().list_recipes()).unwrap();
        let ids: Vec<RecipeId> = recipes.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_free_text_and_category_queries() {
        let catalog = catalog();
        let by_text =
            tokio_test::block_on(catalog.list_recipes_matching_free_text(&["DIABETES".to_string()]))
                .unwrap();
        assert_eq!(by_text.len(), 1);
        assert_eq!(by_text[0].id, 1);

        let by_category = tokio_test::block_on(catalog.list_recipes_by_category_ids(&[2])).unwrap();
        assert_eq!(by_category.len(), 1);
        assert_eq!(by_category[0].id, 2);
    }

    #[tokio::test]
    async fn test_random_recipes_respect_exclusion_and_limit() {
        let catalog = catalog();
        for _ in 0..10 {
            let drawn = catalog.list_random_recipes(&[2], 5).await.unwrap();
            let mut ids: Vec<RecipeId> = drawn.iter().map(|r| r.id).collect();
            ids.sort();
            assert_eq!(ids, vec![1, 3]);
        }

        let one = catalog.list_random_recipes(&[], 1).await.unwrap();
        assert_eq!(one.len(), 1);
        assert!(catalog.list_random_recipes(&[], 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_categories_sorted_and_resolved() {
        let catalog = catalog();
        let names: Vec<String> = catalog
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Diabetes", "Gout"]);

        let ids = catalog
            .resolve_category_ids_by_names(&["gout".to_string(), "unknown".to_string()])
            .await
            .unwrap();
        assert_eq!(ids, vec![2]);
    }

    #[tokio::test]
    async fn test_member_interests() {
        let catalog = catalog();
        let interests = catalog
            .get_member_interests("somchai@example.com")
            .await
            .unwrap();
        assert_eq!(interests, vec!["diabetes", "gout"]);

        assert!(catalog
            .get_member_interests("empty@example.com")
            .await
            .unwrap()
            .is_empty());

        let missing = catalog.get_member_interests("nobody@example.com").await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_member_interests() {
        let catalog = catalog();
        catalog
            .set_member_interests("EMPTY@example.com", &["Kidney".to_string(), "Gout".to_string()])
            .await
            .unwrap();
        assert_eq!(
            catalog.get_member_interests("empty@example.com").await.unwrap(),
            vec!["Kidney", "Gout"]
        );

        let missing = catalog.set_member_interests("nobody@example.com", &[]).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bookmarks_newest_first_without_repeats() {
        let catalog = catalog();
        assert!(catalog.add_bookmark("somchai@example.com", 1).await.unwrap());
        assert!(catalog.add_bookmark("somchai@example.com", 3).await.unwrap());
        assert!(!catalog.add_bookmark("SOMCHAI@example.com", 1).await.unwrap());

        let ids: Vec<RecipeId> = catalog
            .list_bookmarked_recipes("somchai@example.com")
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![3, 1]);
        assert!(catalog.is_bookmarked("somchai@example.com", 3).await.unwrap());
        assert!(!catalog.is_bookmarked("empty@example.com", 3).await.unwrap());

        assert!(catalog.remove_bookmark("somchai@example.com", 3).await.unwrap());
        assert!(!catalog.remove_bookmark("somchai@example.com", 3).await.unwrap());

        let unknown_recipe = catalog.add_bookmark("somchai@example.com", 99).await;
        assert!(matches!(unknown_recipe, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_comments_lifecycle() {
        let catalog = catalog();
        let first = catalog
            .add_comment(1, "somchai@example.com", "Lovely")
            .await
            .unwrap();
        let second = catalog
            .add_comment(1, "empty@example.com", "Too salty")
            .await
            .unwrap();
        catalog.add_comment(2, "empty@example.com", "Other").await.unwrap();

        assert_eq!(first.member_email, "Somchai@Example.com");
        assert_eq!(first.author_name.as_deref(), Some("Somchai"));

        let listed = catalog.list_comments(1, 10, 0).await.unwrap();
        let ids: Vec<CommentId> = listed.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert_eq!(catalog.list_comments(1, 1, 1).await.unwrap()[0].id, first.id);

        let edited = catalog.update_comment(first.id, "Lovely!").await.unwrap().unwrap();
        assert_eq!(edited.body, "Lovely!");
        assert!(catalog.update_comment(404, "x").await.unwrap().is_none());

        assert!(catalog.delete_comment(first.id).await.unwrap());
        assert!(catalog.get_comment(first.id).await.unwrap().is_none());
    }
}
