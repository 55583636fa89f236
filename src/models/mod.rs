use serde::{Deserialize, Serialize};

mod meal;
mod member;
mod recommendation;

pub use meal::MealSlot;
pub use member::{BookmarkStatus, Comment, CommentId, CommentPage, CommentView, MemberInterests};
pub use recommendation::{
    NumberedItem, RecipeDetail, RecipeSummary, RecommendationResponse, RecommendationResult,
    RecommendationTier,
};

/// Identifier of a recipe row
pub type RecipeId = i64;

/// Identifier of a disease category row
pub type CategoryId = i64;

/// A recipe row as persisted.
///
/// The list-shaped fields (`meal`, `ingredients`, `steps`) and the free-text
/// tag field are kept raw; their historical encodings vary, so they are only
/// decoded at display time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Recipe {
    pub id: RecipeId,
    pub title: String,
    pub image: Option<String>,
    pub details: Option<String>,
    /// Meal slots, comma separated or JSON encoded
    pub meal: Option<String>,
    /// Category tag: at most one disease category
    pub disease_id: Option<CategoryId>,
    /// Free-text tag field: comma separated disease names
    pub disease_tags: Option<String>,
    pub ingredients: Option<String>,
    pub steps: Option<String>,
}

impl Recipe {
    /// Creates a recipe with only a title; every other field is empty
    pub fn new(id: RecipeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            image: None,
            details: None,
            meal: None,
            disease_id: None,
            disease_tags: None,
            ingredients: None,
            steps: None,
        }
    }

    pub fn with_category(mut self, disease_id: CategoryId) -> Self {
        self.disease_id = Some(disease_id);
        self
    }

    pub fn with_tags(mut self, disease_tags: impl Into<String>) -> Self {
        self.disease_tags = Some(disease_tags.into());
        self
    }

    pub fn with_meal(mut self, meal: impl Into<String>) -> Self {
        self.meal = Some(meal.into());
        self
    }

    /// Case-insensitive substring match of any term against the free-text tag field
    pub fn tags_mention_any(&self, terms: &[String]) -> bool {
        let Some(tags) = self.disease_tags.as_deref() else {
            return false;
        };
        let tags = tags.to_lowercase();
        terms
            .iter()
            .map(|term| term.trim().to_lowercase())
            .any(|term| !term.is_empty() && tags.contains(&term))
    }
}

/// A disease category that recipes can be tagged with
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Disease {
    pub id: CategoryId,
    pub name: String,
}

impl Disease {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_mention_any_is_case_insensitive() {
        let recipe = Recipe::new(1, "Congee").with_tags("Diabetes, Kidney");
        assert!(recipe.tags_mention_any(&["diabetes".to_string()]));
        assert!(recipe.tags_mention_any(&["KIDNEY".to_string()]));
        assert!(!recipe.tags_mention_any(&["gout".to_string()]));
    }

    #[test]
    fn test_tags_mention_any_ignores_blank_terms() {
        let recipe = Recipe::new(1, "Congee").with_tags("Diabetes");
        assert!(!recipe.tags_mention_any(&["  ".to_string()]));
    }

    #[test]
    fn test_tags_mention_any_without_tags() {
        let recipe = Recipe::new(1, "Congee");
        assert!(!recipe.tags_mention_any(&["diabetes".to_string()]));
    }
}
