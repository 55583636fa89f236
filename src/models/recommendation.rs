use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, MealSlot, Recipe, RecipeId};

/// How a recommendation set was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationTier {
    /// At least one recipe matched the member's declared interests
    Personalized,
    /// Every recipe was drawn at random
    Random,
}

/// Outcome of one recommendation selection, never persisted
#[derive(Debug, Clone)]
pub struct RecommendationResult {
    /// Selected recipes in selection order, no duplicate ids
    pub recipes: Vec<Recipe>,
    pub tier: RecommendationTier,
    pub message: String,
}

impl RecommendationResult {
    pub fn ids(&self) -> Vec<RecipeId> {
        self.recipes.iter().map(|r| r.id).collect()
    }
}

/// Display form of a recipe in listings and recommendations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub title: String,
    pub image: String,
    pub details: String,
    pub meal_types: Vec<MealSlot>,
    pub diseases: Vec<CategoryId>,
    /// Category name merged with the free-text tags, near-duplicates removed
    pub tags: Vec<String>,
}

/// One entry of a numbered ingredient or step list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumberedItem {
    pub no: usize,
    pub text: String,
}

/// Full display form of a single recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub summary: RecipeSummary,
    pub ingredients: Vec<NumberedItem>,
    pub steps: Vec<NumberedItem>,
}

/// Response body of the recommendations endpoint
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecipeSummary>,
    pub tier: RecommendationTier,
    pub member_interests: Vec<String>,
    pub message: String,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_serialization() {
        assert_eq!(
            serde_json::to_string(&RecommendationTier::Personalized).unwrap(),
            "\"personalized\""
        );
        assert_eq!(
            serde_json::to_string(&RecommendationTier::Random).unwrap(),
            "\"random\""
        );
    }

    #[test]
    fn test_detail_flattens_summary() {
        let detail = RecipeDetail {
            summary: RecipeSummary {
                id: 7,
                title: "Tom yum".to_string(),
                image: "/images/default-recipe.jpg".to_string(),
                details: String::new(),
                meal_types: vec![MealSlot::Lunch],
                diseases: vec![],
                tags: vec![],
            },
            ingredients: vec![NumberedItem {
                no: 1,
                text: "shrimp".to_string(),
            }],
            steps: vec![],
        };

        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["meal_types"][0], "lunch");
        assert_eq!(json["ingredients"][0]["no"], 1);
    }
}
