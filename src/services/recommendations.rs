use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;

use crate::{
    error::{AppError, AppResult},
    models::{Recipe, RecipeId, RecommendationResponse, RecommendationResult, RecommendationTier},
    services::{
        catalog::{CategoryLookup, Lookups, RecipeLookup},
        recipes::RecipeFormatter,
        tags::TagNormalizer,
    },
};

/// What a tier sees when asked for candidates
pub struct SelectionContext<'a> {
    /// Declared interests of the member, never empty for personalizing tiers
    pub interests: &'a [String],
    /// Ids already chosen by earlier tiers
    pub selected: &'a HashSet<RecipeId>,
    /// How many more recipes are wanted
    pub shortfall: usize,
}

/// One stage of selection.
///
/// A tier only proposes candidates; the selector removes ids chosen earlier,
/// shuffles, and takes at most the shortfall.
#[async_trait::async_trait]
pub trait SelectionTier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether recipes from this tier make the result personalized
    fn personalizes(&self) -> bool;

    async fn candidates(&self, ctx: &SelectionContext<'_>) -> AppResult<Vec<Recipe>>;
}

/// Tier A: free-text tag field mentions a declared interest
pub struct FreeTextTier {
    recipes: Arc<dyn RecipeLookup>,
}

#[async_trait::async_trait]
impl SelectionTier for FreeTextTier {
    fn name(&self) -> &'static str {
        "free_text"
    }

    fn personalizes(&self) -> bool {
        true
    }

    async fn candidates(&self, ctx: &SelectionContext<'_>) -> AppResult<Vec<Recipe>> {
        self.recipes
            .list_recipes_matching_free_text(ctx.interests)
            .await
    }
}

/// Tier B: category tag is a category named by a declared interest
pub struct CategoryTier {
    recipes: Arc<dyn RecipeLookup>,
    categories: Arc<dyn CategoryLookup>,
}

#[async_trait::async_trait]
impl SelectionTier for CategoryTier {
    fn name(&self) -> &'static str {
        "category"
    }

    fn personalizes(&self) -> bool {
        true
    }

    async fn candidates(&self, ctx: &SelectionContext<'_>) -> AppResult<Vec<Recipe>> {
        let ids = self
            .categories
            .resolve_category_ids_by_names(ctx.interests)
            .await?;

        if ids.is_empty() {
            tracing::debug!(interests = ?ctx.interests, "No categories match declared interests");
            return Ok(Vec::new());
        }

        self.recipes.list_recipes_by_category_ids(&ids).await
    }
}

/// Tier C, and the whole selection when nothing is declared: any recipe
pub struct RandomTier {
    recipes: Arc<dyn RecipeLookup>,
}

#[async_trait::async_trait]
impl SelectionTier for RandomTier {
    fn name(&self) -> &'static str {
        "random"
    }

    fn personalizes(&self) -> bool {
        false
    }

    async fn candidates(&self, ctx: &SelectionContext<'_>) -> AppResult<Vec<Recipe>> {
        let exclude: Vec<RecipeId> = ctx.selected.iter().copied().collect();
        self.recipes
            .list_random_recipes(&exclude, ctx.shortfall)
            .await
    }
}

/// Drops already selected and repeated ids, then draws up to `shortfall` at random
fn draw(
    mut candidates: Vec<Recipe>,
    selected: &mut HashSet<RecipeId>,
    shortfall: usize,
) -> Vec<Recipe> {
    candidates.retain(|r| !selected.contains(&r.id));
    candidates.shuffle(&mut rand::thread_rng());

    let mut drawn = Vec::new();
    for recipe in candidates {
        if drawn.len() == shortfall {
            break;
        }
        if selected.insert(recipe.id) {
            drawn.push(recipe);
        }
    }
    drawn
}

/// Chooses up to N recipes for a member from their declared interests
pub struct RecommendationSelector {
    recipes: Arc<dyn RecipeLookup>,
    categories: Arc<dyn CategoryLookup>,
}

impl RecommendationSelector {
    pub fn new(recipes: Arc<dyn RecipeLookup>, categories: Arc<dyn CategoryLookup>) -> Self {
        Self {
            recipes,
            categories,
        }
    }

    /// Tiers in the order they are tried
    fn tiers(&self, interests: &[String]) -> Vec<Box<dyn SelectionTier>> {
        let random = Box::new(RandomTier {
            recipes: self.recipes.clone(),
        });

        if interests.is_empty() {
            return vec![random];
        }

        vec![
            Box::new(FreeTextTier {
                recipes: self.recipes.clone(),
            }),
            Box::new(CategoryTier {
                recipes: self.recipes.clone(),
                categories: self.categories.clone(),
            }),
            random,
        ]
    }

    pub async fn select(&self, interests: &[String], limit: usize) -> AppResult<RecommendationResult> {
        if limit == 0 {
            return Err(AppError::InvalidInput(
                "limit must be a positive integer".to_string(),
            ));
        }

        let mut recipes = Vec::new();
        let mut selected = HashSet::new();
        let mut personalized = false;

        for tier in self.tiers(interests) {
            let shortfall = limit - recipes.len();
            if shortfall == 0 {
                break;
            }

            let ctx = SelectionContext {
                interests,
                selected: &selected,
                shortfall,
            };
            let candidates = tier.candidates(&ctx).await?;
            let found = candidates.len();

            let drawn = draw(candidates, &mut selected, shortfall);
            tracing::debug!(
                tier = tier.name(),
                candidates = found,
                taken = drawn.len(),
                shortfall,
                "Selection tier finished"
            );

            personalized |= tier.personalizes() && !drawn.is_empty();
            recipes.extend(drawn);
        }

        let (tier, message) = if personalized {
            (
                RecommendationTier::Personalized,
                format!("Recommended recipes for: {}", interests.join(", ")),
            )
        } else if interests.is_empty() {
            (
                RecommendationTier::Random,
                "Random recipes (no declared interests yet)".to_string(),
            )
        } else {
            (
                RecommendationTier::Random,
                "No recipes match your interests yet; showing random recipes".to_string(),
            )
        };

        tracing::info!(
            interests = interests.len(),
            limit,
            selected = recipes.len(),
            tier = ?tier,
            "Recommendations selected"
        );

        Ok(RecommendationResult {
            recipes,
            tier,
            message,
        })
    }
}

/// Recommendations for a member, formatted for display
pub async fn get_recommendations(
    lookups: &Lookups,
    normalizer: &TagNormalizer,
    member: &str,
    limit: usize,
) -> AppResult<RecommendationResponse> {
    let interests = lookups.members.get_member_interests(member).await?;

    let selector = RecommendationSelector::new(lookups.recipes.clone(), lookups.categories.clone());
    let result = selector.select(&interests, limit).await?;

    let categories = lookups.categories.list_categories().await?;
    let formatter = RecipeFormatter::new(normalizer, &categories);

    Ok(RecommendationResponse {
        recommendations: result.recipes.iter().map(|r| formatter.summary(r)).collect(),
        tier: result.tier,
        member_interests: interests,
        message: result.message,
        generated_at: Utc::now(),
    })
}
