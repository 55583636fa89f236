use std::collections::HashMap;

use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    models::{
        CategoryId, Disease, MealSlot, NumberedItem, Recipe, RecipeDetail, RecipeId, RecipeSummary,
    },
    services::{catalog::Lookups, list_field, tags::TagNormalizer},
};

pub const DEFAULT_IMAGE: &str = "/images/default-recipe.jpg";
pub const UNTITLED: &str = "Untitled recipe";

/// Normalizes a stored image reference to a servable path.
///
/// Absolute http(s) URLs pass through; a leading `public/` directory is dropped.
pub fn normalize_image_path(raw: Option<&str>) -> String {
    let raw = raw.map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return DEFAULT_IMAGE.to_string();
    }

    let lower = raw.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return raw.to_string();
    }

    let path = raw
        .strip_prefix("/public/")
        .or_else(|| raw.strip_prefix("public/"))
        .unwrap_or(raw);

    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Decodes the meal field, dropping unknown slots and repeats
pub fn decode_meal_slots(raw: Option<&str>) -> Vec<MealSlot> {
    let mut slots = Vec::new();
    for entry in list_field::decode(raw) {
        match entry.parse::<MealSlot>() {
            Ok(slot) if !slots.contains(&slot) => slots.push(slot),
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "Skipping meal entry"),
        }
    }
    slots
}

fn normalize_details(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .trim()
        .to_string()
}

fn numbered(items: Vec<String>) -> Vec<NumberedItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(i, text)| NumberedItem { no: i + 1, text })
        .collect()
}

/// Turns recipe rows into their display forms
pub struct RecipeFormatter<'a> {
    normalizer: &'a TagNormalizer,
    category_names: HashMap<CategoryId, String>,
}

impl<'a> RecipeFormatter<'a> {
    pub fn new(normalizer: &'a TagNormalizer, categories: &[Disease]) -> Self {
        Self {
            normalizer,
            category_names: categories.iter().map(|c| (c.id, c.name.clone())).collect(),
        }
    }

    pub fn summary(&self, recipe: &Recipe) -> RecipeSummary {
        let category_name = recipe
            .disease_id
            .and_then(|id| self.category_names.get(&id))
            .map(String::as_str);

        let title = recipe.title.trim();

        RecipeSummary {
            id: recipe.id,
            title: (if title.is_empty() { UNTITLED } else { title }).to_string(),
            image: normalize_image_path(recipe.image.as_deref()),
            details: normalize_details(recipe.details.as_deref()),
            meal_types: decode_meal_slots(recipe.meal.as_deref()),
            diseases: recipe.disease_id.into_iter().collect(),
            tags: self
                .normalizer
                .merge_recipe_tags(category_name, recipe.disease_tags.as_deref()),
        }
    }

    pub fn detail(&self, recipe: &Recipe) -> RecipeDetail {
        RecipeDetail {
            summary: self.summary(recipe),
            ingredients: numbered(list_field::decode(recipe.ingredients.as_deref())),
            steps: numbered(list_field::decode(recipe.steps.as_deref())),
        }
    }
}

/// Optional filters for the recipe listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFilter {
    /// Category id
    pub disease: Option<CategoryId>,
    pub meal: Option<MealSlot>,
    /// Free text matched against title, details, tags and meal names
    pub q: Option<String>,
}

pub(crate) fn fold_query(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl RecipeFilter {
    pub fn matches(&self, summary: &RecipeSummary) -> bool {
        if let Some(disease) = self.disease {
            if !summary.diseases.contains(&disease) {
                return false;
            }
        }

        if let Some(meal) = self.meal {
            if !summary.meal_types.contains(&meal) {
                return false;
            }
        }

        let query = self.q.as_deref().map(fold_query).unwrap_or_default();
        if query.is_empty() {
            return true;
        }

        fold_query(&summary.title).contains(&query)
            || fold_query(&summary.details).contains(&query)
            || summary.tags.iter().any(|t| fold_query(t).contains(&query))
            || summary
                .meal_types
                .iter()
                .any(|m| m.to_string().contains(&query))
    }
}

/// The catalog as display summaries, newest first, filtered
pub async fn list_recipes(
    lookups: &Lookups,
    normalizer: &TagNormalizer,
    filter: &RecipeFilter,
) -> AppResult<Vec<RecipeSummary>> {
    let recipes = lookups.recipes.list_recipes().await?;
    let categories = lookups.categories.list_categories().await?;
    let formatter = RecipeFormatter::new(normalizer, &categories);

    let summaries: Vec<RecipeSummary> = recipes
        .iter()
        .map(|r| formatter.summary(r))
        .filter(|s| filter.matches(s))
        .collect();

    tracing::debug!(
        total = recipes.len(),
        matched = summaries.len(),
        filter = ?filter,
        "Listed recipes"
    );

    Ok(summaries)
}

/// One recipe with decoded ingredients and steps
pub async fn get_recipe_detail(
    lookups: &Lookups,
    normalizer: &TagNormalizer,
    id: RecipeId,
) -> AppResult<RecipeDetail> {
    let recipe = lookups
        .recipes
        .get_recipe(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recipe {} not found", id)))?;

    let categories = lookups.categories.list_categories().await?;
    Ok(RecipeFormatter::new(normalizer, &categories).detail(&recipe))
}
