use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// A meal slot a recipe is suitable for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
}

impl FromStr for MealSlot {
    type Err = String;

    /// Accepts slot names case-insensitively and the legacy numeric codes `1`-`3`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "breakfast" | "1" => Ok(MealSlot::Breakfast),
            "lunch" | "2" => Ok(MealSlot::Lunch),
            "dinner" | "3" => Ok(MealSlot::Dinner),
            other => Err(format!("unknown meal slot: {}", other)),
        }
    }
}

impl Display for MealSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
        };
        write!(f, "{}", name)
    }
}
