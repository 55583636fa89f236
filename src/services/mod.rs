pub mod bookmarks;
pub mod catalog;
pub mod comments;
pub mod list_field;
pub mod members;
pub mod recipes;
pub mod recommendations;
pub mod tags;

pub use recommendations::RecommendationSelector;
pub use tags::{SynonymTable, TagNormalizer};
