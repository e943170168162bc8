//! Bundled mock content used to seed a fresh content store

use serde::Deserialize;

use crate::components::Category;
use crate::content::Card;
use crate::error::ContentError;

const SEED_JSON: &str = include_str!("../../data/seed_content.json");

/// Categories and cards as shipped with the application
#[derive(Debug, Clone, Deserialize)]
pub struct SeedContent {
    pub categories: Vec<Category>,
    pub cards: Vec<Card>,
}

/// Parse the bundled seed content
pub fn seed_content() -> Result<SeedContent, ContentError> {
    parse_content(SEED_JSON)
}

/// Parse content in the seed format, validating every card
pub fn parse_content(json: &str) -> Result<SeedContent, ContentError> {
    let content: SeedContent = serde_json::from_str(json)?;

    for card in &content.cards {
        card.validate()?;
        if !content.categories.iter().any(|c| c.id == card.category_id) {
            return Err(ContentError::UnknownCategory(card.category_id));
        }
    }

    Ok(content)
}
