//! Content repository - categories and cards behind a key-value store
//!
//! The session engine only needs the two read methods of
//! [`ContentRepository`]. [`LocalContentStore`] adds the CRUD surface used by
//! the card editor and is persisted with [`crate::persistence`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::components::{Category, Difficulty, Question};
use crate::error::ContentError;
use crate::generation::{seed_content, SeedContent};

/// Read access the quiz session needs from a content provider
pub trait ContentRepository {
    fn list_categories(&self) -> Vec<Category>;

    /// Every playable question, category denormalized as its name
    fn list_questions_for_quiz(&self) -> Vec<Question>;
}

/// A stored flash card, owned by one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: u32,
    pub category_id: u32,
    pub question: String,
    pub answers: Vec<String>,
    pub correct_answer: usize,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl Card {
    pub fn new(
        category_id: u32,
        question: impl Into<String>,
        answers: Vec<String>,
        correct_answer: usize,
    ) -> Self {
        Self {
            id: 0,
            category_id,
            question: question.into(),
            answers,
            correct_answer,
            difficulty: Difficulty::default(),
            explanation: None,
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Build the quiz question for this card
    pub fn to_question(&self, category_name: &str) -> Question {
        Question {
            id: self.id,
            prompt: self.question.clone(),
            answers: self.answers.clone(),
            correct_answer: self.correct_answer,
            category: category_name.to_string(),
            difficulty: self.difficulty,
            explanation: self.explanation.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ContentError> {
        self.to_question("").validate()
    }
}

/// In-process key-value content store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocalContentStore {
    categories: BTreeMap<u32, Category>,
    cards: BTreeMap<u32, Card>,
    next_category_id: u32,
    next_card_id: u32,
}

impl LocalContentStore {
    pub fn new() -> Self {
        Self {
            next_category_id: 1,
            next_card_id: 1,
            ..Default::default()
        }
    }

    /// Store pre-filled with the bundled mock content
    pub fn seeded() -> Result<Self, ContentError> {
        Self::from_seed(seed_content()?)
    }

    /// Build a store from seed-format content, rejecting invalid cards
    pub fn from_seed(seed: SeedContent) -> Result<Self, ContentError> {
        let mut store = Self::new();
        for category in seed.categories {
            store.next_category_id = store.next_category_id.max(category.id + 1);
            store.categories.insert(category.id, category);
        }
        for card in seed.cards {
            store.next_card_id = store.next_card_id.max(card.id + 1);
            store.cards.insert(card.id, card);
        }
        store.validate()?;
        Ok(store)
    }

    /// Every card must pass validation and belong to a known category
    pub fn validate(&self) -> Result<(), ContentError> {
        self.cards.values().try_for_each(|card| self.check_card(card))
    }

    // ── Categories ─────────────────────────────────────────────────────

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.categories.values()
    }

    pub fn category(&self, id: u32) -> Option<&Category> {
        self.categories.get(&id)
    }

    /// Case-insensitive lookup by display name
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        let needle = name.trim().to_lowercase();
        self.categories
            .values()
            .find(|c| c.name.trim().to_lowercase() == needle)
    }

    pub fn create_category(
        &mut self,
        name: &str,
        description: &str,
        icon: &str,
        color: &str,
    ) -> Result<u32, ContentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContentError::InvalidQuestion("category name is empty".into()));
        }
        if self.category_by_name(name).is_some() {
            return Err(ContentError::DuplicateCategory(name.to_string()));
        }

        let id = self.next_category_id;
        self.next_category_id += 1;
        self.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
                description: description.to_string(),
                icon: icon.to_string(),
                color: color.to_string(),
            },
        );
        Ok(id)
    }

    pub fn update_category(&mut self, mut category: Category) -> Result<(), ContentError> {
        category.name = category.name.trim().to_string();
        if category.name.is_empty() {
            return Err(ContentError::InvalidQuestion("category name is empty".into()));
        }
        if let Some(existing) = self.category_by_name(&category.name) {
            if existing.id != category.id {
                return Err(ContentError::DuplicateCategory(category.name));
            }
        }
        match self.categories.get_mut(&category.id) {
            Some(slot) => {
                *slot = category;
                Ok(())
            }
            None => Err(ContentError::UnknownCategory(category.id)),
        }
    }

    /// Remove a category together with all of its cards
    pub fn delete_category(&mut self, id: u32) -> Result<Category, ContentError> {
        let category = self
            .categories
            .remove(&id)
            .ok_or(ContentError::UnknownCategory(id))?;
        self.cards.retain(|_, card| card.category_id != id);
        Ok(category)
    }

    // ── Cards ──────────────────────────────────────────────────────────

    pub fn card(&self, id: u32) -> Option<&Card> {
        self.cards.get(&id)
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn cards_in_category(&self, category_id: u32) -> Vec<&Card> {
        self.cards
            .values()
            .filter(|c| c.category_id == category_id)
            .collect()
    }

    /// Insert a card, assigning a fresh id (the card's own id is ignored)
    pub fn create_card(&mut self, mut card: Card) -> Result<u32, ContentError> {
        self.check_card(&card)?;
        let id = self.next_card_id;
        self.next_card_id += 1;
        card.id = id;
        self.cards.insert(id, card);
        Ok(id)
    }

    pub fn update_card(&mut self, card: Card) -> Result<(), ContentError> {
        self.check_card(&card)?;
        match self.cards.get_mut(&card.id) {
            Some(slot) => {
                *slot = card;
                Ok(())
            }
            None => Err(ContentError::UnknownCard(card.id)),
        }
    }

    pub fn delete_card(&mut self, id: u32) -> Result<Card, ContentError> {
        self.cards.remove(&id).ok_or(ContentError::UnknownCard(id))
    }

    fn check_card(&self, card: &Card) -> Result<(), ContentError> {
        if !self.categories.contains_key(&card.category_id) {
            return Err(ContentError::UnknownCategory(card.category_id));
        }
        card.validate()
    }
}

impl ContentRepository for LocalContentStore {
    fn list_categories(&self) -> Vec<Category> {
        self.categories.values().cloned().collect()
    }

    fn list_questions_for_quiz(&self) -> Vec<Question> {
        self.cards
            .values()
            .filter_map(|card| {
                self.categories
                    .get(&card.category_id)
                    .map(|category| card.to_question(&category.name))
            })
            .collect()
    }
}
