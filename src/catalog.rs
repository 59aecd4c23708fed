//! Card Catalog - The immutable source collection.
//!
//! Loaded once at startup from the JSON card data, then never mutated.
//! All derived views (filters, pages, canvas entities) reference cards by
//! id; insertion order is the canonical display order and is preserved by
//! every downstream computation.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use thiserror::Error;

use crate::types::CardId;

/// Error type for catalog loading.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// I/O error while reading the catalog file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The catalog JSON was malformed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two cards share the same id.
    #[error("duplicate card id: {0}")]
    DuplicateId(CardId),
}

/// One card record.
///
/// Pure data: created at catalog load, never mutated, never destroyed
/// during a session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Card {
    pub id: CardId,
    #[serde(default)]
    pub title: String,
    /// Image URL, empty when the card has none.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub content: String,
    /// Single category label.
    #[serde(default)]
    pub collection: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Optional external link.
    #[serde(default)]
    pub url: Option<String>,
}

impl Card {
    /// Calendar year of the card's date, if it has one.
    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }
}

/// The immutable, ordered card collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cards: Vec<Card>,
    by_id: HashMap<CardId, usize>,
}

impl Catalog {
    /// Build a catalog from card records, preserving input order.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self, CatalogError> {
        let mut by_id = HashMap::with_capacity(cards.len());
        for (i, card) in cards.iter().enumerate() {
            if by_id.insert(card.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(card.id.clone()));
            }
        }
        Ok(Self { cards, by_id })
    }

    /// Parse a catalog from the JSON card array.
    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Self::from_cards(cards)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// All cards in insertion order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card by id.
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.by_id.get(id).map(|&i| &self.cards[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Distinct collection labels in first-seen order.
    pub fn collections(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for card in &self.cards {
            if !seen.contains(&card.collection) {
                seen.push(card.collection.clone());
            }
        }
        seen
    }

    /// Distinct tag labels in first-seen order.
    pub fn tags(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for card in &self.cards {
            for tag in &card.tags {
                if !seen.contains(tag) {
                    seen.push(tag.clone());
                }
            }
        }
        seen
    }

    /// Distinct years in first-seen order (cards without a date contribute
    /// nothing).
    pub fn years(&self) -> Vec<i32> {
        let mut seen = Vec::new();
        for card in &self.cards {
            if let Some(year) = card.year() {
                if !seen.contains(&year) {
                    seen.push(year);
                }
            }
        }
        seen
    }
}

// =============================================================================
// Tests
// =============================================================================
