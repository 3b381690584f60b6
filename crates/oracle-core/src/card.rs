use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A single oracle card.
///
/// Cards are immutable reference data owned by the content catalog. The
/// engine only ever clones them into drawn slots.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Stable catalog identifier.
    pub id: String,
    /// Display title.
    pub title: String,
    /// Long-form meaning of the card.
    pub description: String,
    /// Reflection prompts offered alongside the card.
    #[serde(default)]
    pub prompts: Vec<String>,
    /// A suggested action for the day.
    #[serde(default)]
    pub action: String,
    /// Whether the card is only available to subscribers.
    #[serde(default)]
    pub is_premium: bool,
}

impl Card {
    /// Create a free card with no prompts or action.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            prompts: Vec::new(),
            action: String::new(),
            is_premium: false,
        }
    }
}

/// The full, fixed catalog of cards available for sampling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// Build a deck from cards, rejecting duplicate ids.
    pub fn new(cards: Vec<Card>) -> CoreResult<Self> {
        let mut seen = HashSet::new();
        for card in &cards {
            if !seen.insert(card.id.as_str()) {
                return Err(CoreError::DuplicateCard(card.id.clone()));
            }
        }
        Ok(Self { cards })
    }

    /// Parse a deck from a JSON array of cards.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        Self::new(cards)
    }

    /// All cards in catalog order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Look up a card by id.
    pub fn get(&self, id: &str) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The subset of cards a caller may draw from.
    ///
    /// Subscribers see the whole deck; everyone else only free cards.
    pub fn accessible(&self, premium: bool) -> Deck {
        if premium {
            return self.clone();
        }
        Deck {
            cards: self
                .cards
                .iter()
                .filter(|c| !c.is_premium)
                .cloned()
                .collect(),
        }
    }
}
