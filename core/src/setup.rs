//! Deck validation and per-match configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CardId, Level, DECK_SIZE};

/// Errors raised while validating a deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum DeckError {
    /// The deck does not hold exactly eight cards.
    #[error("a deck needs exactly 8 cards, found {0}")]
    WrongSize(usize),
    /// A card appears more than once.
    #[error("card {0:?} appears more than once")]
    Duplicate(CardId),
    /// A hidden card cannot be part of a deck.
    #[error("card {0:?} cannot be placed in a deck")]
    Hidden(CardId),
}

/// Eight distinct playable cards.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<CardId>", into = "Vec<CardId>")]
pub struct Deck {
    cards: [CardId; DECK_SIZE],
}

impl Deck {
    /// Validates and creates a deck.
    pub fn new(cards: &[CardId]) -> Result<Self, DeckError> {
        let cards: [CardId; DECK_SIZE] = cards
            .try_into()
            .map_err(|_| DeckError::WrongSize(cards.len()))?;
        for (index, card) in cards.iter().enumerate() {
            if card.is_hidden() {
                return Err(DeckError::Hidden(*card));
            }
            if cards[..index].contains(card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        Ok(Self { cards })
    }

    /// Cards in the deck, in the order they were provided.
    #[must_use]
    pub const fn cards(&self) -> &[CardId; DECK_SIZE] {
        &self.cards
    }

    /// Reports whether the deck contains `card`.
    #[must_use]
    pub fn contains(&self, card: CardId) -> bool {
        self.cards.contains(&card)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self {
            cards: [
                CardId::Knight,
                CardId::Archers,
                CardId::Giant,
                CardId::MiniPekka,
                CardId::Fireball,
                CardId::Skeletons,
                CardId::Zap,
                CardId::Cannon,
            ],
        }
    }
}

impl TryFrom<Vec<CardId>> for Deck {
    type Error = DeckError;

    fn try_from(cards: Vec<CardId>) -> Result<Self, Self::Error> {
        Self::new(&cards)
    }
}

impl From<Deck> for Vec<CardId> {
    fn from(deck: Deck) -> Self {
        deck.cards.to_vec()
    }
}

/// Everything the world needs to start a match.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchSetup {
    /// Deck cycled through the player's hand.
    pub player_deck: Deck,
    /// Deck the AI draws its deployments from.
    pub enemy_deck: Deck,
    /// Levels of the player's cards; missing cards use [`Level::STANDARD`].
    pub card_levels: BTreeMap<CardId, Level>,
    /// Level of the player's crown towers.
    pub king_level: Level,
    /// Level of the AI's cards and crown towers.
    pub enemy_level: Level,
    /// Multiplier applied to the match reward.
    pub reward_multiplier: u32,
    /// Seed for the hand shuffle.
    pub seed: u64,
    /// Elixir available on the first tick.
    pub starting_elixir: f32,
    /// Length of regulation time in seconds.
    pub match_seconds: u32,
    /// Length of overtime in seconds.
    pub overtime_seconds: u32,
}

impl MatchSetup {
    /// Default regulation length.
    pub const MATCH_SECONDS: u32 = 180;
    /// Default overtime length.
    pub const OVERTIME_SECONDS: u32 = 120;
    /// Default opening elixir.
    pub const STARTING_ELIXIR: f32 = 5.0;

    /// Creates a setup with standard levels and timings.
    #[must_use]
    pub fn new(player_deck: Deck, enemy_deck: Deck) -> Self {
        Self {
            player_deck,
            enemy_deck,
            card_levels: BTreeMap::new(),
            king_level: Level::STANDARD,
            enemy_level: Level::STANDARD,
            reward_multiplier: 1,
            seed: 0,
            starting_elixir: Self::STARTING_ELIXIR,
            match_seconds: Self::MATCH_SECONDS,
            overtime_seconds: Self::OVERTIME_SECONDS,
        }
    }

    /// Level at which the player fields `card`.
    #[must_use]
    pub fn card_level(&self, card: CardId) -> Level {
        self.card_levels.get(&card).copied().unwrap_or_default()
    }
}

impl Default for MatchSetup {
    fn default() -> Self {
        Self::new(Deck::default(), Deck::default())
    }
}
