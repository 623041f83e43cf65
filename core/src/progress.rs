//! Persistent player progress: currency, levels and the saved deck.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{CardId, Deck, Level, MatchSetup, Side};

/// Currency awarded for a win before the reward multiplier.
pub const REWARD_BASE: u64 = 100;

/// Currency awarded to the player for a match outcome.
///
/// A win pays [`REWARD_BASE`] times the multiplier, a loss a quarter of that,
/// and a draw nothing.
#[must_use]
pub fn match_reward(winner: Option<Side>, multiplier: u32) -> u64 {
    let full = REWARD_BASE * u64::from(multiplier);
    match winner {
        Some(Side::Player) => full,
        Some(Side::Enemy) => full / 4,
        None => 0,
    }
}

/// Errors raised while upgrading a card or the king tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum UpgradeError {
    /// The level is already terminal.
    #[error("already at the maximum level")]
    MaxLevel,
    /// The balance does not cover the upgrade.
    #[error("upgrade costs {cost} but only {balance} is available")]
    InsufficientCurrency {
        /// Price of the upgrade.
        cost: u64,
        /// Available currency.
        balance: u64,
    },
    /// Hidden cards level with the card that produces them.
    #[error("card {0:?} cannot be upgraded directly")]
    HiddenCard(CardId),
}

/// Progress record kept between matches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerProgress {
    /// Spendable currency.
    pub currency: u64,
    /// Level of the player's crown towers.
    pub king_level: Level,
    /// Card levels; missing cards are at [`Level::STANDARD`].
    pub card_levels: BTreeMap<CardId, Level>,
    /// Deck used for the next match.
    pub saved_deck: Deck,
}

impl Default for PlayerProgress {
    fn default() -> Self {
        Self {
            currency: 0,
            king_level: Level::STANDARD,
            card_levels: BTreeMap::new(),
            saved_deck: Deck::default(),
        }
    }
}

impl PlayerProgress {
    /// Price of upgrading something currently at `level`.
    #[must_use]
    pub fn upgrade_cost(level: Level) -> u64 {
        REWARD_BASE * u64::from(level.get())
    }

    /// Current level of `card`.
    #[must_use]
    pub fn card_level(&self, card: CardId) -> Level {
        self.card_levels.get(&card).copied().unwrap_or_default()
    }

    /// Adds currency, typically a match reward.
    pub fn credit(&mut self, amount: u64) {
        self.currency = self.currency.saturating_add(amount);
    }

    /// Raises `card` by one level, paying the upgrade cost.
    pub fn upgrade_card(&mut self, card: CardId) -> Result<Level, UpgradeError> {
        if card.is_hidden() {
            return Err(UpgradeError::HiddenCard(card));
        }
        let next = self.purchase(self.card_level(card))?;
        let _ = self.card_levels.insert(card, next);
        Ok(next)
    }

    /// Raises the king tower by one level, paying the upgrade cost.
    pub fn upgrade_king(&mut self) -> Result<Level, UpgradeError> {
        let next = self.purchase(self.king_level)?;
        self.king_level = next;
        Ok(next)
    }

    fn purchase(&mut self, current: Level) -> Result<Level, UpgradeError> {
        let next = current.next().ok_or(UpgradeError::MaxLevel)?;
        let cost = Self::upgrade_cost(current);
        if self.currency < cost {
            return Err(UpgradeError::InsufficientCurrency {
                cost,
                balance: self.currency,
            });
        }
        self.currency -= cost;
        Ok(next)
    }

    /// Builds a match setup fielding the saved deck at the recorded levels.
    #[must_use]
    pub fn match_setup(&self, enemy_deck: Deck) -> MatchSetup {
        MatchSetup {
            card_levels: self.card_levels.clone(),
            king_level: self.king_level,
            ..MatchSetup::new(self.saved_deck.clone(), enemy_deck)
        }
    }
}
