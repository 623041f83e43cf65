//! Level scaling of card and tower statistics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::{
    BuildingStats, CardDefinition, CardKind, CrownTowerStats, SpellDelivery, SpellStats,
    TroopStats,
};

/// Multiplier applied per level above 1.
pub const GROWTH_FACTOR: f32 = 1.10;

/// Error returned when a level lies outside `1..=14`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("level {0} is outside 1..=14")]
pub struct LevelError(pub u8);

/// Upgrade level of a card or tower, always within `1..=14`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    /// Lowest level.
    pub const MIN: Level = Level(1);
    /// Terminal level; cards at this level cannot be upgraded.
    pub const MAX: Level = Level(14);
    /// Level at which unconfigured cards and towers are fielded.
    pub const STANDARD: Level = Level(11);

    /// Creates a level, rejecting values outside `1..=14`.
    pub fn new(value: u8) -> Result<Self, LevelError> {
        if (Self::MIN.0..=Self::MAX.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(LevelError(value))
        }
    }

    /// Numeric value of the level.
    #[must_use]
    pub const fn get(&self) -> u8 {
        self.0
    }

    /// Following level, or `None` at the terminal level.
    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::new(self.0 + 1).ok()
    }

    /// Multiplier applied to scaling statistics at this level.
    #[must_use]
    pub fn multiplier(self) -> f32 {
        GROWTH_FACTOR.powi(i32::from(self.0) - 1)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl TryFrom<u8> for Level {
    type Error = LevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

/// Statistics that grow with level.
///
/// Hit points, damage, tower damage, shields, flat spell damage and death bomb
/// damage are multiplied and rounded; lingering per-tick damage is multiplied
/// without rounding. Every other field passes through unchanged.
pub trait Scalable: Sized {
    /// Returns a copy of `self` scaled to `level`.
    #[must_use]
    fn scaled(&self, level: Level) -> Self;
}

/// Scales `base` to `level`.
#[must_use]
pub fn scale<T: Scalable>(base: &T, level: Level) -> T {
    base.scaled(level)
}

fn rounded(value: f32, multiplier: f32) -> f32 {
    (value * multiplier).round()
}

impl Scalable for TroopStats {
    fn scaled(&self, level: Level) -> Self {
        let multiplier = level.multiplier();
        let mut stats = *self;
        stats.hitpoints = rounded(self.hitpoints, multiplier);
        stats.damage = rounded(self.damage, multiplier);
        stats.shield = self.shield.map(|shield| rounded(shield, multiplier));
        if let Some(bomb) = stats.death_bomb.as_mut() {
            bomb.damage = rounded(bomb.damage, multiplier);
        }
        stats
    }
}

impl Scalable for BuildingStats {
    fn scaled(&self, level: Level) -> Self {
        let multiplier = level.multiplier();
        let mut stats = *self;
        stats.hitpoints = rounded(self.hitpoints, multiplier);
        if let Some(turret) = stats.turret.as_mut() {
            turret.damage = rounded(turret.damage, multiplier);
        }
        stats
    }
}

impl Scalable for SpellStats {
    fn scaled(&self, level: Level) -> Self {
        let multiplier = level.multiplier();
        let mut stats = *self;
        stats.damage = self.damage.map(|damage| rounded(damage, multiplier));
        stats.tower_damage = self.tower_damage.map(|damage| rounded(damage, multiplier));
        if let SpellDelivery::Lingering {
            troop_damage_per_tick,
            structure_damage_per_tick,
            ..
        } = &mut stats.delivery
        {
            *troop_damage_per_tick *= multiplier;
            *structure_damage_per_tick *= multiplier;
        }
        stats
    }
}

impl Scalable for CardKind {
    fn scaled(&self, level: Level) -> Self {
        match self {
            Self::Troop(stats) => Self::Troop(stats.scaled(level)),
            Self::Building(stats) => Self::Building(stats.scaled(level)),
            Self::Spell(stats) => Self::Spell(stats.scaled(level)),
        }
    }
}

impl Scalable for CardDefinition {
    fn scaled(&self, level: Level) -> Self {
        Self {
            kind: self.kind.scaled(level),
            ..self.clone()
        }
    }
}

impl Scalable for CrownTowerStats {
    fn scaled(&self, level: Level) -> Self {
        let multiplier = level.multiplier();
        Self {
            hitpoints: rounded(self.hitpoints, multiplier),
            damage: rounded(self.damage, multiplier),
            ..*self
        }
    }
}
