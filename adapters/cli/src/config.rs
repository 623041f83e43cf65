use std::{fs, path::Path};

use anyhow::{Context, Result};
use clap::ValueEnum;
use crown_arena_core::{CardId, Deck, Level, DECK_SIZE, TICKS_PER_SECOND};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

const WORLD_STREAM: &str = "world";
const SPAWNER_STREAM: &str = "enemy-spawner";
const ENEMY_DECK_STREAM: &str = "enemy-deck";

/// Opponent strength chosen before a match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Difficulty {
    /// Slow single-card waves.
    Easy,
    /// Standard pace.
    #[default]
    Medium,
    /// Fast double-card waves.
    Hard,
}

/// Spawner pacing and reward implied by a difficulty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Preset {
    pub(crate) period_ticks: u32,
    pub(crate) spawn_count: u32,
    pub(crate) reward_multiplier: u32,
}

impl Difficulty {
    pub(crate) const fn preset(self) -> Preset {
        match self {
            Self::Easy => Preset {
                period_ticks: 8 * TICKS_PER_SECOND,
                spawn_count: 1,
                reward_multiplier: 1,
            },
            Self::Medium => Preset {
                period_ticks: 13 * TICKS_PER_SECOND / 2,
                spawn_count: 1,
                reward_multiplier: 2,
            },
            Self::Hard => Preset {
                period_ticks: 5 * TICKS_PER_SECOND,
                spawn_count: 2,
                reward_multiplier: 3,
            },
        }
    }
}

/// Match options read from a TOML file, every field optional.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct MatchConfig {
    pub(crate) difficulty: Difficulty,
    pub(crate) spawn_period_seconds: Option<f32>,
    pub(crate) spawn_count: Option<u32>,
    pub(crate) enemy_level: Option<u8>,
    pub(crate) seed: String,
    pub(crate) tick_limit: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            spawn_period_seconds: None,
            spawn_count: None,
            enemy_level: None,
            seed: String::from("crown-arena"),
            tick_limit: None,
        }
    }
}

impl MatchConfig {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read match config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid match config {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("failed to parse match config toml contents")
    }

    /// Spawn period in ticks, explicit values overriding the preset.
    pub(crate) fn period_ticks(&self) -> u32 {
        match self.spawn_period_seconds {
            Some(seconds) => (seconds.max(0.0) * TICKS_PER_SECOND as f32).round() as u32,
            None => self.difficulty.preset().period_ticks,
        }
    }

    pub(crate) fn spawn_count(&self) -> u32 {
        self.spawn_count
            .unwrap_or_else(|| self.difficulty.preset().spawn_count)
    }

    pub(crate) fn enemy_level(&self) -> Result<Level> {
        match self.enemy_level {
            Some(value) => Level::new(value).context("invalid enemy level"),
            None => Ok(Level::STANDARD),
        }
    }
}

/// Independent RNG seeds derived from one textual label.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SeedStreams {
    pub(crate) world: u64,
    pub(crate) spawner: u64,
    pub(crate) enemy_deck: u64,
}

impl SeedStreams {
    pub(crate) fn from_label(label: &str) -> Self {
        Self {
            world: derive_seed(label, WORLD_STREAM),
            spawner: derive_seed(label, SPAWNER_STREAM),
            enemy_deck: derive_seed(label, ENEMY_DECK_STREAM),
        }
    }
}

fn derive_seed(label: &str, stream: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(label.as_bytes());
    hasher.update([0]);
    hasher.update(stream.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

/// Eight distinct playable cards picked at random for the opponent.
pub(crate) fn random_enemy_deck(seed: u64) -> Result<Deck> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut pool: Vec<CardId> = CardId::playable().collect();
    pool.shuffle(&mut rng);
    Deck::new(&pool[..DECK_SIZE]).context("failed to assemble enemy deck")
}
