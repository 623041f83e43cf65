#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic AI opponent that periodically deploys cards from the enemy
//! deck onto its half of the arena.

use crown_arena_core::{
    ArenaSnapshot, CardDefinition, CardKind, Catalog, Command, Deck, EntityKind, Event, Level,
    Position, Side, ARENA_HEIGHT, ARENA_WIDTH, CENTERLINE_X, DECK_SIZE,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Live enemy troops above which spawn waves are skipped.
pub const DEFAULT_MAX_LIVE_TROOPS: usize = 8;

/// Footprint assumed for cards that do not declare one.
const DEFAULT_FOOTPRINT: f32 = 20.0;

/// Gap kept between the river and the nearest spawn position.
const RIVER_MARGIN: f32 = 10.0;

/// Gap kept between the arena's top edge and the nearest spawn position.
const EDGE_MARGIN: f32 = 5.0;

/// Configuration parameters required to construct the enemy spawner.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    period_ticks: u32,
    spawn_count: u32,
    max_live_troops: usize,
    level: Level,
    deck: Deck,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration that deploys `spawn_count` cards every
    /// `period_ticks` ticks at `level`.
    #[must_use]
    pub fn new(period_ticks: u32, spawn_count: u32, level: Level, deck: Deck, rng_seed: u64) -> Self {
        Self {
            period_ticks,
            spawn_count,
            max_live_troops: DEFAULT_MAX_LIVE_TROOPS,
            level,
            deck,
            rng_seed,
        }
    }

    /// Overrides the live troop ceiling.
    #[must_use]
    pub fn with_max_live_troops(mut self, max_live_troops: usize) -> Self {
        self.max_live_troops = max_live_troops;
        self
    }
}

/// Pure system that converts elapsed ticks into enemy deployment commands.
#[derive(Debug)]
pub struct EnemySpawner {
    period_ticks: u32,
    spawn_count: u32,
    max_live_troops: usize,
    level: Level,
    deck: Deck,
    accumulated_ticks: u32,
    halted: bool,
    rng: ChaCha8Rng,
}

impl EnemySpawner {
    /// Creates a new spawner using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            period_ticks: config.period_ticks,
            spawn_count: config.spawn_count,
            max_live_troops: config.max_live_troops,
            level: config.level,
            deck: config.deck,
            accumulated_ticks: 0,
            halted: false,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Reports whether the spawner stopped for good after the match ended.
    #[must_use]
    pub const fn is_halted(&self) -> bool {
        self.halted
    }

    /// Consumes world events and the arena view to emit deployment commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        catalog: &Catalog,
        arena: &ArenaSnapshot,
        out: &mut Vec<Command>,
    ) {
        if self.halted {
            return;
        }

        let mut elapsed = 0;
        for event in events {
            match event {
                Event::TimeAdvanced { .. } => elapsed += 1,
                Event::MatchEnded { .. } => {
                    debug!("enemy spawner halted");
                    self.halted = true;
                    return;
                }
                _ => {}
            }
        }

        if self.period_ticks == 0 || elapsed == 0 {
            return;
        }

        self.accumulated_ticks = self.accumulated_ticks.saturating_add(elapsed);
        for _ in 0..self.resolve_waves() {
            self.spawn_wave(catalog, arena, out);
        }
    }

    fn resolve_waves(&mut self) -> u32 {
        let waves = self.accumulated_ticks / self.period_ticks;
        self.accumulated_ticks %= self.period_ticks;
        waves
    }

    fn spawn_wave(&mut self, catalog: &Catalog, arena: &ArenaSnapshot, out: &mut Vec<Command>) {
        let live = arena
            .iter()
            .filter(|entity| entity.kind == EntityKind::Troop && entity.side == Side::Enemy)
            .count();
        if live >= self.max_live_troops {
            trace!(live, "spawn wave skipped");
            return;
        }

        for _ in 0..self.spawn_count {
            let card = self.deck.cards()[self.rng.gen_range(0..DECK_SIZE)];
            let definition = catalog.card(card);
            let position = match definition.kind {
                CardKind::Spell(_) => match self.spell_target(arena) {
                    Some(position) => position,
                    None => {
                        trace!(?card, "no target for enemy spell");
                        continue;
                    }
                },
                CardKind::Troop(_) | CardKind::Building(_) => self.field_position(definition),
            };
            debug!(?card, x = position.x, y = position.y, "enemy deploys card");
            out.push(Command::Deploy {
                card,
                level: self.level,
                side: Side::Enemy,
                position,
            });
        }
    }

    /// Uniform position on the enemy half that keeps the footprint on the
    /// field.
    fn field_position(&mut self, definition: &CardDefinition) -> Position {
        let size = footprint(definition);
        let min_x = CENTERLINE_X + RIVER_MARGIN;
        let max_x = (ARENA_WIDTH - size).max(min_x + 1.0);
        let max_y = (ARENA_HEIGHT - size - EDGE_MARGIN).max(EDGE_MARGIN + 1.0);
        Position::new(
            self.rng.gen_range(min_x..max_x),
            self.rng.gen_range(EDGE_MARGIN..max_y),
        )
    }

    /// Centre of a random living player combatant.
    fn spell_target(&mut self, arena: &ArenaSnapshot) -> Option<Position> {
        let targets: Vec<Position> = arena
            .iter()
            .filter(|entity| {
                entity.side == Side::Player
                    && matches!(
                        entity.kind,
                        EntityKind::Troop | EntityKind::Building | EntityKind::Tower
                    )
                    && entity
                        .health
                        .is_some_and(|health| health.hitpoints > 0.0)
            })
            .map(|entity| entity.position)
            .collect();
        if targets.is_empty() {
            return None;
        }
        Some(targets[self.rng.gen_range(0..targets.len())])
    }
}

fn footprint(definition: &CardDefinition) -> f32 {
    let size = match definition.kind {
        CardKind::Troop(stats) => stats.size,
        CardKind::Building(stats) => stats.size,
        CardKind::Spell(_) => 0.0,
    };
    if size > 0.0 {
        size
    } else {
        DEFAULT_FOOTPRINT
    }
}
