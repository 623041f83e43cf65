#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Crown Arena battle simulator.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

pub mod cards;
pub mod progress;
pub mod scaling;
pub mod setup;

pub use cards::{
    AttackStyle, BuildingStats, CardCategory, CardDefinition, CardId, CardKind, Catalog,
    CatalogError, CatalogFile, CrownTowerStats, DeathBombStats, DeathSpawn, HitEffects,
    PeriodicSpawn, SpawnPattern, SpellDelivery, SpellStats, TargetPreference, TowerKind,
    TroopStats, TurretStats,
};
pub use progress::{match_reward, PlayerProgress, UpgradeError, REWARD_BASE};
pub use scaling::{scale, Level, LevelError, Scalable, GROWTH_FACTOR};
pub use setup::{Deck, DeckError, MatchSetup};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of simulation ticks that make up one second of match time.
pub const TICKS_PER_SECOND: u32 = 60;

/// Width of the battlefield measured in world units.
pub const ARENA_WIDTH: f32 = 600.0;

/// Height of the battlefield measured in world units.
pub const ARENA_HEIGHT: f32 = 300.0;

/// Horizontal coordinate of the river that divides the two halves.
pub const CENTERLINE_X: f32 = ARENA_WIDTH / 2.0;

/// Half-width of the river; troops and buildings may not be deployed inside it.
pub const RIVER_HALF_WIDTH: f32 = 10.0;

/// Edge length of the deployment tiles that troops and buildings snap to.
pub const TILE_SIZE: f32 = 20.0;

/// Number of card slots held in a hand.
pub const HAND_SIZE: usize = 4;

/// Number of cards in a complete deck.
pub const DECK_SIZE: usize = 8;

/// Upper bound of the elixir pool.
pub const MAX_ELIXIR: f32 = 10.0;

/// Owning side of an entity or a deployment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The human player, defending the left half of the arena.
    Player,
    /// The AI opponent, defending the right half of the arena.
    Enemy,
}

impl Side {
    /// Both sides in a fixed order.
    pub const ALL: [Side; 2] = [Side::Player, Side::Enemy];

    /// Returns the opposing side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Reports whether the provided horizontal coordinate lies inside this
    /// side's deployment zone.
    #[must_use]
    pub fn owns_x(self, x: f32) -> bool {
        match self {
            Self::Player => x <= CENTERLINE_X - RIVER_HALF_WIDTH,
            Self::Enemy => x >= CENTERLINE_X + RIVER_HALF_WIDTH,
        }
    }
}

/// Unique identifier assigned to every entity and transient effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Point on the battlefield expressed in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate, growing towards the enemy half.
    pub x: f32,
    /// Vertical coordinate, growing towards the bottom lane.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance between two positions.
    #[must_use]
    pub fn distance(self, other: Position) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position shifted by the provided offset.
    #[must_use]
    pub fn offset(self, offset: Position) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y)
    }

    /// Snaps the position to the centre of the deployment tile containing it.
    #[must_use]
    pub fn snap_to_tile(self) -> Self {
        let column = (self.x / TILE_SIZE).floor();
        let row = (self.y / TILE_SIZE).floor();
        Self::new(
            column * TILE_SIZE + TILE_SIZE / 2.0,
            row * TILE_SIZE + TILE_SIZE / 2.0,
        )
    }

    /// Reports whether the position lies on the battlefield.
    #[must_use]
    pub fn is_on_field(self) -> bool {
        (0.0..=ARENA_WIDTH).contains(&self.x) && (0.0..=ARENA_HEIGHT).contains(&self.y)
    }
}

/// Index of a slot within the player's hand.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HandSlot(u8);

impl HandSlot {
    /// Every hand slot in order.
    pub const ALL: [HandSlot; HAND_SIZE] = [HandSlot(0), HandSlot(1), HandSlot(2), HandSlot(3)];

    /// Creates a slot index, returning `None` when it exceeds the hand size.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        if index < HAND_SIZE {
            u8::try_from(index).ok().map(Self)
        } else {
            None
        }
    }

    /// Zero-based index of the slot.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Lifecycle phase of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Regulation time is counting down.
    Running,
    /// Regulation ended with tied crowns; the next tower decides the match.
    Overtime,
    /// The match is over and no further ticks are simulated.
    Ended,
}

/// Crown tally for both sides.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Crowns {
    /// Crowns earned by the player.
    pub player: u8,
    /// Crowns earned by the enemy.
    pub enemy: u8,
}

impl Crowns {
    /// Number of crowns that ends a match outright.
    pub const WINNING: u8 = 3;

    /// Crowns earned by the provided side.
    #[must_use]
    pub const fn of(&self, side: Side) -> u8 {
        match side {
            Side::Player => self.player,
            Side::Enemy => self.enemy,
        }
    }

    /// Mutable access to the tally of the provided side.
    pub fn of_mut(&mut self, side: Side) -> &mut u8 {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    /// Side holding a strict crown lead, if any.
    #[must_use]
    pub fn leader(&self) -> Option<Side> {
        match self.player.cmp(&self.enemy) {
            std::cmp::Ordering::Greater => Some(Side::Player),
            std::cmp::Ordering::Less => Some(Side::Enemy),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation by a single tick.
    Tick,
    /// Plays the card held in a hand slot at the provided position.
    PlayCard {
        /// Hand slot holding the card to play.
        slot: HandSlot,
        /// Requested deployment position.
        position: Position,
    },
    /// Deploys a card for a side at an explicit level.
    ///
    /// Player deployments must reference a card held in the hand and are paid
    /// for with elixir; enemy deployments are free.
    Deploy {
        /// Card to deploy.
        card: CardId,
        /// Level used to scale the card's stats.
        level: Level,
        /// Side that owns the deployed entities.
        side: Side,
        /// Requested deployment position.
        position: Position,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that just completed.
        tick: u64,
    },
    /// Confirms that a card was deployed.
    CardDeployed {
        /// Card that was deployed.
        card: CardId,
        /// Side that owns the deployment.
        side: Side,
        /// Resolved deployment position after tile snapping.
        position: Position,
        /// Entities created by the deployment, empty for instant spells.
        entities: Vec<EntityId>,
    },
    /// Reports that a deployment request was rejected.
    DeploymentRejected {
        /// Card requested for deployment, when one could be resolved.
        card: Option<CardId>,
        /// Side that issued the request.
        side: Side,
        /// Specific reason the deployment failed.
        reason: DeploymentError,
    },
    /// Announces that a card entered a hand slot.
    CardDrawn {
        /// Slot that received the card.
        slot: HandSlot,
        /// Card that was drawn.
        card: CardId,
    },
    /// Confirms that an entity was created outside of a deployment, such as a
    /// periodic or death-triggered spawn.
    EntitySpawned {
        /// Identifier allocated to the new entity.
        entity: EntityId,
        /// Card describing the new entity.
        card: CardId,
        /// Side that owns the new entity.
        side: Side,
    },
    /// Confirms that a troop or building was removed after dying.
    EntityDestroyed {
        /// Identifier of the removed entity.
        entity: EntityId,
        /// Side that owned the entity.
        side: Side,
    },
    /// Confirms that a shield break replaced an entity with another one.
    EntityTransformed {
        /// Identifier of the replaced entity.
        from: EntityId,
        /// Identifier of the replacement.
        into: EntityId,
        /// Card describing the replacement.
        card: CardId,
    },
    /// Announces that a king tower woke up.
    KingTowerActivated {
        /// Side owning the king tower.
        side: Side,
    },
    /// Confirms that a crown tower fell.
    TowerDestroyed {
        /// Identifier of the destroyed tower.
        tower: EntityId,
        /// Side that owned the tower.
        side: Side,
        /// Kind of tower that fell.
        kind: TowerKind,
    },
    /// Reports the crown tally after it changed.
    CrownsChanged {
        /// Updated crown tally.
        crowns: Crowns,
    },
    /// Reports that the elixir accrual multiplier changed.
    ElixirRateChanged {
        /// Multiplier applied to the base accrual rate.
        multiplier: u8,
    },
    /// Reports a match phase transition.
    PhaseChanged {
        /// Phase that became active.
        phase: MatchPhase,
    },
    /// Announces the end of the match. Emitted exactly once.
    MatchEnded {
        /// Winning side, or `None` for a draw.
        winner: Option<Side>,
        /// Final crown tally.
        crowns: Crowns,
        /// Currency awarded to the player.
        reward: u64,
    },
}

/// Reasons a deployment request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum DeploymentError {
    /// The match already ended.
    #[error("the match has ended")]
    MatchEnded,
    /// The player cannot afford the card.
    #[error("not enough elixir")]
    InsufficientElixir,
    /// The requested position lies outside the battlefield.
    #[error("position is outside the arena")]
    OutOfBounds,
    /// Troops and buildings must be deployed on the owner's half.
    #[error("position is outside the deployment zone")]
    WrongHalf,
    /// Player deployments must reference a card held in the hand.
    #[error("card is not in hand")]
    NotInHand,
    /// The requested hand slot holds no card.
    #[error("hand slot is empty")]
    EmptySlot,
    /// Hidden cards only enter play through other cards.
    #[error("card cannot be deployed directly")]
    HiddenCard,
}

/// Category of a simulated entity or effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Crown tower.
    Tower,
    /// Deployed building.
    Building,
    /// Troop.
    Troop,
    /// Attack projectile fired by a troop, building or tower.
    Projectile,
    /// Spell travelling towards its destination.
    SpellProjectile,
    /// Short-lived blast marker left by an area effect.
    SpellVisual,
    /// Timed bomb dropped by a dying troop.
    DeathBomb,
    /// Lingering damage area.
    LingeringSpell,
}

/// Identifier presentation layers use to pick artwork.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visual {
    /// Artwork of a catalog card.
    Card(CardId),
    /// Crown tower artwork.
    Tower(TowerKind),
    /// Homing projectile.
    Bolt,
    /// Rolling piercing projectile.
    Boulder,
    /// Area blast marker.
    Blast,
    /// Death bomb.
    Bomb,
}

/// Hit point readout of a combatant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthSnapshot {
    /// Remaining hit points.
    pub hitpoints: f32,
    /// Remaining hit points divided by the maximum, clamped to `0.0..=1.0`.
    pub hitpoint_ratio: f32,
    /// Remaining shield divided by the maximum, for shielded entities.
    pub shield_ratio: Option<f32>,
}

/// Immutable representation of a single entity or effect used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntitySnapshot {
    /// Unique identifier assigned to the entity.
    pub id: EntityId,
    /// Category of the entity.
    pub kind: EntityKind,
    /// Artwork identifier.
    pub visual: Visual,
    /// Owning side.
    pub side: Side,
    /// Centre of the entity.
    pub position: Position,
    /// Radius of the entity's footprint or effect area.
    pub radius: f32,
    /// Hit points for combatants, `None` for transient effects.
    pub health: Option<HealthSnapshot>,
    /// Whether the entity is frozen or stunned.
    pub frozen: bool,
    /// Whether the entity is slowed.
    pub slowed: bool,
    /// Whether the entity is still inside its deploy delay.
    pub deploying: bool,
    /// Whether the entity is hidden underground.
    pub concealed: bool,
    /// Whether the entity is acting; only dormant king towers report `false`.
    pub active: bool,
    /// Remaining lifetime ratio of timed effects.
    pub fade: Option<f32>,
}

/// Read-only snapshot describing every live entity and effect.
#[derive(Clone, Debug, Default)]
pub struct ArenaSnapshot {
    tick: u64,
    entities: Vec<EntitySnapshot>,
}

impl ArenaSnapshot {
    /// Creates a new arena snapshot, ordering entities by identifier.
    #[must_use]
    pub fn from_entities(tick: u64, mut entities: Vec<EntitySnapshot>) -> Self {
        entities.sort_by_key(|snapshot| snapshot.id);
        Self { tick, entities }
    }

    /// Tick at which the snapshot was captured.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Iterator over the captured entities in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EntitySnapshot> {
        self.entities.iter()
    }

    /// Consumes the snapshot, yielding the underlying entities.
    #[must_use]
    pub fn into_vec(self) -> Vec<EntitySnapshot> {
        self.entities
    }
}

/// Short message shown across the arena after notable transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BannerMessage {
    /// Elixir accrual doubled for the final minute.
    DoubleElixir,
    /// Overtime started with tripled elixir.
    Overtime,
}

impl BannerMessage {
    /// Text displayed for the message.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::DoubleElixir => "2x ELIXIR!",
            Self::Overtime => "OVERTIME: 3x ELIXIR!",
        }
    }
}

/// Banner currently displayed, together with its remaining visibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Banner {
    /// Message being displayed.
    pub message: BannerMessage,
    /// Ticks left before the banner disappears.
    pub ticks_remaining: u32,
}

/// Read-only summary of the match state machine.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchStatus {
    /// Number of ticks simulated so far.
    pub tick: u64,
    /// Current phase.
    pub phase: MatchPhase,
    /// Seconds left in the current phase clock.
    pub seconds_remaining: u32,
    /// Player elixir, always within `0.0..=MAX_ELIXIR`.
    pub elixir: f32,
    /// Multiplier applied to the base elixir rate.
    pub elixir_multiplier: u8,
    /// Crown tally.
    pub crowns: Crowns,
    /// Cards held in the player's hand.
    pub hand: [Option<CardId>; HAND_SIZE],
    /// Card that will be drawn next.
    pub next_card: Option<CardId>,
    /// Banner currently shown, if any.
    pub banner: Option<Banner>,
    /// Winner once the match ended; `None` while running or after a draw.
    pub winner: Option<Side>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_opponent_is_an_involution() {
        for side in Side::ALL {
            assert_eq!(side.opponent().opponent(), side);
            assert_ne!(side.opponent(), side);
        }
    }

    #[test]
    fn deployment_zones_exclude_the_river() {
        assert!(Side::Player.owns_x(290.0));
        assert!(!Side::Player.owns_x(291.0));
        assert!(Side::Enemy.owns_x(310.0));
        assert!(!Side::Enemy.owns_x(300.0));
    }

    #[test]
    fn snapping_moves_to_tile_centre() {
        let snapped = Position::new(47.0, 3.0).snap_to_tile();
        assert_eq!(snapped, Position::new(50.0, 10.0));
    }

    #[test]
    fn hand_slot_rejects_out_of_range_indices() {
        assert!(HandSlot::new(3).is_some());
        assert!(HandSlot::new(HAND_SIZE).is_none());
    }

    #[test]
    fn crown_leader_requires_strict_lead() {
        let mut crowns = Crowns::default();
        assert_eq!(crowns.leader(), None);
        *crowns.of_mut(Side::Enemy) += 1;
        assert_eq!(crowns.leader(), Some(Side::Enemy));
        assert_eq!(crowns.of(Side::Enemy), 1);
    }

    #[test]
    fn tower_kind_round_trips_through_bincode() {
        let bytes = bincode::serialize(&TowerKind::King).expect("serialize");
        let restored: TowerKind = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, TowerKind::King);
    }
}
