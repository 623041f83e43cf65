//! Card catalog: typed base statistics for every deployable card.
//!
//! All statistics describe level 1. The [`crate::scaling`] module turns them
//! into the values used at a specific level.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Position;

const SLOW: f32 = 0.6;
const MEDIUM: f32 = 1.0;
const FAST: f32 = 1.4;
const VERY_FAST: f32 = 1.8;

const MELEE_RANGE: f32 = 10.0;
const STANDARD_DEPLOY_TICKS: u32 = 60;

const PAIR: &[(f32, f32)] = &[(-5.0, 0.0), (5.0, 0.0)];
const TRIO: &[(f32, f32)] = &[(0.0, 0.0), (-10.0, -5.0), (10.0, 5.0)];
const QUINTET: &[(f32, f32)] = &[
    (0.0, 0.0),
    (-10.0, -10.0),
    (10.0, -10.0),
    (-10.0, 10.0),
    (10.0, 10.0),
];
const SWARM: &[(f32, f32)] = &[
    (0.0, 0.0),
    (-10.0, -5.0),
    (10.0, 5.0),
    (-5.0, 5.0),
    (5.0, -5.0),
];
const HORDE: &[(f32, f32)] = &[
    (-10.0, -10.0),
    (10.0, -10.0),
    (-10.0, 10.0),
    (10.0, 10.0),
    (-20.0, 0.0),
    (20.0, 0.0),
];

/// Identifier of every card known to the simulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardId {
    /// Sturdy melee troop.
    Knight,
    /// Pair of ranged troops.
    Archers,
    /// Slow tank that only attacks structures.
    Giant,
    /// Hard-hitting melee troop.
    MiniPekka,
    /// Flying troop with splash projectiles.
    BabyDragon,
    /// Trio of fragile melee troops.
    Skeletons,
    /// Ranged splash troop that periodically summons skeletons.
    Witch,
    /// Five melee troops.
    Barbarians,
    /// Heavy structure attacker that splits into golemites.
    Golem,
    /// One-shot troop that freezes what it hits.
    IceSpirit,
    /// Trio of ranged goblins.
    SpearGoblins,
    /// Ranged troop that slows what it hits.
    IceWizard,
    /// Trio of ranged troops that stun what they hit.
    Zappies,
    /// Melee troop that drops a bomb when it dies.
    GiantSkeleton,
    /// Five fragile flying troops.
    Bats,
    /// Trio of fast melee troops.
    Goblins,
    /// Trio of flying troops.
    Minions,
    /// Six flying troops.
    MinionHorde,
    /// Long-ranged structure attacker.
    RoyalGiant,
    /// Pair of very fast melee troops.
    EliteBarbarians,
    /// Troop that tunnels underground and may be deployed anywhere.
    Miner,
    /// Melee troop that damages everything around it.
    Valkyrie,
    /// Shielded melee splash troop.
    DarkPrince,
    /// Trio of shielded skeletons.
    Guards,
    /// Shielded ranged troop that becomes a cannon once its shield breaks.
    CannonCart,
    /// Troop that rolls piercing boulders along the ground.
    Bowler,
    /// Instant stunning spell.
    Zap,
    /// Instant spell that knocks troops back.
    Snowball,
    /// Travelling area damage spell.
    Fireball,
    /// Slow, high damage area spell.
    Rocket,
    /// Lingering area spell that favours structures.
    Earthquake,
    /// Building that periodically spawns spear goblins.
    GoblinHut,
    /// Defensive turret building.
    Cannon,
    /// Building that spawns skeletons while alive and when destroyed.
    Tombstone,
    /// Hidden troop produced when a golem dies.
    Golemite,
    /// Hidden spear goblin produced by the goblin hut.
    SpearGoblin,
    /// Hidden minion produced by the minion horde.
    Minion,
    /// Hidden turret produced when the cannon cart loses its shield.
    BrokenCannon,
}

impl CardId {
    /// Every card identifier in catalog order.
    pub const ALL: [CardId; 38] = [
        CardId::Knight,
        CardId::Archers,
        CardId::Giant,
        CardId::MiniPekka,
        CardId::BabyDragon,
        CardId::Skeletons,
        CardId::Witch,
        CardId::Barbarians,
        CardId::Golem,
        CardId::IceSpirit,
        CardId::SpearGoblins,
        CardId::IceWizard,
        CardId::Zappies,
        CardId::GiantSkeleton,
        CardId::Bats,
        CardId::Goblins,
        CardId::Minions,
        CardId::MinionHorde,
        CardId::RoyalGiant,
        CardId::EliteBarbarians,
        CardId::Miner,
        CardId::Valkyrie,
        CardId::DarkPrince,
        CardId::Guards,
        CardId::CannonCart,
        CardId::Bowler,
        CardId::Zap,
        CardId::Snowball,
        CardId::Fireball,
        CardId::Rocket,
        CardId::Earthquake,
        CardId::GoblinHut,
        CardId::Cannon,
        CardId::Tombstone,
        CardId::Golemite,
        CardId::SpearGoblin,
        CardId::Minion,
        CardId::BrokenCannon,
    ];

    /// Reports whether the card only enters play through another card.
    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(
            self,
            Self::Golemite | Self::SpearGoblin | Self::Minion | Self::BrokenCannon
        )
    }

    /// Iterator over every card a deck may contain.
    pub fn playable() -> impl Iterator<Item = CardId> {
        Self::ALL.into_iter().filter(|card| !card.is_hidden())
    }
}

/// Broad classification of a card.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardCategory {
    /// Deployable troop.
    Troop,
    /// Deployable building.
    Building,
    /// Deployable spell.
    Spell,
    /// Troop that only enters play through another card.
    HiddenTroop,
    /// Building that only enters play through another card.
    HiddenBuilding,
}

/// How a troop delivers its attacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackStyle {
    /// Direct damage to the target, or to everything in the splash radius
    /// around the attacker when one is configured.
    #[default]
    Melee,
    /// Homing projectile that strikes the target, splashing on impact when a
    /// splash radius is configured.
    Projectile,
    /// Linear projectile that damages each enemy it passes at most once.
    Piercing {
        /// Distance travelled before the projectile expires.
        travel: f32,
        /// Radius within which the projectile hits entities.
        radius: f32,
    },
}

/// Which entities a troop is willing to target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetPreference {
    /// Troops, buildings and towers.
    #[default]
    Any,
    /// Only buildings and towers.
    Buildings,
}

/// Status effects applied to whatever an attack hits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct HitEffects {
    /// Ticks the victim stays stunned.
    pub stun_ticks: u32,
    /// Ticks the victim stays slowed.
    pub slow_ticks: u32,
    /// Ticks the victim stays frozen.
    pub freeze_ticks: u32,
}

impl HitEffects {
    /// Reports whether the effects do nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.stun_ticks == 0 && self.slow_ticks == 0 && self.freeze_ticks == 0
    }
}

/// Arrangement of entities produced by a spawn around the spawner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpawnPattern {
    /// A single entity at the spawner's centre.
    #[default]
    Centre,
    /// Two entities ten units to the left and right of the spawner.
    Flanks,
    /// Four entities one body length above, below, left and right.
    Cross,
}

impl SpawnPattern {
    /// Offsets relative to the spawner's centre for a spawner of `size`.
    #[must_use]
    pub fn offsets(self, size: f32) -> Vec<Position> {
        match self {
            Self::Centre => vec![Position::new(0.0, 0.0)],
            Self::Flanks => vec![Position::new(-10.0, 0.0), Position::new(10.0, 0.0)],
            Self::Cross => vec![
                Position::new(0.0, -size),
                Position::new(0.0, size),
                Position::new(-size, 0.0),
                Position::new(size, 0.0),
            ],
        }
    }
}

/// Repeating spawn performed by a living troop or building.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PeriodicSpawn {
    /// Card spawned.
    pub card: CardId,
    /// Arrangement of the spawned entities.
    pub pattern: SpawnPattern,
    /// Ticks between spawns.
    pub interval_ticks: u32,
}

/// Spawn performed once when a troop or building dies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeathSpawn {
    /// Card spawned.
    pub card: CardId,
    /// Arrangement of the spawned entities.
    pub pattern: SpawnPattern,
}

/// Bomb dropped by a troop when it dies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeathBombStats {
    /// Damage dealt when the bomb explodes.
    pub damage: f32,
    /// Explosion radius.
    pub radius: f32,
    /// Ticks between the drop and the explosion.
    pub fuse_ticks: u32,
}

/// Statistics of a troop card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TroopStats {
    /// Maximum hit points.
    pub hitpoints: f32,
    /// Damage per attack.
    pub damage: f32,
    /// Shield hit points absorbed before the main pool.
    pub shield: Option<f32>,
    /// Distance travelled per tick.
    pub speed: f32,
    /// Attack range measured between footprint edges.
    pub range: f32,
    /// Seconds between attacks.
    pub attack_interval: f32,
    /// Footprint diameter.
    pub size: f32,
    /// How attacks are delivered.
    pub attack: AttackStyle,
    /// Radius of splash damage, if any.
    pub splash_radius: Option<f32>,
    /// Whether the troop flies over the river.
    pub flying: bool,
    /// Whether the troop may target flying troops.
    pub targets_air: bool,
    /// Which entities the troop targets.
    pub target_preference: TargetPreference,
    /// Whether the troop travels underground until it reaches attack range.
    pub burrows: bool,
    /// Status effects applied by each hit.
    pub on_hit: HitEffects,
    /// Whether the troop dies after its first attack.
    pub self_destructs: bool,
    /// Spawn repeated while the troop lives.
    pub periodic_spawn: Option<PeriodicSpawn>,
    /// Spawn performed when the troop dies.
    pub death_spawn: Option<DeathSpawn>,
    /// Bomb dropped when the troop dies.
    pub death_bomb: Option<DeathBombStats>,
    /// Card that replaces the troop when its shield breaks.
    pub transforms_into: Option<CardId>,
}

/// Weapon mounted on a building.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretStats {
    /// Damage per shot.
    pub damage: f32,
    /// Range measured between centres.
    pub range: f32,
    /// Seconds between shots.
    pub attack_interval: f32,
    /// Whether the turret may target flying troops.
    pub targets_air: bool,
}

/// Statistics of a building card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildingStats {
    /// Maximum hit points.
    pub hitpoints: f32,
    /// Footprint edge length.
    pub size: f32,
    /// Ticks until lifetime decay destroys the building.
    pub lifetime_ticks: u32,
    /// Weapon, for defensive buildings.
    pub turret: Option<TurretStats>,
    /// Spawn repeated while the building stands.
    pub periodic_spawn: Option<PeriodicSpawn>,
    /// Spawn performed when the building is destroyed.
    pub death_spawn: Option<DeathSpawn>,
}

/// How a spell reaches its destination and applies its effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellDelivery {
    /// The effect resolves on the deployment tick.
    #[default]
    Instant,
    /// A projectile flies from the caster's king tower and resolves on arrival.
    Projectile {
        /// Ticks needed to cross the arena.
        travel_ticks: u32,
    },
    /// An area that damages everything inside it every tick.
    Lingering {
        /// Ticks the area persists.
        duration_ticks: u32,
        /// Damage per tick dealt to troops.
        troop_damage_per_tick: f32,
        /// Damage per tick dealt to buildings and towers.
        structure_damage_per_tick: f32,
    },
}

/// Statistics of a spell card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellStats {
    /// Effect radius.
    pub radius: f32,
    /// Flat damage dealt to troops and buildings.
    pub damage: Option<f32>,
    /// Flat damage dealt to crown towers.
    pub tower_damage: Option<f32>,
    /// Ticks affected entities stay stunned.
    pub stun_ticks: u32,
    /// Ticks affected entities stay frozen.
    pub freeze_ticks: u32,
    /// Distance troops are pushed away from the centre.
    pub knockback: Option<f32>,
    /// How the spell is delivered.
    pub delivery: SpellDelivery,
}

/// Category-specific statistics of a card.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum CardKind {
    /// Troop statistics.
    Troop(TroopStats),
    /// Building statistics.
    Building(BuildingStats),
    /// Spell statistics.
    Spell(SpellStats),
}

/// Catalog entry describing a card at level 1.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Card identifier.
    pub id: CardId,
    /// Display name.
    pub name: String,
    /// Elixir cost.
    pub cost: u8,
    /// Ticks deployed entities stay inert.
    #[serde(default)]
    pub deploy_ticks: u32,
    /// Whether the card may be deployed on the opponent's half.
    #[serde(default)]
    pub deploy_anywhere: bool,
    /// Card whose statistics the deployed entities use, when it differs.
    #[serde(default)]
    pub deploys: Option<CardId>,
    /// Offsets of the deployed entities; empty means a single entity.
    #[serde(default)]
    pub formation: Vec<Position>,
    /// Category-specific statistics.
    pub kind: CardKind,
}

impl CardDefinition {
    /// Category of the card.
    #[must_use]
    pub fn category(&self) -> CardCategory {
        match (self.kind, self.id.is_hidden()) {
            (CardKind::Troop(_), false) => CardCategory::Troop,
            (CardKind::Troop(_), true) => CardCategory::HiddenTroop,
            (CardKind::Building(_), false) => CardCategory::Building,
            (CardKind::Building(_), true) => CardCategory::HiddenBuilding,
            (CardKind::Spell(_), _) => CardCategory::Spell,
        }
    }

    /// Offsets of the entities created by one deployment.
    #[must_use]
    pub fn deployment_offsets(&self) -> Vec<Position> {
        if self.formation.is_empty() {
            vec![Position::new(0.0, 0.0)]
        } else {
            self.formation.clone()
        }
    }

    fn references(&self) -> Vec<CardId> {
        let mut references: Vec<CardId> = self.deploys.into_iter().collect();
        match self.kind {
            CardKind::Troop(stats) => {
                references.extend(stats.periodic_spawn.map(|spawn| spawn.card));
                references.extend(stats.death_spawn.map(|spawn| spawn.card));
                references.extend(stats.transforms_into);
            }
            CardKind::Building(stats) => {
                references.extend(stats.periodic_spawn.map(|spawn| spawn.card));
                references.extend(stats.death_spawn.map(|spawn| spawn.card));
            }
            CardKind::Spell(_) => {}
        }
        references
    }
}

/// Errors raised while assembling a catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The same card was defined twice.
    #[error("card {0:?} is defined more than once")]
    Duplicate(CardId),
    /// A card identifier has no definition.
    #[error("card {0:?} has no definition")]
    Missing(CardId),
    /// A card refers to another card that cannot fulfil the reference.
    #[error("card {card:?} refers to {reference:?}, which is not a troop or building")]
    InvalidReference {
        /// Card holding the reference.
        card: CardId,
        /// Referenced card.
        reference: CardId,
    },
}

/// Serialized form of a catalog, as read from configuration files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Card definitions.
    pub cards: Vec<CardDefinition>,
}

/// Validated, read-only card table.
#[derive(Clone, Debug, PartialEq)]
pub struct Catalog {
    cards: BTreeMap<CardId, CardDefinition>,
}

impl Catalog {
    /// Builds a catalog, verifying that every card is defined exactly once and
    /// that every referenced card is a troop or building.
    pub fn from_definitions(
        definitions: impl IntoIterator<Item = CardDefinition>,
    ) -> Result<Self, CatalogError> {
        let mut cards = BTreeMap::new();
        for definition in definitions {
            let id = definition.id;
            if cards.insert(id, definition).is_some() {
                return Err(CatalogError::Duplicate(id));
            }
        }

        if let Some(missing) = CardId::ALL.into_iter().find(|id| !cards.contains_key(id)) {
            return Err(CatalogError::Missing(missing));
        }

        for definition in cards.values() {
            for reference in definition.references() {
                let valid = cards
                    .get(&reference)
                    .is_some_and(|target| !matches!(target.kind, CardKind::Spell(_)));
                if !valid {
                    return Err(CatalogError::InvalidReference {
                        card: definition.id,
                        reference,
                    });
                }
            }
        }

        Ok(Self { cards })
    }

    /// Builds the catalog from its serialized form.
    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        Self::from_definitions(file.cards)
    }

    /// Serialized form of the catalog.
    #[must_use]
    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            cards: self.cards.values().cloned().collect(),
        }
    }

    /// Looks up a card definition.
    ///
    /// # Panics
    ///
    /// Panics if the card is missing, which validation rules out.
    #[must_use]
    pub fn card(&self, id: CardId) -> &CardDefinition {
        match self.cards.get(&id) {
            Some(definition) => definition,
            None => panic!("catalog invariant violated: card {id:?} has no definition"),
        }
    }

    /// Iterator over every definition in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &CardDefinition> {
        self.cards.values()
    }

    /// The built-in card table.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            cards: standard_definitions()
                .into_iter()
                .map(|definition| (definition.id, definition))
                .collect(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Crown tower variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Central tower; dormant until damaged or a sibling falls.
    King,
    /// Lane tower guarding a bridge.
    Princess,
}

/// Statistics of a crown tower.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrownTowerStats {
    /// Maximum hit points.
    pub hitpoints: f32,
    /// Damage per shot.
    pub damage: f32,
    /// Seconds between shots.
    pub attack_interval: f32,
    /// Range measured between centres.
    pub range: f32,
    /// Footprint width.
    pub width: f32,
    /// Footprint height.
    pub height: f32,
}

impl TowerKind {
    /// Level-1 statistics of the tower.
    #[must_use]
    pub const fn base_stats(self) -> CrownTowerStats {
        match self {
            Self::King => CrownTowerStats {
                hitpoints: 1545.0,
                damage: 38.0,
                attack_interval: 1.0,
                range: 180.0,
                width: 50.0,
                height: 90.0,
            },
            Self::Princess => CrownTowerStats {
                hitpoints: 977.0,
                damage: 43.0,
                attack_interval: 0.8,
                range: 200.0,
                width: 40.0,
                height: 80.0,
            },
        }
    }
}

fn formation(offsets: &[(f32, f32)]) -> Vec<Position> {
    offsets.iter().map(|&(x, y)| Position::new(x, y)).collect()
}

fn definition(id: CardId, name: &str, cost: u8, kind: CardKind) -> CardDefinition {
    let deploy_ticks = match kind {
        CardKind::Spell(_) => 0,
        _ => STANDARD_DEPLOY_TICKS,
    };
    CardDefinition {
        id,
        name: name.to_owned(),
        cost,
        deploy_ticks,
        deploy_anywhere: false,
        deploys: None,
        formation: Vec::new(),
        kind,
    }
}

fn troop(id: CardId, name: &str, cost: u8, offsets: &[(f32, f32)], stats: TroopStats) -> CardDefinition {
    CardDefinition {
        formation: formation(offsets),
        ..definition(id, name, cost, CardKind::Troop(stats))
    }
}

fn melee(hitpoints: f32, damage: f32, speed: f32, attack_interval: f32, size: f32) -> TroopStats {
    TroopStats {
        hitpoints,
        damage,
        speed,
        range: MELEE_RANGE,
        attack_interval,
        size,
        ..TroopStats::default()
    }
}

fn ranged(
    hitpoints: f32,
    damage: f32,
    speed: f32,
    range: f32,
    attack_interval: f32,
    size: f32,
) -> TroopStats {
    TroopStats {
        hitpoints,
        damage,
        speed,
        range,
        attack_interval,
        size,
        attack: AttackStyle::Projectile,
        targets_air: true,
        ..TroopStats::default()
    }
}

fn spell(id: CardId, name: &str, cost: u8, stats: SpellStats) -> CardDefinition {
    CardDefinition {
        deploy_anywhere: true,
        ..definition(id, name, cost, CardKind::Spell(stats))
    }
}

fn standard_definitions() -> Vec<CardDefinition> {
    let skeleton = melee(30.0, 30.0, FAST, 1.0, 18.0);
    let spear_goblin = ranged(51.0, 31.0, VERY_FAST, 150.0, 1.1, 20.0);
    let minion = TroopStats {
        flying: true,
        targets_air: true,
        ..melee(83.0, 39.0, FAST, 1.0, 24.0)
    };

    vec![
        troop(CardId::Knight, "Knight", 3, &[], melee(615.0, 72.0, MEDIUM, 1.2, 28.0)),
        troop(
            CardId::Archers,
            "Archers",
            3,
            PAIR,
            ranged(108.0, 37.0, MEDIUM, 150.0, 1.2, 22.0),
        ),
        troop(
            CardId::Giant,
            "Giant",
            5,
            &[],
            TroopStats {
                target_preference: TargetPreference::Buildings,
                ..melee(1395.0, 89.0, SLOW, 1.5, 35.0)
            },
        ),
        troop(CardId::MiniPekka, "Mini P.E.K.K.A", 4, &[], melee(407.0, 221.0, FAST, 1.8, 25.0)),
        troop(
            CardId::BabyDragon,
            "Baby Dragon",
            4,
            &[],
            TroopStats {
                flying: true,
                splash_radius: Some(30.0),
                ..ranged(395.0, 56.0, FAST, 120.0, 1.5, 35.0)
            },
        ),
        troop(CardId::Skeletons, "Skeletons", 1, TRIO, skeleton),
        troop(
            CardId::Witch,
            "Witch",
            5,
            &[],
            TroopStats {
                splash_radius: Some(30.0),
                periodic_spawn: Some(PeriodicSpawn {
                    card: CardId::Skeletons,
                    pattern: SpawnPattern::Cross,
                    interval_ticks: 420,
                }),
                ..ranged(296.0, 47.0, MEDIUM, 130.0, 1.1, 28.0)
            },
        ),
        troop(
            CardId::Barbarians,
            "Barbarians",
            5,
            QUINTET,
            melee(149.0, 46.0, MEDIUM, 1.4, 26.0),
        ),
        troop(
            CardId::Golem,
            "Golem",
            8,
            &[],
            TroopStats {
                target_preference: TargetPreference::Buildings,
                death_spawn: Some(DeathSpawn {
                    card: CardId::Golemite,
                    pattern: SpawnPattern::Flanks,
                }),
                ..melee(1804.0, 109.0, SLOW, 2.5, 40.0)
            },
        ),
        troop(
            CardId::IceSpirit,
            "Ice Spirit",
            1,
            &[],
            TroopStats {
                targets_air: true,
                self_destructs: true,
                on_hit: HitEffects {
                    freeze_ticks: 78,
                    ..HitEffects::default()
                },
                ..melee(81.0, 37.0, VERY_FAST, 0.5, 20.0)
            },
        ),
        troop(CardId::SpearGoblins, "Spear Goblins", 2, TRIO, spear_goblin),
        troop(
            CardId::IceWizard,
            "Ice Wizard",
            3,
            &[],
            TroopStats {
                on_hit: HitEffects {
                    slow_ticks: 150,
                    ..HitEffects::default()
                },
                ..ranged(271.0, 43.0, MEDIUM, 165.0, 1.7, 28.0)
            },
        ),
        troop(
            CardId::Zappies,
            "Zappies",
            4,
            TRIO,
            TroopStats {
                on_hit: HitEffects {
                    stun_ticks: 30,
                    ..HitEffects::default()
                },
                ..ranged(123.0, 33.0, MEDIUM, 135.0, 1.6, 22.0)
            },
        ),
        troop(
            CardId::GiantSkeleton,
            "Giant Skeleton",
            6,
            &[],
            TroopStats {
                death_bomb: Some(DeathBombStats {
                    damage: 409.0,
                    radius: 100.0,
                    fuse_ticks: 180,
                }),
                ..melee(1120.0, 72.0, MEDIUM, 1.5, 38.0)
            },
        ),
        troop(
            CardId::Bats,
            "Bats",
            2,
            SWARM,
            TroopStats {
                flying: true,
                targets_air: true,
                ..melee(30.0, 30.0, FAST, 1.0, 18.0)
            },
        ),
        troop(CardId::Goblins, "Goblins", 2, TRIO, melee(73.0, 46.0, VERY_FAST, 1.1, 20.0)),
        troop(CardId::Minions, "Minions", 3, TRIO, minion),
        CardDefinition {
            deploys: Some(CardId::Minion),
            ..troop(CardId::MinionHorde, "Minion Horde", 5, HORDE, minion)
        },
        troop(
            CardId::RoyalGiant,
            "Royal Giant",
            6,
            &[],
            TroopStats {
                targets_air: false,
                target_preference: TargetPreference::Buildings,
                ..ranged(1077.0, 105.0, SLOW, 195.0, 1.7, 35.0)
            },
        ),
        troop(
            CardId::EliteBarbarians,
            "Elite Barbarians",
            6,
            PAIR,
            melee(429.0, 128.0, VERY_FAST, 1.7, 28.0),
        ),
        CardDefinition {
            deploy_anywhere: true,
            ..troop(
                CardId::Miner,
                "Miner",
                3,
                &[],
                TroopStats {
                    burrows: true,
                    ..melee(386.0, 62.0, FAST, 1.2, 25.0)
                },
            )
        },
        troop(
            CardId::Valkyrie,
            "Valkyrie",
            4,
            &[],
            TroopStats {
                splash_radius: Some(40.0),
                ..melee(638.0, 85.0, MEDIUM, 1.5, 28.0)
            },
        ),
        troop(
            CardId::DarkPrince,
            "Dark Prince",
            4,
            &[],
            TroopStats {
                shield: Some(77.0),
                splash_radius: Some(30.0),
                ..melee(397.0, 79.0, MEDIUM, 1.3, 30.0)
            },
        ),
        troop(
            CardId::Guards,
            "Guards",
            3,
            TRIO,
            TroopStats {
                shield: Some(77.0),
                ..melee(31.0, 35.0, FAST, 1.0, 20.0)
            },
        ),
        troop(
            CardId::CannonCart,
            "Cannon Cart",
            5,
            &[],
            TroopStats {
                shield: Some(251.0),
                targets_air: false,
                transforms_into: Some(CardId::BrokenCannon),
                ..ranged(251.0, 82.0, MEDIUM, 165.0, 1.0, 30.0)
            },
        ),
        troop(
            CardId::Bowler,
            "Bowler",
            5,
            &[],
            TroopStats {
                attack: AttackStyle::Piercing {
                    travel: 150.0,
                    radius: 15.0,
                },
                targets_air: false,
                ..ranged(655.0, 111.0, SLOW, 100.0, 2.5, 32.0)
            },
        ),
        spell(
            CardId::Zap,
            "Zap",
            2,
            SpellStats {
                radius: 40.0,
                damage: Some(67.0),
                tower_damage: Some(20.0),
                stun_ticks: 30,
                ..SpellStats::default()
            },
        ),
        spell(
            CardId::Snowball,
            "Snowball",
            2,
            SpellStats {
                radius: 40.0,
                damage: Some(41.0),
                tower_damage: Some(12.0),
                knockback: Some(30.0),
                ..SpellStats::default()
            },
        ),
        spell(
            CardId::Fireball,
            "Fireball",
            4,
            SpellStats {
                radius: 50.0,
                damage: Some(242.0),
                tower_damage: Some(72.0),
                delivery: SpellDelivery::Projectile { travel_ticks: 50 },
                ..SpellStats::default()
            },
        ),
        spell(
            CardId::Rocket,
            "Rocket",
            6,
            SpellStats {
                radius: 40.0,
                damage: Some(529.0),
                tower_damage: Some(159.0),
                delivery: SpellDelivery::Projectile { travel_ticks: 100 },
                ..SpellStats::default()
            },
        ),
        spell(
            CardId::Earthquake,
            "Earthquake",
            3,
            SpellStats {
                radius: 70.0,
                delivery: SpellDelivery::Lingering {
                    duration_ticks: 180,
                    troop_damage_per_tick: 0.43566,
                    structure_damage_per_tick: 1.74651,
                },
                ..SpellStats::default()
            },
        ),
        definition(
            CardId::GoblinHut,
            "Goblin Hut",
            5,
            CardKind::Building(BuildingStats {
                hitpoints: 499.0,
                size: 40.0,
                lifetime_ticks: 1740,
                periodic_spawn: Some(PeriodicSpawn {
                    card: CardId::SpearGoblin,
                    pattern: SpawnPattern::Centre,
                    interval_ticks: 240,
                }),
                ..BuildingStats::default()
            }),
        ),
        definition(
            CardId::Cannon,
            "Cannon",
            3,
            CardKind::Building(BuildingStats {
                hitpoints: 266.0,
                size: 40.0,
                lifetime_ticks: 1800,
                turret: Some(TurretStats {
                    damage: 55.0,
                    range: 165.0,
                    attack_interval: 0.8,
                    targets_air: false,
                }),
                ..BuildingStats::default()
            }),
        ),
        definition(
            CardId::Tombstone,
            "Tombstone",
            3,
            CardKind::Building(BuildingStats {
                hitpoints: 197.0,
                size: 40.0,
                lifetime_ticks: 1800,
                periodic_spawn: Some(PeriodicSpawn {
                    card: CardId::Skeletons,
                    pattern: SpawnPattern::Centre,
                    interval_ticks: 174,
                }),
                death_spawn: Some(DeathSpawn {
                    card: CardId::Skeletons,
                    pattern: SpawnPattern::Cross,
                }),
                ..BuildingStats::default()
            }),
        ),
        CardDefinition {
            deploy_ticks: 0,
            ..troop(
                CardId::Golemite,
                "Golemite",
                0,
                &[],
                TroopStats {
                    target_preference: TargetPreference::Buildings,
                    ..melee(365.0, 22.0, SLOW, 2.5, 30.0)
                },
            )
        },
        troop(CardId::SpearGoblin, "Spear Goblin", 0, &[], spear_goblin),
        troop(CardId::Minion, "Minion", 0, &[], minion),
        CardDefinition {
            deploy_ticks: 0,
            ..definition(
                CardId::BrokenCannon,
                "Broken Cannon",
                0,
                CardKind::Building(BuildingStats {
                    hitpoints: 251.0,
                    size: 30.0,
                    lifetime_ticks: 1800,
                    turret: Some(TurretStats {
                        damage: 82.0,
                        range: 165.0,
                        attack_interval: 1.0,
                        targets_air: false,
                    }),
                    ..BuildingStats::default()
                }),
            )
        },
    ]
}
