#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for Crown Arena.
//!
//! The world owns every entity and transient effect, the match clock and the
//! player's hand. It is mutated exclusively through [`apply`] and inspected
//! through the read-only [`query`] module.

mod arena;
mod combat;
mod combatant;
mod deploy;
mod effects;
mod entities;
mod hand;
mod match_state;
mod spells;

use crown_arena_core::{
    CardId, CardKind, Catalog, Command, EntityId, Event, Level, MatchSetup, Position, Scalable,
    SpawnPattern, Side,
};
use tracing::{debug, info, trace};

use crate::{
    arena::{clamp_to_field, spawn_point, tower_layout, Field},
    combatant::Combatant,
    effects::{DeathBomb, LingeringArea, Projectile, SpellProjectile, SpellVisual},
    entities::{Building, Tower, Unit},
    hand::Hand,
    match_state::MatchState,
};

/// Represents the authoritative Crown Arena battle state.
#[derive(Debug)]
pub struct World {
    catalog: Catalog,
    setup: MatchSetup,
    state: MatchState,
    hand: Hand,
    field: Field,
    projectiles: Vec<Projectile>,
    spell_projectiles: Vec<SpellProjectile>,
    visuals: Vec<SpellVisual>,
    bombs: Vec<DeathBomb>,
    areas: Vec<LingeringArea>,
    next_id: u32,
    tick: u64,
}

impl World {
    /// Creates a world for `setup` using the built-in card catalog.
    #[must_use]
    pub fn new(setup: MatchSetup) -> Self {
        Self::with_catalog(Catalog::standard(), setup)
    }

    /// Creates a world for `setup` using an externally supplied catalog.
    #[must_use]
    pub fn with_catalog(catalog: Catalog, setup: MatchSetup) -> Self {
        let mut world = Self {
            state: MatchState::new(&setup),
            hand: Hand::new(&setup.player_deck, setup.seed),
            catalog,
            setup,
            field: Field::default(),
            projectiles: Vec::new(),
            spell_projectiles: Vec::new(),
            visuals: Vec::new(),
            bombs: Vec::new(),
            areas: Vec::new(),
            next_id: 0,
            tick: 0,
        };
        for side in Side::ALL {
            let level = world.tower_level(side);
            for (kind, position) in tower_layout(side) {
                let id = world.allocate_id();
                let stats = kind.base_stats().scaled(level);
                world
                    .field
                    .towers
                    .push(Tower::new(id, side, kind, position, stats));
            }
        }
        world
    }

    fn tower_level(&self, side: Side) -> Level {
        match side {
            Side::Player => self.setup.king_level,
            Side::Enemy => self.setup.enemy_level,
        }
    }

    fn allocate_id(&mut self) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Creates the troop or building described by `card`, returning its
    /// identifier. Spells produce nothing.
    fn spawn_entity(
        &mut self,
        card: CardId,
        side: Side,
        level: Level,
        position: Position,
        deploy_ticks: u32,
    ) -> Option<EntityId> {
        let kind = self.catalog.card(card).kind.scaled(level);
        let position = clamp_to_field(position);
        match kind {
            CardKind::Troop(stats) => {
                let id = self.allocate_id();
                self.field.units.push(Unit::new(
                    id,
                    card,
                    side,
                    level,
                    position,
                    stats,
                    deploy_ticks,
                ));
                Some(id)
            }
            CardKind::Building(stats) => {
                let id = self.allocate_id();
                self.field.buildings.push(Building::new(
                    id,
                    card,
                    side,
                    level,
                    position,
                    stats,
                    deploy_ticks,
                ));
                Some(id)
            }
            CardKind::Spell(_) => None,
        }
    }

    /// Spawns `card` around `origin` following `pattern`.
    fn spawn_pattern(
        &mut self,
        card: CardId,
        pattern: SpawnPattern,
        side: Side,
        level: Level,
        origin: (Position, f32),
        out_events: &mut Vec<Event>,
    ) {
        let (centre, size) = origin;
        let deploy_ticks = self.catalog.card(card).deploy_ticks;
        for offset in pattern.offsets(size) {
            let point = spawn_point(centre, offset, side);
            if let Some(entity) = self.spawn_entity(card, side, level, point, deploy_ticks) {
                debug!(entity = entity.get(), ?card, ?side, "entity spawned");
                out_events.push(Event::EntitySpawned { entity, card, side });
            }
        }
    }

    fn advance(&mut self, out_events: &mut Vec<Event>) {
        self.tick += 1;
        trace!(tick = self.tick, "tick started");

        self.state.advance(out_events);
        if !self.state.is_over() {
            self.update_towers();
            self.update_buildings(out_events);
            self.reap(out_events);
            self.update_projectiles();
            self.reap(out_events);
            self.update_spell_projectiles();
            self.reap(out_events);
            self.update_units(out_events);
            self.reap(out_events);
            self.update_visuals();
            self.update_bombs();
            self.reap(out_events);
            self.update_areas();
            self.reap(out_events);
            self.state.check_crowns(out_events);
        }

        out_events.push(Event::TimeAdvanced { tick: self.tick });
    }

    /// Removes dead combatants after queuing their death effects, swaps
    /// shield-broken troops for their replacement and scores fallen towers.
    fn reap(&mut self, out_events: &mut Vec<Event>) {
        self.transform_broken_shields(out_events);

        let (units, fallen): (Vec<Unit>, Vec<Unit>) = std::mem::take(&mut self.field.units)
            .into_iter()
            .partition(|unit| unit.is_alive());
        self.field.units = units;
        for unit in fallen {
            debug!(entity = unit.id.get(), card = ?unit.card, side = ?unit.side, "troop died");
            out_events.push(Event::EntityDestroyed {
                entity: unit.id,
                side: unit.side,
            });
            if let Some(spawn) = unit.stats.death_spawn {
                self.spawn_pattern(
                    spawn.card,
                    spawn.pattern,
                    unit.side,
                    unit.level,
                    (unit.position, unit.stats.size),
                    out_events,
                );
            }
            if let Some(bomb) = unit.stats.death_bomb {
                let id = self.allocate_id();
                self.bombs.push(DeathBomb {
                    id,
                    side: unit.side,
                    position: unit.position,
                    fuse: bomb.fuse_ticks,
                    fuse_total: bomb.fuse_ticks,
                    damage: bomb.damage,
                    radius: bomb.radius,
                });
            }
        }

        let (buildings, fallen): (Vec<Building>, Vec<Building>) =
            std::mem::take(&mut self.field.buildings)
                .into_iter()
                .partition(|building| building.is_alive());
        self.field.buildings = buildings;
        for building in fallen {
            debug!(entity = building.id.get(), card = ?building.card, "building destroyed");
            out_events.push(Event::EntityDestroyed {
                entity: building.id,
                side: building.side,
            });
            if let Some(spawn) = building.stats.death_spawn {
                self.spawn_pattern(
                    spawn.card,
                    spawn.pattern,
                    building.side,
                    building.level,
                    (building.position, building.stats.size),
                    out_events,
                );
            }
        }

        let (towers, fallen): (Vec<Tower>, Vec<Tower>) = std::mem::take(&mut self.field.towers)
            .into_iter()
            .partition(|tower| tower.is_alive());
        self.field.towers = towers;
        for tower in fallen {
            info!(side = ?tower.side, kind = ?tower.kind, "tower destroyed");
            out_events.push(Event::TowerDestroyed {
                tower: tower.id,
                side: tower.side,
                kind: tower.kind,
            });
            self.state.award_tower(tower.side, tower.kind, out_events);
            if let Some(king) = self.field.king_mut(tower.side) {
                king.activate();
            }
        }

        for tower in &mut self.field.towers {
            if tower.take_activation_notice() {
                info!(side = ?tower.side, "king tower activated");
                out_events.push(Event::KingTowerActivated { side: tower.side });
            }
        }
    }

    fn transform_broken_shields(&mut self, out_events: &mut Vec<Event>) {
        let mut index = 0;
        while index < self.field.units.len() {
            let unit = &self.field.units[index];
            let replacement = unit
                .stats
                .transforms_into
                .filter(|_| unit.is_alive() && unit.vitals.shield_broken());
            let Some(card) = replacement else {
                index += 1;
                continue;
            };
            let unit = self.field.units.remove(index);
            if let Some(into) = self.spawn_entity(card, unit.side, unit.level, unit.position, 0) {
                debug!(from = unit.id.get(), into = into.get(), ?card, "entity transformed");
                out_events.push(Event::EntityTransformed {
                    from: unit.id,
                    into,
                    card,
                });
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new(MatchSetup::default())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if world.state.is_over() {
                return;
            }
            world.advance(out_events);
        }
        Command::PlayCard { slot, position } => world.play_card(slot, position, out_events),
        Command::Deploy {
            card,
            level,
            side,
            position,
        } => world.deploy_for(card, level, side, position, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use crown_arena_core::{
        ArenaSnapshot, Catalog, EntityKind, EntitySnapshot, MatchPhase, MatchSetup, MatchStatus,
        Side, Visual,
    };

    use super::{combatant::Combatant, World};

    /// Number of ticks simulated so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Current match phase.
    #[must_use]
    pub fn phase(world: &World) -> MatchPhase {
        world.state.phase()
    }

    /// Player elixir.
    #[must_use]
    pub fn elixir(world: &World) -> f32 {
        world.state.elixir().amount()
    }

    /// Card table used by the world.
    #[must_use]
    pub fn catalog(world: &World) -> &Catalog {
        &world.catalog
    }

    /// Setup the match was created from.
    #[must_use]
    pub fn setup(world: &World) -> &MatchSetup {
        &world.setup
    }

    /// Number of living troops owned by `side`.
    #[must_use]
    pub fn live_troops(world: &World, side: Side) -> usize {
        world.field.live_troops(side)
    }

    /// Summary of the match state machine and the player's hand.
    #[must_use]
    pub fn match_status(world: &World) -> MatchStatus {
        MatchStatus {
            tick: world.tick,
            phase: world.state.phase(),
            seconds_remaining: world.state.seconds_remaining(),
            elixir: world.state.elixir().amount(),
            elixir_multiplier: world.state.multiplier(),
            crowns: world.state.crowns(),
            hand: world.hand.slots(),
            next_card: world.hand.next_card(),
            banner: world.state.banner(),
            winner: world.state.winner(),
        }
    }

    /// Captures every live entity and transient effect.
    #[must_use]
    pub fn arena_snapshot(world: &World) -> ArenaSnapshot {
        let mut entities = Vec::new();
        for tower in &world.field.towers {
            entities.push(combatant_snapshot(
                tower,
                EntityKind::Tower,
                Visual::Tower(tower.kind),
                tower.status.is_frozen(),
                tower.status.is_slowed(),
                false,
                tower.is_active(),
            ));
        }
        for building in &world.field.buildings {
            entities.push(combatant_snapshot(
                building,
                EntityKind::Building,
                Visual::Card(building.card),
                building.status.is_frozen(),
                building.status.is_slowed(),
                building.deploying > 0,
                true,
            ));
        }
        for unit in &world.field.units {
            entities.push(combatant_snapshot(
                unit,
                EntityKind::Troop,
                Visual::Card(unit.card),
                unit.status.is_frozen(),
                unit.status.is_slowed(),
                unit.deploying > 0,
                true,
            ));
        }
        entities.extend(world.projectiles.iter().map(|effect| effect.snapshot()));
        entities.extend(
            world
                .spell_projectiles
                .iter()
                .map(|effect| effect.snapshot()),
        );
        entities.extend(world.visuals.iter().map(|effect| effect.snapshot()));
        entities.extend(world.bombs.iter().map(|effect| effect.snapshot()));
        entities.extend(world.areas.iter().map(|effect| effect.snapshot()));
        ArenaSnapshot::from_entities(world.tick, entities)
    }

    fn combatant_snapshot(
        combatant: &dyn Combatant,
        kind: EntityKind,
        visual: Visual,
        frozen: bool,
        slowed: bool,
        deploying: bool,
        active: bool,
    ) -> EntitySnapshot {
        EntitySnapshot {
            id: combatant.id(),
            kind,
            visual,
            side: combatant.side(),
            position: combatant.position(),
            radius: combatant.radius(),
            health: Some(combatant.vitals().snapshot()),
            frozen,
            slowed,
            deploying,
            concealed: combatant.ignores_areas(),
            active,
            fade: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crown_arena_core::{
        CardId, Catalog, CardKind, DeathSpawn, Event, Level, MatchSetup, Position, Side,
        SpawnPattern, TowerKind, TroopStats, TILE_SIZE,
    };
    use crown_arena_system_pathfinding::{has_crossed, Bridge};

    use super::*;

    fn deploy_enemy(world: &mut World, card: CardId, position: Position) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Deploy {
                card,
                level: Level::STANDARD,
                side: Side::Enemy,
                position,
            },
            &mut events,
        );
        events
    }

    /// Ticks the world and fails if a ground troop changes halves away from
    /// a bridge.
    fn run_checking_crossings(world: &mut World, ticks: usize) {
        let mut events = Vec::new();
        for _ in 0..ticks {
            let before: Vec<(EntityId, Position)> = world
                .field
                .units
                .iter()
                .map(|unit| (unit.id, unit.position))
                .collect();
            apply(world, Command::Tick, &mut events);
            for unit in world.field.units.iter().filter(|unit| !unit.stats.flying) {
                let Some((_, previous)) = before.iter().find(|(id, _)| *id == unit.id) else {
                    continue;
                };
                if has_crossed(unit.side, previous.x) == has_crossed(unit.side, unit.position.x) {
                    continue;
                }
                let on_bridge = Bridge::ALL
                    .iter()
                    .any(|bridge| (bridge.position().y - unit.position.y).abs() <= TILE_SIZE);
                assert!(
                    on_bridge,
                    "{:?} crossed at {:?}",
                    unit.card, unit.position
                );
            }
        }
    }

    fn world_with_fragile_golem() -> World {
        let standard = Catalog::standard();
        let definitions = standard.iter().cloned().map(|mut definition| {
            if definition.id == CardId::Golem {
                definition.kind = CardKind::Troop(TroopStats {
                    hitpoints: 100.0,
                    size: 40.0,
                    death_spawn: Some(DeathSpawn {
                        card: CardId::Golemite,
                        pattern: SpawnPattern::Flanks,
                    }),
                    ..TroopStats::default()
                });
            }
            definition
        });
        let catalog = Catalog::from_definitions(definitions).expect("valid catalog");
        World::with_catalog(catalog, MatchSetup::default())
    }

    #[test]
    fn new_world_raises_six_crown_towers() {
        let world = World::default();
        assert_eq!(world.field.towers.len(), 6);
        let kings = world
            .field
            .towers
            .iter()
            .filter(|tower| tower.kind == TowerKind::King)
            .count();
        assert_eq!(kings, 2);
        assert!(world
            .field
            .towers
            .iter()
            .all(|tower| tower.is_active() == (tower.kind == TowerKind::Princess)));
    }

    #[test]
    fn fourth_hit_kills_and_spawns_at_the_last_position() {
        let mut world = world_with_fragile_golem();
        let position = Position::new(200.0, 150.0);
        let id = world
            .spawn_entity(CardId::Golem, Side::Player, Level::MIN, position, 0)
            .expect("golem is a troop");

        let mut events = Vec::new();
        for _ in 0..3 {
            world.field.units[0].take_damage(30.0);
            world.reap(&mut events);
        }
        assert_eq!(world.field.units[0].vitals.hitpoints(), 10.0);
        assert!(events.is_empty());

        world.field.units[0].take_damage(30.0);
        world.reap(&mut events);

        assert!(world.field.units.iter().all(|unit| unit.id != id));
        assert!(events.contains(&Event::EntityDestroyed {
            entity: id,
            side: Side::Player,
        }));
        let golemites: Vec<_> = world
            .field
            .units
            .iter()
            .filter(|unit| unit.card == CardId::Golemite)
            .map(|unit| unit.position)
            .collect();
        assert_eq!(
            golemites,
            vec![Position::new(190.0, 150.0), Position::new(210.0, 150.0)]
        );
    }

    #[test]
    fn broken_shields_transform_into_the_configured_card() {
        let mut world = World::default();
        let cart = world
            .spawn_entity(
                CardId::CannonCart,
                Side::Enemy,
                Level::MIN,
                Position::new(400.0, 100.0),
                0,
            )
            .expect("cannon cart is a troop");
        let shield = world.field.units[0].vitals.shield();
        world.field.units[0].take_damage(shield);
        let mut events = Vec::new();
        world.reap(&mut events);

        assert!(world.field.units.is_empty());
        assert_eq!(world.field.buildings.len(), 1);
        assert_eq!(world.field.buildings[0].card, CardId::BrokenCannon);
        assert!(matches!(
            events.as_slice(),
            [Event::EntityTransformed { from, card: CardId::BrokenCannon, .. }] if *from == cart
        ));
    }

    #[test]
    fn destroyed_princess_wakes_the_king_and_scores() {
        let mut world = World::default();
        let princess = world
            .field
            .towers
            .iter()
            .position(|tower| tower.side == Side::Enemy && tower.kind == TowerKind::Princess)
            .expect("enemy princess");
        world.field.towers[princess].vitals.kill();
        let mut events = Vec::new();
        world.reap(&mut events);

        assert_eq!(world.state.crowns().player, 1);
        assert!(events.contains(&Event::KingTowerActivated { side: Side::Enemy }));
        assert!(world
            .field
            .king_mut(Side::Enemy)
            .is_some_and(|king| king.is_active()));
    }

    #[test]
    fn death_bombs_are_dropped_where_the_carrier_fell() {
        let mut world = World::default();
        let position = Position::new(250.0, 100.0);
        let _ = world.spawn_entity(CardId::GiantSkeleton, Side::Player, Level::MIN, position, 0);
        world.field.units[0].vitals.kill();
        let mut events = Vec::new();
        world.reap(&mut events);

        assert_eq!(world.bombs.len(), 1);
        assert_eq!(world.bombs[0].position, position);
        assert_eq!(world.bombs[0].fuse, 180);
    }

    #[test]
    fn formations_deployed_at_the_river_stay_on_their_bank() {
        let mut world = World::default();
        let events = deploy_enemy(&mut world, CardId::Barbarians, Position::new(310.0, 150.0));
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::CardDeployed { .. })));
        assert_eq!(world.field.units.len(), 5);
        assert!(world
            .field
            .units
            .iter()
            .all(|unit| Side::Enemy.owns_x(unit.position.x)));

        run_checking_crossings(&mut world, 600);
    }

    #[test]
    fn witch_spawns_at_the_river_stay_on_their_bank() {
        let mut world = World::default();
        let _ = deploy_enemy(&mut world, CardId::Witch, Position::new(310.0, 150.0));
        let deploy_ticks = world.field.units[0].deploying as usize;
        let mut events = Vec::new();
        for _ in 0..=deploy_ticks {
            apply(&mut world, Command::Tick, &mut events);
        }
        let skeletons: Vec<Position> = world
            .field
            .units
            .iter()
            .filter(|unit| unit.card == CardId::Skeletons)
            .map(|unit| unit.position)
            .collect();
        assert_eq!(skeletons.len(), 4);
        assert!(skeletons
            .iter()
            .all(|position| Side::Enemy.owns_x(position.x)));

        run_checking_crossings(&mut world, 300);
    }

    #[test]
    fn destroyed_tombstones_release_skeletons() {
        let mut world = World::default();
        let tombstone = world
            .spawn_entity(
                CardId::Tombstone,
                Side::Player,
                Level::MIN,
                Position::new(150.0, 150.0),
                0,
            )
            .expect("tombstone is a building");
        world.field.buildings[0].vitals.kill();
        let mut events = Vec::new();
        world.reap(&mut events);

        assert!(world.field.buildings.is_empty());
        assert!(events.contains(&Event::EntityDestroyed {
            entity: tombstone,
            side: Side::Player,
        }));
        let spawned = events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    Event::EntitySpawned {
                        card: CardId::Skeletons,
                        side: Side::Player,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(spawned, 4);
        let positions: Vec<Position> = world.field.units.iter().map(|unit| unit.position).collect();
        assert!(positions.contains(&Position::new(150.0, 110.0)));
        assert!(positions.contains(&Position::new(190.0, 150.0)));
    }
}
