//! Per-tick stages for towers, buildings, troops and transient effects.

use crown_arena_core::{
    AttackStyle, EntityId, Event, HitEffects, Position, Side, TargetPreference, TICKS_PER_SECOND,
};
use crown_arena_system_pathfinding::{advance, direction, step_towards, Mover};
use crown_arena_system_targeting::{nearest, retains, Candidate, Scope, Seeker};
use tracing::{debug, trace};

use crate::{
    arena::clamp_to_field,
    combatant::Combatant,
    effects::{Flight, Projectile, Strike, PROJECTILE_SPEED},
    spells::{afflict, apply_area, AreaEffect},
    World,
};

fn interval_ticks(seconds: f32) -> f32 {
    seconds * TICKS_PER_SECOND as f32
}

/// Keeps a still-valid target or searches for the nearest eligible one.
fn reacquire(
    current: Option<EntityId>,
    seeker: &Seeker,
    candidates: &[Candidate],
) -> Option<EntityId> {
    current
        .filter(|target| retains(seeker, *target, candidates))
        .or_else(|| nearest(seeker, candidates))
}

impl World {
    pub(crate) fn update_towers(&mut self) {
        let candidates = self.field.candidates();
        let mut shots = Vec::new();
        for tower in &mut self.field.towers {
            if !tower.is_active() {
                continue;
            }
            let Some(slowed) = tower.status.advance() else {
                continue;
            };
            tower.cooldown.advance(slowed);
            let seeker = Seeker {
                side: tower.side,
                position: tower.position,
                targets_air: true,
                scope: Scope::TroopsOnly,
                range: Some(tower.stats.range),
            };
            tower.target = reacquire(tower.target, &seeker, &candidates);
            let Some(target) = tower.target else {
                continue;
            };
            if !tower.cooldown.is_ready() {
                continue;
            }
            tower
                .cooldown
                .restart(interval_ticks(tower.stats.attack_interval));
            let strike = Strike {
                damage: tower.stats.damage,
                splash: None,
                effects: HitEffects::default(),
                hits_air: true,
            };
            shots.push((tower.side, tower.position, target, strike));
        }
        for (side, position, target, strike) in shots {
            self.launch_homing(side, position, target, strike);
        }
    }

    pub(crate) fn update_buildings(&mut self, out_events: &mut Vec<Event>) {
        let count = self.field.buildings.len();
        for index in 0..count {
            self.update_building(index, out_events);
        }
    }

    fn update_building(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let building = &mut self.field.buildings[index];
        if building.deploying > 0 {
            building.deploying -= 1;
            return;
        }
        let Some(slowed) = building.status.advance() else {
            return;
        };
        let decay = building.decay_per_tick();
        building.vitals.drain(decay);
        if !building.is_alive() {
            return;
        }
        building.attack.advance(slowed);

        if let Some(spawn) = building.stats.periodic_spawn {
            building.spawn.advance(slowed);
            if building.spawn.is_ready() {
                building.spawn.restart(spawn.interval_ticks as f32);
                let origin = (building.position, building.stats.size);
                let (side, level) = (building.side, building.level);
                self.spawn_pattern(spawn.card, spawn.pattern, side, level, origin, out_events);
            }
        }

        let Some(turret) = self.field.buildings[index].stats.turret else {
            return;
        };
        let candidates = self.field.candidates();
        let building = &mut self.field.buildings[index];
        let seeker = Seeker {
            side: building.side,
            position: building.position,
            targets_air: turret.targets_air,
            scope: Scope::TroopsOnly,
            range: Some(turret.range),
        };
        building.target = reacquire(building.target, &seeker, &candidates);
        let Some(target) = building.target else {
            return;
        };
        if !building.attack.is_ready() {
            return;
        }
        building.attack.restart(interval_ticks(turret.attack_interval));
        let strike = Strike {
            damage: turret.damage,
            splash: None,
            effects: HitEffects::default(),
            hits_air: turret.targets_air,
        };
        let (side, position) = (building.side, building.position);
        self.launch_homing(side, position, target, strike);
    }

    pub(crate) fn update_units(&mut self, out_events: &mut Vec<Event>) {
        let count = self.field.units.len();
        for index in 0..count {
            self.update_unit(index, out_events);
        }
    }

    fn update_unit(&mut self, index: usize, out_events: &mut Vec<Event>) {
        let unit = &mut self.field.units[index];
        if !unit.is_alive() {
            return;
        }
        if unit.deploying > 0 {
            unit.deploying -= 1;
            return;
        }
        let Some(slowed) = unit.status.advance() else {
            return;
        };
        unit.attack.advance(slowed);

        if let Some(spawn) = unit.stats.periodic_spawn {
            unit.spawn.advance(slowed);
            if unit.spawn.is_ready() {
                unit.spawn.restart(spawn.interval_ticks as f32);
                let origin = (unit.position, unit.stats.size);
                let (side, level) = (unit.side, unit.level);
                self.spawn_pattern(spawn.card, spawn.pattern, side, level, origin, out_events);
            }
        }

        let candidates = self.field.candidates();
        let unit = &mut self.field.units[index];
        let seeker = Seeker {
            side: unit.side,
            position: unit.position,
            targets_air: unit.stats.targets_air,
            scope: match unit.stats.target_preference {
                TargetPreference::Any => Scope::Everything,
                TargetPreference::Buildings => Scope::StructuresOnly,
            },
            range: None,
        };
        unit.target = reacquire(unit.target, &seeker, &candidates);
        let Some(target) = unit
            .target
            .and_then(|id| candidates.iter().find(|candidate| candidate.id == id))
        else {
            return;
        };

        let reach = unit.radius() + target.radius + unit.stats.range;
        if unit.position.distance(target.position) <= reach {
            unit.burrowed = false;
            if unit.attack.is_ready() {
                unit.attack.restart(interval_ticks(unit.stats.attack_interval));
                let target = *target;
                self.unit_attack(index, &target);
            }
        } else {
            let mover = Mover {
                position: unit.position,
                speed: unit.stats.speed,
                flying: unit.stats.flying,
                burrowed: unit.burrowed,
                slowed,
            };
            unit.position = clamp_to_field(step_towards(&mover, unit.side, target.position));
        }
    }

    fn unit_attack(&mut self, index: usize, target: &Candidate) {
        let unit = &self.field.units[index];
        let (side, position, stats) = (unit.side, unit.position, unit.stats);
        trace!(attacker = unit.id.get(), target = target.id.get(), "troop attacks");
        let strike = Strike {
            damage: stats.damage,
            splash: stats.splash_radius,
            effects: stats.on_hit,
            hits_air: stats.targets_air,
        };
        match stats.attack {
            AttackStyle::Melee => match strike.splash {
                Some(radius) => {
                    let _ = apply_area(
                        &mut self.field,
                        &AreaEffect::splash(&strike, position, radius, side),
                    );
                }
                None => self.strike_directly(target.id, &strike),
            },
            AttackStyle::Projectile => self.launch_homing(side, position, target.id, strike),
            AttackStyle::Piercing { travel, radius } => {
                let id = self.allocate_id();
                self.projectiles.push(Projectile {
                    id,
                    side,
                    position,
                    flight: Flight::Linear {
                        heading: direction(position, target.position),
                        remaining: travel,
                        radius,
                        struck: Default::default(),
                    },
                    strike,
                });
            }
        }
        if stats.self_destructs {
            self.field.units[index].vitals.kill();
        }
    }

    fn strike_directly(&mut self, target: EntityId, strike: &Strike) {
        if let Some(victim) = self.field.combatant_mut(target) {
            victim.take_damage(strike.damage);
            afflict(victim, &strike.effects);
        }
    }

    fn launch_homing(&mut self, side: Side, position: Position, target: EntityId, strike: Strike) {
        let id = self.allocate_id();
        self.projectiles.push(Projectile {
            id,
            side,
            position,
            flight: Flight::Homing { target },
            strike,
        });
    }

    pub(crate) fn update_projectiles(&mut self) {
        let mut projectiles = std::mem::take(&mut self.projectiles);
        projectiles.retain_mut(|projectile| self.fly(projectile));
        self.projectiles = projectiles;
    }

    /// Moves a projectile one tick and resolves hits. Returns whether it
    /// stays in flight.
    fn fly(&mut self, projectile: &mut Projectile) -> bool {
        let strike = projectile.strike;
        let side = projectile.side;
        match &mut projectile.flight {
            Flight::Homing { target } => {
                let target = *target;
                let Some(candidate) = self
                    .field
                    .candidate(target)
                    .filter(|candidate| candidate.alive)
                else {
                    return false;
                };
                if projectile.position.distance(candidate.position) < PROJECTILE_SPEED {
                    match strike.splash {
                        Some(radius) => {
                            let _ = apply_area(
                                &mut self.field,
                                &AreaEffect::splash(&strike, candidate.position, radius, side),
                            );
                        }
                        None => self.strike_directly(target, &strike),
                    }
                    return false;
                }
                projectile.position =
                    advance(projectile.position, candidate.position, PROJECTILE_SPEED);
                true
            }
            Flight::Linear {
                heading,
                remaining,
                radius,
                struck,
            } => {
                let step = PROJECTILE_SPEED.min(*remaining);
                projectile.position = Position::new(
                    projectile.position.x + heading.x * step,
                    projectile.position.y + heading.y * step,
                );
                *remaining -= step;
                let position = projectile.position;
                for combatant in self.field.combatants_mut() {
                    if combatant.side() == side
                        || !combatant.is_alive()
                        || combatant.ignores_areas()
                        || struck.contains(&combatant.id())
                    {
                        continue;
                    }
                    if combatant.is_flying() && !strike.hits_air {
                        continue;
                    }
                    if position.distance(combatant.position()) > *radius + combatant.radius() {
                        continue;
                    }
                    let _ = struck.insert(combatant.id());
                    combatant.take_damage(strike.damage);
                    afflict(combatant, &strike.effects);
                }
                *remaining > 0.0 && position.is_on_field()
            }
        }
    }

    pub(crate) fn update_spell_projectiles(&mut self) {
        let mut landed = Vec::new();
        self.spell_projectiles.retain_mut(|spell| {
            if spell.position.distance(spell.destination) <= spell.speed {
                landed.push(spell.clone());
                false
            } else {
                spell.position = advance(spell.position, spell.destination, spell.speed);
                true
            }
        });
        for spell in landed {
            let effect = AreaEffect::spell(&spell.stats, spell.destination, spell.side);
            let affected = apply_area(&mut self.field, &effect);
            debug!(card = ?spell.card, affected, "spell landed");
            self.show_blast(spell.side, spell.destination, spell.stats.radius);
        }
    }

    pub(crate) fn update_visuals(&mut self) {
        for visual in &mut self.visuals {
            visual.remaining = visual.remaining.saturating_sub(1);
        }
        self.visuals.retain(|visual| visual.remaining > 0);
    }

    pub(crate) fn update_bombs(&mut self) {
        let mut detonated = Vec::new();
        self.bombs.retain_mut(|bomb| {
            bomb.fuse = bomb.fuse.saturating_sub(1);
            if bomb.fuse == 0 {
                detonated.push(bomb.clone());
                false
            } else {
                true
            }
        });
        for bomb in detonated {
            let effect = AreaEffect::blast(bomb.position, bomb.radius, bomb.side, bomb.damage);
            let affected = apply_area(&mut self.field, &effect);
            debug!(bomb = bomb.id.get(), affected, "death bomb exploded");
            self.show_blast(bomb.side, bomb.position, bomb.radius);
        }
    }

    /// Damages everything inside each lingering area, then counts it down.
    ///
    /// Damage is applied before the countdown, so an area lasting `duration`
    /// ticks hurts on all `duration` of them rather than `duration - 1`.
    pub(crate) fn update_areas(&mut self) {
        for area in &mut self.areas {
            if area.remaining == 0 {
                continue;
            }
            let effect = AreaEffect::lingering(
                area.position,
                area.radius,
                area.side,
                area.troop_damage,
                area.structure_damage,
            );
            let _ = apply_area(&mut self.field, &effect);
            area.remaining -= 1;
        }
        self.areas.retain(|area| area.remaining > 0);
    }
}
