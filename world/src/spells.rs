//! Area effect resolution shared by spells, splash attacks and death bombs.

use crown_arena_core::{HitEffects, Position, Side, SpellStats};

use crate::{arena::Field, combatant::Combatant, effects::Strike};

/// Damage dealt by an area effect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum AreaDamage {
    /// No damage; status effects only.
    None,
    /// One-off damage, with a separate amount for crown towers.
    Flat { general: f32, towers: f32 },
    /// Lingering damage with separate rates for troops and structures.
    PerTick { troops: f32, structures: f32 },
}

/// Effect applied to every enemy combatant inside a circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct AreaEffect {
    pub(crate) centre: Position,
    pub(crate) radius: f32,
    /// Side that caused the effect; only its opponents are affected.
    pub(crate) side: Side,
    pub(crate) damage: AreaDamage,
    pub(crate) effects: HitEffects,
    pub(crate) knockback: Option<f32>,
    pub(crate) hits_air: bool,
}

impl AreaEffect {
    /// Impact of a flat-damage spell.
    pub(crate) fn spell(stats: &SpellStats, centre: Position, side: Side) -> Self {
        let damage = match stats.damage {
            Some(general) => AreaDamage::Flat {
                general,
                towers: stats.tower_damage.unwrap_or(general),
            },
            None => AreaDamage::None,
        };
        Self {
            centre,
            radius: stats.radius,
            side,
            damage,
            effects: HitEffects {
                stun_ticks: stats.stun_ticks,
                freeze_ticks: stats.freeze_ticks,
                slow_ticks: 0,
            },
            knockback: stats.knockback,
            hits_air: true,
        }
    }

    /// Splash of an attack landing at `centre`.
    pub(crate) fn splash(strike: &Strike, centre: Position, radius: f32, side: Side) -> Self {
        Self {
            centre,
            radius,
            side,
            damage: AreaDamage::Flat {
                general: strike.damage,
                towers: strike.damage,
            },
            effects: strike.effects,
            knockback: None,
            hits_air: strike.hits_air,
        }
    }

    /// One tick of a lingering area.
    pub(crate) fn lingering(
        centre: Position,
        radius: f32,
        side: Side,
        troops: f32,
        structures: f32,
    ) -> Self {
        Self {
            centre,
            radius,
            side,
            damage: AreaDamage::PerTick { troops, structures },
            effects: HitEffects::default(),
            knockback: None,
            hits_air: true,
        }
    }

    /// Explosion that hurts everything alike.
    pub(crate) fn blast(centre: Position, radius: f32, side: Side, damage: f32) -> Self {
        Self {
            centre,
            radius,
            side,
            damage: AreaDamage::Flat {
                general: damage,
                towers: damage,
            },
            effects: HitEffects::default(),
            knockback: None,
            hits_air: true,
        }
    }

    /// Reports whether the circle reaches a combatant's footprint.
    pub(crate) fn covers(&self, position: Position, radius: f32) -> bool {
        self.centre.distance(position) <= self.radius + radius
    }

    fn damage_for(&self, combatant: &dyn Combatant) -> f32 {
        match self.damage {
            AreaDamage::None => 0.0,
            AreaDamage::Flat { general, towers } => {
                if combatant.is_tower() {
                    towers
                } else {
                    general
                }
            }
            AreaDamage::PerTick { troops, structures } => {
                if combatant.is_structure() {
                    structures
                } else {
                    troops
                }
            }
        }
    }
}

/// Applies status effects carried by a hit.
pub(crate) fn afflict(combatant: &mut dyn Combatant, effects: &HitEffects) {
    if effects.is_empty() {
        return;
    }
    let status = combatant.status_mut();
    status.freeze(effects.stun_ticks.max(effects.freeze_ticks));
    status.slow(effects.slow_ticks);
}

/// Applies `effect` to every qualifying combatant and returns how many were
/// affected.
pub(crate) fn apply_area(field: &mut Field, effect: &AreaEffect) -> usize {
    let mut affected = 0;
    for combatant in field.combatants_mut() {
        if combatant.side() == effect.side || !combatant.is_alive() || combatant.ignores_areas() {
            continue;
        }
        if combatant.is_flying() && !effect.hits_air {
            continue;
        }
        if !effect.covers(combatant.position(), combatant.radius()) {
            continue;
        }
        let damage = effect.damage_for(combatant);
        if damage > 0.0 {
            combatant.take_damage(damage);
        }
        afflict(combatant, &effect.effects);
        if let Some(distance) = effect.knockback {
            combatant.knock_back(effect.centre, distance);
        }
        affected += 1;
    }
    affected
}

#[cfg(test)]
mod tests {
    use crown_arena_core::{Catalog, CardId, CardKind, EntityId, Level, TowerKind, TroopStats};

    use super::*;
    use crate::entities::{Tower, Unit};

    fn dummy(id: u32, side: Side, position: Position, size: f32) -> Unit {
        let stats = TroopStats {
            hitpoints: 1000.0,
            size,
            ..TroopStats::default()
        };
        Unit::new(
            EntityId::new(id),
            CardId::Knight,
            side,
            Level::MIN,
            position,
            stats,
            0,
        )
    }

    fn fireball() -> SpellStats {
        match Catalog::standard().card(CardId::Fireball).kind {
            CardKind::Spell(stats) => stats,
            other => panic!("fireball is a spell, found {other:?}"),
        }
    }

    #[test]
    fn radius_includes_half_of_the_target_size() {
        let mut field = Field::default();
        field
            .units
            .push(dummy(1, Side::Enemy, Position::new(130.0, 100.0), 40.0));
        field
            .units
            .push(dummy(2, Side::Enemy, Position::new(200.0, 100.0), 40.0));
        let effect = AreaEffect::blast(Position::new(100.0, 100.0), 50.0, Side::Player, 10.0);

        assert_eq!(apply_area(&mut field, &effect), 1);
        assert_eq!(field.units[0].vitals.hitpoints(), 990.0);
        assert_eq!(field.units[1].vitals.hitpoints(), 1000.0);
    }

    #[test]
    fn friendly_and_burrowed_combatants_are_spared() {
        let mut field = Field::default();
        field
            .units
            .push(dummy(1, Side::Player, Position::new(100.0, 100.0), 20.0));
        let mut miner = dummy(2, Side::Enemy, Position::new(100.0, 100.0), 20.0);
        miner.burrowed = true;
        field.units.push(miner);
        let effect = AreaEffect::blast(Position::new(100.0, 100.0), 50.0, Side::Player, 10.0);
        assert_eq!(apply_area(&mut field, &effect), 0);
    }

    #[test]
    fn spells_deal_reduced_damage_to_towers_and_wake_kings() {
        let mut field = Field::default();
        let stats = TowerKind::King.base_stats();
        field.towers.push(Tower::new(
            EntityId::new(0),
            Side::Enemy,
            TowerKind::King,
            Position::new(570.0, 150.0),
            stats,
        ));
        field
            .units
            .push(dummy(1, Side::Enemy, Position::new(560.0, 150.0), 20.0));
        let effect = AreaEffect::spell(&fireball(), Position::new(565.0, 150.0), Side::Player);

        assert_eq!(apply_area(&mut field, &effect), 2);
        assert_eq!(field.towers[0].vitals.hitpoints(), stats.hitpoints - 72.0);
        assert!(field.towers[0].is_active());
        assert_eq!(field.units[0].vitals.hitpoints(), 1000.0 - 242.0);
    }

    #[test]
    fn knockback_pushes_troops_and_clears_targets() {
        let mut field = Field::default();
        let mut unit = dummy(1, Side::Enemy, Position::new(130.0, 100.0), 20.0);
        unit.target = Some(EntityId::new(9));
        field.units.push(unit);
        let effect = AreaEffect {
            knockback: Some(30.0),
            ..AreaEffect::blast(Position::new(100.0, 100.0), 40.0, Side::Player, 0.0)
        };

        assert_eq!(apply_area(&mut field, &effect), 1);
        assert!((field.units[0].position.x - 160.0).abs() < 1e-3);
        assert_eq!(field.units[0].target, None);
    }

    #[test]
    fn lingering_damage_favours_structures() {
        let mut field = Field::default();
        field
            .units
            .push(dummy(1, Side::Enemy, Position::new(100.0, 100.0), 20.0));
        field.towers.push(Tower::new(
            EntityId::new(0),
            Side::Enemy,
            TowerKind::Princess,
            Position::new(120.0, 100.0),
            TowerKind::Princess.base_stats(),
        ));
        let effect = AreaEffect::lingering(Position::new(100.0, 100.0), 70.0, Side::Player, 1.0, 4.0);
        assert_eq!(apply_area(&mut field, &effect), 2);
        assert_eq!(field.units[0].vitals.hitpoints(), 999.0);
        assert_eq!(
            field.towers[0].vitals.hitpoints(),
            TowerKind::Princess.base_stats().hitpoints - 4.0
        );
    }

    #[test]
    fn stuns_freeze_their_victims() {
        let mut field = Field::default();
        field
            .units
            .push(dummy(1, Side::Enemy, Position::new(100.0, 100.0), 20.0));
        let effect = AreaEffect {
            effects: HitEffects {
                stun_ticks: 30,
                ..HitEffects::default()
            },
            ..AreaEffect::blast(Position::new(100.0, 100.0), 40.0, Side::Player, 0.0)
        };
        let _ = apply_area(&mut field, &effect);
        assert!(field.units[0].status.is_frozen());
    }
}
