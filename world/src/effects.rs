//! Short-lived effects: attack projectiles, travelling spells, lingering
//! areas, death bombs and blast markers.

use std::collections::BTreeSet;

use crown_arena_core::{
    CardId, EntityId, EntityKind, EntitySnapshot, HitEffects, Position, Side, SpellStats, Visual,
};

/// Distance an attack projectile covers per tick.
pub(crate) const PROJECTILE_SPEED: f32 = 10.0;

/// Ticks a blast marker stays visible.
pub(crate) const VISUAL_TICKS: u32 = 30;

/// Damage and side effects carried by an attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Strike {
    pub(crate) damage: f32,
    pub(crate) splash: Option<f32>,
    pub(crate) effects: HitEffects,
    pub(crate) hits_air: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Flight {
    /// Follows a target and strikes it on contact.
    Homing { target: EntityId },
    /// Travels in a straight line, striking each enemy it passes once.
    Linear {
        heading: Position,
        remaining: f32,
        radius: f32,
        struck: BTreeSet<EntityId>,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: EntityId,
    pub(crate) side: Side,
    pub(crate) position: Position,
    pub(crate) flight: Flight,
    pub(crate) strike: Strike,
}

impl Projectile {
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        let (visual, radius) = match &self.flight {
            Flight::Homing { .. } => (Visual::Bolt, 3.0),
            Flight::Linear { radius, .. } => (Visual::Boulder, *radius),
        };
        effect_snapshot(
            self.id,
            EntityKind::Projectile,
            visual,
            self.side,
            self.position,
            radius,
            None,
        )
    }
}

/// Spell flying from its caster's king tower to the target point.
#[derive(Clone, Debug)]
pub(crate) struct SpellProjectile {
    pub(crate) id: EntityId,
    pub(crate) side: Side,
    pub(crate) card: CardId,
    pub(crate) position: Position,
    pub(crate) destination: Position,
    pub(crate) speed: f32,
    pub(crate) stats: SpellStats,
}

impl SpellProjectile {
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        effect_snapshot(
            self.id,
            EntityKind::SpellProjectile,
            Visual::Card(self.card),
            self.side,
            self.position,
            8.0,
            None,
        )
    }
}

/// Area that damages everything inside it once per tick.
#[derive(Clone, Debug)]
pub(crate) struct LingeringArea {
    pub(crate) id: EntityId,
    pub(crate) side: Side,
    pub(crate) card: CardId,
    pub(crate) position: Position,
    pub(crate) radius: f32,
    pub(crate) remaining: u32,
    pub(crate) duration: u32,
    pub(crate) troop_damage: f32,
    pub(crate) structure_damage: f32,
}

impl LingeringArea {
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        effect_snapshot(
            self.id,
            EntityKind::LingeringSpell,
            Visual::Card(self.card),
            self.side,
            self.position,
            self.radius,
            Some(ratio(self.remaining, self.duration)),
        )
    }
}

/// Bomb left behind by a dying troop.
#[derive(Clone, Debug)]
pub(crate) struct DeathBomb {
    pub(crate) id: EntityId,
    pub(crate) side: Side,
    pub(crate) position: Position,
    pub(crate) fuse: u32,
    pub(crate) fuse_total: u32,
    pub(crate) damage: f32,
    pub(crate) radius: f32,
}

impl DeathBomb {
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        effect_snapshot(
            self.id,
            EntityKind::DeathBomb,
            Visual::Bomb,
            self.side,
            self.position,
            self.radius,
            Some(ratio(self.fuse, self.fuse_total)),
        )
    }
}

/// Blast marker shown where an area effect resolved.
#[derive(Clone, Debug)]
pub(crate) struct SpellVisual {
    pub(crate) id: EntityId,
    pub(crate) side: Side,
    pub(crate) position: Position,
    pub(crate) radius: f32,
    pub(crate) remaining: u32,
}

impl SpellVisual {
    pub(crate) fn snapshot(&self) -> EntitySnapshot {
        effect_snapshot(
            self.id,
            EntityKind::SpellVisual,
            Visual::Blast,
            self.side,
            self.position,
            self.radius,
            Some(ratio(self.remaining, VISUAL_TICKS)),
        )
    }
}

fn ratio(remaining: u32, total: u32) -> f32 {
    if total == 0 {
        0.0
    } else {
        remaining as f32 / total as f32
    }
}

fn effect_snapshot(
    id: EntityId,
    kind: EntityKind,
    visual: Visual,
    side: Side,
    position: Position,
    radius: f32,
    fade: Option<f32>,
) -> EntitySnapshot {
    EntitySnapshot {
        id,
        kind,
        visual,
        side,
        position,
        radius,
        health: None,
        frozen: false,
        slowed: false,
        deploying: false,
        concealed: false,
        active: true,
        fade,
    }
}
