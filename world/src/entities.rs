//! Towers, buildings and troops.

use crown_arena_core::{
    BuildingStats, CardId, CrownTowerStats, EntityId, Level, Position, Side, TowerKind,
    TroopStats,
};

use crate::combatant::{knocked_back, Combatant, Cooldown, Status, Vitals};

/// Crown tower defending one side.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    pub(crate) id: EntityId,
    pub(crate) side: Side,
    pub(crate) kind: TowerKind,
    pub(crate) position: Position,
    pub(crate) stats: CrownTowerStats,
    pub(crate) vitals: Vitals,
    pub(crate) status: Status,
    pub(crate) target: Option<EntityId>,
    pub(crate) cooldown: Cooldown,
    active: bool,
    announced: bool,
}

impl Tower {
    pub(crate) fn new(
        id: EntityId,
        side: Side,
        kind: TowerKind,
        position: Position,
        stats: CrownTowerStats,
    ) -> Self {
        Self {
            id,
            side,
            kind,
            position,
            stats,
            vitals: Vitals::new(stats.hitpoints, None),
            status: Status::default(),
            target: None,
            cooldown: Cooldown::ready(),
            active: kind == TowerKind::Princess,
            announced: kind == TowerKind::Princess,
        }
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.active
    }

    /// Wakes the tower. Activation is permanent.
    pub(crate) fn activate(&mut self) {
        self.active = true;
    }

    /// Reports a fresh activation exactly once.
    pub(crate) fn take_activation_notice(&mut self) -> bool {
        if self.active && !self.announced {
            self.announced = true;
            true
        } else {
            false
        }
    }
}

impl Combatant for Tower {
    fn id(&self) -> EntityId {
        self.id
    }

    fn side(&self) -> Side {
        self.side
    }

    fn position(&self) -> Position {
        self.position
    }

    fn radius(&self) -> f32 {
        self.stats.width / 2.0
    }

    fn is_structure(&self) -> bool {
        true
    }

    fn is_tower(&self) -> bool {
        true
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    fn is_targetable(&self) -> bool {
        true
    }

    fn damaged(&mut self) {
        self.activate();
    }
}

/// Deployed building.
#[derive(Clone, Debug)]
pub(crate) struct Building {
    pub(crate) id: EntityId,
    pub(crate) card: CardId,
    pub(crate) side: Side,
    pub(crate) level: Level,
    pub(crate) position: Position,
    pub(crate) stats: BuildingStats,
    pub(crate) vitals: Vitals,
    pub(crate) status: Status,
    pub(crate) deploying: u32,
    pub(crate) target: Option<EntityId>,
    pub(crate) attack: Cooldown,
    pub(crate) spawn: Cooldown,
}

impl Building {
    pub(crate) fn new(
        id: EntityId,
        card: CardId,
        side: Side,
        level: Level,
        position: Position,
        stats: BuildingStats,
        deploy_ticks: u32,
    ) -> Self {
        Self {
            id,
            card,
            side,
            level,
            position,
            stats,
            vitals: Vitals::new(stats.hitpoints, None),
            status: Status::default(),
            deploying: deploy_ticks,
            target: None,
            attack: Cooldown::ready(),
            spawn: Cooldown::ready(),
        }
    }

    /// Hit points lost to lifetime decay each active tick.
    pub(crate) fn decay_per_tick(&self) -> f32 {
        if self.stats.lifetime_ticks == 0 {
            0.0
        } else {
            self.vitals.max_hitpoints() / self.stats.lifetime_ticks as f32
        }
    }
}

impl Combatant for Building {
    fn id(&self) -> EntityId {
        self.id
    }

    fn side(&self) -> Side {
        self.side
    }

    fn position(&self) -> Position {
        self.position
    }

    fn radius(&self) -> f32 {
        self.stats.size / 2.0
    }

    fn is_structure(&self) -> bool {
        true
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    fn is_targetable(&self) -> bool {
        self.deploying == 0
    }
}

/// Troop on the battlefield.
#[derive(Clone, Debug)]
pub(crate) struct Unit {
    pub(crate) id: EntityId,
    pub(crate) card: CardId,
    pub(crate) side: Side,
    pub(crate) level: Level,
    pub(crate) position: Position,
    pub(crate) stats: TroopStats,
    pub(crate) vitals: Vitals,
    pub(crate) status: Status,
    pub(crate) deploying: u32,
    pub(crate) target: Option<EntityId>,
    pub(crate) attack: Cooldown,
    pub(crate) spawn: Cooldown,
    pub(crate) burrowed: bool,
}

impl Unit {
    pub(crate) fn new(
        id: EntityId,
        card: CardId,
        side: Side,
        level: Level,
        position: Position,
        stats: TroopStats,
        deploy_ticks: u32,
    ) -> Self {
        Self {
            id,
            card,
            side,
            level,
            position,
            stats,
            vitals: Vitals::new(stats.hitpoints, stats.shield),
            status: Status::default(),
            deploying: deploy_ticks,
            target: None,
            attack: Cooldown::ready(),
            spawn: Cooldown::ready(),
            burrowed: stats.burrows,
        }
    }
}

impl Combatant for Unit {
    fn id(&self) -> EntityId {
        self.id
    }

    fn side(&self) -> Side {
        self.side
    }

    fn position(&self) -> Position {
        self.position
    }

    fn radius(&self) -> f32 {
        self.stats.size / 2.0
    }

    fn is_structure(&self) -> bool {
        false
    }

    fn is_flying(&self) -> bool {
        self.stats.flying
    }

    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }

    fn is_targetable(&self) -> bool {
        self.deploying == 0 && !self.burrowed
    }

    fn ignores_areas(&self) -> bool {
        self.burrowed
    }

    fn knock_back(&mut self, centre: Position, distance: f32) {
        self.position = knocked_back(self.position, centre, distance);
        self.target = None;
    }
}
