//! Battlefield geometry and the collections of live combatants.

use crown_arena_core::{
    EntityId, Position, Side, TowerKind, ARENA_HEIGHT, ARENA_WIDTH, CENTERLINE_X,
    RIVER_HALF_WIDTH,
};
use crown_arena_system_targeting::Candidate;

use crate::{
    combatant::Combatant,
    entities::{Building, Tower, Unit},
};

/// Crown tower centres for one side: king first, then top and bottom
/// princess.
pub(crate) fn tower_layout(side: Side) -> [(TowerKind, Position); 3] {
    let (king_x, princess_x) = match side {
        Side::Player => (30.0, 80.0),
        Side::Enemy => (ARENA_WIDTH - 30.0, ARENA_WIDTH - 80.0),
    };
    [
        (TowerKind::King, Position::new(king_x, ARENA_HEIGHT / 2.0)),
        (TowerKind::Princess, Position::new(princess_x, 75.0)),
        (TowerKind::Princess, Position::new(princess_x, 225.0)),
    ]
}

/// Centre of a side's king tower.
pub(crate) fn king_position(side: Side) -> Position {
    tower_layout(side)[0].1
}

pub(crate) fn clamp_to_field(position: Position) -> Position {
    Position::new(
        position.x.clamp(0.0, ARENA_WIDTH),
        position.y.clamp(0.0, ARENA_HEIGHT),
    )
}

/// Where an entity spawned at `offset` from `origin` is placed.
///
/// Spawns land on the bank holding `origin`, or on `owner`'s bank when the
/// origin is inside the river, so that no offset carries a troop across.
pub(crate) fn spawn_point(origin: Position, offset: Position, owner: Side) -> Position {
    let bank = Side::ALL
        .into_iter()
        .find(|side| side.owns_x(origin.x))
        .unwrap_or(owner);
    let point = clamp_to_field(origin.offset(offset));
    let x = match bank {
        Side::Player => point.x.min(CENTERLINE_X - RIVER_HALF_WIDTH),
        Side::Enemy => point.x.max(CENTERLINE_X + RIVER_HALF_WIDTH),
    };
    Position::new(x, point.y)
}

/// Every tower, building and troop currently on the battlefield.
#[derive(Clone, Debug, Default)]
pub(crate) struct Field {
    pub(crate) towers: Vec<Tower>,
    pub(crate) buildings: Vec<Building>,
    pub(crate) units: Vec<Unit>,
}

impl Field {
    /// Target candidates in search order: troops, towers, buildings.
    pub(crate) fn candidates(&self) -> Vec<Candidate> {
        self.combatants().map(|combatant| combatant.candidate()).collect()
    }

    pub(crate) fn candidate(&self, id: EntityId) -> Option<Candidate> {
        self.combatants()
            .find(|combatant| combatant.id() == id)
            .map(|combatant| combatant.candidate())
    }

    pub(crate) fn combatants(&self) -> impl Iterator<Item = &dyn Combatant> + '_ {
        self.units
            .iter()
            .map(|unit| unit as &dyn Combatant)
            .chain(self.towers.iter().map(|tower| tower as &dyn Combatant))
            .chain(
                self.buildings
                    .iter()
                    .map(|building| building as &dyn Combatant),
            )
    }

    pub(crate) fn combatants_mut(&mut self) -> impl Iterator<Item = &mut dyn Combatant> + '_ {
        self.units
            .iter_mut()
            .map(|unit| unit as &mut dyn Combatant)
            .chain(self.towers.iter_mut().map(|tower| tower as &mut dyn Combatant))
            .chain(
                self.buildings
                    .iter_mut()
                    .map(|building| building as &mut dyn Combatant),
            )
    }

    pub(crate) fn combatant_mut(&mut self, id: EntityId) -> Option<&mut dyn Combatant> {
        self.combatants_mut().find(|combatant| combatant.id() == id)
    }

    pub(crate) fn king_mut(&mut self, side: Side) -> Option<&mut Tower> {
        self.towers
            .iter_mut()
            .find(|tower| tower.side == side && tower.kind == TowerKind::King)
    }

    /// Number of living troops owned by `side`.
    pub(crate) fn live_troops(&self, side: Side) -> usize {
        self.units
            .iter()
            .filter(|unit| unit.side == side && unit.vitals.is_alive())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layouts_mirror_across_the_river() {
        for ((player_kind, player), (enemy_kind, enemy)) in tower_layout(Side::Player)
            .into_iter()
            .zip(tower_layout(Side::Enemy))
        {
            assert_eq!(player_kind, enemy_kind);
            assert_eq!(player.x + enemy.x, ARENA_WIDTH);
            assert_eq!(player.y, enemy.y);
        }
        assert_eq!(king_position(Side::Enemy), Position::new(570.0, 150.0));
    }

    #[test]
    fn clamping_keeps_positions_on_the_field() {
        let clamped = clamp_to_field(Position::new(-5.0, 400.0));
        assert_eq!(clamped, Position::new(0.0, ARENA_HEIGHT));
    }

    #[test]
    fn spawn_offsets_never_reach_into_the_river() {
        let offset = Position::new(-10.0, 10.0);
        let enemy_bank = spawn_point(Position::new(310.0, 150.0), offset, Side::Enemy);
        assert_eq!(enemy_bank, Position::new(310.0, 160.0));

        let crossed = spawn_point(Position::new(320.0, 150.0), offset, Side::Player);
        assert_eq!(crossed, Position::new(310.0, 160.0));

        let mid_river = spawn_point(Position::new(300.0, 85.0), offset, Side::Player);
        assert_eq!(mid_river, Position::new(290.0, 95.0));

        let inland = spawn_point(Position::new(100.0, 150.0), offset, Side::Player);
        assert_eq!(inland, Position::new(90.0, 160.0));
    }
}
