#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure nearest-eligible target selection.
//!
//! The world describes every combatant as a [`Candidate`] and every searching
//! entity as a [`Seeker`]. Selection is the strict nearest eligible candidate
//! by centre distance; ties keep whichever candidate appears first in the
//! slice, so callers control tie-breaking through iteration order.

use crown_arena_core::{EntityId, Position, Side};

/// Combatant that may be selected as a target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    /// Identifier of the combatant.
    pub id: EntityId,
    /// Owning side.
    pub side: Side,
    /// Centre of the combatant.
    pub position: Position,
    /// Half of the combatant's footprint.
    pub radius: f32,
    /// Whether the combatant is a tower or building.
    pub structure: bool,
    /// Whether the combatant flies.
    pub flying: bool,
    /// Whether the combatant has hit points left.
    pub alive: bool,
    /// Whether searches may select the combatant; false while deploying or
    /// burrowed.
    pub targetable: bool,
}

/// Kinds of combatants a seeker considers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Troops and structures.
    Everything,
    /// Towers and buildings only.
    StructuresOnly,
    /// Troops only.
    TroopsOnly,
}

/// Entity looking for something to attack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Seeker {
    /// Side of the seeker; only the opposing side is eligible.
    pub side: Side,
    /// Centre of the seeker.
    pub position: Position,
    /// Whether flying candidates are eligible.
    pub targets_air: bool,
    /// Kinds of combatants considered.
    pub scope: Scope,
    /// Centre distance a candidate must be strictly within; `None` disables
    /// the range filter.
    pub range: Option<f32>,
}

impl Seeker {
    /// Reports whether `candidate` may be selected, ignoring range.
    #[must_use]
    pub fn accepts(&self, candidate: &Candidate) -> bool {
        if candidate.side == self.side || !candidate.alive || !candidate.targetable {
            return false;
        }
        if candidate.flying && !self.targets_air {
            return false;
        }
        match self.scope {
            Scope::Everything => true,
            Scope::StructuresOnly => candidate.structure,
            Scope::TroopsOnly => !candidate.structure,
        }
    }

    /// Reports whether `candidate` lies inside the seeker's search range.
    #[must_use]
    pub fn reaches(&self, candidate: &Candidate) -> bool {
        self.range
            .map_or(true, |range| self.position.distance(candidate.position) < range)
    }
}

/// Selects the nearest eligible candidate.
#[must_use]
pub fn nearest(seeker: &Seeker, candidates: &[Candidate]) -> Option<EntityId> {
    let mut best: Option<(f32, EntityId)> = None;
    for candidate in candidates {
        if !seeker.accepts(candidate) || !seeker.reaches(candidate) {
            continue;
        }
        let distance = seeker.position.distance(candidate.position);
        match best {
            Some((closest, _)) if distance >= closest => {}
            _ => best = Some((distance, candidate.id)),
        }
    }
    best.map(|(_, id)| id)
}

/// Reports whether a previously chosen target is still worth pursuing.
///
/// The target must still be present, alive and eligible, and inside range for
/// seekers that filter by range.
#[must_use]
pub fn retains(seeker: &Seeker, target: EntityId, candidates: &[Candidate]) -> bool {
    candidates
        .iter()
        .find(|candidate| candidate.id == target)
        .is_some_and(|candidate| {
            candidate.alive && candidate.side != seeker.side && seeker.reaches(candidate)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn troop(id: u32, side: Side, x: f32, y: f32) -> Candidate {
        Candidate {
            id: EntityId::new(id),
            side,
            position: Position::new(x, y),
            radius: 10.0,
            structure: false,
            flying: false,
            alive: true,
            targetable: true,
        }
    }

    fn seeker(scope: Scope) -> Seeker {
        Seeker {
            side: Side::Player,
            position: Position::new(0.0, 0.0),
            targets_air: false,
            scope,
            range: None,
        }
    }

    #[test]
    fn picks_nearest_opponent() {
        let candidates = [
            troop(1, Side::Enemy, 50.0, 0.0),
            troop(2, Side::Player, 5.0, 0.0),
            troop(3, Side::Enemy, 20.0, 0.0),
        ];
        assert_eq!(
            nearest(&seeker(Scope::Everything), &candidates),
            Some(EntityId::new(3))
        );
    }

    #[test]
    fn ties_keep_first_seen() {
        let candidates = [
            troop(9, Side::Enemy, 0.0, 30.0),
            troop(4, Side::Enemy, 30.0, 0.0),
        ];
        assert_eq!(
            nearest(&seeker(Scope::Everything), &candidates),
            Some(EntityId::new(9))
        );
    }

    #[test]
    fn flying_requires_air_targeting() {
        let mut bat = troop(1, Side::Enemy, 10.0, 0.0);
        bat.flying = true;
        let candidates = [bat, troop(2, Side::Enemy, 90.0, 0.0)];
        assert_eq!(
            nearest(&seeker(Scope::Everything), &candidates),
            Some(EntityId::new(2))
        );

        let mut archer = seeker(Scope::Everything);
        archer.targets_air = true;
        assert_eq!(nearest(&archer, &candidates), Some(EntityId::new(1)));
    }

    #[test]
    fn structure_scope_ignores_troops() {
        let mut hut = troop(2, Side::Enemy, 200.0, 0.0);
        hut.structure = true;
        let candidates = [troop(1, Side::Enemy, 10.0, 0.0), hut];
        assert_eq!(
            nearest(&seeker(Scope::StructuresOnly), &candidates),
            Some(EntityId::new(2))
        );
        assert_eq!(
            nearest(&seeker(Scope::TroopsOnly), &candidates),
            Some(EntityId::new(1))
        );
    }

    #[test]
    fn hidden_and_dead_candidates_are_skipped() {
        let mut burrowed = troop(1, Side::Enemy, 5.0, 0.0);
        burrowed.targetable = false;
        let mut dead = troop(2, Side::Enemy, 6.0, 0.0);
        dead.alive = false;
        let candidates = [burrowed, dead];
        assert_eq!(nearest(&seeker(Scope::Everything), &candidates), None);
    }

    #[test]
    fn range_filter_is_strict() {
        let mut tower = seeker(Scope::TroopsOnly);
        tower.range = Some(100.0);
        let candidates = [troop(1, Side::Enemy, 100.0, 0.0)];
        assert_eq!(nearest(&tower, &candidates), None);
        assert!(!retains(&tower, EntityId::new(1), &candidates));

        let candidates = [troop(1, Side::Enemy, 99.0, 0.0)];
        assert_eq!(nearest(&tower, &candidates), Some(EntityId::new(1)));
        assert!(retains(&tower, EntityId::new(1), &candidates));
    }

    #[test]
    fn vanished_targets_are_released() {
        let candidates = [troop(1, Side::Enemy, 10.0, 0.0)];
        assert!(!retains(
            &seeker(Scope::Everything),
            EntityId::new(7),
            &candidates
        ));
    }
}
