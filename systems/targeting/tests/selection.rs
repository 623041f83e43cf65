use crown_arena_core::{EntityId, Position, Side};
use crown_arena_system_targeting::{nearest, retains, Candidate, Scope, Seeker};

fn candidate(id: u32, side: Side, x: f32, y: f32) -> Candidate {
    Candidate {
        id: EntityId::new(id),
        side,
        position: Position::new(x, y),
        radius: 14.0,
        structure: false,
        flying: false,
        alive: true,
        targetable: true,
    }
}

fn princess_tower() -> Seeker {
    Seeker {
        side: Side::Player,
        position: Position::new(80.0, 75.0),
        targets_air: true,
        scope: Scope::TroopsOnly,
        range: Some(200.0),
    }
}

fn giant() -> Seeker {
    Seeker {
        side: Side::Player,
        position: Position::new(250.0, 85.0),
        targets_air: false,
        scope: Scope::StructuresOnly,
        range: None,
    }
}

#[test]
fn towers_only_consider_troops_inside_their_range() {
    let mut hut = candidate(1, Side::Enemy, 120.0, 75.0);
    hut.structure = true;
    let far = candidate(2, Side::Enemy, 400.0, 75.0);
    let bat = Candidate {
        flying: true,
        ..candidate(3, Side::Enemy, 240.0, 75.0)
    };
    let candidates = [hut, far, bat];

    assert_eq!(
        nearest(&princess_tower(), &candidates),
        Some(EntityId::new(3))
    );
}

#[test]
fn towers_release_targets_that_walk_out_of_range() {
    let knight = candidate(5, Side::Enemy, 200.0, 75.0);
    assert!(retains(&princess_tower(), knight.id, &[knight]));

    let retreated = candidate(5, Side::Enemy, 300.0, 75.0);
    assert!(!retains(&princess_tower(), retreated.id, &[retreated]));
}

#[test]
fn unit_searches_are_not_limited_by_range() {
    let mut king = candidate(9, Side::Enemy, 570.0, 150.0);
    king.structure = true;
    let knight = candidate(4, Side::Enemy, 270.0, 85.0);

    assert_eq!(nearest(&giant(), &[knight, king]), Some(EntityId::new(9)));
    assert!(retains(&giant(), king.id, &[knight, king]));
}

#[test]
fn burrowed_and_deploying_candidates_cannot_be_picked() {
    let miner = Candidate {
        targetable: false,
        ..candidate(1, Side::Enemy, 100.0, 75.0)
    };
    let archer = candidate(2, Side::Enemy, 150.0, 75.0);

    assert_eq!(
        nearest(&princess_tower(), &[miner, archer]),
        Some(EntityId::new(2))
    );
}

#[test]
fn equal_distances_resolve_to_the_earlier_candidate() {
    let top = candidate(7, Side::Enemy, 80.0, 25.0);
    let bottom = candidate(3, Side::Enemy, 80.0, 125.0);

    assert_eq!(
        nearest(&princess_tower(), &[top, bottom]),
        Some(EntityId::new(7))
    );
    assert_eq!(
        nearest(&princess_tower(), &[bottom, top]),
        Some(EntityId::new(3))
    );
}

#[test]
fn friendly_candidates_are_never_chosen() {
    let ally = candidate(1, Side::Player, 90.0, 75.0);
    assert_eq!(nearest(&princess_tower(), &[ally]), None);
    assert!(!retains(&princess_tower(), ally.id, &[ally]));
}
