use std::collections::BTreeMap;

use crown_arena_core::{
    CardId, Command, EntityId, EntityKind, Level, Position, Side, Visual, CENTERLINE_X,
};
use crown_arena_system_pathfinding::Bridge;
use crown_arena_world::{self as world, query, World};

const BRIDGE_TOLERANCE: f32 = 3.0;

/// Deploys `card` for the enemy and records every point where one of its
/// troops crossed the centreline.
fn river_crossings(card: CardId, position: Position, ticks: u32) -> Vec<Position> {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Deploy {
            card,
            level: Level::STANDARD,
            side: Side::Enemy,
            position,
        },
        &mut events,
    );

    let mut last_seen: BTreeMap<EntityId, Position> = BTreeMap::new();
    let mut crossings = Vec::new();
    for _ in 0..ticks {
        world::apply(&mut world, Command::Tick, &mut events);
        for entity in query::arena_snapshot(&world).iter() {
            if entity.kind != EntityKind::Troop || entity.visual != Visual::Card(card) {
                continue;
            }
            if let Some(previous) = last_seen.insert(entity.id, entity.position) {
                let crossed = (previous.x - CENTERLINE_X).signum()
                    != (entity.position.x - CENTERLINE_X).signum();
                if crossed {
                    crossings.push(entity.position);
                }
            }
        }
    }
    crossings
}

fn near_a_bridge(position: Position) -> bool {
    Bridge::ALL
        .into_iter()
        .any(|bridge| (position.y - bridge.position().y).abs() <= BRIDGE_TOLERANCE)
}

#[test]
fn ground_troops_cross_only_at_the_bridges() {
    let crossings = river_crossings(CardId::Knight, Position::new(500.0, 150.0), 600);
    assert!(!crossings.is_empty(), "knight never reached the river");
    assert!(
        crossings.iter().all(|position| near_a_bridge(*position)),
        "crossed away from a bridge: {crossings:?}"
    );
}

#[test]
fn formations_share_the_nearest_bridge() {
    let crossings = river_crossings(CardId::Barbarians, Position::new(450.0, 230.0), 600);
    assert!(!crossings.is_empty(), "barbarians never reached the river");
    assert!(crossings
        .iter()
        .all(|position| (position.y - Bridge::Bottom.position().y).abs() <= BRIDGE_TOLERANCE));
}

#[test]
fn formations_at_the_river_edge_still_use_the_bridges() {
    let crossings = river_crossings(CardId::Barbarians, Position::new(310.0, 150.0), 600);
    assert!(!crossings.is_empty(), "barbarians never crossed");
    assert!(
        crossings.iter().all(|position| near_a_bridge(*position)),
        "crossed away from a bridge: {crossings:?}"
    );
}

#[test]
fn flying_troops_cross_wherever_their_target_lies() {
    let crossings = river_crossings(CardId::Minions, Position::new(500.0, 150.0), 600);
    assert!(!crossings.is_empty(), "minions never reached the river");
    assert!(crossings.iter().any(|position| !near_a_bridge(*position)));
}
