use crown_arena_core::{
    BannerMessage, Command, EntityKind, Event, Level, MatchPhase, MatchSetup, Position, Side,
    TowerKind, Visual,
};
use crown_arena_world::{self as world, query, World};

fn run_ticks(world: &mut World, ticks: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        world::apply(world, Command::Tick, &mut events);
    }
    events
}

fn short_match(match_seconds: u32, overtime_seconds: u32) -> World {
    World::new(MatchSetup {
        match_seconds,
        overtime_seconds,
        ..MatchSetup::default()
    })
}

#[test]
fn elixir_accrues_one_point_every_two_seconds() {
    let mut world = World::default();
    assert_eq!(query::elixir(&world), 5.0);
    let _ = run_ticks(&mut world, 120);
    assert!((query::elixir(&world) - 6.0).abs() < 1e-3);
}

#[test]
fn elixir_stops_at_the_cap() {
    let mut world = World::new(MatchSetup {
        starting_elixir: 9.95,
        ..MatchSetup::default()
    });
    let _ = run_ticks(&mut world, 10);
    assert_eq!(query::elixir(&world), 10.0);
}

#[test]
fn tied_crowns_at_time_up_trigger_overtime_once() {
    let mut world = short_match(2, 2);
    let events = run_ticks(&mut world, 120);

    let overtime_changes = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::PhaseChanged {
                    phase: MatchPhase::Overtime
                }
            )
        })
        .count();
    assert_eq!(overtime_changes, 1);
    let status = query::match_status(&world);
    assert_eq!(status.phase, MatchPhase::Overtime);
    assert_eq!(status.elixir_multiplier, 3);
    assert_eq!(
        status.banner.map(|banner| banner.message),
        Some(BannerMessage::Overtime)
    );

    let events = run_ticks(&mut world, 60);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::PhaseChanged { .. })));
}

#[test]
fn expired_overtime_ends_in_a_draw_without_reward() {
    let mut world = short_match(1, 1);
    let events = run_ticks(&mut world, 120);

    let endings: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            Event::MatchEnded { winner, reward, .. } => Some((*winner, *reward)),
            _ => None,
        })
        .collect();
    assert_eq!(endings, vec![(None, 0)]);
    assert_eq!(query::phase(&world), MatchPhase::Ended);

    let tick = query::tick(&world);
    assert!(run_ticks(&mut world, 10).is_empty());
    assert_eq!(query::tick(&world), tick);
}

#[test]
fn damaged_king_towers_stay_active() {
    let mut world = World::default();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::Deploy {
            card: crown_arena_core::CardId::Zap,
            level: Level::STANDARD,
            side: Side::Enemy,
            position: Position::new(30.0, 150.0),
        },
        &mut events,
    );
    events.extend(run_ticks(&mut world, 1));
    assert!(events.contains(&Event::KingTowerActivated { side: Side::Player }));

    let _ = run_ticks(&mut world, 300);
    let king = query::arena_snapshot(&world)
        .into_vec()
        .into_iter()
        .find(|entity| entity.visual == Visual::Tower(TowerKind::King) && entity.side == Side::Player)
        .expect("player king stands");
    assert!(king.active);
    assert!(king.health.is_some_and(|health| health.hitpoint_ratio < 1.0));
}

#[test]
fn rockets_topple_a_princess_tower_and_score_a_crown() {
    let mut world = World::default();
    let mut events = Vec::new();
    for _ in 0..5 {
        world::apply(
            &mut world,
            Command::Deploy {
                card: crown_arena_core::CardId::Rocket,
                level: Level::MAX,
                side: Side::Enemy,
                position: Position::new(80.0, 75.0),
            },
            &mut events,
        );
    }
    events.extend(run_ticks(&mut world, 120));

    assert!(events.iter().any(|event| matches!(
        event,
        Event::TowerDestroyed {
            side: Side::Player,
            kind: TowerKind::Princess,
            ..
        }
    )));
    assert!(events.contains(&Event::KingTowerActivated { side: Side::Player }));
    let status = query::match_status(&world);
    assert_eq!(status.crowns.enemy, 1);
    assert_eq!(status.crowns.player, 0);
    assert_eq!(status.phase, MatchPhase::Running);

    let towers = query::arena_snapshot(&world)
        .iter()
        .filter(|entity| entity.kind == EntityKind::Tower)
        .count();
    assert_eq!(towers, 5);
}

#[test]
fn match_status_reports_the_opening_hand() {
    let world = World::default();
    let status = query::match_status(&world);
    assert_eq!(status.tick, 0);
    assert_eq!(status.phase, MatchPhase::Running);
    assert_eq!(status.seconds_remaining, MatchSetup::MATCH_SECONDS);
    assert!(status.hand.iter().all(Option::is_some));
    assert!(status.next_card.is_some());
    assert_eq!(status.winner, None);
}
