use crown_arena_core::{
    ArenaSnapshot, CardKind, Catalog, Command, EntityKind, EntitySnapshot, Event, HandSlot,
    MatchStatus, Position, Side, TowerKind, Visual,
};
use tracing::debug;

/// Distance behind the princess towers at which troops are placed.
const DEPLOY_X: f32 = 60.0;

/// Lane centres the autopilot alternates between.
const LANES: [f32; 2] = [75.0, 225.0];

/// Scripted stand-in for the human player used by headless matches.
#[derive(Debug)]
pub(crate) struct Autopilot {
    think_ticks: u32,
    accumulated_ticks: u32,
    next_lane: usize,
}

impl Autopilot {
    pub(crate) const fn new(think_ticks: u32) -> Self {
        Self {
            think_ticks,
            accumulated_ticks: 0,
            next_lane: 0,
        }
    }

    /// Plays the first affordable card in hand once per thinking interval.
    pub(crate) fn handle(
        &mut self,
        events: &[Event],
        catalog: &Catalog,
        status: &MatchStatus,
        arena: &ArenaSnapshot,
        out: &mut Vec<Command>,
    ) {
        let elapsed = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count() as u32;
        self.accumulated_ticks = self.accumulated_ticks.saturating_add(elapsed);
        if self.accumulated_ticks < self.think_ticks || status.winner.is_some() {
            return;
        }
        self.accumulated_ticks = 0;

        let Some((slot, card)) = HandSlot::ALL.into_iter().find_map(|slot| {
            let card = status.hand[slot.index()]?;
            (f32::from(catalog.card(card).cost) <= status.elixir).then_some((slot, card))
        }) else {
            return;
        };

        let position = match catalog.card(card).kind {
            CardKind::Spell(_) => match spell_target(arena) {
                Some(position) => position,
                None => return,
            },
            CardKind::Troop(_) | CardKind::Building(_) => {
                let lane = LANES[self.next_lane % LANES.len()];
                self.next_lane += 1;
                Position::new(DEPLOY_X, lane)
            }
        };

        debug!(?card, x = position.x, y = position.y, "autopilot plays card");
        out.push(Command::PlayCard { slot, position });
    }
}

/// Enemy troop closest to the player's king, or the weakest enemy princess
/// tower when no troop is on the field.
fn spell_target(arena: &ArenaSnapshot) -> Option<Position> {
    let king = arena
        .iter()
        .find(|entity| {
            entity.side == Side::Player && entity.visual == Visual::Tower(TowerKind::King)
        })?
        .position;

    let troop = arena
        .iter()
        .filter(|entity| entity.side == Side::Enemy && entity.kind == EntityKind::Troop)
        .filter(|entity| !entity.concealed)
        .min_by(|a, b| a.position.distance(king).total_cmp(&b.position.distance(king)));
    if let Some(troop) = troop {
        return Some(troop.position);
    }

    arena
        .iter()
        .filter(|entity| {
            entity.side == Side::Enemy && entity.visual == Visual::Tower(TowerKind::Princess)
        })
        .min_by(|a, b| hitpoint_ratio(a).total_cmp(&hitpoint_ratio(b)))
        .map(|tower| tower.position)
}

fn hitpoint_ratio(entity: &EntitySnapshot) -> f32 {
    entity
        .health
        .map_or(1.0, |health| health.hitpoint_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crown_arena_core::{CardId, Deck, MatchSetup};
    use crown_arena_world::{self as world, query, World};

    fn ticks(count: u64) -> Vec<Event> {
        (1..=count).map(|tick| Event::TimeAdvanced { tick }).collect()
    }

    #[test]
    fn waits_for_the_thinking_interval() {
        let world = World::default();
        let mut autopilot = Autopilot::new(30);
        let mut commands = Vec::new();
        autopilot.handle(
            &ticks(29),
            query::catalog(&world),
            &query::match_status(&world),
            &query::arena_snapshot(&world),
            &mut commands,
        );
        assert!(commands.is_empty());

        autopilot.handle(
            &ticks(1),
            query::catalog(&world),
            &query::match_status(&world),
            &query::arena_snapshot(&world),
            &mut commands,
        );
        assert_eq!(commands.len(), 1);
    }

    #[test]
    fn plays_are_accepted_by_the_world() {
        let mut world = World::default();
        let mut autopilot = Autopilot::new(1);
        let mut events = Vec::new();
        let mut commands = Vec::new();
        autopilot.handle(
            &ticks(1),
            query::catalog(&world),
            &query::match_status(&world),
            &query::arena_snapshot(&world),
            &mut commands,
        );
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::CardDeployed { side: Side::Player, .. })));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::DeploymentRejected { .. })));
    }

    #[test]
    fn holds_when_nothing_is_affordable() {
        let deck = Deck::new(&[
            CardId::Golem,
            CardId::Rocket,
            CardId::GiantSkeleton,
            CardId::RoyalGiant,
            CardId::EliteBarbarians,
            CardId::Witch,
            CardId::Giant,
            CardId::Bowler,
        ])
        .expect("valid deck");
        let world = World::new(MatchSetup {
            starting_elixir: 4.0,
            ..MatchSetup::new(deck, Deck::default())
        });
        let mut autopilot = Autopilot::new(1);
        let mut commands = Vec::new();
        autopilot.handle(
            &ticks(1),
            query::catalog(&world),
            &query::match_status(&world),
            &query::arena_snapshot(&world),
            &mut commands,
        );
        assert!(commands.is_empty());
    }

    #[test]
    fn spells_prefer_troops_near_the_king() {
        let mut world = World::default();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Deploy {
                card: CardId::Knight,
                level: crown_arena_core::Level::STANDARD,
                side: Side::Enemy,
                position: Position::new(330.0, 150.0),
            },
            &mut events,
        );
        let arena = query::arena_snapshot(&world);
        let knight = arena
            .iter()
            .find(|entity| entity.kind == EntityKind::Troop)
            .expect("knight deployed");
        assert_eq!(spell_target(&arena), Some(knight.position));
    }

    #[test]
    fn spells_fall_back_to_princess_towers() {
        let world = World::default();
        let target = spell_target(&query::arena_snapshot(&world)).expect("towers stand");
        assert!(Side::Enemy.owns_x(target.x));
        assert!(target.y == 75.0 || target.y == 225.0);
    }
}
