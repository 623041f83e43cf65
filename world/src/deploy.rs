//! Deployment legality and entity creation for played cards.

use crown_arena_core::{
    CardId, CardKind, DeploymentError, EntityId, Event, HandSlot, Level, Position, Scalable,
    Side, SpellDelivery, SpellStats, ARENA_WIDTH,
};
use tracing::debug;

use crate::{
    arena::{king_position, spawn_point},
    effects::{LingeringArea, SpellProjectile, SpellVisual, VISUAL_TICKS},
    spells::{apply_area, AreaEffect},
    World,
};

impl World {
    pub(crate) fn play_card(
        &mut self,
        slot: HandSlot,
        position: Position,
        out_events: &mut Vec<Event>,
    ) {
        let Some(card) = self.hand.card(slot) else {
            out_events.push(Event::DeploymentRejected {
                card: None,
                side: Side::Player,
                reason: DeploymentError::EmptySlot,
            });
            return;
        };
        let level = self.setup.card_level(card);
        self.deploy_for(card, level, Side::Player, position, out_events);
    }

    pub(crate) fn deploy_for(
        &mut self,
        card: CardId,
        level: Level,
        side: Side,
        position: Position,
        out_events: &mut Vec<Event>,
    ) {
        if let Err(reason) = self.validate_deployment(card, side, position) {
            debug!(?card, ?side, %reason, "deployment rejected");
            out_events.push(Event::DeploymentRejected {
                card: Some(card),
                side,
                reason,
            });
            return;
        }

        if side == Side::Player {
            let cost = self.catalog.card(card).cost;
            self.state.elixir_mut().spend(cost);
            if let Some(slot) = self.hand.slot_of(card) {
                let _ = self.hand.play(slot, out_events);
            }
        }

        let definition = self.catalog.card(card);
        let kind = definition.kind;
        let spawned = definition.deploys.unwrap_or(card);
        let deploy_ticks = definition.deploy_ticks;
        let offsets = definition.deployment_offsets();
        let entities = match kind {
            CardKind::Spell(stats) => {
                self.cast_spell(card, stats.scaled(level), side, position);
                Vec::new()
            }
            CardKind::Troop(_) | CardKind::Building(_) => {
                let origin = position.snap_to_tile();
                offsets
                    .into_iter()
                    .filter_map(|offset| {
                        let point = spawn_point(origin, offset, side);
                        self.spawn_entity(spawned, side, level, point, deploy_ticks)
                    })
                    .collect::<Vec<EntityId>>()
            }
        };

        debug!(?card, ?side, level = level.get(), count = entities.len(), "card deployed");
        out_events.push(Event::CardDeployed {
            card,
            side,
            position,
            entities,
        });
    }

    fn validate_deployment(
        &self,
        card: CardId,
        side: Side,
        position: Position,
    ) -> Result<(), DeploymentError> {
        if self.state.is_over() {
            return Err(DeploymentError::MatchEnded);
        }
        if card.is_hidden() {
            return Err(DeploymentError::HiddenCard);
        }
        if side == Side::Player && self.hand.slot_of(card).is_none() {
            return Err(DeploymentError::NotInHand);
        }
        if !position.is_on_field() {
            return Err(DeploymentError::OutOfBounds);
        }
        let definition = self.catalog.card(card);
        let restricted = !matches!(definition.kind, CardKind::Spell(_)) && !definition.deploy_anywhere;
        if restricted && !side.owns_x(position.x) {
            return Err(DeploymentError::WrongHalf);
        }
        if side == Side::Player && !self.state.elixir().can_afford(definition.cost) {
            return Err(DeploymentError::InsufficientElixir);
        }
        Ok(())
    }

    fn cast_spell(
        &mut self,
        card: CardId,
        stats: SpellStats,
        side: Side,
        target: Position,
    ) {
        match stats.delivery {
            SpellDelivery::Instant => {
                let affected = apply_area(&mut self.field, &AreaEffect::spell(&stats, target, side));
                debug!(?card, affected, "spell resolved");
                self.show_blast(side, target, stats.radius);
            }
            SpellDelivery::Projectile { travel_ticks } => {
                let id = self.allocate_id();
                self.spell_projectiles.push(SpellProjectile {
                    id,
                    side,
                    card,
                    position: king_position(side),
                    destination: target,
                    speed: ARENA_WIDTH / travel_ticks.max(1) as f32,
                    stats,
                });
            }
            SpellDelivery::Lingering {
                duration_ticks,
                troop_damage_per_tick,
                structure_damage_per_tick,
            } => {
                let id = self.allocate_id();
                self.areas.push(LingeringArea {
                    id,
                    side,
                    card,
                    position: target,
                    radius: stats.radius,
                    remaining: duration_ticks,
                    duration: duration_ticks,
                    troop_damage: troop_damage_per_tick,
                    structure_damage: structure_damage_per_tick,
                });
            }
        }
    }

    /// Leaves a short-lived blast marker where an area effect resolved.
    pub(crate) fn show_blast(&mut self, side: Side, position: Position, radius: f32) {
        let id = self.allocate_id();
        self.visuals.push(SpellVisual {
            id,
            side,
            position,
            radius,
            remaining: VISUAL_TICKS,
        });
    }
}
