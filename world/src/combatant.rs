//! Capabilities shared by towers, buildings and troops.

use crown_arena_core::{EntityId, HealthSnapshot, Position, Side};
use crown_arena_system_pathfinding::push_away;
use crown_arena_system_targeting::Candidate;

/// Slow multiplier applied to attack and spawn intervals.
pub(crate) const SLOW_INTERVAL_FACTOR: f32 = 1.35;

/// Hit point pools of a combatant.
///
/// A positive shield absorbs each hit in full while the main pool stays at
/// its maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Vitals {
    hitpoints: f32,
    max_hitpoints: f32,
    shield: f32,
    max_shield: f32,
    shield_broken: bool,
}

impl Vitals {
    pub(crate) fn new(max_hitpoints: f32, shield: Option<f32>) -> Self {
        let shield = shield.unwrap_or(0.0).max(0.0);
        Self {
            hitpoints: max_hitpoints,
            max_hitpoints,
            shield,
            max_shield: shield,
            shield_broken: false,
        }
    }

    pub(crate) fn absorb(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        if self.shield > 0.0 {
            self.shield = (self.shield - amount).max(0.0);
            self.hitpoints = self.max_hitpoints;
            if self.shield == 0.0 {
                self.shield_broken = true;
            }
        } else {
            self.hitpoints -= amount;
        }
    }

    /// Removes hit points directly, bypassing the shield.
    pub(crate) fn drain(&mut self, amount: f32) {
        self.hitpoints -= amount;
    }

    pub(crate) fn kill(&mut self) {
        self.shield = 0.0;
        self.hitpoints = 0.0;
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.hitpoints > 0.0 || self.shield > 0.0
    }

    pub(crate) const fn hitpoints(&self) -> f32 {
        self.hitpoints
    }

    pub(crate) const fn max_hitpoints(&self) -> f32 {
        self.max_hitpoints
    }

    pub(crate) const fn shield(&self) -> f32 {
        self.shield
    }

    pub(crate) const fn shield_broken(&self) -> bool {
        self.shield_broken
    }

    pub(crate) fn snapshot(&self) -> HealthSnapshot {
        let ratio = |value: f32, max: f32| {
            if max > 0.0 {
                (value / max).clamp(0.0, 1.0)
            } else {
                0.0
            }
        };
        HealthSnapshot {
            hitpoints: self.hitpoints().max(0.0),
            hitpoint_ratio: ratio(self.hitpoints(), self.max_hitpoints()),
            shield_ratio: (self.max_shield > 0.0).then(|| ratio(self.shield(), self.max_shield)),
        }
    }
}

/// Status countdowns in ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Status {
    frozen: u32,
    slowed: u32,
}

impl Status {
    pub(crate) fn freeze(&mut self, ticks: u32) {
        self.frozen = self.frozen.max(ticks);
    }

    pub(crate) fn slow(&mut self, ticks: u32) {
        self.slowed = self.slowed.max(ticks);
    }

    pub(crate) const fn is_frozen(&self) -> bool {
        self.frozen > 0
    }

    pub(crate) const fn is_slowed(&self) -> bool {
        self.slowed > 0
    }

    /// Advances the countdowns for one tick.
    ///
    /// Returns `Some(slowed)` when the owner may act this tick and `None`
    /// while it is frozen. A frozen owner's slow countdown is held.
    pub(crate) fn advance(&mut self) -> Option<bool> {
        if self.frozen > 0 {
            self.frozen -= 1;
            return None;
        }
        let slowed = self.slowed > 0;
        self.slowed = self.slowed.saturating_sub(1);
        Some(slowed)
    }
}

/// Countdown measured in ticks that runs slower while its owner is slowed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub(crate) const fn ready() -> Self {
        Self { remaining: 0.0 }
    }

    pub(crate) fn advance(&mut self, slowed: bool) {
        let step = if slowed {
            1.0 / SLOW_INTERVAL_FACTOR
        } else {
            1.0
        };
        self.remaining = (self.remaining - step).max(0.0);
    }

    pub(crate) fn is_ready(&self) -> bool {
        self.remaining <= f32::EPSILON
    }

    pub(crate) fn restart(&mut self, ticks: f32) {
        self.remaining = ticks;
    }
}

/// Shared view over towers, buildings and troops used by targeting and area
/// effects.
pub(crate) trait Combatant {
    fn id(&self) -> EntityId;

    fn side(&self) -> Side;

    fn position(&self) -> Position;

    /// Half of the footprint.
    fn radius(&self) -> f32;

    fn is_structure(&self) -> bool;

    fn is_tower(&self) -> bool {
        false
    }

    fn is_flying(&self) -> bool {
        false
    }

    fn vitals(&self) -> &Vitals;

    fn vitals_mut(&mut self) -> &mut Vitals;

    fn status_mut(&mut self) -> &mut Status;

    /// Whether target searches may pick the combatant.
    fn is_targetable(&self) -> bool;

    /// Whether area effects pass over the combatant.
    fn ignores_areas(&self) -> bool {
        false
    }

    /// Hook run after the combatant takes damage.
    fn damaged(&mut self) {}

    /// Moves the combatant away from `centre`; structures stay put.
    fn knock_back(&mut self, _centre: Position, _distance: f32) {}

    fn is_alive(&self) -> bool {
        self.vitals().is_alive()
    }

    fn take_damage(&mut self, amount: f32) {
        self.vitals_mut().absorb(amount);
        self.damaged();
    }

    fn candidate(&self) -> Candidate {
        Candidate {
            id: self.id(),
            side: self.side(),
            position: self.position(),
            radius: self.radius(),
            structure: self.is_structure(),
            flying: self.is_flying(),
            alive: self.is_alive(),
            targetable: self.is_targetable(),
        }
    }
}

/// Moves `position` away from `centre` and keeps it on the battlefield.
pub(crate) fn knocked_back(position: Position, centre: Position, distance: f32) -> Position {
    crate::arena::clamp_to_field(push_away(position, centre, distance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_hits_exhaust_hitpoints() {
        let mut vitals = Vitals::new(100.0, None);
        for _ in 0..3 {
            vitals.absorb(30.0);
        }
        assert_eq!(vitals.hitpoints(), 10.0);
        assert!(vitals.is_alive());
        vitals.absorb(30.0);
        assert!(vitals.hitpoints() <= 0.0);
        assert!(!vitals.is_alive());
    }

    #[test]
    fn shield_absorbs_whole_hits_before_hitpoints() {
        let mut vitals = Vitals::new(100.0, Some(50.0));
        vitals.absorb(30.0);
        assert_eq!(vitals.shield(), 20.0);
        assert_eq!(vitals.hitpoints(), 100.0);
        vitals.absorb(80.0);
        assert_eq!(vitals.shield(), 0.0);
        assert_eq!(vitals.hitpoints(), 100.0);
        assert!(vitals.shield_broken());
        vitals.absorb(30.0);
        assert_eq!(vitals.hitpoints(), 70.0);
    }

    #[test]
    fn statuses_refresh_to_the_longer_duration() {
        let mut status = Status::default();
        status.freeze(30);
        status.freeze(10);
        assert_eq!(status.advance(), None);
        for _ in 0..29 {
            assert_eq!(status.advance(), None);
        }
        assert_eq!(status.advance(), Some(false));
    }

    #[test]
    fn frozen_owners_hold_their_slow() {
        let mut status = Status::default();
        status.slow(2);
        status.freeze(1);
        assert_eq!(status.advance(), None);
        assert_eq!(status.advance(), Some(true));
        assert_eq!(status.advance(), Some(true));
        assert_eq!(status.advance(), Some(false));
    }

    #[test]
    fn slowed_cooldowns_stretch_by_the_slow_factor() {
        let mut cooldown = Cooldown::ready();
        cooldown.restart(27.0);
        let mut ticks = 0;
        while !cooldown.is_ready() {
            cooldown.advance(true);
            ticks += 1;
        }
        assert_eq!(ticks, 37);
    }

    #[test]
    fn health_snapshot_reports_ratios() {
        let mut vitals = Vitals::new(200.0, Some(40.0));
        vitals.absorb(10.0);
        let snapshot = vitals.snapshot();
        assert_eq!(snapshot.hitpoint_ratio, 1.0);
        assert_eq!(snapshot.shield_ratio, Some(0.75));
    }
}
