//! Match clock, elixir, crowns and outcome.

use crown_arena_core::{
    match_reward, Banner, BannerMessage, Crowns, Event, MatchPhase, MatchSetup, Side, TowerKind,
    MAX_ELIXIR, TICKS_PER_SECOND,
};
use tracing::info;

/// Elixir gained per tick at the base rate.
pub(crate) const BASE_ELIXIR_PER_TICK: f32 = 1.0 / 120.0;

const DOUBLE_ELIXIR_SECONDS: u32 = 60;
const BANNER_TICKS: u32 = 300;

/// Elixir pool, always within `0.0..=MAX_ELIXIR`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Elixir {
    amount: f32,
}

impl Elixir {
    pub(crate) fn new(amount: f32) -> Self {
        Self {
            amount: amount.clamp(0.0, MAX_ELIXIR),
        }
    }

    pub(crate) fn accrue(&mut self, amount: f32) {
        self.amount = (self.amount + amount).clamp(0.0, MAX_ELIXIR);
    }

    pub(crate) fn can_afford(&self, cost: u8) -> bool {
        self.amount >= f32::from(cost)
    }

    pub(crate) fn spend(&mut self, cost: u8) {
        self.amount = (self.amount - f32::from(cost)).max(0.0);
    }

    pub(crate) const fn amount(&self) -> f32 {
        self.amount
    }
}

#[derive(Clone, Debug)]
pub(crate) struct MatchState {
    phase: MatchPhase,
    seconds_remaining: u32,
    ticks_into_second: u32,
    overtime_seconds: u32,
    elixir: Elixir,
    multiplier: u8,
    crowns: Crowns,
    banner: Option<Banner>,
    winner: Option<Side>,
    reward_multiplier: u32,
}

impl MatchState {
    pub(crate) fn new(setup: &MatchSetup) -> Self {
        Self {
            phase: MatchPhase::Running,
            seconds_remaining: setup.match_seconds,
            ticks_into_second: 0,
            overtime_seconds: setup.overtime_seconds,
            elixir: Elixir::new(setup.starting_elixir),
            multiplier: 1,
            crowns: Crowns::default(),
            banner: None,
            winner: None,
            reward_multiplier: setup.reward_multiplier,
        }
    }

    pub(crate) const fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub(crate) fn is_over(&self) -> bool {
        self.phase == MatchPhase::Ended
    }

    pub(crate) const fn seconds_remaining(&self) -> u32 {
        self.seconds_remaining
    }

    pub(crate) const fn elixir(&self) -> &Elixir {
        &self.elixir
    }

    pub(crate) fn elixir_mut(&mut self) -> &mut Elixir {
        &mut self.elixir
    }

    pub(crate) const fn multiplier(&self) -> u8 {
        self.multiplier
    }

    pub(crate) const fn crowns(&self) -> Crowns {
        self.crowns
    }

    pub(crate) const fn banner(&self) -> Option<Banner> {
        self.banner
    }

    pub(crate) const fn winner(&self) -> Option<Side> {
        self.winner
    }

    /// Runs the clock stage of a tick.
    pub(crate) fn advance(&mut self, out: &mut Vec<Event>) {
        if self.is_over() {
            return;
        }

        if let Some(banner) = self.banner.as_mut() {
            banner.ticks_remaining = banner.ticks_remaining.saturating_sub(1);
            if banner.ticks_remaining == 0 {
                self.banner = None;
            }
        }

        self.elixir
            .accrue(BASE_ELIXIR_PER_TICK * f32::from(self.multiplier));

        self.ticks_into_second += 1;
        if self.ticks_into_second < TICKS_PER_SECOND {
            return;
        }
        self.ticks_into_second = 0;
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);

        match self.phase {
            MatchPhase::Running => {
                if self.seconds_remaining <= DOUBLE_ELIXIR_SECONDS && self.multiplier < 2 {
                    self.set_multiplier(2, out);
                    self.show(BannerMessage::DoubleElixir);
                }
                if self.seconds_remaining == 0 {
                    match self.crowns.leader() {
                        Some(winner) => self.finish(Some(winner), out),
                        None => self.enter_overtime(out),
                    }
                }
            }
            MatchPhase::Overtime => {
                if self.seconds_remaining == 0 {
                    self.finish(self.crowns.leader(), out);
                }
            }
            MatchPhase::Ended => {}
        }
    }

    fn set_multiplier(&mut self, multiplier: u8, out: &mut Vec<Event>) {
        self.multiplier = multiplier;
        info!(multiplier, "elixir rate changed");
        out.push(Event::ElixirRateChanged { multiplier });
    }

    fn show(&mut self, message: BannerMessage) {
        self.banner = Some(Banner {
            message,
            ticks_remaining: BANNER_TICKS,
        });
    }

    fn enter_overtime(&mut self, out: &mut Vec<Event>) {
        self.phase = MatchPhase::Overtime;
        self.seconds_remaining = self.overtime_seconds;
        info!(seconds = self.overtime_seconds, "overtime started");
        out.push(Event::PhaseChanged {
            phase: MatchPhase::Overtime,
        });
        self.set_multiplier(3, out);
        self.show(BannerMessage::Overtime);
    }

    /// Ends the match once; later calls are ignored.
    pub(crate) fn finish(&mut self, winner: Option<Side>, out: &mut Vec<Event>) {
        if self.is_over() {
            return;
        }
        self.phase = MatchPhase::Ended;
        self.winner = winner;
        let reward = match_reward(winner, self.reward_multiplier);
        info!(?winner, player = self.crowns.player, enemy = self.crowns.enemy, reward, "match ended");
        out.push(Event::PhaseChanged {
            phase: MatchPhase::Ended,
        });
        out.push(Event::MatchEnded {
            winner,
            crowns: self.crowns,
            reward,
        });
    }

    /// Credits the opponent of `fallen` for destroying one of its towers.
    pub(crate) fn award_tower(&mut self, fallen: Side, kind: TowerKind, out: &mut Vec<Event>) {
        let scorer = fallen.opponent();
        let tally = self.crowns.of_mut(scorer);
        *tally = match kind {
            TowerKind::King => Crowns::WINNING,
            TowerKind::Princess => (*tally + 1).min(Crowns::WINNING),
        };
        if self.phase == MatchPhase::Overtime {
            if let Some(leader) = self.crowns.leader() {
                *self.crowns.of_mut(leader) = Crowns::WINNING;
            }
        }
        info!(?scorer, player = self.crowns.player, enemy = self.crowns.enemy, "crowns changed");
        out.push(Event::CrownsChanged {
            crowns: self.crowns,
        });
    }

    /// Ends the match when a side holds three crowns.
    pub(crate) fn check_crowns(&mut self, out: &mut Vec<Event>) {
        if let Some(winner) = Side::ALL
            .into_iter()
            .find(|side| self.crowns.of(*side) >= Crowns::WINNING)
        {
            self.finish(Some(winner), out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(match_seconds: u32) -> MatchSetup {
        MatchSetup {
            match_seconds,
            ..MatchSetup::default()
        }
    }

    fn run_seconds(state: &mut MatchState, seconds: u32, out: &mut Vec<Event>) {
        for _ in 0..seconds * TICKS_PER_SECOND {
            state.advance(out);
        }
    }

    #[test]
    fn elixir_never_exceeds_the_cap() {
        let mut elixir = Elixir::new(9.95);
        for _ in 0..10 {
            elixir.accrue(BASE_ELIXIR_PER_TICK);
        }
        assert_eq!(elixir.amount(), MAX_ELIXIR);
        assert!(!Elixir::new(3.9).can_afford(4));
    }

    #[test]
    fn double_elixir_fires_once_inside_the_final_minute() {
        let mut state = MatchState::new(&setup(62));
        let mut events = Vec::new();
        run_seconds(&mut state, 1, &mut events);
        assert!(events.is_empty());
        run_seconds(&mut state, 3, &mut events);
        assert_eq!(
            events,
            vec![Event::ElixirRateChanged { multiplier: 2 }]
        );
        assert_eq!(
            state.banner().map(|banner| banner.message),
            Some(BannerMessage::DoubleElixir)
        );
    }

    #[test]
    fn tied_crowns_at_time_up_enter_overtime_once() {
        let mut state = MatchState::new(&setup(2));
        let mut events = Vec::new();
        state.award_tower(Side::Enemy, TowerKind::Princess, &mut events);
        state.award_tower(Side::Player, TowerKind::Princess, &mut events);
        events.clear();

        run_seconds(&mut state, 3, &mut events);

        assert_eq!(state.phase(), MatchPhase::Overtime);
        assert_eq!(state.multiplier(), 3);
        let overtime_events = events
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
        assert_eq!(overtime_events, 1);
        assert_eq!(
            state.banner().map(|banner| banner.message),
            Some(BannerMessage::Overtime)
        );
    }

    #[test]
    fn a_crown_lead_at_time_up_ends_the_match() {
        let mut state = MatchState::new(&MatchSetup {
            reward_multiplier: 2,
            ..setup(1)
        });
        let mut events = Vec::new();
        state.award_tower(Side::Enemy, TowerKind::Princess, &mut events);
        run_seconds(&mut state, 1, &mut events);
        assert!(state.is_over());
        assert_eq!(state.winner(), Some(Side::Player));
        assert!(events.contains(&Event::MatchEnded {
            winner: Some(Side::Player),
            crowns: Crowns {
                player: 1,
                enemy: 0
            },
            reward: 200,
        }));
    }

    #[test]
    fn overtime_towers_decide_the_match() {
        let mut state = MatchState::new(&setup(1));
        let mut events = Vec::new();
        run_seconds(&mut state, 1, &mut events);
        assert_eq!(state.phase(), MatchPhase::Overtime);

        state.award_tower(Side::Player, TowerKind::Princess, &mut events);
        assert_eq!(state.crowns().enemy, Crowns::WINNING);
        state.check_crowns(&mut events);
        assert_eq!(state.winner(), Some(Side::Enemy));
    }

    #[test]
    fn expired_overtime_without_a_lead_is_a_draw() {
        let mut state = MatchState::new(&MatchSetup {
            overtime_seconds: 1,
            ..setup(1)
        });
        let mut events = Vec::new();
        run_seconds(&mut state, 2, &mut events);
        assert!(state.is_over());
        assert_eq!(state.winner(), None);
        let endings = events
            .iter()
            .filter(|event| matches!(event, Event::MatchEnded { .. }))
            .count();
        assert_eq!(endings, 1);
        assert!(events.contains(&Event::MatchEnded {
            winner: None,
            crowns: Crowns::default(),
            reward: 0,
        }));
    }

    #[test]
    fn elixir_stops_accruing_once_the_match_ends() {
        let mut state = MatchState::new(&setup(1));
        let mut events = Vec::new();
        state.finish(Some(Side::Player), &mut events);
        let before = state.elixir().amount();
        run_seconds(&mut state, 1, &mut events);
        assert_eq!(state.elixir().amount(), before);
    }

    #[test]
    fn king_towers_award_three_crowns() {
        let mut state = MatchState::new(&setup(10));
        let mut events = Vec::new();
        state.award_tower(Side::Enemy, TowerKind::King, &mut events);
        assert_eq!(state.crowns().player, Crowns::WINNING);
    }
}
