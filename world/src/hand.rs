//! Hand, draw pile and discard pile of the player's deck.

use std::collections::VecDeque;

use crown_arena_core::{CardId, Deck, Event, HandSlot, HAND_SIZE};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Clone, Debug)]
pub(crate) struct Hand {
    slots: [Option<CardId>; HAND_SIZE],
    draw_pile: VecDeque<CardId>,
    discard_pile: Vec<CardId>,
    rng: ChaCha8Rng,
}

impl Hand {
    /// Shuffles the deck and draws the opening hand.
    pub(crate) fn new(deck: &Deck, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut cards = deck.cards().to_vec();
        cards.shuffle(&mut rng);
        let mut hand = Self {
            slots: [None; HAND_SIZE],
            draw_pile: cards.into(),
            discard_pile: Vec::new(),
            rng,
        };
        for slot in HandSlot::ALL {
            hand.slots[slot.index()] = hand.draw();
        }
        hand
    }

    pub(crate) const fn slots(&self) -> [Option<CardId>; HAND_SIZE] {
        self.slots
    }

    pub(crate) fn card(&self, slot: HandSlot) -> Option<CardId> {
        self.slots[slot.index()]
    }

    pub(crate) fn slot_of(&self, card: CardId) -> Option<HandSlot> {
        HandSlot::ALL
            .into_iter()
            .find(|slot| self.slots[slot.index()] == Some(card))
    }

    /// Card that the next draw produces, if the draw pile holds one.
    pub(crate) fn next_card(&self) -> Option<CardId> {
        self.draw_pile.front().copied()
    }

    /// Empties `slot`, discards its card and immediately redraws.
    pub(crate) fn play(&mut self, slot: HandSlot, out: &mut Vec<Event>) -> Option<CardId> {
        let played = self.slots[slot.index()].take()?;
        self.discard_pile.push(played);
        if let Some(card) = self.draw() {
            self.slots[slot.index()] = Some(card);
            out.push(Event::CardDrawn { slot, card });
        }
        Some(played)
    }

    fn draw(&mut self) -> Option<CardId> {
        if self.draw_pile.is_empty() {
            self.discard_pile.shuffle(&mut self.rng);
            self.draw_pile.extend(self.discard_pile.drain(..));
        }
        self.draw_pile.pop_front()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn held(hand: &Hand) -> BTreeSet<CardId> {
        hand.slots().into_iter().flatten().collect()
    }

    #[test]
    fn opening_hand_holds_four_distinct_deck_cards() {
        let deck = Deck::default();
        let hand = Hand::new(&deck, 7);
        let cards = held(&hand);
        assert_eq!(cards.len(), HAND_SIZE);
        assert!(cards.iter().all(|card| deck.contains(*card)));
        assert!(hand.next_card().is_some_and(|card| !cards.contains(&card)));
    }

    #[test]
    fn playing_refills_the_slot() {
        let mut hand = Hand::new(&Deck::default(), 3);
        let slot = HandSlot::ALL[2];
        let expected = hand.next_card();
        let mut events = Vec::new();
        let played = hand.play(slot, &mut events).expect("slot holds a card");
        assert_eq!(hand.card(slot), expected);
        assert_ne!(hand.card(slot), Some(played));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn discards_are_reshuffled_when_the_draw_pile_runs_out() {
        let deck = Deck::default();
        let mut hand = Hand::new(&deck, 11);
        let mut events = Vec::new();
        for _ in 0..40 {
            let _ = hand.play(HandSlot::ALL[0], &mut events);
            let cards = held(&hand);
            assert_eq!(cards.len(), HAND_SIZE, "hand slots never empty or repeat");
        }
        assert_eq!(events.len(), 40);
    }

    #[test]
    fn identical_seeds_shuffle_identically() {
        let first = Hand::new(&Deck::default(), 99);
        let second = Hand::new(&Deck::default(), 99);
        assert_eq!(first.slots(), second.slots());
        assert_eq!(first.next_card(), second.next_card());
    }
}
