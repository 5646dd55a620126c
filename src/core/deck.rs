//! Policy tiles, deck composition and the draw/discard piles.
//!
//! ## Conservation
//!
//! Tiles never leave the game: every tile is in the draw pile, in the discard
//! pile, in the hand of the sitting government, or enacted. The engine relies
//! on `draw_len + discard_len + held_len + enacted == composition.total()`
//! in every state, including mid-session.
//!
//! ## Refill
//!
//! Before any draw, a draw pile holding fewer than [`REFILL_BELOW`] tiles is
//! refilled by shuffling the discard pile into it.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::error::{GameError, GameResult};
use super::rng::GameRng;

/// Draw piles smaller than this are refilled before drawing.
pub const REFILL_BELOW: usize = 3;

/// A policy tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Policy {
    Liberal,
    Fascist,
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Policy::Liberal => f.write_str("Liberal"),
            Policy::Fascist => f.write_str("Fascist"),
        }
    }
}

/// Up to three tiles in hand during a legislative session.
pub type PolicyHand = SmallVec<[Policy; 3]>;

/// Number of tiles of each kind in a full deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckComposition {
    pub liberal: usize,
    pub fascist: usize,
}

impl Default for DeckComposition {
    fn default() -> Self {
        Self {
            liberal: 6,
            fascist: 11,
        }
    }
}

impl DeckComposition {
    #[must_use]
    pub fn total(&self) -> usize {
        self.liberal + self.fascist
    }

    #[must_use]
    pub fn count(&self, policy: Policy) -> usize {
        match policy {
            Policy::Liberal => self.liberal,
            Policy::Fascist => self.fascist,
        }
    }

    /// Unshuffled tile list.
    #[must_use]
    pub fn tiles(&self) -> Vec<Policy> {
        let mut tiles = Vec::with_capacity(self.total());
        tiles.extend(std::iter::repeat(Policy::Liberal).take(self.liberal));
        tiles.extend(std::iter::repeat(Policy::Fascist).take(self.fascist));
        tiles
    }

    /// Composition of an arbitrary tile list.
    #[must_use]
    pub fn of(tiles: &[Policy]) -> Self {
        let liberal = tiles.iter().filter(|p| **p == Policy::Liberal).count();
        Self {
            liberal,
            fascist: tiles.len() - liberal,
        }
    }
}

/// Draw pile, discard pile and the tiles held by the government in session.
///
/// The top of the draw pile is the end of the vector.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolicyDeck {
    draw_pile: Vec<Policy>,
    discard_pile: Vec<Policy>,
    held: PolicyHand,
}

impl PolicyDeck {
    /// A freshly shuffled deck.
    #[must_use]
    pub fn shuffled(composition: DeckComposition, rng: &mut GameRng) -> Self {
        let mut draw_pile = composition.tiles();
        rng.shuffle(&mut draw_pile);
        Self {
            draw_pile,
            discard_pile: Vec::new(),
            held: PolicyHand::new(),
        }
    }

    /// A deck in a known order, `top_first[0]` being drawn first.
    ///
    /// ```
    /// use secret_hitler_rl::core::{Policy, PolicyDeck};
    ///
    /// let deck = PolicyDeck::stacked(vec![Policy::Liberal, Policy::Fascist]);
    /// assert_eq!(deck.peek_top(), Some(Policy::Liberal));
    /// ```
    #[must_use]
    pub fn stacked(top_first: Vec<Policy>) -> Self {
        let mut draw_pile = top_first;
        draw_pile.reverse();
        Self {
            draw_pile,
            discard_pile: Vec::new(),
            held: PolicyHand::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.draw_pile.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draw_pile.is_empty()
    }

    #[must_use]
    pub fn discard_len(&self) -> usize {
        self.discard_pile.len()
    }

    /// Tiles drawn and not yet discarded or enacted.
    #[must_use]
    pub fn held_len(&self) -> usize {
        self.held.len()
    }

    #[must_use]
    pub fn held(&self) -> &[Policy] {
        &self.held
    }

    /// Tiles still in circulation (draw + discard).
    #[must_use]
    pub fn in_circulation(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }

    #[must_use]
    pub fn peek_top(&self) -> Option<Policy> {
        self.draw_pile.last().copied()
    }

    /// Composition of draw + discard piles together.
    #[must_use]
    pub fn circulating_composition(&self) -> DeckComposition {
        let mut all = self.draw_pile.clone();
        all.extend_from_slice(&self.discard_pile);
        DeckComposition::of(&all)
    }

    /// Make sure `count` tiles can be drawn, refilling from the discard pile
    /// when the draw pile is short.
    ///
    /// Returns `true` if a reshuffle happened. Fails without touching either
    /// pile if the draw cannot be satisfied.
    pub fn prepare_draw(&mut self, count: usize, rng: &mut GameRng) -> GameResult<bool> {
        let needs_refill = self.draw_pile.len() < REFILL_BELOW.max(count);
        let reachable = if needs_refill {
            self.in_circulation()
        } else {
            self.draw_pile.len()
        };
        if reachable < count {
            return Err(GameError::DeckUnderflow {
                needed: count,
                available: self.draw_pile.len(),
                discarded: self.discard_pile.len(),
            });
        }
        if !needs_refill {
            return Ok(false);
        }
        if self.discard_pile.is_empty() {
            log::warn!(
                "draw pile has {} tiles but the discard pile is empty; skipping reshuffle",
                self.draw_pile.len()
            );
            return Ok(false);
        }

        self.draw_pile.append(&mut self.discard_pile);
        rng.shuffle(&mut self.draw_pile);
        log::debug!("reshuffled discard pile, draw pile now {}", self.draw_pile.len());
        Ok(true)
    }

    /// Move `count` tiles from the top into the held hand and return a copy
    /// of them. Call [`Self::prepare_draw`] first.
    pub fn draw_to_hand(&mut self, count: usize) -> GameResult<PolicyHand> {
        if self.draw_pile.len() < count {
            return Err(GameError::DeckUnderflow {
                needed: count,
                available: self.draw_pile.len(),
                discarded: self.discard_pile.len(),
            });
        }
        let split = self.draw_pile.len() - count;
        let drawn: PolicyHand = self.draw_pile.drain(split..).rev().collect();
        self.held.extend_from_slice(&drawn);
        Ok(drawn)
    }

    /// Move one held tile of kind `policy` to the discard pile.
    pub fn discard_from_hand(&mut self, policy: Policy) -> GameResult<()> {
        self.release(policy)?;
        self.discard_pile.push(policy);
        Ok(())
    }

    /// Take one held tile of kind `policy` out of the deck for good. The caller
    /// records it on the matching track.
    pub fn enact_from_hand(&mut self, policy: Policy) -> GameResult<()> {
        self.release(policy)
    }

    fn release(&mut self, policy: Policy) -> GameResult<()> {
        let index = self
            .held
            .iter()
            .position(|p| *p == policy)
            .ok_or(GameError::PolicyNotHeld { policy })?;
        self.held.remove(index);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Draw `count` tiles and throw them all away.
    fn discard_all(deck: &mut PolicyDeck, count: usize) {
        for policy in deck.draw_to_hand(count).unwrap() {
            deck.discard_from_hand(policy).unwrap();
        }
    }

    #[test]
    fn test_default_composition() {
        let comp = DeckComposition::default();
        assert_eq!(comp.total(), 17);
        assert_eq!(comp.count(Policy::Liberal), 6);
        assert_eq!(comp.count(Policy::Fascist), 11);
    }

    #[test]
    fn test_shuffled_deck_has_full_composition() {
        let mut rng = GameRng::new(1);
        let deck = PolicyDeck::shuffled(DeckComposition::default(), &mut rng);
        assert_eq!(deck.len(), 17);
        assert_eq!(deck.held_len(), 0);
        assert_eq!(deck.circulating_composition(), DeckComposition::default());
    }

    #[test]
    fn test_stacked_draw_order() {
        let mut deck = PolicyDeck::stacked(vec![
            Policy::Liberal,
            Policy::Fascist,
            Policy::Fascist,
            Policy::Liberal,
        ]);
        let hand = deck.draw_to_hand(3).unwrap();
        assert_eq!(hand.as_slice(), &[Policy::Liberal, Policy::Fascist, Policy::Fascist]);
        assert_eq!(deck.held(), hand.as_slice());
        assert_eq!(deck.peek_top(), Some(Policy::Liberal));
    }

    #[test]
    fn test_held_tiles_are_counted_until_released() {
        let mut deck = PolicyDeck::stacked(vec![
            Policy::Liberal,
            Policy::Fascist,
            Policy::Fascist,
            Policy::Liberal,
        ]);
        let total = |d: &PolicyDeck| d.len() + d.discard_len() + d.held_len();

        deck.draw_to_hand(3).unwrap();
        assert_eq!((deck.len(), deck.held_len()), (1, 3));
        assert_eq!(total(&deck), 4);

        deck.discard_from_hand(Policy::Fascist).unwrap();
        assert_eq!((deck.discard_len(), deck.held_len()), (1, 2));
        assert_eq!(total(&deck), 4);

        deck.enact_from_hand(Policy::Liberal).unwrap();
        deck.discard_from_hand(Policy::Fascist).unwrap();
        assert_eq!(deck.held_len(), 0);
        assert_eq!(total(&deck), 3);
    }

    #[test]
    fn test_releasing_unheld_policy_fails() {
        let mut deck = PolicyDeck::stacked(vec![Policy::Fascist; 3]);
        deck.draw_to_hand(3).unwrap();
        assert_eq!(
            deck.enact_from_hand(Policy::Liberal),
            Err(GameError::PolicyNotHeld {
                policy: Policy::Liberal
            })
        );
        assert_eq!(deck.held_len(), 3);
    }

    #[test]
    fn test_prepare_draw_refills_short_pile() {
        let mut rng = GameRng::new(3);
        let mut deck = PolicyDeck::stacked(vec![
            Policy::Fascist,
            Policy::Liberal,
            Policy::Liberal,
            Policy::Fascist,
        ]);
        discard_all(&mut deck, 2);

        assert!(deck.prepare_draw(3, &mut rng).unwrap());
        assert_eq!(deck.len(), 4);
        assert_eq!(deck.discard_len(), 0);
        assert_eq!(deck.draw_to_hand(3).unwrap().len(), 3);
    }

    #[test]
    fn test_prepare_draw_no_refill_when_enough() {
        let mut rng = GameRng::new(3);
        let mut deck = PolicyDeck::stacked(vec![Policy::Liberal; 6]);
        discard_all(&mut deck, 1);

        assert!(!deck.prepare_draw(3, &mut rng).unwrap());
        assert_eq!(deck.discard_len(), 1);
    }

    #[test]
    fn test_prepare_draw_underflow_leaves_piles_untouched() {
        let mut rng = GameRng::new(3);
        let mut deck = PolicyDeck::stacked(vec![Policy::Fascist, Policy::Liberal]);
        discard_all(&mut deck, 1);

        let err = deck.prepare_draw(3, &mut rng).unwrap_err();
        assert_eq!(
            err,
            GameError::DeckUnderflow {
                needed: 3,
                available: 1,
                discarded: 1
            }
        );
        assert_eq!(deck.len(), 1);
        assert_eq!(deck.discard_len(), 1);
    }

    #[test]
    fn test_single_draw_with_empty_discard_is_allowed() {
        let mut rng = GameRng::new(3);
        let mut deck = PolicyDeck::stacked(vec![Policy::Fascist]);
        assert!(!deck.prepare_draw(1, &mut rng).unwrap());
        assert_eq!(deck.draw_to_hand(1).unwrap().as_slice(), &[Policy::Fascist]);
    }
}
