//! What a player is allowed to know.
//!
//! ## PublicState
//!
//! The table as everyone sees it: policy tracks, election tracker, who is
//! alive, who governs, the election history and what can be inferred about
//! the deck. It never holds a role.
//!
//! ## Observation
//!
//! `PublicState` plus one seat's private knowledge: its own role, the
//! results of its own investigations and any policy tiles it holds. Agents
//! only ever receive an `Observation`; the engine rebuilds them after every
//! committed action, so a half-applied transition is never visible.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use super::deck::{DeckComposition, Policy, PolicyHand};
use super::player::{PlayerId, PlayerMap};
use super::role::{Party, Role, Team};
use super::state::{ElectionRecord, Government};
use crate::rules::PhaseKind;

/// Publicly observable table state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PublicState {
    pub player_count: usize,
    pub phase: PhaseKind,
    pub round: u32,
    pub liberal_enacted: u8,
    pub fascist_enacted: u8,
    pub election_tracker: u8,
    pub alive: PlayerMap<bool>,
    pub veto_active: bool,

    /// Tiles believed to be in circulation (draw + discard).
    ///
    /// Starts at the full composition, loses one tile per enactment, and is
    /// reset to `composition - enacted` on every reshuffle.
    pub known_deck: DeckComposition,
    pub draw_pile_len: usize,
    pub discard_len: usize,
    /// Tiles in the sitting government's hands.
    pub held_len: usize,

    /// Presidential candidate or sitting president.
    pub president: Option<PlayerId>,
    /// Chancellor nominee or sitting chancellor.
    pub chancellor: Option<PlayerId>,
    /// Government elected this round.
    pub government: Option<Government>,
    pub term_limited: Option<Government>,
    pub history: Vector<ElectionRecord>,

    pub hitler_assassinated: bool,
    pub game_ended: bool,
    pub winner: Option<Team>,
}

impl PublicState {
    /// Opening state for a table.
    #[must_use]
    pub fn new(player_count: usize, deck: DeckComposition) -> Self {
        Self {
            player_count,
            phase: PhaseKind::Election,
            round: 0,
            liberal_enacted: 0,
            fascist_enacted: 0,
            election_tracker: 0,
            alive: PlayerMap::with_value(player_count, true),
            veto_active: false,
            known_deck: deck,
            draw_pile_len: deck.total(),
            discard_len: 0,
            held_len: 0,
            president: None,
            chancellor: None,
            government: None,
            term_limited: None,
            history: Vector::new(),
            hitler_assassinated: false,
            game_ended: false,
            winner: None,
        }
    }

    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.alive.try_get(player).copied().unwrap_or(false)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.alive.values().filter(|a| **a).count()
    }

    pub fn alive_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.alive.iter().filter(|(_, a)| **a).map(|(p, _)| p)
    }

    /// Forget one tile of `policy` after it is enacted.
    pub(crate) fn note_enactment(&mut self, policy: Policy) {
        match policy {
            Policy::Liberal => self.known_deck.liberal = self.known_deck.liberal.saturating_sub(1),
            Policy::Fascist => self.known_deck.fascist = self.known_deck.fascist.saturating_sub(1),
        }
    }

    /// After a reshuffle only `totals - enacted` is known.
    pub(crate) fn note_reshuffle(&mut self, totals: DeckComposition) {
        self.known_deck = DeckComposition {
            liberal: totals.liberal.saturating_sub(usize::from(self.liberal_enacted)),
            fascist: totals.fascist.saturating_sub(usize::from(self.fascist_enacted)),
        };
    }
}

/// One seat's view of the game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub player: PlayerId,
    pub role: Role,
    /// Results of investigations this seat performed.
    pub investigations: OrdMap<PlayerId, Party>,
    /// Tiles in this seat's hand during a legislative session.
    pub hand: PolicyHand,
    pub public: PublicState,
}

impl Observation {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.public.is_alive(self.player)
    }

    #[must_use]
    pub fn team(&self) -> Team {
        self.role.team()
    }

    /// Whether this seat's team has won. `None` while the game runs.
    #[must_use]
    pub fn won(&self) -> Option<bool> {
        self.public.winner.map(|w| w == self.team())
    }
}
