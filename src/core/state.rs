//! Authoritative game state owned by the engine.
//!
//! ## GameSession
//!
//! Policy counters, the election tracker, the government in office, the
//! append-only election history and the final result. Only the engine
//! mutates a session; once `game_ended` is set it never changes again.
//!
//! ## PlayerRecord
//!
//! Per-seat hidden and public facts: role, alive flag, veto eligibility and
//! the players this seat has investigated.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use super::deck::Policy;
use super::player::PlayerId;
use super::role::{Role, Team};

/// Election tracker value that forces a top-deck enactment.
pub const ELECTION_TRACKER_LIMIT: u8 = 3;

/// A (president, chancellor) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Government {
    pub president: PlayerId,
    pub chancellor: PlayerId,
}

impl Government {
    #[must_use]
    pub const fn new(president: PlayerId, chancellor: PlayerId) -> Self {
        Self {
            president,
            chancellor,
        }
    }

    #[must_use]
    pub fn includes(&self, player: PlayerId) -> bool {
        self.president == player || self.chancellor == player
    }
}

impl std::fmt::Display for Government {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.president, self.chancellor)
    }
}

/// One entry of the public election history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionRecord {
    pub round: u32,
    pub government: Government,
    pub ja: u8,
    pub nein: u8,
    pub elected: bool,
}

/// Why a game ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WinReason {
    LiberalPolicies,
    FascistPolicies,
    HitlerElected,
    HitlerExecuted,
}

impl WinReason {
    #[must_use]
    pub const fn winner(self) -> Team {
        match self {
            WinReason::LiberalPolicies | WinReason::HitlerExecuted => Team::Liberals,
            WinReason::FascistPolicies | WinReason::HitlerElected => Team::Fascists,
        }
    }
}

impl std::fmt::Display for WinReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            WinReason::LiberalPolicies => "five Liberal policies enacted",
            WinReason::FascistPolicies => "six Fascist policies enacted",
            WinReason::HitlerElected => "Hitler elected Chancellor",
            WinReason::HitlerExecuted => "Hitler executed",
        };
        f.write_str(text)
    }
}

/// Counters, government and result of one game.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub liberal_enacted: u8,
    pub fascist_enacted: u8,
    /// Consecutive failed elections, 0..=3.
    pub election_tracker: u8,
    pub hitler_assassinated: bool,
    pub game_ended: bool,
    pub winner: Option<Team>,
    pub win_reason: Option<WinReason>,
    /// Election round, starting at 1 with the first nomination.
    pub round: u32,
    /// The government elected this round, cleared when the next round opens.
    pub government: Option<Government>,
    /// Members of the last elected government, barred from the next chancellorship.
    pub term_limited: Option<Government>,
    /// Every election, successful or not, in order.
    pub history: Vector<ElectionRecord>,
}

impl GameSession {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn enacted(&self, policy: Policy) -> u8 {
        match policy {
            Policy::Liberal => self.liberal_enacted,
            Policy::Fascist => self.fascist_enacted,
        }
    }

    #[must_use]
    pub fn total_enacted(&self) -> usize {
        usize::from(self.liberal_enacted) + usize::from(self.fascist_enacted)
    }

    /// Veto power unlocks with the fifth Fascist policy.
    #[must_use]
    pub fn veto_active(&self) -> bool {
        self.fascist_enacted >= 5
    }

    /// Count one more enacted policy.
    pub(crate) fn record_enactment(&mut self, policy: Policy) {
        match policy {
            Policy::Liberal => self.liberal_enacted += 1,
            Policy::Fascist => self.fascist_enacted += 1,
        }
    }

    pub(crate) fn finish(&mut self, reason: WinReason) {
        self.game_ended = true;
        self.winner = Some(reason.winner());
        self.win_reason = Some(reason);
    }
}

/// Everything the engine tracks about one seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub role: Role,
    pub alive: bool,
    /// Set for every player once veto power unlocks.
    pub veto_eligible: bool,
    /// Players this seat has investigated. Only grows.
    pub investigated: FxHashSet<PlayerId>,
}

impl PlayerRecord {
    #[must_use]
    pub fn new(role: Role) -> Self {
        Self {
            role,
            alive: true,
            veto_eligible: false,
            investigated: FxHashSet::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_government_includes() {
        let gov = Government::new(PlayerId::new(1), PlayerId::new(4));
        assert!(gov.includes(PlayerId::new(1)));
        assert!(gov.includes(PlayerId::new(4)));
        assert!(!gov.includes(PlayerId::new(2)));
    }

    #[test]
    fn test_win_reason_winner() {
        assert_eq!(WinReason::HitlerExecuted.winner(), Team::Liberals);
        assert_eq!(WinReason::HitlerElected.winner(), Team::Fascists);
        assert_eq!(WinReason::LiberalPolicies.winner(), Team::Liberals);
        assert_eq!(WinReason::FascistPolicies.winner(), Team::Fascists);
    }

    #[test]
    fn test_session_enactment_counts() {
        let mut session = GameSession::new();
        session.record_enactment(Policy::Fascist);
        session.record_enactment(Policy::Fascist);
        session.record_enactment(Policy::Liberal);

        assert_eq!(session.enacted(Policy::Fascist), 2);
        assert_eq!(session.enacted(Policy::Liberal), 1);
        assert_eq!(session.total_enacted(), 3);
        assert!(!session.veto_active());
    }

    #[test]
    fn test_session_finish() {
        let mut session = GameSession::new();
        session.finish(WinReason::HitlerElected);
        assert!(session.game_ended);
        assert_eq!(session.winner, Some(Team::Fascists));
        assert_eq!(session.win_reason, Some(WinReason::HitlerElected));
    }

    #[test]
    fn test_session_serialization() {
        let mut session = GameSession::new();
        session.history.push_back(ElectionRecord {
            round: 1,
            government: Government::new(PlayerId::new(0), PlayerId::new(2)),
            ja: 4,
            nein: 3,
            elected: true,
        });
        let json = serde_json::to_string(&session).unwrap();
        let back: GameSession = serde_json::from_str(&json).unwrap();
        assert_eq!(session, back);
    }
}
