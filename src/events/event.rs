//! Game event types.
//!
//! The engine emits one event per notable transition. Events only carry
//! public information, with two exceptions addressed to a single seat:
//! `Investigated` (result known to the investigator) and `PoliciesDrawn`
//! (tiles known to the president).

use serde::{Deserialize, Serialize};

use crate::core::{Action, Government, Party, PlayerId, Policy, PolicyHand, Team, WinReason};
use crate::rules::PhaseKind;

/// Something that happened at the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A new election round opened.
    RoundStarted {
        round: u32,
        president: PlayerId,
        special: bool,
    },
    /// An agent's action was accepted.
    ActionCommitted { player: PlayerId, action: Action },
    ChancellorNominated { government: Government },
    ElectionResolved {
        government: Government,
        ja: u8,
        nein: u8,
        elected: bool,
    },
    ElectionTrackerAdvanced { tracker: u8 },
    DeckReshuffled { draw_pile: usize },
    PoliciesDrawn {
        president: PlayerId,
        policies: PolicyHand,
    },
    VetoProposed { chancellor: PlayerId },
    VetoResolved { approved: bool },
    PolicyEnacted { policy: Policy, forced: bool },
    Investigated {
        investigator: PlayerId,
        target: PlayerId,
        party: Party,
    },
    SpecialElectionCalled {
        president: PlayerId,
        designated: PlayerId,
    },
    PlayerExecuted { player: PlayerId },
    PhaseChanged { from: PhaseKind, to: PhaseKind },
    GameEnded { winner: Team, reason: WinReason },
}

impl GameEvent {
    /// Short name for logs and filtering.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            GameEvent::RoundStarted { .. } => "round_started",
            GameEvent::ActionCommitted { .. } => "action_committed",
            GameEvent::ChancellorNominated { .. } => "chancellor_nominated",
            GameEvent::ElectionResolved { .. } => "election_resolved",
            GameEvent::ElectionTrackerAdvanced { .. } => "election_tracker_advanced",
            GameEvent::DeckReshuffled { .. } => "deck_reshuffled",
            GameEvent::PoliciesDrawn { .. } => "policies_drawn",
            GameEvent::VetoProposed { .. } => "veto_proposed",
            GameEvent::VetoResolved { .. } => "veto_resolved",
            GameEvent::PolicyEnacted { .. } => "policy_enacted",
            GameEvent::Investigated { .. } => "investigated",
            GameEvent::SpecialElectionCalled { .. } => "special_election_called",
            GameEvent::PlayerExecuted { .. } => "player_executed",
            GameEvent::PhaseChanged { .. } => "phase_changed",
            GameEvent::GameEnded { .. } => "game_ended",
        }
    }

    /// Whether the event reveals private information to a single seat.
    #[must_use]
    pub const fn is_private(&self) -> bool {
        matches!(self, GameEvent::Investigated { .. } | GameEvent::PoliciesDrawn { .. })
    }
}

impl std::fmt::Display for GameEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameEvent::RoundStarted {
                round,
                president,
                special,
            } => {
                let kind = if *special { " (special election)" } else { "" };
                write!(f, "round {round}: {president} is presidential candidate{kind}")
            }
            GameEvent::ActionCommitted { player, action } => write!(f, "{player} {action:?}"),
            GameEvent::ChancellorNominated { government } => {
                write!(f, "{} nominates {}", government.president, government.chancellor)
            }
            GameEvent::ElectionResolved {
                government,
                ja,
                nein,
                elected,
            } => {
                let outcome = if *elected { "elected" } else { "rejected" };
                write!(f, "government {government} {outcome} ({ja} ja / {nein} nein)")
            }
            GameEvent::ElectionTrackerAdvanced { tracker } => {
                write!(f, "election tracker at {tracker}")
            }
            GameEvent::DeckReshuffled { draw_pile } => {
                write!(f, "discard pile reshuffled, {draw_pile} tiles in draw pile")
            }
            GameEvent::PoliciesDrawn { president, policies } => {
                write!(f, "{president} draws {policies:?}")
            }
            GameEvent::VetoProposed { chancellor } => write!(f, "{chancellor} proposes a veto"),
            GameEvent::VetoResolved { approved } => {
                let outcome = if *approved { "approved" } else { "refused" };
                write!(f, "veto {outcome}")
            }
            GameEvent::PolicyEnacted { policy, forced } => {
                let how = if *forced { " by the frustrated populace" } else { "" };
                write!(f, "{policy} policy enacted{how}")
            }
            GameEvent::Investigated {
                investigator,
                target,
                party,
            } => write!(f, "{investigator} investigates {target}: {party:?}"),
            GameEvent::SpecialElectionCalled {
                president,
                designated,
            } => write!(f, "{president} designates {designated} as next candidate"),
            GameEvent::PlayerExecuted { player } => write!(f, "{player} executed"),
            GameEvent::PhaseChanged { from, to } => write!(f, "phase {from:?} -> {to:?}"),
            GameEvent::GameEnded { winner, reason } => write!(f, "{winner} win: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_events() {
        let investigated = GameEvent::Investigated {
            investigator: PlayerId::new(0),
            target: PlayerId::new(3),
            party: Party::Fascist,
        };
        assert!(investigated.is_private());
        assert!(!GameEvent::PlayerExecuted { player: PlayerId::new(2) }.is_private());
    }

    #[test]
    fn test_display() {
        let event = GameEvent::GameEnded {
            winner: Team::Liberals,
            reason: WinReason::HitlerExecuted,
        };
        assert_eq!(event.to_string(), "Liberals win: Hitler executed");
        assert_eq!(event.name(), "game_ended");
    }

    #[test]
    fn test_serialization() {
        let event = GameEvent::ElectionResolved {
            government: Government::new(PlayerId::new(1), PlayerId::new(5)),
            ja: 4,
            nein: 3,
            elected: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
