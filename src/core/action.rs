//! Action representation.
//!
//! Every decision an agent can make is one variant of [`Action`]. The engine
//! handles each variant exhaustively per stage; there are no loosely typed
//! action tuples.

use serde::{Deserialize, Serialize};

use super::deck::Policy;
use super::player::PlayerId;

/// A ballot on a proposed government.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Vote {
    Ja,
    Nein,
}

impl Vote {
    #[must_use]
    pub const fn is_ja(self) -> bool {
        matches!(self, Vote::Ja)
    }
}

impl From<bool> for Vote {
    fn from(ja: bool) -> Self {
        if ja {
            Vote::Ja
        } else {
            Vote::Nein
        }
    }
}

/// A complete game action.
///
/// ```
/// use secret_hitler_rl::core::{Action, PlayerId, Policy, Vote};
///
/// let nominate = Action::Nominate(PlayerId::new(3));
/// assert_eq!(nominate.target(), Some(PlayerId::new(3)));
///
/// let vote = Action::Vote(Vote::Ja);
/// assert_eq!(vote.target(), None);
/// assert_eq!(Action::Enact(Policy::Liberal).policy(), Some(Policy::Liberal));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// President proposes a chancellor.
    Nominate(PlayerId),
    /// A living player votes on the proposed government.
    Vote(Vote),
    /// President discards one of the three drawn policies.
    Discard(Policy),
    /// Chancellor enacts one of the two remaining policies.
    Enact(Policy),
    /// Chancellor proposes a veto (`true`), or the president answers one.
    Veto(bool),
    /// President looks at a player's party membership.
    Investigate(PlayerId),
    /// President picks the next presidential candidate.
    DesignatePresident(PlayerId),
    /// President executes a player.
    Execute(PlayerId),
}

impl Action {
    /// The player this action targets, if any.
    #[must_use]
    pub const fn target(&self) -> Option<PlayerId> {
        match self {
            Action::Nominate(p)
            | Action::Investigate(p)
            | Action::DesignatePresident(p)
            | Action::Execute(p) => Some(*p),
            Action::Vote(_) | Action::Discard(_) | Action::Enact(_) | Action::Veto(_) => None,
        }
    }

    /// The policy this action handles, if any.
    #[must_use]
    pub const fn policy(&self) -> Option<Policy> {
        match self {
            Action::Discard(p) | Action::Enact(p) => Some(*p),
            _ => None,
        }
    }

    /// Short verb for logs.
    #[must_use]
    pub const fn verb(&self) -> &'static str {
        match self {
            Action::Nominate(_) => "nominate",
            Action::Vote(_) => "vote",
            Action::Discard(_) => "discard",
            Action::Enact(_) => "enact",
            Action::Veto(_) => "veto",
            Action::Investigate(_) => "investigate",
            Action::DesignatePresident(_) => "designate",
            Action::Execute(_) => "execute",
        }
    }
}

/// A committed action with its position in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: PlayerId,
    pub action: Action,
    /// Election round the action belongs to (starts at 1).
    pub round: u32,
    /// Global sequence number of the action within the game.
    pub sequence: u32,
}

impl ActionRecord {
    #[must_use]
    pub fn new(player: PlayerId, action: Action, round: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            round,
            sequence,
        }
    }
}
