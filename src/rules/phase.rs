//! Decision stages of a game.
//!
//! The public phase cycle is `Election -> Legislative -> Executive`, with
//! `Terminal` absorbing. Each phase is split into stages that wait on exactly
//! one kind of decision; `Voting` is the only stage several players act in.

use serde::{Deserialize, Serialize};

use crate::core::{Government, PlayerId, PlayerMap, PolicyHand, Vote, WinReason};

/// Coarse phase, as shown to every player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    Election,
    Legislative,
    Executive,
    Terminal,
}

/// Presidential power unlocked by a Fascist enactment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExecutivePower {
    Investigate,
    SpecialElection,
    Execution,
}

impl ExecutivePower {
    /// Power granted when the Fascist track reaches `fascist_enacted`.
    ///
    /// ```
    /// use secret_hitler_rl::rules::ExecutivePower;
    ///
    /// assert_eq!(ExecutivePower::for_fascist_count(1), None);
    /// assert_eq!(ExecutivePower::for_fascist_count(2), Some(ExecutivePower::Investigate));
    /// assert_eq!(ExecutivePower::for_fascist_count(5), Some(ExecutivePower::Execution));
    /// ```
    #[must_use]
    pub const fn for_fascist_count(fascist_enacted: u8) -> Option<Self> {
        match fascist_enacted {
            2 => Some(ExecutivePower::Investigate),
            3 => Some(ExecutivePower::SpecialElection),
            4 | 5 => Some(ExecutivePower::Execution),
            _ => None,
        }
    }
}

/// What the pending decision is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DecisionKind {
    Nominate,
    Vote,
    Discard,
    Enact,
    VetoConsent,
    Investigate,
    DesignatePresident,
    Execute,
}

/// The player the engine is waiting on, and for what.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub player: PlayerId,
    pub kind: DecisionKind,
}

impl Decision {
    #[must_use]
    pub const fn new(player: PlayerId, kind: DecisionKind) -> Self {
        Self { player, kind }
    }
}

/// Current stage with the data it needs to resolve.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// President picks a chancellor nominee.
    Nomination { president: PlayerId },
    /// Living players vote on the proposed government.
    Voting {
        government: Government,
        votes: PlayerMap<Option<Vote>>,
    },
    /// President holds three tiles and discards one.
    PresidentDiscard {
        government: Government,
        drawn: PolicyHand,
    },
    /// Chancellor holds two tiles and enacts one, or proposes a veto.
    ChancellorEnact {
        government: Government,
        remaining: PolicyHand,
        veto_refused: bool,
    },
    /// President answers the chancellor's veto proposal.
    VetoConsent {
        government: Government,
        remaining: PolicyHand,
    },
    /// President uses the power unlocked by the last enactment.
    Executive {
        president: PlayerId,
        power: ExecutivePower,
    },
    GameOver { reason: WinReason },
}

impl Phase {
    #[must_use]
    pub const fn kind(&self) -> PhaseKind {
        match self {
            Phase::Nomination { .. } | Phase::Voting { .. } => PhaseKind::Election,
            Phase::PresidentDiscard { .. }
            | Phase::ChancellorEnact { .. }
            | Phase::VetoConsent { .. } => PhaseKind::Legislative,
            Phase::Executive { .. } => PhaseKind::Executive,
            Phase::GameOver { .. } => PhaseKind::Terminal,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver { .. })
    }

    /// Government this stage belongs to, if one is proposed or seated.
    #[must_use]
    pub const fn government(&self) -> Option<Government> {
        match self {
            Phase::Voting { government, .. }
            | Phase::PresidentDiscard { government, .. }
            | Phase::ChancellorEnact { government, .. }
            | Phase::VetoConsent { government, .. } => Some(*government),
            Phase::Nomination { .. } | Phase::Executive { .. } | Phase::GameOver { .. } => None,
        }
    }

    /// Tiles held by `player` during this stage.
    #[must_use]
    pub fn hand_of(&self, player: PlayerId) -> PolicyHand {
        match self {
            Phase::PresidentDiscard { government, drawn } if government.president == player => {
                drawn.clone()
            }
            Phase::ChancellorEnact {
                government,
                remaining,
                ..
            } if government.chancellor == player => remaining.clone(),
            _ => PolicyHand::new(),
        }
    }
}
