//! Error types for engine operations.

use thiserror::Error;

use super::action::Action;
use super::deck::Policy;
use super::player::PlayerId;

/// Result alias used throughout the engine.
pub type GameResult<T> = Result<T, GameError>;

/// Errors raised by the engine.
///
/// Failed elections and vetoes are ordinary game flow and never show up here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The actor or the action is outside the legal set for the pending stage.
    /// The engine state is left untouched.
    #[error("illegal action {action:?} by {player}: {reason}")]
    IllegalAction {
        player: PlayerId,
        action: Action,
        reason: String,
    },

    /// A draw could not be satisfied even after reshuffling the discard pile.
    #[error("deck underflow: needed {needed}, draw pile has {available} and discard pile has {discarded}")]
    DeckUnderflow {
        needed: usize,
        available: usize,
        discarded: usize,
    },

    /// The chancellor was handed something other than exactly two policies.
    #[error("chancellor must receive exactly 2 policies, got {count}")]
    InvalidEnactmentCount { count: usize },

    /// A tile was released from the government's hand that it does not hold.
    #[error("no {policy} policy is held by the sitting government")]
    PolicyNotHeld { policy: Policy },

    /// The game already reached a terminal state.
    #[error("game is over; no further actions are accepted")]
    PostTerminalMutation,

    /// The table could not be set up.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl GameError {
    /// Fatal errors abort the game instance; it must not be driven further.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        match self {
            GameError::IllegalAction { .. } => false,
            GameError::DeckUnderflow { .. }
            | GameError::InvalidEnactmentCount { .. }
            | GameError::PolicyNotHeld { .. }
            | GameError::PostTerminalMutation
            | GameError::InvalidConfig(_) => true,
        }
    }
}
