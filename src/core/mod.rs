//! Core engine types: players, roles, policies, actions, state, RNG, configuration.
//!
//! These are the building blocks the rules engine, agents and training loop
//! share. Nothing in here drives the game; that is `rules::Engine`'s job.

pub mod action;
pub mod config;
pub mod deck;
pub mod error;
pub mod observation;
pub mod player;
pub mod rng;
pub mod role;
pub mod state;

pub use action::{Action, ActionRecord, Vote};
pub use config::{GameConfig, DEFAULT_TERM_LIMIT_RELAXATION};
pub use deck::{DeckComposition, Policy, PolicyDeck, PolicyHand, REFILL_BELOW};
pub use error::{GameError, GameResult};
pub use observation::{Observation, PublicState};
pub use player::{PlayerId, PlayerMap};
pub use rng::GameRng;
pub use role::{Party, Role, RoleTable, Team};
pub use state::{
    ElectionRecord, GameSession, Government, PlayerRecord, WinReason, ELECTION_TRACKER_LIMIT,
};
