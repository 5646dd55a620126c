//! Game rules: decision stages, win conditions and the engine that drives them.
//!
//! The engine is the single writer of game state. Drivers ask it for the
//! pending [`Decision`], fetch the legal actions for that player, and hand
//! the chosen [`crate::core::Action`] back to [`Engine::apply_action`].

pub mod engine;
pub mod phase;
pub mod win;

pub use engine::{Engine, LEGISLATIVE_DRAW};
pub use phase::{Decision, DecisionKind, ExecutivePower, Phase, PhaseKind};
pub use win::{FASCIST_TRACK, HITLER_ZONE, LIBERAL_TRACK};
