//! # secret-hitler-rl
//!
//! A hidden-role election game engine built for generating reinforcement
//! learning trajectories.
//!
//! ## Design Principles
//!
//! 1. **Step-Wise**: The engine never calls out. Callers ask for the next
//!    decision, the legal actions of a seat, and apply one action at a time.
//!
//! 2. **One Owner**: All mutable game state lives in one [`Engine`]. Agents
//!    only ever see an [`Observation`] built for their seat.
//!
//! 3. **Reproducible**: Every shuffle and every random agent draws from a
//!    [`GameRng`] derived from a single `u64` seed.
//!
//! ## Architecture
//!
//! - **Phases as data**: Each stage of a round is a [`Phase`] variant carrying
//!   exactly what that stage needs (the drawn hand, pending votes, the power
//!   to use).
//!
//! - **Persistent history**: Election and action history use `im-rs`, so
//!   observations are cheap to snapshot per action.
//!
//! - **Observers**: Every state change is published as a [`GameEvent`] to the
//!   registered [`GameObserver`]s, synchronously.
//!
//! ## Modules
//!
//! - `core`: Players, roles, policies, deck, actions, state, RNG, configuration
//! - `rules`: Phases, win conditions and the [`Engine`]
//! - `events`: Game events and observers
//! - `agents`: The [`Agent`] trait with random, model-backed and scripted agents
//! - `nn`: Observation encoding, the action index space and model traits
//! - `training`: Rewards, trajectories, self-play and summary sinks

pub mod agents;
pub mod core;
pub mod events;
pub mod nn;
pub mod rules;
pub mod training;

#[cfg(feature = "python")]
mod python;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionRecord, GameConfig, GameError, GameResult, GameRng, Observation, Party, PlayerId,
    PlayerMap, Policy, PublicState, Role, Team, Vote, WinReason,
};

pub use crate::rules::{Decision, DecisionKind, Engine, ExecutivePower, Phase, PhaseKind};

pub use crate::events::{GameEvent, GameObserver, LogObserver, RecordingObserver};

pub use crate::agents::{Agent, ModelAgent, RandomAgent, ScriptedAgent};

pub use crate::nn::{ActionSpace, EncodedState, FeatureEncoder, PolicyModel, StateEncoder};

pub use crate::training::{
    DefaultReward, ReplayBuffer, RewardFn, SelfPlayConfig, SelfPlayRunner, SummarySink,
    Trajectory, Transition,
};
