//! Model integration.
//!
//! ## Overview
//!
//! - **Encoding**: `StateEncoder` trait and the flat `FeatureEncoder`
//! - **Actions**: `ActionSpace` gives every action a stable global index
//! - **Traits**: `PolicyModel` predicts over a legal action list, `Learner`
//!   consumes transition batches
//! - **Baseline**: `UniformModel`, `CountingLearner` for testing
//!
//! ## Usage
//!
//! ```
//! use secret_hitler_rl::core::GameConfig;
//! use secret_hitler_rl::nn::{FeatureEncoder, PolicyModel, StateEncoder, UniformModel};
//! use secret_hitler_rl::rules::Engine;
//!
//! let engine = Engine::new(GameConfig::new(5)).unwrap();
//! let decision = engine.next_decision().unwrap();
//! let legal = engine.legal_actions(decision.player);
//!
//! let encoded = FeatureEncoder::new(5).encode(&engine.observation(decision.player));
//! let prediction = UniformModel.predict(&encoded, legal.len());
//! assert!(prediction.is_usable(legal.len()));
//! ```

pub mod action_space;
pub mod encoder;
pub mod traits;

pub use action_space::ActionSpace;
pub use encoder::{FeatureEncoder, StateEncoder};
pub use traits::{CountingLearner, EncodedState, Learner, PolicyModel, Prediction, UniformModel};
