//! Training data: rewards, trajectories, the self-play loop and summary sinks.
//!
//! ## Overview
//!
//! - **RewardFn**: scores each committed action for the seat that took it
//! - **Trajectory**: the transitions recorded in one game
//! - **ReplayBuffer**: FIFO store with seeded batch sampling
//! - **SelfPlayRunner**: plays batches of games and collects trajectories
//! - **SummarySink**: receives one summary per finished game
//!
//! ## Usage
//!
//! ```rust
//! use secret_hitler_rl::nn::CountingLearner;
//! use secret_hitler_rl::training::{
//!     random_agents, NullSink, ReplayBuffer, SelfPlayConfig, SelfPlayRunner,
//! };
//!
//! let config = SelfPlayConfig::default()
//!     .with_player_count(5)
//!     .with_games(2)
//!     .with_seed_offset(1000);
//! let runner = SelfPlayRunner::new(config);
//!
//! let mut buffer = ReplayBuffer::new(10_000);
//! let mut learner = CountingLearner::default();
//! let stats = runner.run_training(random_agents, &mut NullSink, &mut buffer, &mut learner, 32);
//!
//! assert_eq!(stats.games_played, 2);
//! assert_eq!(learner.batches, 2);
//! ```

pub mod reward;
pub mod self_play;
pub mod sink;
pub mod trajectory;

pub use reward::{DefaultReward, RewardFn, RewardWeights};
pub use self_play::{
    random_agents, seat_seed, GameRecord, RunReport, RunStats, SelfPlayConfig, SelfPlayRunner,
};
pub use sink::{read_summaries, BincodeSink, GameSummary, MemorySink, NullSink, SummarySink};
pub use trajectory::{ReplayBuffer, Trajectory, Transition};
