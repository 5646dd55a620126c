//! Transitions, trajectories and the replay buffer.
//!
//! A trajectory records one game from the learner seats' point of view:
//! - Encoded observation before each action
//! - The action, as a global index and as a position in the legal list
//! - Reward and the encoded observation right after it
//! - Whether the game ended

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::{Action, GameRng, PlayerId, Team, WinReason};
use crate::nn::{EncodedState, Learner};

/// One `(state, action, reward, next_state, done)` tuple.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: EncodedState,
    pub action: Action,
    /// Index in the table's [`crate::nn::ActionSpace`].
    pub action_index: usize,
    /// Position of `action` in the legal list the agent chose from.
    pub legal_index: usize,
    pub legal_count: usize,
    pub reward: f64,
    pub next_state: EncodedState,
    pub done: bool,
    pub player: PlayerId,
}

/// All transitions recorded in one game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub transitions: Vec<Transition>,

    pub seed: u64,
    pub player_count: usize,
    pub winner: Option<Team>,
    pub win_reason: Option<WinReason>,
}

impl Trajectory {
    pub fn new(seed: u64, player_count: usize) -> Self {
        Self {
            transitions: Vec::new(),
            seed,
            player_count,
            winner: None,
            win_reason: None,
        }
    }

    pub fn push(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn player_transitions(&self, player: PlayerId) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.player == player)
    }

    /// The most recent transition of `player`.
    pub fn last_for_player_mut(&mut self, player: PlayerId) -> Option<&mut Transition> {
        self.transitions.iter_mut().rev().find(|t| t.player == player)
    }

    /// Sum of rewards collected by `player`.
    pub fn total_reward(&self, player: PlayerId) -> f64 {
        self.player_transitions(player).map(|t| t.reward).sum()
    }
}

/// FIFO buffer of transitions.
///
/// When full, the oldest transitions are dropped first.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    transitions: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            transitions: VecDeque::with_capacity(capacity.min(1 << 16)),
            capacity,
        }
    }

    pub fn push(&mut self, transition: Transition) {
        if self.capacity == 0 {
            return;
        }
        if self.transitions.len() >= self.capacity {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Append every transition of a trajectory.
    pub fn extend(&mut self, trajectory: Trajectory) {
        for transition in trajectory.transitions {
            self.push(transition);
        }
    }

    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.transitions.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Sample up to `batch_size` distinct transitions.
    ///
    /// Uses the provided seed for reproducibility.
    pub fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<Transition> {
        if self.transitions.is_empty() || batch_size == 0 {
            return vec![];
        }

        let mut rng = GameRng::new(seed);

        // Partial Fisher-Yates over indices
        let mut indices: Vec<usize> = (0..self.transitions.len()).collect();
        let n = indices.len();
        let limit = batch_size.min(n);

        for i in 0..limit {
            let j = i + rng.gen_range_usize(0..n - i);
            indices.swap(i, j);
        }

        indices
            .into_iter()
            .take(limit)
            .map(|i| self.transitions[i].clone())
            .collect()
    }

    /// Sample a batch and hand it to `learner`. `None` if the buffer is empty.
    pub fn train<L: Learner + ?Sized>(
        &self,
        learner: &mut L,
        batch_size: usize,
        seed: u64,
    ) -> Option<f32> {
        let batch = self.sample_batch(batch_size, seed);
        if batch.is_empty() {
            return None;
        }
        let loss = learner.train(&batch);
        log::debug!("trained on {} transitions, loss {loss}", batch.len());
        Some(loss)
    }
}

impl Default for ReplayBuffer {
    fn default() -> Self {
        Self::new(100_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Vote;
    use crate::nn::CountingLearner;

    fn transition(player: u8, reward: f64) -> Transition {
        Transition {
            state: EncodedState::zeros(vec![4]),
            action: Action::Vote(Vote::Ja),
            action_index: 0,
            legal_index: 0,
            legal_count: 2,
            reward,
            next_state: EncodedState::zeros(vec![4]),
            done: false,
            player: PlayerId::new(player),
        }
    }

    #[test]
    fn test_trajectory_player_views() {
        let mut traj = Trajectory::new(42, 5);
        assert!(traj.is_empty());

        traj.push(transition(0, 10.0));
        traj.push(transition(1, -10.0));
        traj.push(transition(0, 5.0));

        assert_eq!(traj.len(), 3);
        assert_eq!(traj.player_transitions(PlayerId::new(0)).count(), 2);
        assert_eq!(traj.total_reward(PlayerId::new(0)), 15.0);

        let last = traj.last_for_player_mut(PlayerId::new(0)).unwrap();
        assert_eq!(last.reward, 5.0);
        last.done = true;
        assert!(traj.transitions[2].done);
        assert!(traj.last_for_player_mut(PlayerId::new(4)).is_none());
    }

    #[test]
    fn test_replay_buffer_is_fifo() {
        let mut buffer = ReplayBuffer::new(3);
        for i in 0..5 {
            buffer.push(transition(0, f64::from(i)));
        }
        assert_eq!(buffer.len(), 3);
        let rewards: Vec<f64> = buffer.iter().map(|t| t.reward).collect();
        assert_eq!(rewards, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let mut buffer = ReplayBuffer::new(0);
        buffer.push(transition(0, 1.0));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_sample_batch() {
        let mut buffer = ReplayBuffer::new(100);
        for i in 0..10 {
            buffer.push(transition((i % 5) as u8, f64::from(i)));
        }

        let batch = buffer.sample_batch(5, 123);
        assert_eq!(batch.len(), 5);
        assert_eq!(batch, buffer.sample_batch(5, 123));

        let mut rewards: Vec<i64> = batch.iter().map(|t| t.reward as i64).collect();
        rewards.sort_unstable();
        rewards.dedup();
        assert_eq!(rewards.len(), 5);

        assert_eq!(buffer.sample_batch(100, 1).len(), 10);
    }

    #[test]
    fn test_train_hands_batch_to_learner() {
        let mut buffer = ReplayBuffer::default();
        let mut learner = CountingLearner::default();
        assert_eq!(buffer.train(&mut learner, 8, 0), None);

        for _ in 0..4 {
            buffer.push(transition(1, 0.0));
        }
        assert_eq!(buffer.train(&mut learner, 8, 0), Some(0.0));
        assert_eq!(learner.batches, 1);
        assert_eq!(learner.transitions, 4);
    }

    #[test]
    fn test_trajectory_serialization() {
        let mut traj = Trajectory::new(7, 5);
        traj.push(transition(2, 10.0));
        traj.winner = Some(Team::Liberals);

        let json = serde_json::to_string(&traj).unwrap();
        let back: Trajectory = serde_json::from_str(&json).unwrap();
        assert_eq!(traj, back);

        let bytes = bincode::serialize(&traj).unwrap();
        let back: Trajectory = bincode::deserialize(&bytes).unwrap();
        assert_eq!(traj, back);
    }
}
