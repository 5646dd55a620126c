//! Per-action rewards.
//!
//! A reward function looks at the acting seat's observation before and after
//! a committed action. It is pure: same inputs, same reward, no side effects.

use serde::{Deserialize, Serialize};

use crate::core::{Action, Observation, Party, Policy};

/// Scores one committed action for the seat that took it.
pub trait RewardFn {
    fn reward(&self, prev: &Observation, next: &Observation, action: &Action, done: bool) -> f64;
}

impl<F> RewardFn for F
where
    F: Fn(&Observation, &Observation, &Action, bool) -> f64,
{
    fn reward(&self, prev: &Observation, next: &Observation, action: &Action, done: bool) -> f64 {
        self(prev, next, action, done)
    }
}

/// Weights of [`DefaultReward`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RewardWeights {
    pub win: f64,
    pub loss: f64,
    pub own_policy: f64,
    pub other_policy: f64,
    /// Investigating a dead seat. The engine never accepts such an action, so
    /// this only fires for callers that score an agent's raw answer before
    /// legality is checked.
    pub dead_target: f64,
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            win: 100.0,
            loss: -100.0,
            own_policy: 10.0,
            other_policy: -10.0,
            dead_target: -20.0,
        }
    }
}

/// Terminal win/loss plus shaping for enactments and wasted investigations.
///
/// ```
/// use secret_hitler_rl::training::{DefaultReward, RewardWeights};
///
/// let reward = DefaultReward::default();
/// assert_eq!(reward.weights(), RewardWeights::default());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultReward {
    weights: RewardWeights,
}

impl DefaultReward {
    #[must_use]
    pub fn new(weights: RewardWeights) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> RewardWeights {
        self.weights
    }
}

impl RewardFn for DefaultReward {
    fn reward(&self, prev: &Observation, next: &Observation, action: &Action, done: bool) -> f64 {
        let w = &self.weights;
        let mut reward = 0.0;

        if done {
            match next.won() {
                Some(true) => reward += w.win,
                Some(false) => reward += w.loss,
                None => {}
            }
        }

        match action {
            Action::Enact(policy) => {
                let own = match prev.role.party() {
                    Party::Liberal => Policy::Liberal,
                    Party::Fascist => Policy::Fascist,
                };
                reward += if *policy == own {
                    w.own_policy
                } else {
                    w.other_policy
                };
            }
            // Unreachable for committed actions; see `RewardWeights::dead_target`.
            Action::Investigate(target) if !prev.public.is_alive(*target) => {
                reward += w.dead_target;
            }
            _ => {}
        }

        reward
    }
}
