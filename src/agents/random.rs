//! Uniformly random agent.

use super::{Agent, VetoStage};
use crate::core::{GameRng, Observation, PlayerId, Policy, Vote};

/// Picks uniformly among the legal options. Votes and veto answers are fair
/// coin flips.
#[derive(Clone, Debug)]
pub struct RandomAgent {
    rng: GameRng,
}

impl RandomAgent {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: GameRng::new(seed),
        }
    }

    #[must_use]
    pub fn from_rng(rng: GameRng) -> Self {
        Self { rng }
    }

    fn pick<T: Copy>(&mut self, options: &[T], fallback: T) -> T {
        self.rng.choose(options).copied().unwrap_or(fallback)
    }
}

impl Agent for RandomAgent {
    fn nominate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(candidates, obs.player)
    }

    fn vote(&mut self, _obs: &Observation) -> Vote {
        Vote::from(self.rng.gen_bool(0.5))
    }

    fn discard(&mut self, _obs: &Observation, options: &[Policy]) -> Policy {
        self.pick(options, Policy::Fascist)
    }

    fn enact(&mut self, _obs: &Observation, options: &[Policy]) -> Policy {
        self.pick(options, Policy::Fascist)
    }

    fn decide_veto(&mut self, _obs: &Observation, _stage: VetoStage) -> bool {
        self.rng.gen_bool(0.5)
    }

    fn investigate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(candidates, obs.player)
    }

    fn designate_president(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(candidates, obs.player)
    }

    fn choose_kill_target(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(candidates, obs.player)
    }

    fn name(&self) -> &str {
        "random"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::rules::Engine;

    #[test]
    fn test_random_agents_finish_games() {
        for seed in 0..20 {
            let config = GameConfig::new(5 + (seed as usize % 6)).with_seed(seed);
            let mut engine = Engine::new(config).unwrap();
            let mut agents: Vec<RandomAgent> = (0..engine.config().player_count)
                .map(|i| RandomAgent::new(seed * 100 + i as u64))
                .collect();

            while let Some(decision) = engine.next_decision() {
                let obs = engine.observation(decision.player);
                let legal = engine.legal_actions(decision.player);
                let action = agents[decision.player.index()].act(&obs, &decision, &legal);
                engine.apply_action(decision.player, action).unwrap();
            }
            assert!(engine.winner().is_some(), "seed {seed}");
        }
    }

    #[test]
    fn test_same_seed_same_choices() {
        let engine = Engine::new(GameConfig::new(7)).unwrap();
        let obs = engine.observation(PlayerId::new(0));
        let candidates: Vec<PlayerId> = (1..7).map(PlayerId::new).collect();

        let mut a = RandomAgent::new(9);
        let mut b = RandomAgent::new(9);
        for _ in 0..10 {
            assert_eq!(a.nominate(&obs, &candidates), b.nominate(&obs, &candidates));
            assert_eq!(a.vote(&obs), b.vote(&obs));
        }
    }

    #[test]
    fn test_empty_candidates_falls_back_to_self() {
        let engine = Engine::new(GameConfig::new(5)).unwrap();
        let obs = engine.observation(PlayerId::new(2));
        assert_eq!(RandomAgent::new(1).nominate(&obs, &[]), PlayerId::new(2));
    }
}
