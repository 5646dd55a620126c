//! Agent backed by a policy model.
//!
//! Every decision is encoded with the agent's [`StateEncoder`] and handed to
//! the model together with the number of legal options. An index prediction
//! picks that option; a distribution is sampled. Output that does not fit the
//! option list is logged and replaced by a uniform choice.

use super::{Agent, VetoStage};
use crate::core::{Action, GameRng, Observation, PlayerId, Policy, Vote};
use crate::nn::{FeatureEncoder, PolicyModel, Prediction, StateEncoder};
use crate::rules::Decision;

pub struct ModelAgent<M: PolicyModel, E: StateEncoder = FeatureEncoder> {
    model: M,
    encoder: E,
    rng: GameRng,
    fallbacks: usize,
}

impl<M: PolicyModel> ModelAgent<M> {
    /// Model agent using the flat feature encoder.
    pub fn new(model: M, player_count: usize, seed: u64) -> Self {
        Self::with_encoder(model, FeatureEncoder::new(player_count), seed)
    }
}

impl<M: PolicyModel, E: StateEncoder> ModelAgent<M, E> {
    pub fn with_encoder(model: M, encoder: E, seed: u64) -> Self {
        Self {
            model,
            encoder,
            rng: GameRng::new(seed),
            fallbacks: 0,
        }
    }

    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// How many times model output had to be replaced by a uniform choice.
    #[must_use]
    pub fn fallbacks(&self) -> usize {
        self.fallbacks
    }

    fn pick<T: Copy>(&mut self, obs: &Observation, options: &[T], fallback: T) -> T {
        if options.len() <= 1 {
            return options.first().copied().unwrap_or(fallback);
        }

        let state = self.encoder.encode(obs);
        let prediction = self.model.predict(&state, options.len());
        let chosen = match &prediction {
            Prediction::Index(i) if *i < options.len() => Some(*i),
            Prediction::Distribution(weights) if weights.len() == options.len() => {
                self.rng.choose_weighted(weights)
            }
            _ => None,
        };

        match chosen {
            Some(index) => options[index],
            None => {
                log::warn!(
                    "{} cannot use model output {prediction:?} for {} options; choosing uniformly",
                    obs.player,
                    options.len()
                );
                self.fallbacks += 1;
                self.rng.choose(options).copied().unwrap_or(fallback)
            }
        }
    }
}

impl<M: PolicyModel, E: StateEncoder> Agent for ModelAgent<M, E> {
    fn nominate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(obs, candidates, obs.player)
    }

    fn vote(&mut self, obs: &Observation) -> Vote {
        self.pick(obs, &[Vote::Ja, Vote::Nein], Vote::Nein)
    }

    fn discard(&mut self, obs: &Observation, options: &[Policy]) -> Policy {
        self.pick(obs, options, Policy::Fascist)
    }

    fn enact(&mut self, obs: &Observation, options: &[Policy]) -> Policy {
        self.pick(obs, options, Policy::Fascist)
    }

    fn decide_veto(&mut self, obs: &Observation, _stage: VetoStage) -> bool {
        self.pick(obs, &[true, false], false)
    }

    fn investigate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(obs, candidates, obs.player)
    }

    fn designate_president(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(obs, candidates, obs.player)
    }

    fn choose_kill_target(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.pick(obs, candidates, obs.player)
    }

    /// The model indexes straight into the legal list, so the recorded
    /// `legal_count` of a transition matches what the model saw.
    fn act(&mut self, obs: &Observation, _decision: &Decision, legal: &[Action]) -> Action {
        let options = self.possible_actions(obs, legal);
        let fallback = options.first().copied().unwrap_or(Action::Veto(false));
        self.pick(obs, &options, fallback)
    }

    fn name(&self) -> &str {
        "model"
    }
}
