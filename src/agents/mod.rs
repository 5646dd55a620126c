//! Player agents.
//!
//! An agent answers the engine's decisions for one seat. Each method gets the
//! seat's [`Observation`] and the options the engine considers legal; the
//! engine stays the only judge of legality and rejects anything else.
//!
//! ## Implementations
//!
//! - [`RandomAgent`]: uniform choice from a seeded RNG
//! - [`ModelAgent`]: asks a [`crate::nn::PolicyModel`] over the legal list
//! - [`ScriptedAgent`]: closures per decision, for tests and demos

pub mod model;
pub mod random;
pub mod scripted;

pub use model::ModelAgent;
pub use random::RandomAgent;
pub use scripted::{CallLog, ScriptedAgent};

use crate::core::{Action, Observation, PlayerId, Policy, Vote};
use crate::rules::{Decision, DecisionKind};

/// Which side of a veto the agent is deciding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VetoStage {
    /// Chancellor: ask to discard both remaining policies.
    Propose,
    /// President: agree to the chancellor's request.
    Consent,
}

/// Decision-making for one seat.
pub trait Agent {
    fn nominate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId;

    fn vote(&mut self, obs: &Observation) -> Vote;

    /// Pick the policy to discard. `options` holds each distinct tile once;
    /// the full hand is in `obs.hand`.
    fn discard(&mut self, obs: &Observation, options: &[Policy]) -> Policy;

    fn enact(&mut self, obs: &Observation, options: &[Policy]) -> Policy;

    fn decide_veto(&mut self, obs: &Observation, stage: VetoStage) -> bool;

    fn investigate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId;

    /// Special election: choose the next presidential candidate.
    fn designate_president(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId;

    fn choose_kill_target(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId;

    /// The actions this agent is willing to consider, out of the legal set.
    fn possible_actions(&self, _obs: &Observation, legal: &[Action]) -> Vec<Action> {
        legal.to_vec()
    }

    /// Answer a pending decision by dispatching to the matching method.
    fn act(&mut self, obs: &Observation, decision: &Decision, legal: &[Action]) -> Action {
        let options = self.possible_actions(obs, legal);
        match decision.kind {
            DecisionKind::Nominate => Action::Nominate(self.nominate(obs, &targets(&options))),
            DecisionKind::Vote => Action::Vote(self.vote(obs)),
            DecisionKind::Discard => Action::Discard(self.discard(obs, &policies(&options))),
            DecisionKind::Enact => {
                if options.contains(&Action::Veto(true))
                    && self.decide_veto(obs, VetoStage::Propose)
                {
                    Action::Veto(true)
                } else {
                    Action::Enact(self.enact(obs, &policies(&options)))
                }
            }
            DecisionKind::VetoConsent => Action::Veto(self.decide_veto(obs, VetoStage::Consent)),
            DecisionKind::Investigate => {
                Action::Investigate(self.investigate(obs, &targets(&options)))
            }
            DecisionKind::DesignatePresident => {
                Action::DesignatePresident(self.designate_president(obs, &targets(&options)))
            }
            DecisionKind::Execute => {
                Action::Execute(self.choose_kill_target(obs, &targets(&options)))
            }
        }
    }

    /// Label for logs and summaries.
    fn name(&self) -> &str {
        "agent"
    }
}

impl<A: Agent + ?Sized> Agent for Box<A> {
    fn nominate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        (**self).nominate(obs, candidates)
    }

    fn vote(&mut self, obs: &Observation) -> Vote {
        (**self).vote(obs)
    }

    fn discard(&mut self, obs: &Observation, options: &[Policy]) -> Policy {
        (**self).discard(obs, options)
    }

    fn enact(&mut self, obs: &Observation, options: &[Policy]) -> Policy {
        (**self).enact(obs, options)
    }

    fn decide_veto(&mut self, obs: &Observation, stage: VetoStage) -> bool {
        (**self).decide_veto(obs, stage)
    }

    fn investigate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        (**self).investigate(obs, candidates)
    }

    fn designate_president(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        (**self).designate_president(obs, candidates)
    }

    fn choose_kill_target(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        (**self).choose_kill_target(obs, candidates)
    }

    fn possible_actions(&self, obs: &Observation, legal: &[Action]) -> Vec<Action> {
        (**self).possible_actions(obs, legal)
    }

    fn act(&mut self, obs: &Observation, decision: &Decision, legal: &[Action]) -> Action {
        (**self).act(obs, decision, legal)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Seats targeted by a list of actions.
pub(crate) fn targets(actions: &[Action]) -> Vec<PlayerId> {
    actions.iter().filter_map(Action::target).collect()
}

/// Policies handled by a list of actions.
pub(crate) fn policies(actions: &[Action]) -> Vec<Policy> {
    actions.iter().filter_map(Action::policy).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_extraction() {
        let legal = [
            Action::Enact(Policy::Liberal),
            Action::Enact(Policy::Fascist),
            Action::Veto(true),
        ];
        assert_eq!(policies(&legal), vec![Policy::Liberal, Policy::Fascist]);
        assert!(targets(&legal).is_empty());

        let legal = [
            Action::Execute(PlayerId::new(1)),
            Action::Execute(PlayerId::new(4)),
        ];
        assert_eq!(targets(&legal), vec![PlayerId::new(1), PlayerId::new(4)]);
    }
}
