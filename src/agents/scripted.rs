//! Agent driven by closures.
//!
//! Used to force specific lines of play in tests and demos. Each decision
//! kind has its own closure; anything not overridden takes the first option,
//! votes Ja and never vetoes. Every call is appended to a shared [`CallLog`].

use std::cell::RefCell;
use std::rc::Rc;

use super::{Agent, VetoStage};
use crate::core::{Observation, PlayerId, Policy, Vote};
use crate::rules::DecisionKind;

type VoteFn = Box<dyn FnMut(&Observation) -> Vote>;
type PolicyFn = Box<dyn FnMut(&Observation, &[Policy]) -> Policy>;
type TargetFn = Box<dyn FnMut(&Observation, DecisionKind, &[PlayerId]) -> PlayerId>;
type VetoFn = Box<dyn FnMut(&Observation, VetoStage) -> bool>;

/// Decisions an agent was asked to make, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct CallLog {
    calls: Rc<RefCell<Vec<DecisionKind>>>,
}

impl CallLog {
    fn push(&self, kind: DecisionKind) {
        self.calls.borrow_mut().push(kind);
    }

    #[must_use]
    pub fn calls(&self) -> Vec<DecisionKind> {
        self.calls.borrow().clone()
    }

    #[must_use]
    pub fn count(&self, kind: DecisionKind) -> usize {
        self.calls.borrow().iter().filter(|k| **k == kind).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.borrow().is_empty()
    }
}

/// Closure-driven agent.
///
/// ```
/// use secret_hitler_rl::agents::ScriptedAgent;
/// use secret_hitler_rl::core::{Policy, Vote};
///
/// let agent = ScriptedAgent::new()
///     .on_vote(|_| Vote::Nein)
///     .prefer(Policy::Liberal);
/// assert!(agent.log().is_empty());
/// ```
pub struct ScriptedAgent {
    vote: VoteFn,
    discard: PolicyFn,
    enact: PolicyFn,
    target: TargetFn,
    veto: VetoFn,
    log: CallLog,
}

impl Default for ScriptedAgent {
    fn default() -> Self {
        Self::new()
    }
}

fn first_policy(options: &[Policy]) -> Policy {
    options.first().copied().unwrap_or(Policy::Fascist)
}

impl ScriptedAgent {
    #[must_use]
    pub fn new() -> Self {
        Self {
            vote: Box::new(|_: &Observation| Vote::Ja),
            discard: Box::new(|_: &Observation, options: &[Policy]| first_policy(options)),
            enact: Box::new(|_: &Observation, options: &[Policy]| first_policy(options)),
            target: Box::new(
                |obs: &Observation, _: DecisionKind, candidates: &[PlayerId]| {
                    candidates.first().copied().unwrap_or(obs.player)
                },
            ),
            veto: Box::new(|_: &Observation, _: VetoStage| false),
            log: CallLog::default(),
        }
    }

    #[must_use]
    pub fn on_vote(mut self, f: impl FnMut(&Observation) -> Vote + 'static) -> Self {
        self.vote = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_discard(mut self, f: impl FnMut(&Observation, &[Policy]) -> Policy + 'static) -> Self {
        self.discard = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_enact(mut self, f: impl FnMut(&Observation, &[Policy]) -> Policy + 'static) -> Self {
        self.enact = Box::new(f);
        self
    }

    /// Closure for every seat choice: nomination, investigation, special
    /// election and execution.
    #[must_use]
    pub fn on_target(
        mut self,
        f: impl FnMut(&Observation, DecisionKind, &[PlayerId]) -> PlayerId + 'static,
    ) -> Self {
        self.target = Box::new(f);
        self
    }

    #[must_use]
    pub fn on_veto(mut self, f: impl FnMut(&Observation, VetoStage) -> bool + 'static) -> Self {
        self.veto = Box::new(f);
        self
    }

    /// Keep `policy` whenever possible: discard the other kind, enact this one.
    #[must_use]
    pub fn prefer(self, policy: Policy) -> Self {
        self.on_discard(move |_, options| {
            options
                .iter()
                .copied()
                .find(|p| *p != policy)
                .unwrap_or(policy)
        })
        .on_enact(move |_, options| {
            if options.contains(&policy) {
                policy
            } else {
                first_policy(options)
            }
        })
    }

    /// Always pick `seat` when it is among the candidates.
    #[must_use]
    pub fn target_seat(self, seat: PlayerId) -> Self {
        self.on_target(move |obs, _, candidates| {
            if candidates.contains(&seat) {
                seat
            } else {
                candidates.first().copied().unwrap_or(obs.player)
            }
        })
    }

    /// Handle to the shared call log.
    #[must_use]
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn choose_target(
        &mut self,
        obs: &Observation,
        kind: DecisionKind,
        candidates: &[PlayerId],
    ) -> PlayerId {
        self.log.push(kind);
        (self.target)(obs, kind, candidates)
    }
}

impl Agent for ScriptedAgent {
    fn nominate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.choose_target(obs, DecisionKind::Nominate, candidates)
    }

    fn vote(&mut self, obs: &Observation) -> Vote {
        self.log.push(DecisionKind::Vote);
        (self.vote)(obs)
    }

    fn discard(&mut self, obs: &Observation, options: &[Policy]) -> Policy {
        self.log.push(DecisionKind::Discard);
        (self.discard)(obs, options)
    }

    fn enact(&mut self, obs: &Observation, options: &[Policy]) -> Policy {
        self.log.push(DecisionKind::Enact);
        (self.enact)(obs, options)
    }

    fn decide_veto(&mut self, obs: &Observation, stage: VetoStage) -> bool {
        if stage == VetoStage::Consent {
            self.log.push(DecisionKind::VetoConsent);
        }
        (self.veto)(obs, stage)
    }

    fn investigate(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.choose_target(obs, DecisionKind::Investigate, candidates)
    }

    fn designate_president(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.choose_target(obs, DecisionKind::DesignatePresident, candidates)
    }

    fn choose_kill_target(&mut self, obs: &Observation, candidates: &[PlayerId]) -> PlayerId {
        self.choose_target(obs, DecisionKind::Execute, candidates)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
