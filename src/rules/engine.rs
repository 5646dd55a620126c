//! The game engine.
//!
//! `Engine` owns one game: the session counters, the seats, the policy deck
//! and the pending decision stage. It is driven step by step:
//!
//! ```
//! use secret_hitler_rl::core::GameConfig;
//! use secret_hitler_rl::rules::Engine;
//!
//! let mut engine = Engine::new(GameConfig::new(5).with_seed(7)).unwrap();
//! while let Some(decision) = engine.next_decision() {
//!     let legal = engine.legal_actions(decision.player);
//!     engine.apply_action(decision.player, legal[0]).unwrap();
//! }
//! assert!(engine.is_terminal());
//! ```
//!
//! ## Validation
//!
//! `apply_action` checks the action against `legal_actions` before touching
//! anything. An illegal action returns `GameError::IllegalAction` and leaves
//! the game exactly as it was. Every other error is fatal for the instance.
//!
//! ## Observations
//!
//! The public projection is re-synced once per committed action, after the
//! whole transition has been applied.

use im::{OrdMap, Vector};
use smallvec::SmallVec;

use super::phase::{Decision, DecisionKind, ExecutivePower, Phase};
use super::win;
use crate::core::{
    Action, ActionRecord, ElectionRecord, GameConfig, GameError, GameResult, GameRng,
    GameSession, Government, Observation, PlayerId, PlayerMap, PlayerRecord, Policy, PolicyDeck,
    PolicyHand, PublicState, Role, Team, Vote, WinReason, ELECTION_TRACKER_LIMIT,
};
use crate::events::{GameEvent, GameObserver};

/// Tiles drawn at the start of a legislative session.
pub const LEGISLATIVE_DRAW: usize = 3;

/// One game instance.
pub struct Engine {
    config: GameConfig,
    session: GameSession,
    players: PlayerMap<PlayerRecord>,
    deck: PolicyDeck,
    deck_rng: GameRng,
    phase: Phase,
    public: PublicState,
    /// Last president chosen by regular rotation (or the caller of a special election).
    rotation_anchor: Option<PlayerId>,
    /// Candidate picked by a special election, presiding for one round.
    designated_president: Option<PlayerId>,
    actions: Vector<ActionRecord>,
    observers: Vec<Box<dyn GameObserver>>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("session", &self.session)
            .field("phase", &self.phase)
            .field("draw_pile", &self.deck.len())
            .field("discard_pile", &self.deck.discard_len())
            .field("held", &self.deck.held_len())
            .finish_non_exhaustive()
    }
}

impl Engine {
    /// Set up a table: validate the config, seat roles, shuffle the deck and
    /// open the first election.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        Self::with_observers(config, Vec::new())
    }

    /// Like [`Self::new`], with observers attached before the first round opens.
    pub fn with_observers(
        config: GameConfig,
        observers: Vec<Box<dyn GameObserver>>,
    ) -> GameResult<Self> {
        config.validate()?;

        let rng = GameRng::new(config.seed);
        let roles: Vec<Role> = match &config.fixed_roles {
            Some(roles) => roles.clone(),
            None => {
                let mut roles = config.roles.roles();
                rng.for_context("roles").shuffle(&mut roles);
                roles
            }
        };

        let mut deck_rng = rng.for_context("deck");
        let deck = match &config.stacked_deck {
            Some(top_first) => PolicyDeck::stacked(top_first.clone()),
            None => PolicyDeck::shuffled(config.deck, &mut deck_rng),
        };

        let players = PlayerMap::from_vec(roles.into_iter().map(PlayerRecord::new).collect());
        let public = PublicState::new(config.player_count, config.deck);
        let first = config.first_president;

        let mut engine = Self {
            config,
            session: GameSession::new(),
            players,
            deck,
            deck_rng,
            phase: Phase::Nomination { president: first },
            public,
            rotation_anchor: None,
            designated_president: None,
            actions: Vector::new(),
            observers,
        };
        log::debug!(
            "new game: {} players, seed {}",
            engine.config.player_count,
            engine.config.seed
        );
        engine.open_round();
        engine.sync_public();
        Ok(engine)
    }

    pub fn add_observer(&mut self, observer: Box<dyn GameObserver>) {
        self.observers.push(observer);
    }

    // === Read access ===

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Seat records, roles included. Not for agents.
    #[must_use]
    pub fn players(&self) -> &PlayerMap<PlayerRecord> {
        &self.players
    }

    #[must_use]
    pub fn role(&self, player: PlayerId) -> Role {
        self.players[player].role
    }

    #[must_use]
    pub fn deck(&self) -> &PolicyDeck {
        &self.deck
    }

    #[must_use]
    pub fn public(&self) -> &PublicState {
        &self.public
    }

    /// Every committed action, in order.
    #[must_use]
    pub fn action_history(&self) -> &Vector<ActionRecord> {
        &self.actions
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.session.game_ended
    }

    #[must_use]
    pub fn winner(&self) -> Option<Team> {
        self.session.winner
    }

    #[must_use]
    pub fn win_reason(&self) -> Option<WinReason> {
        self.session.win_reason
    }

    /// Re-run the win check without changing anything.
    ///
    /// Once the game is over this keeps returning the recorded result.
    #[must_use]
    pub fn evaluate_win(&self) -> Option<WinReason> {
        self.session
            .win_reason
            .or_else(|| win::evaluate(&self.session, &self.players))
    }

    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.players.try_get(player).is_some_and(|r| r.alive)
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.players.values().filter(|r| r.alive).count()
    }

    pub fn living_players(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.players
            .iter()
            .filter(|(_, r)| r.alive)
            .map(|(p, _)| p)
    }

    /// What `player` may legitimately know right now.
    #[must_use]
    pub fn observation(&self, player: PlayerId) -> Observation {
        let record = &self.players[player];
        let investigations: OrdMap<PlayerId, _> = record
            .investigated
            .iter()
            .map(|target| (*target, self.players[*target].role.party()))
            .collect();
        Observation {
            player,
            role: record.role,
            investigations,
            hand: self.phase.hand_of(player),
            public: self.public.clone(),
        }
    }

    // === Decisions ===

    /// The decision the engine is waiting on. `None` once the game is over.
    ///
    /// During voting this is the lowest seat that has not voted yet.
    #[must_use]
    pub fn next_decision(&self) -> Option<Decision> {
        match &self.phase {
            Phase::Nomination { president } => {
                Some(Decision::new(*president, DecisionKind::Nominate))
            }
            Phase::Voting { votes, .. } => self
                .pending_voters(votes)
                .next()
                .map(|p| Decision::new(p, DecisionKind::Vote)),
            Phase::PresidentDiscard { government, .. } => {
                Some(Decision::new(government.president, DecisionKind::Discard))
            }
            Phase::ChancellorEnact { government, .. } => {
                Some(Decision::new(government.chancellor, DecisionKind::Enact))
            }
            Phase::VetoConsent { government, .. } => {
                Some(Decision::new(government.president, DecisionKind::VetoConsent))
            }
            Phase::Executive { president, power } => {
                let kind = match power {
                    ExecutivePower::Investigate => DecisionKind::Investigate,
                    ExecutivePower::SpecialElection => DecisionKind::DesignatePresident,
                    ExecutivePower::Execution => DecisionKind::Execute,
                };
                Some(Decision::new(*president, kind))
            }
            Phase::GameOver { .. } => None,
        }
    }

    /// Every player who currently has a decision to make.
    #[must_use]
    pub fn pending_players(&self) -> Vec<PlayerId> {
        match &self.phase {
            Phase::Voting { votes, .. } => self.pending_voters(votes).collect(),
            _ => self.next_decision().map(|d| d.player).into_iter().collect(),
        }
    }

    /// Legal actions for `player`. Empty when it is not their decision.
    #[must_use]
    pub fn legal_actions(&self, player: PlayerId) -> Vec<Action> {
        match &self.phase {
            Phase::Nomination { president } if *president == player => self
                .eligible_chancellors(player)
                .into_iter()
                .map(Action::Nominate)
                .collect(),
            Phase::Voting { votes, .. }
                if self.is_alive(player) && votes.try_get(player).is_some_and(Option::is_none) =>
            {
                vec![Action::Vote(Vote::Ja), Action::Vote(Vote::Nein)]
            }
            Phase::PresidentDiscard { government, drawn } if government.president == player => {
                distinct(drawn).into_iter().map(Action::Discard).collect()
            }
            Phase::ChancellorEnact {
                government,
                remaining,
                veto_refused,
            } if government.chancellor == player => {
                let mut actions: Vec<Action> =
                    distinct(remaining).into_iter().map(Action::Enact).collect();
                if !veto_refused && self.can_veto(government) {
                    actions.push(Action::Veto(true));
                }
                actions
            }
            Phase::VetoConsent { government, .. } if government.president == player => {
                vec![Action::Veto(true), Action::Veto(false)]
            }
            Phase::Executive { president, power } if *president == player => {
                let wrap = match power {
                    ExecutivePower::Investigate => Action::Investigate,
                    ExecutivePower::SpecialElection => Action::DesignatePresident,
                    ExecutivePower::Execution => Action::Execute,
                };
                self.power_targets(player, *power)
                    .into_iter()
                    .map(wrap)
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    /// Living players `president` may nominate.
    ///
    /// Excludes the president and, while enough players are alive, both
    /// members of the last elected government. If that leaves nobody the term
    /// limit is dropped.
    #[must_use]
    pub fn eligible_chancellors(&self, president: PlayerId) -> Vec<PlayerId> {
        let living: Vec<PlayerId> = self.living_players().filter(|p| *p != president).collect();
        let limited = self
            .session
            .term_limited
            .filter(|_| self.alive_count() >= self.config.term_limit_relaxation_below);

        let Some(limited) = limited else {
            return living;
        };
        let eligible: Vec<PlayerId> = living
            .iter()
            .copied()
            .filter(|p| !limited.includes(*p))
            .collect();
        if eligible.is_empty() {
            living
        } else {
            eligible
        }
    }

    // === Transitions ===

    /// Validate and commit one action.
    pub fn apply_action(&mut self, player: PlayerId, action: Action) -> GameResult<()> {
        if self.session.game_ended {
            return Err(GameError::PostTerminalMutation);
        }
        if !self.legal_actions(player).contains(&action) {
            return Err(GameError::IllegalAction {
                player,
                action,
                reason: self.illegal_reason(player, &action),
            });
        }

        let sequence = u32::try_from(self.actions.len()).unwrap_or(u32::MAX);
        self.actions
            .push_back(ActionRecord::new(player, action, self.session.round, sequence));
        self.emit(GameEvent::ActionCommitted { player, action });

        let result = self.resolve(player, action);
        self.sync_public();
        result
    }

    fn resolve(&mut self, player: PlayerId, action: Action) -> GameResult<()> {
        match (self.phase.clone(), action) {
            (Phase::Nomination { president }, Action::Nominate(chancellor)) => {
                let government = Government::new(president, chancellor);
                self.emit(GameEvent::ChancellorNominated { government });
                self.set_phase(Phase::Voting {
                    government,
                    votes: PlayerMap::with_value(self.config.player_count, None),
                });
                Ok(())
            }
            (Phase::Voting { government, mut votes }, Action::Vote(vote)) => {
                votes[player] = Some(vote);
                if self.pending_voters(&votes).next().is_some() {
                    self.phase = Phase::Voting { government, votes };
                    Ok(())
                } else {
                    self.resolve_election(government, &votes)
                }
            }
            (Phase::PresidentDiscard { government, drawn }, Action::Discard(policy)) => {
                let mut remaining = drawn;
                take_one(&mut remaining, policy);
                if remaining.len() != 2 {
                    return Err(GameError::InvalidEnactmentCount {
                        count: remaining.len(),
                    });
                }
                self.deck.discard_from_hand(policy)?;
                self.set_phase(Phase::ChancellorEnact {
                    government,
                    remaining,
                    veto_refused: false,
                });
                Ok(())
            }
            (Phase::ChancellorEnact { government, remaining, .. }, Action::Enact(policy)) => {
                self.chancellor_enact(government, remaining, policy)
            }
            (Phase::ChancellorEnact { government, remaining, .. }, Action::Veto(true)) => {
                self.emit(GameEvent::VetoProposed { chancellor: player });
                self.set_phase(Phase::VetoConsent {
                    government,
                    remaining,
                });
                Ok(())
            }
            (Phase::VetoConsent { government, remaining }, Action::Veto(approved)) => {
                self.emit(GameEvent::VetoResolved { approved });
                if approved {
                    for policy in remaining {
                        self.deck.discard_from_hand(policy)?;
                    }
                    self.advance_tracker()
                } else {
                    self.set_phase(Phase::ChancellorEnact {
                        government,
                        remaining,
                        veto_refused: true,
                    });
                    Ok(())
                }
            }
            (Phase::Executive { president, .. }, Action::Investigate(target)) => {
                self.players[president].investigated.insert(target);
                let party = self.players[target].role.party();
                self.emit(GameEvent::Investigated {
                    investigator: president,
                    target,
                    party,
                });
                self.open_round();
                Ok(())
            }
            (Phase::Executive { president, .. }, Action::DesignatePresident(target)) => {
                self.designated_president = Some(target);
                self.rotation_anchor = Some(president);
                self.emit(GameEvent::SpecialElectionCalled {
                    president,
                    designated: target,
                });
                self.open_round();
                Ok(())
            }
            (Phase::Executive { .. }, Action::Execute(target)) => {
                self.players[target].alive = false;
                if self.players[target].role.is_hitler() {
                    self.session.hitler_assassinated = true;
                }
                self.emit(GameEvent::PlayerExecuted { player: target });
                if !self.check_win() {
                    self.open_round();
                }
                Ok(())
            }
            (phase, action) => Err(GameError::IllegalAction {
                player,
                action,
                reason: format!("{} is not accepted during {:?}", action.verb(), phase.kind()),
            }),
        }
    }

    fn resolve_election(
        &mut self,
        government: Government,
        votes: &PlayerMap<Option<Vote>>,
    ) -> GameResult<()> {
        let ja = votes.values().filter(|v| **v == Some(Vote::Ja)).count();
        let nein = votes.values().filter(|v| **v == Some(Vote::Nein)).count();
        let elected = 2 * ja > self.alive_count();
        let (ja, nein) = (
            u8::try_from(ja).unwrap_or(u8::MAX),
            u8::try_from(nein).unwrap_or(u8::MAX),
        );

        self.session.history.push_back(ElectionRecord {
            round: self.session.round,
            government,
            ja,
            nein,
            elected,
        });
        self.emit(GameEvent::ElectionResolved {
            government,
            ja,
            nein,
            elected,
        });

        if !elected {
            return self.advance_tracker();
        }

        self.session.election_tracker = 0;
        self.session.government = Some(government);
        self.session.term_limited = Some(government);
        if self.check_win() {
            return Ok(());
        }

        if self.deck.prepare_draw(LEGISLATIVE_DRAW, &mut self.deck_rng)? {
            self.note_reshuffle();
        }
        let drawn = self.deck.draw_to_hand(LEGISLATIVE_DRAW)?;
        self.emit(GameEvent::PoliciesDrawn {
            president: government.president,
            policies: drawn.clone(),
        });
        self.set_phase(Phase::PresidentDiscard { government, drawn });
        Ok(())
    }

    fn chancellor_enact(
        &mut self,
        government: Government,
        mut remaining: PolicyHand,
        policy: Policy,
    ) -> GameResult<()> {
        if remaining.len() != 2 {
            return Err(GameError::InvalidEnactmentCount {
                count: remaining.len(),
            });
        }
        take_one(&mut remaining, policy);
        for leftover in remaining {
            self.deck.discard_from_hand(leftover)?;
        }
        self.enact(policy, false)?;
        if self.check_win() {
            return Ok(());
        }

        let power = match policy {
            Policy::Fascist => ExecutivePower::for_fascist_count(self.session.fascist_enacted),
            Policy::Liberal => None,
        };
        match power {
            Some(power) if !self.power_targets(government.president, power).is_empty() => {
                self.set_phase(Phase::Executive {
                    president: government.president,
                    power,
                });
            }
            Some(power) => {
                log::warn!("{power:?} has no legal target, skipping");
                self.open_round();
            }
            None => self.open_round(),
        }
        Ok(())
    }

    /// Count a failed election or an approved veto. On the third in a row the
    /// top policy is enacted as is.
    fn advance_tracker(&mut self) -> GameResult<()> {
        self.session.election_tracker += 1;
        self.emit(GameEvent::ElectionTrackerAdvanced {
            tracker: self.session.election_tracker,
        });

        if self.session.election_tracker >= ELECTION_TRACKER_LIMIT {
            if self.deck.prepare_draw(1, &mut self.deck_rng)? {
                self.note_reshuffle();
            }
            let top = self.deck.draw_to_hand(1)?;
            self.session.election_tracker = 0;
            self.session.term_limited = None;
            for policy in top {
                self.enact(policy, true)?;
            }
            if self.check_win() {
                return Ok(());
            }
        }

        self.open_round();
        Ok(())
    }

    fn enact(&mut self, policy: Policy, forced: bool) -> GameResult<()> {
        self.deck.enact_from_hand(policy)?;
        self.session.record_enactment(policy);
        self.public.note_enactment(policy);
        if self.session.veto_active() {
            for (_, record) in self.players.iter_mut() {
                record.veto_eligible = true;
            }
        }
        self.emit(GameEvent::PolicyEnacted { policy, forced });
        Ok(())
    }

    fn note_reshuffle(&mut self) {
        self.sync_public();
        self.public.note_reshuffle(self.config.deck);
        self.emit(GameEvent::DeckReshuffled {
            draw_pile: self.deck.len(),
        });
    }

    fn check_win(&mut self) -> bool {
        match win::evaluate(&self.session, &self.players) {
            Some(reason) => {
                self.session.finish(reason);
                self.set_phase(Phase::GameOver { reason });
                self.emit(GameEvent::GameEnded {
                    winner: reason.winner(),
                    reason,
                });
                true
            }
            None => false,
        }
    }

    /// Start the next election with the next presidential candidate.
    fn open_round(&mut self) {
        self.session.round += 1;
        self.session.government = None;

        let (president, special) = match self.designated_president.take() {
            Some(designated) => (designated, true),
            None => {
                let president = match self.rotation_anchor {
                    Some(anchor) => self.next_living_after(anchor),
                    None if self.is_alive(self.config.first_president) => {
                        self.config.first_president
                    }
                    None => self.next_living_after(self.config.first_president),
                };
                self.rotation_anchor = Some(president);
                (president, false)
            }
        };

        self.emit(GameEvent::RoundStarted {
            round: self.session.round,
            president,
            special,
        });
        self.set_phase(Phase::Nomination { president });
    }

    // === Helpers ===

    fn next_living_after(&self, seat: PlayerId) -> PlayerId {
        let n = self.config.player_count;
        let mut candidate = seat.next(n);
        for _ in 0..n {
            if self.players[candidate].alive {
                return candidate;
            }
            candidate = candidate.next(n);
        }
        seat
    }

    fn pending_voters<'a>(
        &'a self,
        votes: &'a PlayerMap<Option<Vote>>,
    ) -> impl Iterator<Item = PlayerId> + 'a {
        votes
            .iter()
            .filter(|(p, vote)| vote.is_none() && self.players[*p].alive)
            .map(|(p, _)| p)
    }

    fn can_veto(&self, government: &Government) -> bool {
        self.session.veto_active()
            && self.players[government.president].veto_eligible
            && self.players[government.chancellor].veto_eligible
    }

    fn was_investigated(&self, target: PlayerId) -> bool {
        self.players
            .values()
            .any(|record| record.investigated.contains(&target))
    }

    fn power_targets(&self, president: PlayerId, power: ExecutivePower) -> Vec<PlayerId> {
        self.living_players()
            .filter(|p| *p != president)
            .filter(|p| power != ExecutivePower::Investigate || !self.was_investigated(*p))
            .collect()
    }

    fn set_phase(&mut self, phase: Phase) {
        let from = self.phase.kind();
        let to = phase.kind();
        self.phase = phase;
        if from != to {
            self.emit(GameEvent::PhaseChanged { from, to });
        }
    }

    fn emit(&mut self, event: GameEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }

    fn sync_public(&mut self) {
        let (president, chancellor) = match &self.phase {
            Phase::Nomination { president } => (Some(*president), None),
            Phase::Executive { president, .. } => (
                Some(*president),
                self.session.government.map(|g| g.chancellor),
            ),
            Phase::GameOver { .. } => (
                self.session.government.map(|g| g.president),
                self.session.government.map(|g| g.chancellor),
            ),
            other => (
                other.government().map(|g| g.president),
                other.government().map(|g| g.chancellor),
            ),
        };

        let public = &mut self.public;
        public.phase = self.phase.kind();
        public.round = self.session.round;
        public.liberal_enacted = self.session.liberal_enacted;
        public.fascist_enacted = self.session.fascist_enacted;
        public.election_tracker = self.session.election_tracker;
        for (player, record) in self.players.iter() {
            public.alive[player] = record.alive;
        }
        public.veto_active = self.session.veto_active();
        public.draw_pile_len = self.deck.len();
        public.discard_len = self.deck.discard_len();
        public.held_len = self.deck.held_len();
        public.president = president;
        public.chancellor = chancellor;
        public.government = self.session.government;
        public.term_limited = self.session.term_limited;
        public.history = self.session.history.clone();
        public.hitler_assassinated = self.session.hitler_assassinated;
        public.game_ended = self.session.game_ended;
        public.winner = self.session.winner;
    }

    fn illegal_reason(&self, player: PlayerId, action: &Action) -> String {
        if !self.is_alive(player) {
            return format!("{player} is dead");
        }
        if let Phase::Voting { votes, .. } = &self.phase {
            if votes.try_get(player).is_some_and(Option::is_some) {
                return format!("{player} already voted");
            }
        }
        if !self.pending_players().contains(&player) {
            return format!("not {player}'s decision");
        }
        if let Some(target) = action.target() {
            if target == player {
                return "cannot target self".into();
            }
            if !self.is_alive(target) {
                return format!("{target} is dead");
            }
            let limited = self.session.term_limited.is_some_and(|g| g.includes(target));
            if matches!(action, Action::Nominate(_)) && limited {
                return format!("{target} is term-limited");
            }
            if matches!(action, Action::Investigate(_)) && self.was_investigated(target) {
                return format!("{target} was already investigated");
            }
        }
        format!("{} is not legal during {:?}", action.verb(), self.phase.kind())
    }
}

/// Distinct policies in a hand, in order of first appearance.
fn distinct(hand: &[Policy]) -> SmallVec<[Policy; 2]> {
    let mut out = SmallVec::new();
    for policy in hand {
        if !out.contains(policy) {
            out.push(*policy);
        }
    }
    out
}

fn take_one(hand: &mut PolicyHand, policy: Policy) {
    if let Some(index) = hand.iter().position(|p| *p == policy) {
        hand.remove(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingObserver;
    use crate::rules::PhaseKind;

    fn seats(n: u8) -> Vec<PlayerId> {
        (0..n).map(PlayerId::new).collect()
    }

    fn vote_all(engine: &mut Engine, vote: Vote) {
        while let Some(d) = engine.next_decision() {
            if d.kind != DecisionKind::Vote {
                break;
            }
            engine.apply_action(d.player, Action::Vote(vote)).unwrap();
        }
    }

    #[test]
    fn test_first_round() {
        let engine = Engine::new(GameConfig::new(5).with_seed(1)).unwrap();
        assert_eq!(engine.session().round, 1);
        assert_eq!(
            engine.next_decision(),
            Some(Decision::new(PlayerId::new(0), DecisionKind::Nominate))
        );
        assert_eq!(engine.public().phase, PhaseKind::Election);
        assert_eq!(engine.deck().len(), 17);
    }

    #[test]
    fn test_roles_follow_table() {
        let engine = Engine::new(GameConfig::new(7).with_seed(3)).unwrap();
        let roles: Vec<Role> = seats(7).into_iter().map(|p| engine.role(p)).collect();
        assert_eq!(roles.iter().filter(|r| **r == Role::Liberal).count(), 4);
        assert_eq!(roles.iter().filter(|r| **r == Role::Fascist).count(), 2);
        assert_eq!(roles.iter().filter(|r| r.is_hitler()).count(), 1);
    }

    #[test]
    fn test_same_seed_same_game() {
        let a = Engine::new(GameConfig::new(6).with_seed(11)).unwrap();
        let b = Engine::new(GameConfig::new(6).with_seed(11)).unwrap();
        for p in seats(6) {
            assert_eq!(a.role(p), b.role(p));
        }
        assert_eq!(a.deck().peek_top(), b.deck().peek_top());
    }

    #[test]
    fn test_wrong_player_is_rejected_without_change() {
        let mut engine = Engine::new(GameConfig::new(5).with_seed(1)).unwrap();
        let before = engine.session().clone();
        let err = engine
            .apply_action(PlayerId::new(2), Action::Nominate(PlayerId::new(3)))
            .unwrap_err();
        assert!(matches!(err, GameError::IllegalAction { .. }));
        assert!(!err.is_fatal());
        assert_eq!(engine.session(), &before);
        assert!(engine.action_history().is_empty());
    }

    #[test]
    fn test_double_vote_rejected() {
        let mut engine = Engine::new(GameConfig::new(5).with_seed(1)).unwrap();
        engine
            .apply_action(PlayerId::new(0), Action::Nominate(PlayerId::new(1)))
            .unwrap();
        engine
            .apply_action(PlayerId::new(3), Action::Vote(Vote::Ja))
            .unwrap();
        let err = engine
            .apply_action(PlayerId::new(3), Action::Vote(Vote::Nein))
            .unwrap_err();
        match err {
            GameError::IllegalAction { reason, .. } => assert!(reason.contains("already voted")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_successful_election_draws_three() {
        let mut engine = Engine::new(GameConfig::new(5).with_seed(2)).unwrap();
        engine
            .apply_action(PlayerId::new(0), Action::Nominate(PlayerId::new(2)))
            .unwrap();
        vote_all(&mut engine, Vote::Ja);

        assert_eq!(engine.public().phase, PhaseKind::Legislative);
        assert_eq!(engine.deck().len(), 14);
        assert_eq!(engine.observation(PlayerId::new(0)).hand.len(), 3);
        assert!(engine.observation(PlayerId::new(2)).hand.is_empty());
        assert_eq!(
            engine.session().term_limited,
            Some(Government::new(PlayerId::new(0), PlayerId::new(2)))
        );
    }

    #[test]
    fn test_failed_election_rotates_president() {
        let mut engine = Engine::new(GameConfig::new(5).with_seed(2)).unwrap();
        engine
            .apply_action(PlayerId::new(0), Action::Nominate(PlayerId::new(2)))
            .unwrap();
        vote_all(&mut engine, Vote::Nein);

        assert_eq!(engine.session().election_tracker, 1);
        assert_eq!(engine.session().history.len(), 1);
        assert!(!engine.session().history[0].elected);
        assert_eq!(
            engine.next_decision(),
            Some(Decision::new(PlayerId::new(1), DecisionKind::Nominate))
        );
    }

    #[test]
    fn test_tied_vote_fails_and_is_recorded() {
        let mut engine = Engine::new(GameConfig::new(10).with_seed(4)).unwrap();
        engine
            .apply_action(PlayerId::new(0), Action::Nominate(PlayerId::new(5)))
            .unwrap();
        let mut cast = 0;
        while let Some(d) = engine.next_decision() {
            if d.kind != DecisionKind::Vote {
                break;
            }
            let vote = if cast < 5 { Vote::Ja } else { Vote::Nein };
            engine.apply_action(d.player, Action::Vote(vote)).unwrap();
            cast += 1;
        }

        let record = engine.session().history[0];
        assert_eq!((record.ja, record.nein), (5, 5));
        assert!(!record.elected);
        assert_eq!(engine.public().history[0], record);
    }

    #[test]
    fn test_distinct_hand_options() {
        let hand: PolicyHand = smallvec::smallvec![Policy::Fascist, Policy::Liberal, Policy::Fascist];
        assert_eq!(distinct(&hand).as_slice(), &[Policy::Fascist, Policy::Liberal]);
    }

    #[test]
    fn test_observers_see_first_round() {
        let recorder = RecordingObserver::new();
        let _engine = Engine::with_observers(
            GameConfig::new(5).with_seed(4),
            vec![Box::new(recorder.clone())],
        )
        .unwrap();
        assert_eq!(
            recorder.events(),
            vec![GameEvent::RoundStarted {
                round: 1,
                president: PlayerId::new(0),
                special: false,
            }]
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = Engine::new(GameConfig::new(4)).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfig(_)));
    }
}
