//! Self-play loop for generating training data.
//!
//! Each game gets its own engine and agents, seeded with
//! `seed_offset + game_index`. The runner drives the engine one decision at a
//! time, records a [`Transition`] for every action a learner seat commits and
//! hands a [`GameSummary`] to the sink once the game is over.
//!
//! ## Failure policy
//!
//! An agent answering with an illegal action is logged and a uniformly random
//! legal action is played in its place. Fatal engine errors drop the game;
//! the run carries on with the next seed.

use rustc_hash::FxHashMap;

use crate::agents::{Agent, RandomAgent};
use crate::core::{
    Action, GameConfig, GameResult, GameRng, Observation, PlayerId, PlayerMap, Team, WinReason,
};
use crate::events::{GameObserver, LogObserver};
use crate::nn::{ActionSpace, FeatureEncoder, Learner, StateEncoder};
use crate::rules::Engine;

use super::reward::{DefaultReward, RewardFn};
use super::sink::{GameSummary, SummarySink};
use super::trajectory::{ReplayBuffer, Trajectory, Transition};

/// Configuration for self-play.
#[derive(Clone, Debug)]
pub struct SelfPlayConfig {
    /// Seats at the table, 5 to 10.
    pub player_count: usize,

    /// Games per call to [`SelfPlayRunner::run`].
    pub games: usize,

    /// Seed offset for RNG (combined with game index for unique seeds).
    pub seed_offset: u64,

    /// Seats whose transitions are recorded. `None` records every seat.
    pub learner_seats: Option<Vec<PlayerId>>,

    /// Hard cap on committed actions per game.
    pub max_actions: usize,

    /// Term limits stop applying once fewer players than this are alive.
    pub term_limit_relaxation_below: usize,

    /// Attach a [`LogObserver`] to every engine.
    pub log_events: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            player_count: 7,
            games: 100,
            seed_offset: 0,
            learner_seats: None,
            max_actions: 2_000,
            term_limit_relaxation_below: crate::core::DEFAULT_TERM_LIMIT_RELAXATION,
            log_events: false,
        }
    }
}

impl SelfPlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_player_count(mut self, player_count: usize) -> Self {
        self.player_count = player_count;
        self
    }

    pub fn with_games(mut self, games: usize) -> Self {
        self.games = games;
        self
    }

    pub fn with_seed_offset(mut self, offset: u64) -> Self {
        self.seed_offset = offset;
        self
    }

    /// Record only these seats.
    pub fn with_learner_seats(mut self, seats: Vec<PlayerId>) -> Self {
        self.learner_seats = Some(seats);
        self
    }

    pub fn with_max_actions(mut self, max: usize) -> Self {
        self.max_actions = max;
        self
    }

    pub fn with_term_limit_relaxation(mut self, below: usize) -> Self {
        self.term_limit_relaxation_below = below;
        self
    }

    pub fn with_event_logging(mut self, enabled: bool) -> Self {
        self.log_events = enabled;
        self
    }

    /// Seed of the `index`-th game.
    pub fn game_seed(&self, index: usize) -> u64 {
        self.seed_offset.wrapping_add(index as u64)
    }

    /// Table configuration for one game.
    pub fn game_config(&self, seed: u64) -> GameConfig {
        GameConfig::new(self.player_count)
            .with_seed(seed)
            .with_term_limit_relaxation(self.term_limit_relaxation_below)
    }

    pub fn is_learner(&self, player: PlayerId) -> bool {
        match &self.learner_seats {
            Some(seats) => seats.contains(&player),
            None => true,
        }
    }
}

/// One played game. `summary.winner` is `None` if it was cut off at
/// `max_actions`.
#[derive(Clone, Debug)]
pub struct GameRecord {
    pub trajectory: Trajectory,
    pub summary: GameSummary,
    /// Illegal agent answers replaced by a random legal action.
    pub substitutions: usize,
}

/// Totals over a run.
#[derive(Clone, Debug, Default)]
pub struct RunStats {
    pub games_played: usize,
    pub games_failed: usize,
    /// Games that hit `max_actions` before ending. They are neither
    /// summarised nor counted as played.
    pub games_truncated: usize,
    pub liberal_wins: usize,
    pub fascist_wins: usize,
    pub reasons: FxHashMap<WinReason, usize>,
    pub actions: usize,
    pub transitions: usize,
    pub substitutions: usize,
}

impl RunStats {
    /// Count a game. Returns `false` for a truncated game, which only bumps
    /// `games_truncated`.
    fn record(&mut self, record: &GameRecord) -> bool {
        match record.summary.winner {
            Some(Team::Liberals) => self.liberal_wins += 1,
            Some(Team::Fascists) => self.fascist_wins += 1,
            None => {
                self.games_truncated += 1;
                return false;
            }
        }
        self.games_played += 1;
        self.actions += record.summary.actions;
        self.transitions += record.trajectory.len();
        self.substitutions += record.substitutions;
        if let Some(reason) = record.summary.win_reason {
            *self.reasons.entry(reason).or_insert(0) += 1;
        }
        true
    }

    /// Share of finished games won by `team`.
    pub fn win_rate(&self, team: Team) -> f64 {
        let finished = self.liberal_wins + self.fascist_wins;
        if finished == 0 {
            return 0.0;
        }
        let wins = match team {
            Team::Liberals => self.liberal_wins,
            Team::Fascists => self.fascist_wins,
        };
        wins as f64 / finished as f64
    }
}

/// Result of [`SelfPlayRunner::run`].
#[derive(Clone, Debug, Default)]
pub struct RunReport {
    pub trajectories: Vec<Trajectory>,
    pub stats: RunStats,
}

/// Drives batches of games and collects transitions.
///
/// ```
/// use secret_hitler_rl::agents::{Agent, RandomAgent};
/// use secret_hitler_rl::training::{MemorySink, SelfPlayConfig, SelfPlayRunner};
///
/// let runner = SelfPlayRunner::new(SelfPlayConfig::default().with_games(3).with_player_count(5));
/// let mut sink = MemorySink::new();
/// let report = runner.run(|_, seed| Box::new(RandomAgent::new(seed)) as Box<dyn Agent>, &mut sink);
/// assert_eq!(report.stats.games_played, 3);
/// assert_eq!(sink.len(), 3);
/// ```
pub struct SelfPlayRunner<R: RewardFn = DefaultReward> {
    config: SelfPlayConfig,
    reward: R,
    encoder: FeatureEncoder,
    space: ActionSpace,
}

impl SelfPlayRunner {
    pub fn new(config: SelfPlayConfig) -> Self {
        Self::with_reward(config, DefaultReward::default())
    }
}

impl<R: RewardFn> SelfPlayRunner<R> {
    pub fn with_reward(config: SelfPlayConfig, reward: R) -> Self {
        let encoder = FeatureEncoder::new(config.player_count);
        let space = ActionSpace::new(config.player_count);
        Self {
            config,
            reward,
            encoder,
            space,
        }
    }

    pub fn config(&self) -> &SelfPlayConfig {
        &self.config
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    pub fn action_space(&self) -> &ActionSpace {
        &self.space
    }

    /// Play `config.games` games. `make_agent` is called once per seat per
    /// game with the seat and a seat-specific seed.
    pub fn run<F>(&self, make_agent: F, sink: &mut dyn SummarySink) -> RunReport
    where
        F: FnMut(PlayerId, u64) -> Box<dyn Agent>,
    {
        let mut trajectories = Vec::new();
        let mut stats = RunStats::default();
        self.run_with(make_agent, sink, |t| trajectories.push(t), &mut stats);
        RunReport {
            trajectories,
            stats,
        }
    }

    /// Like [`Self::run`], feeding transitions into `buffer` and training
    /// `learner` on one batch after every game.
    pub fn run_training<F, L>(
        &self,
        make_agent: F,
        sink: &mut dyn SummarySink,
        buffer: &mut ReplayBuffer,
        learner: &mut L,
        batch_size: usize,
    ) -> RunStats
    where
        F: FnMut(PlayerId, u64) -> Box<dyn Agent>,
        L: Learner + ?Sized,
    {
        let mut stats = RunStats::default();
        let mut step = 0u64;
        let seed_offset = self.config.seed_offset;
        self.run_with(
            make_agent,
            sink,
            |trajectory| {
                buffer.extend(trajectory);
                buffer.train(&mut *learner, batch_size, seed_offset.wrapping_add(step));
                step += 1;
            },
            &mut stats,
        );
        stats
    }

    fn run_with<F, T>(
        &self,
        mut make_agent: F,
        sink: &mut dyn SummarySink,
        mut on_trajectory: T,
        stats: &mut RunStats,
    ) where
        F: FnMut(PlayerId, u64) -> Box<dyn Agent>,
        T: FnMut(Trajectory),
    {
        for index in 0..self.config.games {
            let seed = self.config.game_seed(index);
            let mut agents: Vec<Box<dyn Agent>> = PlayerId::all(self.config.player_count)
                .map(|seat| make_agent(seat, seat_seed(seed, seat)))
                .collect();

            match self.play_game(seed, &mut agents) {
                Ok(record) => {
                    if stats.record(&record) {
                        sink.record(&record.summary);
                        on_trajectory(record.trajectory);
                    }
                }
                Err(err) => {
                    stats.games_failed += 1;
                    log::error!("game {index} (seed {seed}) dropped: {err}");
                }
            }
        }
        log::info!(
            "self-play finished: {} played, {} dropped, {} truncated, liberal {} / fascist {}",
            stats.games_played,
            stats.games_failed,
            stats.games_truncated,
            stats.liberal_wins,
            stats.fascist_wins
        );
    }

    /// Play one game to the end with the given agents, one per seat.
    pub fn play_game(&self, seed: u64, agents: &mut [Box<dyn Agent>]) -> GameResult<GameRecord> {
        let mut observers: Vec<Box<dyn GameObserver>> = Vec::new();
        if self.config.log_events {
            observers.push(Box::new(LogObserver::new().with_label(format!("seed {seed}"))));
        }
        let mut engine = Engine::with_observers(self.config.game_config(seed), observers)?;
        let player_count = self.config.player_count;

        let mut fallback_rng = GameRng::new(seed).for_context("substitute");
        let mut trajectory = Trajectory::new(seed, player_count);
        let mut last: PlayerMap<Option<(Observation, Action)>> =
            PlayerMap::with_default(player_count);
        let mut substitutions = 0;

        while let Some(decision) = engine.next_decision() {
            if engine.action_history().len() >= self.config.max_actions {
                log::warn!(
                    "seed {seed}: stopping after {} actions without a winner",
                    self.config.max_actions
                );
                break;
            }

            let player = decision.player;
            let prev = engine.observation(player);
            let legal = engine.legal_actions(player);
            let Some(agent) = agents.get_mut(player.index()) else {
                log::error!("seed {seed}: no agent seated at {player}");
                break;
            };
            let mut action = agent.act(&prev, &decision, &legal);

            if let Err(err) = engine.apply_action(player, action) {
                if err.is_fatal() {
                    return Err(err);
                }
                log::warn!("seed {seed}: {err}; playing a random legal action instead");
                substitutions += 1;
                action = match fallback_rng.choose(&legal) {
                    Some(substitute) => *substitute,
                    None => return Err(err),
                };
                engine.apply_action(player, action)?;
            }

            if !self.config.is_learner(player) {
                continue;
            }
            let next = engine.observation(player);
            let done = next.public.game_ended;
            trajectory.push(Transition {
                state: self.encoder.encode(&prev),
                action,
                action_index: self.space.index(&action).unwrap_or(0),
                legal_index: legal.iter().position(|a| *a == action).unwrap_or(0),
                legal_count: legal.len(),
                reward: self.reward.reward(&prev, &next, &action, done),
                next_state: self.encoder.encode(&next),
                done,
                player,
            });
            last[player] = Some((prev, action));
        }

        if engine.is_terminal() {
            self.rescore_final(&engine, &mut trajectory, &last);
        }

        trajectory.winner = engine.winner();
        trajectory.win_reason = engine.win_reason();
        let summary = GameSummary::from_engine(&engine);
        log::debug!(
            "seed {seed}: {:?} after {} actions",
            summary.win_reason,
            summary.actions
        );
        Ok(GameRecord {
            trajectory,
            summary,
            substitutions,
        })
    }

    /// Every learner's last transition becomes terminal, scored against the
    /// final observation.
    fn rescore_final(
        &self,
        engine: &Engine,
        trajectory: &mut Trajectory,
        last: &PlayerMap<Option<(Observation, Action)>>,
    ) {
        for (player, entry) in last.iter() {
            let Some((prev, action)) = entry else {
                continue;
            };
            let Some(transition) = trajectory.last_for_player_mut(player) else {
                continue;
            };
            if transition.done {
                continue;
            }
            let last_obs = engine.observation(player);
            transition.reward = self.reward.reward(prev, &last_obs, action, true);
            transition.next_state = self.encoder.encode(&last_obs);
            transition.done = true;
        }
    }
}

/// Seed for one seat's agent, distinct across seats of the same game.
pub fn seat_seed(game_seed: u64, seat: PlayerId) -> u64 {
    game_seed
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(u64::from(seat.0) + 1)
}

/// Random agents at every seat.
pub fn random_agents(_seat: PlayerId, seed: u64) -> Box<dyn Agent> {
    Box::new(RandomAgent::new(seed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::CountingLearner;
    use crate::training::{MemorySink, NullSink};

    #[test]
    fn test_config_builder() {
        let config = SelfPlayConfig::new()
            .with_player_count(6)
            .with_games(4)
            .with_seed_offset(100)
            .with_learner_seats(vec![PlayerId::new(2)])
            .with_max_actions(50);

        assert_eq!(config.player_count, 6);
        assert_eq!(config.game_seed(3), 103);
        assert!(config.is_learner(PlayerId::new(2)));
        assert!(!config.is_learner(PlayerId::new(0)));
        assert_eq!(config.game_config(7).seed, 7);
        assert!(SelfPlayConfig::default().is_learner(PlayerId::new(6)));
    }

    #[test]
    fn test_random_games_finish() {
        let config = SelfPlayConfig::default().with_games(10).with_player_count(7);
        let runner = SelfPlayRunner::new(config);
        let mut sink = MemorySink::new();
        let report = runner.run(random_agents, &mut sink);

        assert_eq!(report.stats.games_played, 10);
        assert_eq!(report.stats.games_failed, 0);
        assert_eq!(report.stats.games_truncated, 0);
        assert_eq!(report.stats.liberal_wins + report.stats.fascist_wins, 10);
        assert_eq!(report.stats.substitutions, 0);
        assert_eq!(report.trajectories.len(), 10);
        assert_eq!(sink.len(), 10);
    }

    #[test]
    fn test_every_learner_ends_done() {
        let runner = SelfPlayRunner::new(SelfPlayConfig::default().with_player_count(5));
        let mut agents: Vec<Box<dyn Agent>> = PlayerId::all(5)
            .map(|seat| random_agents(seat, seat_seed(9, seat)))
            .collect();
        let record = runner.play_game(9, &mut agents).unwrap();
        let traj = &record.trajectory;

        assert!(traj.winner.is_some());
        for seat in PlayerId::all(5) {
            let transitions: Vec<&Transition> = traj.player_transitions(seat).collect();
            let Some(last) = transitions.last() else {
                continue;
            };
            assert!(last.done);
            assert!(last.reward.abs() >= 90.0);
            assert!(transitions[..transitions.len() - 1].iter().all(|t| !t.done));
        }
    }

    #[test]
    fn test_learner_seats_filter() {
        let config = SelfPlayConfig::default()
            .with_player_count(5)
            .with_learner_seats(vec![PlayerId::new(1)]);
        let runner = SelfPlayRunner::new(config);
        let mut agents: Vec<Box<dyn Agent>> = PlayerId::all(5)
            .map(|seat| random_agents(seat, u64::from(seat.0)))
            .collect();
        let record = runner.play_game(4, &mut agents).unwrap();
        assert!(!record.trajectory.is_empty());
        assert!(record
            .trajectory
            .transitions
            .iter()
            .all(|t| t.player == PlayerId::new(1)));
    }

    #[test]
    fn test_runs_are_reproducible() {
        let runner = SelfPlayRunner::new(SelfPlayConfig::default().with_games(3));
        let a = runner.run(random_agents, &mut NullSink);
        let b = runner.run(random_agents, &mut NullSink);
        assert_eq!(a.trajectories, b.trajectories);
    }

    #[test]
    fn test_run_training_feeds_learner() {
        let runner = SelfPlayRunner::new(SelfPlayConfig::default().with_games(2));
        let mut buffer = ReplayBuffer::new(10_000);
        let mut learner = CountingLearner::default();
        let stats = runner.run_training(random_agents, &mut NullSink, &mut buffer, &mut learner, 16);

        assert_eq!(stats.games_played, 2);
        assert_eq!(learner.batches, 2);
        assert_eq!(learner.transitions, 32);
        assert_eq!(buffer.len(), stats.transitions);
    }

    #[test]
    fn test_truncated_games_are_not_summarised() {
        let config = SelfPlayConfig::default()
            .with_games(2)
            .with_player_count(5)
            .with_max_actions(3);
        let runner = SelfPlayRunner::new(config);
        let mut sink = MemorySink::new();
        let report = runner.run(random_agents, &mut sink);

        assert_eq!(report.stats.games_truncated, 2);
        assert_eq!(report.stats.games_played, 0);
        assert_eq!(report.stats.actions, 0);
        assert_eq!(report.stats.transitions, 0);
        assert!(report.stats.reasons.is_empty());
        assert!(report.trajectories.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn test_truncated_game_record_has_no_winner() {
        let runner = SelfPlayRunner::new(
            SelfPlayConfig::default()
                .with_player_count(5)
                .with_max_actions(3),
        );
        let mut agents: Vec<Box<dyn Agent>> = PlayerId::all(5)
            .map(|seat| random_agents(seat, seat_seed(1, seat)))
            .collect();
        let record = runner.play_game(1, &mut agents).unwrap();

        assert_eq!(record.summary.winner, None);
        assert_eq!(record.summary.actions, 3);
        assert!(record.trajectory.transitions.iter().all(|t| !t.done));
    }

    #[test]
    fn test_win_rate() {
        let mut stats = RunStats::default();
        assert_eq!(stats.win_rate(Team::Liberals), 0.0);
        stats.liberal_wins = 1;
        stats.fascist_wins = 3;
        assert_eq!(stats.win_rate(Team::Fascists), 0.75);
    }
}
